//! Report generation port trait.

use std::path::Path;

use crate::domain::engine::SimulationResult;
use crate::domain::error::QuantsimError;
use crate::domain::metrics::Metrics;

/// Port for writing a finished run's series and metrics.
pub trait ReportPort {
    fn write(
        &self,
        result: &SimulationResult,
        metrics: &Metrics,
        strategy_name: &str,
        output_path: &Path,
    ) -> Result<(), QuantsimError>;
}
