//! Data access port trait.

use crate::domain::error::QuantsimError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

/// Supplies historical bars per symbol. Gaps inside the returned range are
/// the engine's responsibility to forward-fill, not the port's.
pub trait DataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, QuantsimError>;

    fn list_symbols(&self) -> Result<Vec<String>, QuantsimError>;
}
