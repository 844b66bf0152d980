//! Plain-text report adapter.
//!
//! Writes a run summary to the output path and the equity curve as a CSV
//! sibling (`<output>.csv` with the extension swapped).

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::domain::engine::SimulationResult;
use crate::domain::error::QuantsimError;
use crate::domain::metrics::Metrics;
use crate::ports::report_port::ReportPort;

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }

    fn render_summary(
        result: &SimulationResult,
        metrics: &Metrics,
        strategy_name: &str,
    ) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "quantsim run summary");
        let _ = writeln!(out, "====================");
        let _ = writeln!(out, "Strategy:              {}", strategy_name);
        if let (Some(first), Some(last)) = (result.daily.first(), result.daily.last()) {
            let _ = writeln!(out, "Period:                {} to {}", first.date, last.date);
        }
        let _ = writeln!(out, "Simulated dates:       {}", result.daily.len());
        let _ = writeln!(out, "Trades executed:       {}", result.ledger.trades.len());
        let _ = writeln!(
            out,
            "Kill switch:           {}",
            if result.kill_switch_triggered {
                "TRIGGERED"
            } else {
                "not triggered"
            }
        );
        let _ = writeln!(
            out,
            "Initial capital:       {:.2}",
            result.ledger.initial_capital
        );
        let _ = writeln!(out, "Final value:           {:.2}", result.final_value());
        let _ = writeln!(out);
        let _ = writeln!(out, "Total return:          {:.2}%", metrics.total_return * 100.0);
        let _ = writeln!(
            out,
            "Annualized return:     {:.2}%",
            metrics.annualized_return * 100.0
        );
        let _ = writeln!(
            out,
            "Annualized volatility: {:.2}%",
            metrics.annualized_volatility * 100.0
        );
        let _ = writeln!(out, "Sharpe ratio:          {:.2}", metrics.sharpe_ratio);
        let _ = writeln!(out, "Sortino ratio:         {:.2}", metrics.sortino_ratio);
        let _ = writeln!(out, "Max drawdown:          {:.2}%", metrics.max_drawdown * 100.0);
        let _ = writeln!(out, "VaR (95%):             {:.2}%", metrics.var_95 * 100.0);
        let _ = writeln!(out, "CVaR (95%):            {:.2}%", metrics.cvar_95 * 100.0);
        out
    }

    fn write_equity_csv(
        result: &SimulationResult,
        path: &Path,
    ) -> Result<(), QuantsimError> {
        let mut writer = csv::Writer::from_path(path).map_err(|e| QuantsimError::Data {
            reason: format!("failed to create {}: {}", path.display(), e),
        })?;
        writer
            .write_record(["date", "portfolio_value", "period_return"])
            .map_err(|e| QuantsimError::Data {
                reason: format!("CSV write error: {}", e),
            })?;
        for day in &result.daily {
            writer
                .write_record([
                    day.date.to_string(),
                    format!("{:.6}", day.portfolio_value),
                    format!("{:.8}", day.period_return),
                ])
                .map_err(|e| QuantsimError::Data {
                    reason: format!("CSV write error: {}", e),
                })?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        result: &SimulationResult,
        metrics: &Metrics,
        strategy_name: &str,
        output_path: &Path,
    ) -> Result<(), QuantsimError> {
        let summary = Self::render_summary(result, metrics, strategy_name);
        fs::write(output_path, summary)?;

        let equity_path = output_path.with_extension("csv");
        Self::write_equity_csv(result, &equity_path)
    }
}
