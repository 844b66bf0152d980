//! OHLCV bar representation.

use chrono::NaiveDate;

/// Closes at or below this threshold are treated as absent for valuation
/// and execution.
pub const PRICE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct OhlcvBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    /// Whether the close is usable as a valuation/execution reference.
    pub fn has_usable_close(&self) -> bool {
        self.close > PRICE_EPSILON
    }
}
