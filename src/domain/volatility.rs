//! Trailing volatility estimation for position sizing.

use chrono::{Duration, NaiveDate};

use crate::domain::metrics::TRADING_DAYS_PER_YEAR;
use crate::domain::ohlcv::OhlcvBar;

/// Calendar days of history feeding one estimate.
pub const VOLATILITY_LOOKBACK_DAYS: i64 = 40;

/// Minimum close-over-close returns required before the estimate is trusted.
pub const MIN_RETURN_OBSERVATIONS: usize = 10;

/// Annualized volatility assumed when the window is too thin or degenerate.
pub const FALLBACK_VOLATILITY: f64 = 0.20;

/// Annualized volatility of an asset's returns over the trailing
/// [`VOLATILITY_LOOKBACK_DAYS`] ending at `as_of`.
///
/// Bars after `as_of` never contribute. Unusable closes are skipped, so a
/// gap makes the two surrounding closes adjacent. Returns
/// [`FALLBACK_VOLATILITY`] when fewer than [`MIN_RETURN_OBSERVATIONS`]
/// returns are available or the estimate is non-positive.
pub fn trailing_volatility(bars: &[OhlcvBar], as_of: NaiveDate) -> f64 {
    let window_start = as_of - Duration::days(VOLATILITY_LOOKBACK_DAYS);

    let closes: Vec<f64> = bars
        .iter()
        .filter(|bar| bar.date > window_start && bar.date <= as_of && bar.has_usable_close())
        .map(|bar| bar.close)
        .collect();

    if closes.len() < MIN_RETURN_OBSERVATIONS + 1 {
        return FALLBACK_VOLATILITY;
    }

    let returns: Vec<f64> = closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect();
    let volatility = population_std(&returns) * TRADING_DAYS_PER_YEAR.sqrt();

    if volatility <= 0.0 {
        FALLBACK_VOLATILITY
    } else {
        volatility
    }
}

fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
