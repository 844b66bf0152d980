//! Signal-generating strategies.

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::signal::{SIGNAL_FLAT, SIGNAL_LONG, SignalSeries};

/// Maps one asset's bar history to a target-position series, once per run.
/// Implementations see the full history at generation time; any look-ahead
/// discipline is theirs to enforce, not the engine's.
pub trait Strategy {
    fn name(&self) -> &str;
    fn generate_signals(&self, bars: &[OhlcvBar]) -> SignalSeries;
}

/// Long while the short SMA sits strictly above the long SMA, flat
/// otherwise.
///
/// Both averages use an expanding warmup (over fewer bars than the window,
/// the mean of what is available), so a signal exists from the first bar.
#[derive(Debug, Clone)]
pub struct SmaCrossover {
    pub short_window: usize,
    pub long_window: usize,
}

impl SmaCrossover {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        SmaCrossover {
            short_window,
            long_window,
        }
    }
}

impl Default for SmaCrossover {
    fn default() -> Self {
        SmaCrossover {
            short_window: 50,
            long_window: 200,
        }
    }
}

impl Strategy for SmaCrossover {
    fn name(&self) -> &str {
        "sma-crossover"
    }

    fn generate_signals(&self, bars: &[OhlcvBar]) -> SignalSeries {
        let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
        let short = rolling_mean(&closes, self.short_window);
        let long = rolling_mean(&closes, self.long_window);

        let mut series = SignalSeries::new();
        for (i, bar) in bars.iter().enumerate() {
            let target = if short[i] > long[i] {
                SIGNAL_LONG
            } else {
                SIGNAL_FLAT
            };
            series.set(bar.date, target);
        }
        series
    }
}

/// Target long on every bar.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuyAndHold;

impl Strategy for BuyAndHold {
    fn name(&self) -> &str {
        "buy-and-hold"
    }

    fn generate_signals(&self, bars: &[OhlcvBar]) -> SignalSeries {
        let mut series = SignalSeries::new();
        for bar in bars {
            series.set(bar.date, SIGNAL_LONG);
        }
        series
    }
}

/// Trailing mean at each index over up to `window` values.
fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for i in 0..values.len() {
        sum += values[i];
        if i >= window {
            sum -= values[i - window];
        }
        let count = (i + 1).min(window);
        out.push(sum / count as f64);
    }
    out
}
