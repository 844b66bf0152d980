//! Latency and spread execution-cost model.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::order_book::Side;

/// Milliseconds in a 6.5-hour trading day.
pub const MS_PER_TRADING_DAY: f64 = 23_400_000.0;

/// Fixed proportional spread cost per side: one basis point.
pub const SPREAD_COST_RATE: f64 = 0.0001;

/// Immutable execution-friction configuration for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutionConfig {
    pub mean_latency_ms: f64,
    pub std_latency_ms: f64,
    /// Quoted spread for synthetic bid/ask derivation, in basis points.
    pub spread_bps: f64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            mean_latency_ms: 100.0,
            std_latency_ms: 20.0,
            spread_bps: 5.0,
        }
    }
}

/// Samples order latency and produces slippage-adjusted execution prices.
///
/// Prices only ever move against the trader: the latency shock is applied
/// by absolute value and the spread cost is paid on both sides. The model
/// represents cost, never benefit.
#[derive(Debug, Clone)]
pub struct ExecutionCostModel {
    config: ExecutionConfig,
    rng: StdRng,
}

impl ExecutionCostModel {
    pub fn new(config: ExecutionConfig) -> Self {
        ExecutionCostModel {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Fixed-seed constructor for reproducible runs.
    pub fn with_seed(config: ExecutionConfig, seed: u64) -> Self {
        ExecutionCostModel {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// One latency draw in milliseconds: Normal(mean, std) floored at zero.
    /// Negative draws clamp, they are not resampled.
    pub fn sample_latency_ms(&mut self) -> f64 {
        sample_normal(
            &mut self.rng,
            self.config.mean_latency_ms,
            self.config.std_latency_ms,
        )
        .max(0.0)
    }

    /// Execution price against `reference_price` for an order of `side`.
    ///
    /// The reference drifts by `N(0,1) * vol * price * sqrt(latency /
    /// trading day)` during the latency window; the drift's absolute value
    /// plus a one-basis-point spread is charged against the trader.
    pub fn execution_price(
        &mut self,
        side: Side,
        reference_price: f64,
        annualized_volatility: f64,
    ) -> f64 {
        let latency_ms = self.sample_latency_ms();
        let time_fraction = latency_ms / MS_PER_TRADING_DAY;
        let shock = sample_normal(&mut self.rng, 0.0, 1.0)
            * annualized_volatility
            * reference_price
            * time_fraction.sqrt();
        let spread_cost = reference_price * SPREAD_COST_RATE;

        match side {
            Side::Buy => reference_price + spread_cost + shock.abs(),
            Side::Sell => reference_price - spread_cost - shock.abs(),
        }
    }
}

/// Box-Muller transform over two uniform draws.
fn sample_normal(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen_range(0.0..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}
