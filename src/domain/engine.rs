//! Time-stepped simulation loop.
//!
//! Replays the unified bar timeline through valuation, risk, and execution
//! passes, mutating one [`PortfolioLedger`] per run.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::error::QuantsimError;
use crate::domain::execution::{ExecutionConfig, ExecutionCostModel};
use crate::domain::market_data::{AssetData, build_unified_timeline};
use crate::domain::order_book::Side;
use crate::domain::portfolio::PortfolioLedger;
use crate::domain::risk::{RiskLimits, RiskPolicy};
use crate::domain::signal::{SIGNAL_FLAT, SIGNAL_LONG, SignalSeries};
use crate::domain::strategy::Strategy;
use crate::domain::volatility::trailing_volatility;

/// Immutable inputs for one run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub initial_capital: f64,
    pub risk_limits: RiskLimits,
    /// None disables execution-cost simulation; fills then happen at the
    /// resolved close.
    pub execution: Option<ExecutionConfig>,
    /// Fixed RNG seed for the cost model. None seeds from entropy.
    pub seed: Option<u64>,
}

/// One record per simulated date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyResult {
    pub date: NaiveDate,
    pub portfolio_value: f64,
    pub period_return: f64,
}

/// Output of one run: the daily series plus the terminal ledger.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub daily: Vec<DailyResult>,
    pub ledger: PortfolioLedger,
    pub kill_switch_triggered: bool,
}

impl SimulationResult {
    /// The period-return series (first entry 0 by definition).
    pub fn returns(&self) -> Vec<f64> {
        self.daily.iter().map(|d| d.period_return).collect()
    }

    pub fn final_value(&self) -> f64 {
        self.daily
            .last()
            .map(|d| d.portfolio_value)
            .unwrap_or(self.ledger.initial_capital)
    }
}

/// Run one simulation over `assets` in the caller's order.
///
/// Dates are processed strictly ascending; within a date, assets are
/// visited in slice order, which makes a seeded run fully reproducible.
/// Configuration errors and signal-domain violations fail here, before
/// the date loop; once the loop starts it always completes.
pub fn run_simulation(
    assets: &[AssetData],
    strategy: &dyn Strategy,
    config: &SimulationConfig,
) -> Result<SimulationResult, QuantsimError> {
    if !(config.initial_capital.is_finite() && config.initial_capital > 0.0) {
        return Err(QuantsimError::RunConfig {
            reason: format!(
                "initial capital must be positive, got {}",
                config.initial_capital
            ),
        });
    }
    if assets.is_empty() {
        return Err(QuantsimError::RunConfig {
            reason: "asset universe is empty".into(),
        });
    }

    // Signals are generated once per asset, never per date.
    let mut signals: HashMap<String, SignalSeries> = HashMap::with_capacity(assets.len());
    for asset in assets {
        let series = strategy.generate_signals(&asset.bars);
        series.validate(&asset.symbol)?;
        if signals.insert(asset.symbol.clone(), series).is_some() {
            return Err(QuantsimError::RunConfig {
                reason: format!("duplicate asset symbol {}", asset.symbol),
            });
        }
    }

    let timeline = build_unified_timeline(assets);
    let mut ledger = PortfolioLedger::new(config.initial_capital);
    let mut risk = RiskPolicy::new(config.risk_limits);
    let mut cost_model = config.execution.map(|exec_config| match config.seed {
        Some(seed) => ExecutionCostModel::with_seed(exec_config, seed),
        None => ExecutionCostModel::new(exec_config),
    });

    let mut last_price: HashMap<String, f64> = HashMap::new();
    let mut values: Vec<(NaiveDate, f64)> = Vec::with_capacity(timeline.len());

    for date in timeline {
        // Valuation pass: resolve each asset's price, forward-filling
        // through gaps. An asset with no usable close yet stays unpriced
        // and untradable for the date.
        let mut prices: HashMap<String, f64> = HashMap::with_capacity(assets.len());
        for asset in assets {
            if let Some(bar) = asset.bar_on(date) {
                if bar.has_usable_close() {
                    last_price.insert(asset.symbol.clone(), bar.close);
                }
            }
            if let Some(&price) = last_price.get(&asset.symbol) {
                prices.insert(asset.symbol.clone(), price);
            }
        }
        let equity = ledger.total_equity(&prices);

        // Risk pass.
        ledger.peak_equity = ledger.peak_equity.max(equity);
        let drawdown = if ledger.peak_equity > 0.0 {
            (equity - ledger.peak_equity) / ledger.peak_equity
        } else {
            0.0
        };
        let can_trade = risk.check_health(drawdown);

        // Execution pass: only flat->long and long->flat act.
        for asset in assets {
            let Some(&price) = prices.get(&asset.symbol) else {
                continue;
            };
            let Some(target) = signals[&asset.symbol].get(date) else {
                continue;
            };

            if target == SIGNAL_LONG && !ledger.is_long(&asset.symbol) {
                if !can_trade {
                    continue;
                }
                let volatility = trailing_volatility(&asset.bars, date);
                let allocation = risk
                    .allocation_amount(ledger.cash, volatility)
                    .min(ledger.cash);
                let execution_price = match cost_model.as_mut() {
                    Some(model) => model.execution_price(Side::Buy, price, volatility),
                    None => price,
                };
                let shares = (allocation / execution_price).floor() as i64;
                if shares >= 1 {
                    ledger.buy(date, &asset.symbol, shares, execution_price);
                }
            } else if target == SIGNAL_FLAT && ledger.is_long(&asset.symbol) {
                let execution_price = match cost_model.as_mut() {
                    Some(model) => {
                        let volatility = trailing_volatility(&asset.bars, date);
                        model.execution_price(Side::Sell, price, volatility)
                    }
                    None => price,
                };
                ledger.sell_all(date, &asset.symbol, execution_price);
            }
        }

        // Post-execution revaluation for the day's record.
        values.push((date, ledger.total_equity(&prices)));
    }

    let mut daily = Vec::with_capacity(values.len());
    let mut previous: Option<f64> = None;
    for (date, portfolio_value) in values {
        let period_return = match previous {
            Some(prev) if prev > 0.0 => (portfolio_value - prev) / prev,
            _ => 0.0,
        };
        daily.push(DailyResult {
            date,
            portfolio_value,
            period_return,
        });
        previous = Some(portfolio_value);
    }

    Ok(SimulationResult {
        daily,
        ledger,
        kill_switch_triggered: risk.kill_switch_active(),
    })
}
