#![allow(dead_code)]

use chrono::NaiveDate;
use quantsim::domain::engine::SimulationConfig;
use quantsim::domain::error::QuantsimError;
use quantsim::domain::market_data::AssetData;
pub use quantsim::domain::ohlcv::OhlcvBar;
use quantsim::domain::risk::RiskLimits;
use quantsim::domain::signal::SignalSeries;
use quantsim::domain::strategy::Strategy;
use quantsim::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, QuantsimError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(QuantsimError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, QuantsimError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

/// Replays pre-scripted per-symbol signals; symbols without a script get an
/// empty series.
pub struct ScriptedStrategy {
    pub signals: HashMap<String, Vec<(NaiveDate, i64)>>,
}

impl ScriptedStrategy {
    pub fn new() -> Self {
        Self {
            signals: HashMap::new(),
        }
    }

    pub fn with(mut self, symbol: &str, points: Vec<(NaiveDate, i64)>) -> Self {
        self.signals.insert(symbol.to_string(), points);
        self
    }
}

impl Strategy for ScriptedStrategy {
    fn name(&self) -> &str {
        "scripted"
    }

    fn generate_signals(&self, bars: &[OhlcvBar]) -> SignalSeries {
        let mut series = SignalSeries::new();
        if let Some(first) = bars.first() {
            if let Some(points) = self.signals.get(&first.symbol) {
                for &(date, target) in points {
                    series.set(date, target);
                }
            }
        }
        series
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(symbol: &str, date_str: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        symbol: symbol.to_string(),
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

pub fn make_asset(symbol: &str, bars: Vec<OhlcvBar>) -> AssetData {
    AssetData::new(symbol.to_string(), bars)
}

pub fn generate_bars(
    symbol: &str,
    start_date: &str,
    count: usize,
    start_price: f64,
) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| OhlcvBar {
            symbol: symbol.to_string(),
            date: start + chrono::Duration::days(i as i64),
            open: start_price + i as f64,
            high: start_price + i as f64 + 1.0,
            low: start_price + i as f64 - 1.0,
            close: start_price + i as f64,
            volume: 1000,
        })
        .collect()
}

pub fn frictionless_config(initial_capital: f64) -> SimulationConfig {
    SimulationConfig {
        initial_capital,
        risk_limits: RiskLimits::default(),
        execution: None,
        seed: None,
    }
}
