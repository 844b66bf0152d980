//! Configuration validation.
//!
//! Every run-configuration check happens here, before any simulation is
//! constructed; nothing inside the date loop re-validates.

use crate::domain::error::QuantsimError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const KNOWN_STRATEGIES: &[&str] = &["sma-crossover", "buy-and-hold"];

pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), QuantsimError> {
    validate_initial_capital(config)?;
    validate_target_volatility(config)?;
    validate_max_drawdown_limit(config)?;
    validate_risk_free_rate(config)?;
    validate_latency(config)?;
    validate_spread(config)?;
    validate_seed(config)?;
    validate_dates(config)?;
    validate_symbols(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), QuantsimError> {
    let name = validate_strategy_name(config)?;
    if name == "sma-crossover" {
        validate_sma_windows(config)?;
    }
    Ok(())
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), QuantsimError> {
    let value = config.get_double("backtest", "initial_capital", 0.0);
    if value <= 0.0 {
        return Err(QuantsimError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_capital".to_string(),
            reason: "initial_capital must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_target_volatility(config: &dyn ConfigPort) -> Result<(), QuantsimError> {
    let value = config.get_double("backtest", "target_volatility", 0.20);
    if value <= 0.0 {
        return Err(QuantsimError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "target_volatility".to_string(),
            reason: "target_volatility must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_max_drawdown_limit(config: &dyn ConfigPort) -> Result<(), QuantsimError> {
    let value = config.get_double("backtest", "max_drawdown_limit", 0.20);
    if value <= 0.0 || value > 1.0 {
        return Err(QuantsimError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "max_drawdown_limit".to_string(),
            reason: "max_drawdown_limit must be between 0 (exclusive) and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), QuantsimError> {
    let value = config.get_double("backtest", "risk_free_rate", 0.0);
    if value < 0.0 {
        return Err(QuantsimError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "risk_free_rate".to_string(),
            reason: "risk_free_rate must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_latency(config: &dyn ConfigPort) -> Result<(), QuantsimError> {
    for key in ["mean_latency_ms", "std_latency_ms"] {
        let value = config.get_double("backtest", key, 0.0);
        if value < 0.0 {
            return Err(QuantsimError::ConfigInvalid {
                section: "backtest".to_string(),
                key: key.to_string(),
                reason: format!("{} must be non-negative", key),
            });
        }
    }
    Ok(())
}

fn validate_spread(config: &dyn ConfigPort) -> Result<(), QuantsimError> {
    let value = config.get_double("backtest", "spread_bps", 0.0);
    if value < 0.0 {
        return Err(QuantsimError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "spread_bps".to_string(),
            reason: "spread_bps must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_seed(config: &dyn ConfigPort) -> Result<(), QuantsimError> {
    // Optional; entropy seeding when absent.
    match config.get_string("backtest", "seed") {
        None => Ok(()),
        Some(s) => match s.trim().parse::<u64>() {
            Ok(_) => Ok(()),
            Err(_) => Err(QuantsimError::ConfigInvalid {
                section: "backtest".to_string(),
                key: "seed".to_string(),
                reason: "seed must be a non-negative integer".to_string(),
            }),
        },
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), QuantsimError> {
    let start_str = config.get_string("backtest", "start_date");
    let end_str = config.get_string("backtest", "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date > end_date {
        return Err(QuantsimError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must not be after end_date".to_string(),
        });
    }
    Ok(())
}

fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, QuantsimError> {
    match value {
        None => Err(QuantsimError::ConfigMissing {
            section: "backtest".to_string(),
            key: field.to_string(),
        }),
        Some(s) => {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| QuantsimError::ConfigInvalid {
                section: "backtest".to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            })
        }
    }
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), QuantsimError> {
    match config.get_string("backtest", "symbols") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(QuantsimError::ConfigMissing {
            section: "backtest".to_string(),
            key: "symbols".to_string(),
        }),
    }
}

fn validate_strategy_name(config: &dyn ConfigPort) -> Result<String, QuantsimError> {
    let name = config
        .get_string("strategy", "name")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default();
    if name.is_empty() {
        return Err(QuantsimError::ConfigMissing {
            section: "strategy".to_string(),
            key: "name".to_string(),
        });
    }
    if !KNOWN_STRATEGIES.contains(&name.as_str()) {
        return Err(QuantsimError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "name".to_string(),
            reason: format!(
                "unknown strategy '{}' (known: {})",
                name,
                KNOWN_STRATEGIES.join(", ")
            ),
        });
    }
    Ok(name)
}

fn validate_sma_windows(config: &dyn ConfigPort) -> Result<(), QuantsimError> {
    let short = config.get_int("strategy", "short_window", 50);
    let long = config.get_int("strategy", "long_window", 200);

    if short < 1 {
        return Err(QuantsimError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "short_window".to_string(),
            reason: "short_window must be at least 1".to_string(),
        });
    }
    if long <= short {
        return Err(QuantsimError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "long_window".to_string(),
            reason: "long_window must be greater than short_window".to_string(),
        });
    }
    Ok(())
}
