//! Risk and performance metrics over a daily-return series.

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Confidence level for the tail-risk metrics.
pub const VAR_CONFIDENCE: f64 = 0.95;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    /// Most negative peak-to-trough decline of the compounded series; 0 or
    /// negative.
    pub max_drawdown: f64,
    /// Historical 95% value-at-risk. Positive numbers are losses.
    pub var_95: f64,
    /// Expected shortfall beyond the 95% VaR threshold. Positive numbers
    /// are losses.
    pub cvar_95: f64,
}

impl Metrics {
    /// Compute the full metrics block from daily returns and an annual
    /// risk-free rate. An empty series yields all-zero metrics.
    pub fn compute(daily_returns: &[f64], risk_free_rate: f64) -> Self {
        if daily_returns.is_empty() {
            return Metrics {
                total_return: 0.0,
                annualized_return: 0.0,
                annualized_volatility: 0.0,
                sharpe_ratio: 0.0,
                sortino_ratio: 0.0,
                max_drawdown: 0.0,
                var_95: 0.0,
                cvar_95: 0.0,
            };
        }

        let n = daily_returns.len() as f64;
        let mean = daily_returns.iter().sum::<f64>() / n;
        let annualized_return = mean * TRADING_DAYS_PER_YEAR;
        let annualized_volatility =
            population_std(daily_returns) * TRADING_DAYS_PER_YEAR.sqrt();

        let sharpe_ratio = if annualized_volatility > 0.0 {
            (annualized_return - risk_free_rate) / annualized_volatility
        } else {
            0.0
        };

        let negatives: Vec<f64> = daily_returns.iter().copied().filter(|r| *r < 0.0).collect();
        let downside_volatility = population_std(&negatives) * TRADING_DAYS_PER_YEAR.sqrt();
        let sortino_ratio = if downside_volatility > 0.0 {
            (annualized_return - risk_free_rate) / downside_volatility
        } else {
            0.0
        };

        let total_return = daily_returns.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0;

        Metrics {
            total_return,
            annualized_return,
            annualized_volatility,
            sharpe_ratio,
            sortino_ratio,
            max_drawdown: compute_max_drawdown(daily_returns),
            var_95: historical_var(daily_returns, VAR_CONFIDENCE),
            cvar_95: historical_cvar(daily_returns, VAR_CONFIDENCE),
        }
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

/// Minimum of `(cumulative - peak) / peak` over the compounded series.
fn compute_max_drawdown(returns: &[f64]) -> f64 {
    let mut cumulative = 1.0_f64;
    let mut peak = 0.0_f64;
    let mut max_drawdown = 0.0_f64;

    for r in returns {
        cumulative *= 1.0 + r;
        if cumulative > peak {
            peak = cumulative;
        }
        if peak > 0.0 {
            let drawdown = (cumulative - peak) / peak;
            if drawdown < max_drawdown {
                max_drawdown = drawdown;
            }
        }
    }

    max_drawdown
}

/// Historical VaR: the return at the `(1 - confidence)` percentile,
/// negated so a positive result reads as a loss.
fn historical_var(returns: &[f64], confidence: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    -percentile(returns, (1.0 - confidence) * 100.0)
}

/// Expected shortfall: mean of the returns at or below the VaR threshold,
/// negated.
fn historical_cvar(returns: &[f64], confidence: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let threshold = percentile(returns, (1.0 - confidence) * 100.0);
    let tail: Vec<f64> = returns
        .iter()
        .copied()
        .filter(|r| *r <= threshold)
        .collect();
    if tail.is_empty() {
        return 0.0;
    }
    -(tail.iter().sum::<f64>() / tail.len() as f64)
}

/// Linear-interpolated percentile of an unsorted sample, `pct` in [0, 100].
fn percentile(values: &[f64], pct: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let weight = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * weight
}
