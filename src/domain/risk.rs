//! Drawdown kill-switch and volatility-targeted position sizing.

/// Immutable risk configuration for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskLimits {
    /// Annualized volatility the sizing targets, e.g. 0.20 for 20%.
    pub target_volatility: f64,
    /// Drawdown magnitude that trips the kill switch, e.g. 0.20 for -20%.
    pub max_drawdown_limit: f64,
}

impl Default for RiskLimits {
    fn default() -> Self {
        RiskLimits {
            target_volatility: 0.20,
            max_drawdown_limit: 0.20,
        }
    }
}

/// Per-run risk state. The kill switch is a one-way latch: once set it stays
/// set for this instance's lifetime, and sizing returns zero from then on.
/// Construct a fresh policy per run.
#[derive(Debug, Clone)]
pub struct RiskPolicy {
    limits: RiskLimits,
    kill_switch_active: bool,
}

impl RiskPolicy {
    pub fn new(limits: RiskLimits) -> Self {
        RiskPolicy {
            limits,
            kill_switch_active: false,
        }
    }

    pub fn kill_switch_active(&self) -> bool {
        self.kill_switch_active
    }

    /// False (unhealthy) iff the drawdown currently breaches the limit;
    /// breaching sets the latch. After a recovery this reports healthy
    /// again, but the latch keeps [`allocation_amount`] at zero, so no new
    /// entry can occur.
    ///
    /// [`allocation_amount`]: RiskPolicy::allocation_amount
    pub fn check_health(&mut self, drawdown: f64) -> bool {
        if drawdown < -self.limits.max_drawdown_limit {
            if !self.kill_switch_active {
                eprintln!(
                    "Risk alert: max drawdown limit hit ({:.2}%), halting new entries",
                    drawdown * 100.0
                );
            }
            self.kill_switch_active = true;
            return false;
        }
        true
    }

    /// Dollar allocation for a new entry: `capital * min(target_vol /
    /// asset_vol, 1.0)`. Never levers beyond 1x, even for very quiet
    /// assets. Zero when the latch is set or the volatility is
    /// non-positive.
    pub fn allocation_amount(&self, capital: f64, asset_volatility: f64) -> f64 {
        if self.kill_switch_active {
            return 0.0;
        }
        if asset_volatility <= 0.0 {
            return 0.0;
        }
        let leverage = (self.limits.target_volatility / asset_volatility).min(1.0);
        capital * leverage
    }
}
