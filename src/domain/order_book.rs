//! Synthetic quotes and limit-order fill rules.

use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

/// A resting limit order awaiting a fill decision against a bar.
#[derive(Debug, Clone)]
pub struct LimitOrder {
    pub side: Side,
    pub limit_price: f64,
    pub quantity: i64,
    pub id: String,
}

/// Synthetic (bid, ask) around a mid price for the given spread.
pub fn quote(mid_price: f64, spread_bps: f64) -> (f64, f64) {
    let half_spread = spread_bps / 10_000.0 / 2.0;
    let bid = mid_price * (1.0 - half_spread);
    let ask = mid_price * (1.0 + half_spread);
    (bid, ask)
}

/// Touch-based fill test: a buy fills iff the bar traded at or below the
/// limit, a sell iff it traded at or above. No partial fills, no queue
/// priority.
pub fn would_fill(order: &LimitOrder, bar: &OhlcvBar) -> bool {
    match order.side {
        Side::Buy => bar.low <= order.limit_price,
        Side::Sell => bar.high >= order.limit_price,
    }
}
