//! Portfolio ledger: cash, whole-share holdings, and mark-to-market equity.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::order_book::Side;

/// One executed fill, recorded as it happens.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub symbol: String,
    pub side: Side,
    pub shares: i64,
    pub price: f64,
}

/// Mutable portfolio state for one run. Equity is never cached; callers
/// recompute it from cash and holdings at every step via [`total_equity`].
///
/// [`total_equity`]: PortfolioLedger::total_equity
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioLedger {
    pub cash: f64,
    pub initial_capital: f64,
    pub holdings: HashMap<String, i64>,
    pub peak_equity: f64,
    pub trades: Vec<TradeRecord>,
}

impl PortfolioLedger {
    pub fn new(initial_capital: f64) -> Self {
        PortfolioLedger {
            cash: initial_capital,
            initial_capital,
            holdings: HashMap::new(),
            peak_equity: 0.0,
            trades: Vec::new(),
        }
    }

    /// Shares held for `symbol`, 0 when absent.
    pub fn holding(&self, symbol: &str) -> i64 {
        self.holdings.get(symbol).copied().unwrap_or(0)
    }

    pub fn is_long(&self, symbol: &str) -> bool {
        self.holding(symbol) > 0
    }

    /// Debit cash by `shares * price` and add to the holding.
    pub fn buy(&mut self, date: NaiveDate, symbol: &str, shares: i64, price: f64) {
        self.cash -= shares as f64 * price;
        *self.holdings.entry(symbol.to_string()).or_insert(0) += shares;
        self.trades.push(TradeRecord {
            date,
            symbol: symbol.to_string(),
            side: Side::Buy,
            shares,
            price,
        });
    }

    /// Liquidate the whole holding at `price`, crediting cash. Returns the
    /// number of shares sold (0 when nothing was held; no trade is recorded).
    pub fn sell_all(&mut self, date: NaiveDate, symbol: &str, price: f64) -> i64 {
        let shares = self.holding(symbol);
        if shares == 0 {
            return 0;
        }
        self.cash += shares as f64 * price;
        self.holdings.remove(symbol);
        self.trades.push(TradeRecord {
            date,
            symbol: symbol.to_string(),
            side: Side::Sell,
            shares,
            price,
        });
        shares
    }

    /// Cash plus the market value of every holding with a resolvable price.
    /// A holding absent from `prices` contributes zero.
    pub fn total_equity(&self, prices: &HashMap<String, f64>) -> f64 {
        let holdings_value: f64 = self
            .holdings
            .iter()
            .filter_map(|(symbol, &shares)| {
                prices.get(symbol).map(|&price| shares as f64 * price)
            })
            .sum();
        self.cash + holdings_value
    }
}
