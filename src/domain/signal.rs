//! Target-position signal series.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::error::QuantsimError;

/// Target position: hold nothing.
pub const SIGNAL_FLAT: i64 = 0;
/// Target position: fully long.
pub const SIGNAL_LONG: i64 = 1;

/// Date-keyed target positions for one asset, produced once per run by a
/// strategy. A date absent from the series means "no change requested".
#[derive(Debug, Clone, Default)]
pub struct SignalSeries {
    values: BTreeMap<NaiveDate, i64>,
}

impl SignalSeries {
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, date: NaiveDate, target: i64) {
        self.values.insert(date, target);
    }

    pub fn get(&self, date: NaiveDate) -> Option<i64> {
        self.values.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Dates with a defined target, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, i64)> + '_ {
        self.values.iter().map(|(d, v)| (*d, *v))
    }

    /// Every value must be in {0, 1}; anything else is a strategy contract
    /// violation and fails the run before the date loop starts.
    pub fn validate(&self, symbol: &str) -> Result<(), QuantsimError> {
        for (&date, &value) in &self.values {
            if value != SIGNAL_FLAT && value != SIGNAL_LONG {
                return Err(QuantsimError::SignalDomain {
                    symbol: symbol.to_string(),
                    date,
                    value,
                });
            }
        }
        Ok(())
    }
}
