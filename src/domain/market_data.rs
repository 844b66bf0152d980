//! Per-asset bar storage and the unified simulation timeline.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::domain::ohlcv::OhlcvBar;

/// One asset's bar history, indexed by date for O(1) lookup during the
/// date loop. Bars are expected in ascending date order (the data adapters
/// sort on load).
#[derive(Debug, Clone)]
pub struct AssetData {
    pub symbol: String,
    pub bars: Vec<OhlcvBar>,
    date_index: HashMap<NaiveDate, usize>,
}

impl AssetData {
    pub fn new(symbol: String, bars: Vec<OhlcvBar>) -> Self {
        let date_index = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| (bar.date, i))
            .collect();
        Self {
            symbol,
            bars,
            date_index,
        }
    }

    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    pub fn bar_on(&self, date: NaiveDate) -> Option<&OhlcvBar> {
        self.date_index.get(&date).map(|&i| &self.bars[i])
    }
}

/// Union of all bar dates across assets, ascending. A date appears on the
/// simulation axis even if only one asset traded on it.
pub fn build_unified_timeline(assets: &[AssetData]) -> Vec<NaiveDate> {
    let unique_dates: BTreeSet<NaiveDate> = assets
        .iter()
        .flat_map(|asset| asset.bars.iter().map(|bar| bar.date))
        .collect();
    unique_dates.into_iter().collect()
}
