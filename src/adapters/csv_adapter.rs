//! CSV file data adapter.
//!
//! Expects one `{SYMBOL}.csv` per asset under the base directory, with
//! `date,open,high,low,close,volume` columns.

use crate::domain::error::QuantsimError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, QuantsimError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                QuantsimError::NoData {
                    symbol: symbol.to_string(),
                }
            } else {
                QuantsimError::Data {
                    reason: format!("failed to read {}: {}", path.display(), e),
                }
            }
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| QuantsimError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| QuantsimError::Data {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                QuantsimError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            let open: f64 = record
                .get(1)
                .ok_or_else(|| QuantsimError::Data {
                    reason: "missing open column".into(),
                })?
                .parse()
                .map_err(|e| QuantsimError::Data {
                    reason: format!("invalid open value: {}", e),
                })?;

            let high: f64 = record
                .get(2)
                .ok_or_else(|| QuantsimError::Data {
                    reason: "missing high column".into(),
                })?
                .parse()
                .map_err(|e| QuantsimError::Data {
                    reason: format!("invalid high value: {}", e),
                })?;

            let low: f64 = record
                .get(3)
                .ok_or_else(|| QuantsimError::Data {
                    reason: "missing low column".into(),
                })?
                .parse()
                .map_err(|e| QuantsimError::Data {
                    reason: format!("invalid low value: {}", e),
                })?;

            let close: f64 = record
                .get(4)
                .ok_or_else(|| QuantsimError::Data {
                    reason: "missing close column".into(),
                })?
                .parse()
                .map_err(|e| QuantsimError::Data {
                    reason: format!("invalid close value: {}", e),
                })?;

            let volume: i64 = record
                .get(5)
                .ok_or_else(|| QuantsimError::Data {
                    reason: "missing volume column".into(),
                })?
                .parse()
                .map_err(|e| QuantsimError::Data {
                    reason: format!("invalid volume value: {}", e),
                })?;

            bars.push(OhlcvBar {
                symbol: symbol.to_string(),
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, QuantsimError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| QuantsimError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| QuantsimError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume\n\
            2021-01-15,100.0,110.0,90.0,105.0,50000\n\
            2021-01-16,105.0,115.0,100.0,110.0,60000\n\
            2021-01-17,110.0,120.0,105.0,115.0,55000\n";

        fs::write(path.join("AAPL.csv"), csv_content).unwrap();
        fs::write(
            path.join("MSFT.csv"),
            "date,open,high,low,close,volume\n",
        )
        .unwrap();
        fs::write(path.join("notes.txt"), "not a data file\n").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_ohlcv_returns_correct_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let start = NaiveDate::from_ymd_opt(2021, 1, 15).unwrap();
        let end = NaiveDate::from_ymd_opt(2021, 1, 17).unwrap();
        let bars = adapter.fetch_ohlcv("AAPL", start, end).unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].symbol, "AAPL");
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2021, 1, 15).unwrap());
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50000);
    }

    #[test]
    fn fetch_ohlcv_filters_by_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let start = NaiveDate::from_ymd_opt(2021, 1, 16).unwrap();
        let end = NaiveDate::from_ymd_opt(2021, 1, 16).unwrap();
        let bars = adapter.fetch_ohlcv("AAPL", start, end).unwrap();

        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2021, 1, 16).unwrap());
    }

    #[test]
    fn fetch_ohlcv_sorts_unordered_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();
        fs::write(
            path.join("SPY.csv"),
            "date,open,high,low,close,volume\n\
             2021-01-17,110.0,120.0,105.0,115.0,55000\n\
             2021-01-15,100.0,110.0,90.0,105.0,50000\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(path);

        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2021, 1, 31).unwrap();
        let bars = adapter.fetch_ohlcv("SPY", start, end).unwrap();

        assert_eq!(bars.len(), 2);
        assert!(bars[0].date < bars[1].date);
    }

    #[test]
    fn fetch_ohlcv_reports_no_data_for_missing_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2021, 1, 31).unwrap();
        let err = adapter.fetch_ohlcv("XYZ", start, end).unwrap_err();

        assert!(matches!(err, QuantsimError::NoData { symbol } if symbol == "XYZ"));
    }

    #[test]
    fn fetch_ohlcv_errors_for_malformed_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();
        fs::write(
            path.join("BAD.csv"),
            "date,open,high,low,close,volume\n2021-01-15,100.0,110.0,90.0,oops,50000\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(path);

        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2021, 1, 31).unwrap();
        let err = adapter.fetch_ohlcv("BAD", start, end).unwrap_err();
        assert!(matches!(err, QuantsimError::Data { .. }));
    }

    #[test]
    fn list_symbols_returns_csv_stems_sorted() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let symbols = adapter.list_symbols().unwrap();
        assert_eq!(symbols, vec!["AAPL", "MSFT"]);
    }
}
