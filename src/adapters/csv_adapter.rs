//! CSV file price adapter.
//!
//! Reads `<base_path>/<SYMBOL>.csv`. Column layout varies by provider, so
//! the timestamp and price columns are located by header name.

use crate::domain::error::QuantdashError;
use crate::domain::price::{PricePoint, normalize};
use crate::ports::price_port::PriceSource;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fs;
use std::path::PathBuf;

const TIMESTAMP_COLUMNS: &[&str] = &["timestamp", "datetime", "date", "time"];
const PRICE_COLUMNS: &[&str] = &["close", "adj_close", "price"];

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Every `.csv` file in the base directory with its stem.
    fn csv_files(&self) -> Result<Vec<(String, PathBuf)>, QuantdashError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| QuantdashError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| QuantdashError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let path = entry.path();
            if path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
            {
                if let Some(stem) = path.file_stem() {
                    files.push((stem.to_string_lossy().into_owned(), path));
                }
            }
        }
        Ok(files)
    }

    /// Symbols match file stems case-insensitively; `<symbol>.csv` is tried
    /// first.
    fn csv_path(&self, symbol: &str) -> PathBuf {
        let exact = self.base_path.join(format!("{}.csv", symbol));
        if exact.is_file() {
            return exact;
        }
        self.csv_files()
            .ok()
            .and_then(|files| {
                files
                    .into_iter()
                    .find(|(stem, _)| stem.eq_ignore_ascii_case(symbol))
                    .map(|(_, path)| path)
            })
            .unwrap_or(exact)
    }
}

fn find_column(headers: &csv::StringRecord, candidates: &[&str]) -> Option<usize> {
    candidates.iter().find_map(|name| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    })
}

/// Accepts `%Y-%m-%d`, `%Y-%m-%d %H:%M:%S`, `%Y-%m-%dT%H:%M:%S` and Unix seconds.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(ts);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    value
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.naive_utc())
}

impl PriceSource for CsvPriceAdapter {
    fn fetch_series(&self, symbol: &str) -> Result<Vec<PricePoint>, QuantdashError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| QuantdashError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| QuantdashError::Data {
                reason: format!("CSV header error in {}: {}", path.display(), e),
            })?
            .clone();

        if headers.is_empty() {
            return Err(QuantdashError::Data {
                reason: format!("{} has no columns", path.display()),
            });
        }
        let ts_col = find_column(&headers, TIMESTAMP_COLUMNS).unwrap_or(0);
        let price_col = find_column(&headers, PRICE_COLUMNS).unwrap_or(headers.len() - 1);

        let mut points = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    log::warn!("{}: skipping row {}: {}", symbol, row + 1, e);
                    continue;
                }
            };

            let ts_str = record.get(ts_col).unwrap_or_default();
            let Some(timestamp) = parse_timestamp(ts_str) else {
                log::warn!("{}: skipping row {} with timestamp {:?}", symbol, row + 1, ts_str);
                continue;
            };

            let price_str = record.get(price_col).unwrap_or_default();
            let Ok(price) = price_str.trim().parse::<f64>() else {
                log::warn!("{}: skipping row {} with price {:?}", symbol, row + 1, price_str);
                continue;
            };

            points.push(PricePoint { timestamp, price });
        }

        log::debug!("{}: read {} rows from {}", symbol, points.len(), path.display());
        Ok(normalize(points))
    }

    /// Upper-cased file stems, sorted and deduplicated.
    fn list_symbols(&self) -> Result<Vec<String>, QuantdashError> {
        let mut symbols: Vec<String> = self
            .csv_files()?
            .into_iter()
            .map(|(stem, _)| stem.to_uppercase())
            .collect();
        symbols.sort();
        symbols.dedup();
        Ok(symbols)
    }
}
