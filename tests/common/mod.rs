#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use quantdash::domain::error::QuantdashError;
use quantdash::domain::price::PricePoint;
use quantdash::ports::price_port::PriceSource;
use std::collections::HashMap;

/// The canonical crossover scenario: one Buy at index 4, one Sell at index 7.
pub const SCENARIO_PRICES: [f64; 10] = [10.0, 9.0, 8.0, 9.0, 10.0, 11.0, 10.0, 9.0, 8.0, 7.0];

pub struct MockPriceSource {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockPriceSource {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, symbol: &str, series: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), series);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PriceSource for MockPriceSource {
    fn fetch_series(&self, symbol: &str) -> Result<Vec<PricePoint>, QuantdashError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(QuantdashError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, QuantdashError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn day(offset: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::days(offset)
}

/// Daily series starting 2024-01-01.
pub fn make_series(prices: &[f64]) -> Vec<PricePoint> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| PricePoint::new(day(i as i64), p))
        .collect()
}

pub fn scenario_series() -> Vec<PricePoint> {
    make_series(&SCENARIO_PRICES)
}

/// CSV body in the `date,close` layout the file adapter reads.
pub fn series_csv(prices: &[f64]) -> String {
    let mut out = String::from("date,close\n");
    for (i, p) in prices.iter().enumerate() {
        out.push_str(&format!("{},{}\n", day(i as i64).format("%Y-%m-%d"), p));
    }
    out
}
