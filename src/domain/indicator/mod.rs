//! Technical indicator implementations.
//!
//! Indicator series are `Vec<Option<f64>>` aligned one-to-one with the input
//! prices; `None` marks a warmup entry where the indicator is undefined.

pub mod sma;

use crate::domain::error::QuantdashError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
}

impl IndicatorType {
    /// Number of leading entries left undefined by this indicator.
    pub fn warmup(&self) -> usize {
        match self {
            IndicatorType::Sma(period) => period.saturating_sub(1),
        }
    }

    pub fn compute(&self, prices: &[f64]) -> Result<Vec<Option<f64>>, QuantdashError> {
        match self {
            IndicatorType::Sma(period) => sma::calculate_sma(prices, *period),
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
        }
    }
}
