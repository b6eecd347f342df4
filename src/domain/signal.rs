//! Moving-average crossover signal generation.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::QuantdashError;
use super::indicator::IndicatorType;
use super::price::{PricePoint, prices};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Buy,
    Sell,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::Buy => write!(f, "BUY"),
            SignalKind::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    /// Position of the triggering point in the price series.
    pub index: usize,
    pub price: f64,
    pub timestamp: NaiveDateTime,
}

/// Check fast/slow windows: both at least 1 and fast strictly shorter.
pub fn validate_windows(fast: usize, slow: usize) -> Result<(), QuantdashError> {
    if fast == 0 {
        return Err(QuantdashError::invalid_parameter(
            "fast_window",
            "must be at least 1",
        ));
    }
    if fast >= slow {
        return Err(QuantdashError::invalid_parameter(
            "fast_window",
            format!("fast window ({fast}) must be shorter than slow window ({slow})"),
        ));
    }
    Ok(())
}

/// Emit a signal wherever the fast SMA crosses the slow SMA.
///
/// Buy when fast moves from at-or-below to strictly above slow; Sell when it
/// moves from at-or-above to strictly below. Only indices where both averages
/// are defined on the current and previous point are considered.
pub fn generate_signals(
    series: &[PricePoint],
    fast: usize,
    slow: usize,
) -> Result<Vec<Signal>, QuantdashError> {
    validate_windows(fast, slow)?;

    let closes = prices(series);
    let fast_ma = IndicatorType::Sma(fast).compute(&closes)?;
    let slow_ma = IndicatorType::Sma(slow).compute(&closes)?;

    // The slow average is the last to become defined; a crossover also
    // needs the point before it.
    let first = IndicatorType::Sma(slow).warmup() + 1;

    let mut signals = Vec::new();
    for i in first..series.len() {
        let (Some(f_prev), Some(s_prev), Some(f_curr), Some(s_curr)) =
            (fast_ma[i - 1], slow_ma[i - 1], fast_ma[i], slow_ma[i])
        else {
            continue;
        };

        let kind = if f_prev <= s_prev && f_curr > s_curr {
            SignalKind::Buy
        } else if f_prev >= s_prev && f_curr < s_curr {
            SignalKind::Sell
        } else {
            continue;
        };

        signals.push(Signal {
            kind,
            index: i,
            price: series[i].price,
            timestamp: series[i].timestamp,
        });
    }

    log::debug!(
        "{} vs {}: {} signals over {} points",
        IndicatorType::Sma(fast),
        IndicatorType::Sma(slow),
        signals.len(),
        series.len()
    );

    Ok(signals)
}
