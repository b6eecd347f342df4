//! Simple Moving Average indicator.
//!
//! O(n) sliding window: the running sum gains the incoming price and loses
//! the price leaving the window.
//! SMA(n)[i] = (P[i-n+1] + ... + P[i]) / n
//! Warmup: first (n-1) entries are undefined.

use crate::domain::error::QuantdashError;

pub fn calculate_sma(prices: &[f64], period: usize) -> Result<Vec<Option<f64>>, QuantdashError> {
    if period == 0 {
        return Err(QuantdashError::invalid_parameter(
            "window",
            "moving average window must be at least 1",
        ));
    }

    let mut values = Vec::with_capacity(prices.len());
    let mut window_sum = 0.0_f64;

    for (i, &price) in prices.iter().enumerate() {
        window_sum += price;
        if i >= period {
            window_sum -= prices[i - period];
        }

        if i + 1 >= period {
            values.push(Some(window_sum / period as f64));
        } else {
            values.push(None);
        }
    }

    Ok(values)
}
