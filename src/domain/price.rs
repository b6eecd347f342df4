//! Price series representation and normalization.
//!
//! Every adapter hands the core a `Vec<PricePoint>` that has been passed
//! through [`normalize`]: ascending by timestamp, one point per timestamp,
//! finite prices only.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: NaiveDateTime, price: f64) -> Self {
        PricePoint { timestamp, price }
    }
}

/// Sort ascending by timestamp, collapse duplicate timestamps keeping the
/// last observation, and drop non-finite prices.
pub fn normalize(mut points: Vec<PricePoint>) -> Vec<PricePoint> {
    let before = points.len();
    points.retain(|p| p.price.is_finite());
    let dropped = before - points.len();
    if dropped > 0 {
        log::warn!("dropped {} non-finite price points", dropped);
    }

    // Stable sort keeps arrival order among equal timestamps, so the last
    // element of each run is the latest observation.
    points.sort_by_key(|p| p.timestamp);

    let mut normalized: Vec<PricePoint> = Vec::with_capacity(points.len());
    for point in points {
        match normalized.last_mut() {
            Some(last) if last.timestamp == point.timestamp => *last = point,
            _ => normalized.push(point),
        }
    }
    normalized
}

/// Closing prices of a series, in order.
pub fn prices(points: &[PricePoint]) -> Vec<f64> {
    points.iter().map(|p| p.price).collect()
}
