//! Executed trade records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::signal::SignalKind;

/// A filled order. Trades form an append-only log in execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub kind: SignalKind,
    /// Position in the price series of the point this trade executed on.
    pub index: usize,
    pub timestamp: NaiveDateTime,
    pub executed_price: f64,
    pub quantity: u64,
    pub fee: f64,
    pub cash_after: f64,
    pub position_after: u64,
}

impl Trade {
    pub fn is_buy(&self) -> bool {
        self.kind == SignalKind::Buy
    }

    pub fn is_sell(&self) -> bool {
        self.kind == SignalKind::Sell
    }
}
