//! Portfolio state for a single-asset simulation.

use serde::{Deserialize, Serialize};

/// Cash/position ledger. Owned by one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub cash: f64,
    pub position: u64,
}

impl Portfolio {
    pub fn new(starting_cash: f64) -> Self {
        Portfolio {
            cash: starting_cash,
            position: 0,
        }
    }

    pub fn has_position(&self) -> bool {
        self.position > 0
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.position as f64 * price
    }

    pub fn total_value(&self, price: f64) -> f64 {
        self.cash + self.market_value(price)
    }

    pub(crate) fn buy(&mut self, quantity: u64, price: f64, fee: f64) {
        self.cash -= quantity as f64 * price + fee;
        self.position += quantity;
    }

    /// Liquidate the whole position, returning the quantity sold.
    pub(crate) fn sell_all(&mut self, price: f64, fee: f64) -> u64 {
        let quantity = self.position;
        self.cash += quantity as f64 * price - fee;
        self.position = 0;
        quantity
    }
}
