//! Trade execution and portfolio simulation.
//!
//! Signals are filled in order against a single cash/position ledger with
//! proportional slippage and fees. Buys commit half of the current cash;
//! sells always liquidate the whole position. Orders that cannot be filled
//! are skipped, never retried.

use serde::{Deserialize, Serialize};

use super::error::QuantdashError;
use super::portfolio::Portfolio;
use super::price::PricePoint;
use super::signal::{Signal, SignalKind};
use super::trade::Trade;

/// Share of current cash committed to each buy.
pub const BUY_ALLOCATION: f64 = 0.5;

/// Fill cost parameters. Rates are fractions (0.001 = 0.1%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    pub slippage_rate: f64,
    pub fee_rate: f64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            slippage_rate: 0.001,
            fee_rate: 0.0005,
        }
    }
}

impl ExecutionConfig {
    pub fn validate(&self) -> Result<(), QuantdashError> {
        if !self.slippage_rate.is_finite() || self.slippage_rate < 0.0 {
            return Err(QuantdashError::invalid_parameter(
                "slippage_rate",
                "must be a non-negative number",
            ));
        }
        if !self.fee_rate.is_finite() || self.fee_rate < 0.0 {
            return Err(QuantdashError::invalid_parameter(
                "fee_rate",
                "must be a non-negative number",
            ));
        }
        Ok(())
    }
}

/// Buy fills above the quote: market_price * (1 + slippage_rate).
pub fn apply_slippage_buy(market_price: f64, slippage_rate: f64) -> f64 {
    market_price * (1.0 + slippage_rate)
}

/// Sell fills below the quote: market_price * (1 - slippage_rate).
pub fn apply_slippage_sell(market_price: f64, slippage_rate: f64) -> f64 {
    market_price * (1.0 - slippage_rate)
}

/// Fee charged once per fill, proportional to the executed price.
pub fn calculate_fee(execution_price: f64, config: &ExecutionConfig) -> f64 {
    execution_price * config.fee_rate
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    InsufficientCash,
    ZeroQuantity,
    NoPosition,
}

/// Result of a fill attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum FillResult {
    Filled(Trade),
    Skipped(SkipReason),
}

/// Buy with half of the available cash.
///
/// 1. Apply slippage to the signal price
/// 2. Skip if cash does not exceed one unit at that price
/// 3. quantity = floor((cash * 0.5 - fee) / execution_price)
/// 4. Skip if quantity is zero
/// 5. Deduct cost + fee and grow the position
pub fn execute_buy(
    portfolio: &mut Portfolio,
    signal: &Signal,
    config: &ExecutionConfig,
) -> FillResult {
    let execution_price = apply_slippage_buy(signal.price, config.slippage_rate);
    let fee = calculate_fee(execution_price, config);

    if portfolio.cash <= execution_price {
        return FillResult::Skipped(SkipReason::InsufficientCash);
    }

    let spend = portfolio.cash * BUY_ALLOCATION;
    let quantity = ((spend - fee) / execution_price).floor();
    if quantity.is_nan() || quantity < 1.0 {
        return FillResult::Skipped(SkipReason::ZeroQuantity);
    }
    let quantity = quantity as u64;

    portfolio.buy(quantity, execution_price, fee);

    FillResult::Filled(Trade {
        kind: SignalKind::Buy,
        index: signal.index,
        timestamp: signal.timestamp,
        executed_price: execution_price,
        quantity,
        fee,
        cash_after: portfolio.cash,
        position_after: portfolio.position,
    })
}

/// Sell the entire position.
pub fn execute_sell(
    portfolio: &mut Portfolio,
    signal: &Signal,
    config: &ExecutionConfig,
) -> FillResult {
    if !portfolio.has_position() {
        return FillResult::Skipped(SkipReason::NoPosition);
    }

    let execution_price = apply_slippage_sell(signal.price, config.slippage_rate);
    let fee = calculate_fee(execution_price, config);
    let quantity = portfolio.sell_all(execution_price, fee);

    FillResult::Filled(Trade {
        kind: SignalKind::Sell,
        index: signal.index,
        timestamp: signal.timestamp,
        executed_price: execution_price,
        quantity,
        fee,
        cash_after: portfolio.cash,
        position_after: portfolio.position,
    })
}

/// Outcome of running a signal sequence through the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub starting_cash: f64,
    pub ending_cash: f64,
    pub ending_position: u64,
    pub final_price: f64,
    pub portfolio_value: f64,
    pub trades: Vec<Trade>,
}

/// Fill every signal in order and mark the ending position to market.
///
/// The mark price is the last positive price in the series, falling back to
/// the last executed trade price when the series has none.
pub fn simulate(
    signals: &[Signal],
    series: &[PricePoint],
    starting_cash: f64,
    config: &ExecutionConfig,
) -> Result<SimulationResult, QuantdashError> {
    if !starting_cash.is_finite() || starting_cash <= 0.0 {
        return Err(QuantdashError::invalid_parameter(
            "starting_cash",
            "must be positive",
        ));
    }
    config.validate()?;

    let mut portfolio = Portfolio::new(starting_cash);
    let mut trades = Vec::new();

    for signal in signals {
        let result = match signal.kind {
            SignalKind::Buy => execute_buy(&mut portfolio, signal, config),
            SignalKind::Sell => execute_sell(&mut portfolio, signal, config),
        };
        match result {
            FillResult::Filled(trade) => trades.push(trade),
            FillResult::Skipped(reason) => {
                log::debug!(
                    "skipped {} at index {}: {:?}",
                    signal.kind,
                    signal.index,
                    reason
                );
            }
        }
    }

    let final_price = series
        .iter()
        .rev()
        .map(|p| p.price)
        .find(|&price| price > 0.0)
        .or_else(|| trades.last().map(|t| t.executed_price))
        .unwrap_or(0.0);

    Ok(SimulationResult {
        starting_cash,
        ending_cash: portfolio.cash,
        ending_position: portfolio.position,
        final_price,
        portfolio_value: portfolio.total_value(final_price),
        trades,
    })
}
