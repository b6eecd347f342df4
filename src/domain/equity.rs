//! Equity curve reconstruction.
//!
//! Replays a trade log against the full price series to value the portfolio
//! at every point, including points with no trading activity. Trades are
//! attached to points by their ordinal `index`, so repeated or gapped
//! timestamps in the series cannot detach a trade from the curve.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::portfolio::Portfolio;
use super::price::PricePoint;
use super::signal::SignalKind;
use super::trade::Trade;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: NaiveDateTime,
    pub cash: f64,
    pub position: u64,
    pub total_value: f64,
}

/// One equity point per series point, in series order.
///
/// Trades on a point are applied before that point is valued. A point with
/// a zero or non-finite price is valued at the last good price seen.
pub fn reconstruct_equity(
    trades: &[Trade],
    series: &[PricePoint],
    starting_cash: f64,
) -> Vec<EquityPoint> {
    let mut portfolio = Portfolio::new(starting_cash);
    let mut pending = trades.iter().peekable();
    let mut last_price = 0.0_f64;
    let mut curve = Vec::with_capacity(series.len());

    for (i, point) in series.iter().enumerate() {
        while let Some(trade) = pending.next_if(|t| t.index <= i) {
            if trade.index < i {
                log::warn!(
                    "trade at index {} arrived out of order, applying at {}",
                    trade.index,
                    i
                );
            }
            apply_trade(&mut portfolio, trade);
        }

        if point.price.is_finite() && point.price > 0.0 {
            last_price = point.price;
        }

        curve.push(EquityPoint {
            timestamp: point.timestamp,
            cash: portfolio.cash,
            position: portfolio.position,
            total_value: portfolio.total_value(last_price),
        });
    }

    let unapplied = pending.count();
    if unapplied > 0 {
        log::debug!("{} trades fall outside the price series", unapplied);
    }

    curve
}

fn apply_trade(portfolio: &mut Portfolio, trade: &Trade) {
    match trade.kind {
        SignalKind::Buy => portfolio.buy(trade.quantity, trade.executed_price, trade.fee),
        SignalKind::Sell => {
            portfolio.sell_all(trade.executed_price, trade.fee);
        }
    }
}
