//! Performance metrics over an equity curve.
//!
//! Periods are treated as trading days regardless of their real spacing.

use serde::{Deserialize, Serialize};

use super::equity::EquityPoint;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub cagr: f64,
    pub sharpe: f64,
    pub total_returns: Vec<f64>,
    pub trade_count: usize,
    pub total_return: f64,
    pub max_drawdown: f64,
}

impl PerformanceSummary {
    /// `risk_free_rate` is annual; it is spread evenly over trading days.
    pub fn compute(equity_curve: &[EquityPoint], trade_count: usize, risk_free_rate: f64) -> Self {
        let returns = period_returns(equity_curve);
        let per_period_rf = risk_free_rate / TRADING_DAYS_PER_YEAR;

        PerformanceSummary {
            cagr: compute_cagr(equity_curve),
            sharpe: compute_sharpe(&returns, per_period_rf),
            total_return: compute_total_return(equity_curve),
            max_drawdown: compute_drawdown(equity_curve),
            total_returns: returns,
            trade_count,
        }
    }
}

/// r[i] = equity[i] / equity[i-1] - 1. Empty for fewer than two points.
pub fn period_returns(equity_curve: &[EquityPoint]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| {
            let prev = w[0].total_value;
            let curr = w[1].total_value;
            if prev > 0.0 { curr / prev - 1.0 } else { 0.0 }
        })
        .collect()
}

/// (end / start)^(1 / years) - 1 with years = max(periods / 252, 1 / 252).
pub fn compute_cagr(equity_curve: &[EquityPoint]) -> f64 {
    let (Some(first), Some(last)) = (equity_curve.first(), equity_curve.last()) else {
        return 0.0;
    };
    let periods = equity_curve.len() - 1;
    if periods == 0 || first.total_value <= 0.0 {
        return 0.0;
    }

    let years = (periods as f64 / TRADING_DAYS_PER_YEAR).max(1.0 / TRADING_DAYS_PER_YEAR);
    let growth = last.total_value / first.total_value;
    let cagr = growth.powf(1.0 / years) - 1.0;
    if cagr.is_finite() { cagr } else { 0.0 }
}

/// Annualized Sharpe ratio using the population standard deviation.
pub fn compute_sharpe(returns: &[f64], per_period_rf: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    // Summation error would otherwise leave a tiny non-zero deviation.
    if returns.iter().all(|&r| r == returns[0]) {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean: f64 = returns.iter().sum::<f64>() / n;
    let variance: f64 = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    if stddev == 0.0 || !stddev.is_finite() {
        return 0.0;
    }

    (mean - per_period_rf) / stddev * TRADING_DAYS_PER_YEAR.sqrt()
}

pub fn compute_total_return(equity_curve: &[EquityPoint]) -> f64 {
    match (equity_curve.first(), equity_curve.last()) {
        (Some(first), Some(last)) if first.total_value > 0.0 => {
            last.total_value / first.total_value - 1.0
        }
        _ => 0.0,
    }
}

/// Largest peak-to-trough decline as a fraction of the peak.
pub fn compute_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    let Some(first) = equity_curve.first() else {
        return 0.0;
    };

    let mut peak = first.total_value;
    let mut max_dd = 0.0_f64;

    for point in equity_curve {
        if point.total_value > peak {
            peak = point.total_value;
        } else if peak > 0.0 {
            let dd = (peak - point.total_value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}
