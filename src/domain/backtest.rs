//! Backtest pipeline: signals → simulation → equity curve → metrics.
//!
//! BacktestConfig defines backtest parameters.

use serde::{Deserialize, Serialize};

use super::equity::{EquityPoint, reconstruct_equity};
use super::error::QuantdashError;
use super::execution::{ExecutionConfig, SimulationResult, simulate};
use super::metrics::PerformanceSummary;
use super::price::PricePoint;
use super::signal::{Signal, generate_signals, validate_windows};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub starting_cash: f64,
    pub fast_window: usize,
    pub slow_window: usize,
    pub execution: ExecutionConfig,
    pub risk_free_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            starting_cash: 10_000.0,
            fast_window: 20,
            slow_window: 50,
            execution: ExecutionConfig::default(),
            risk_free_rate: 0.0,
        }
    }
}

impl BacktestConfig {
    pub fn validate(&self) -> Result<(), QuantdashError> {
        validate_windows(self.fast_window, self.slow_window)?;
        if !self.starting_cash.is_finite() || self.starting_cash <= 0.0 {
            return Err(QuantdashError::invalid_parameter(
                "starting_cash",
                "must be positive",
            ));
        }
        if !(0.0..1.0).contains(&self.risk_free_rate) {
            return Err(QuantdashError::invalid_parameter(
                "risk_free_rate",
                "must be between 0 and 1",
            ));
        }
        self.execution.validate()
    }
}

/// Everything a single backtest run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub symbol: String,
    pub config: BacktestConfig,
    pub signals: Vec<Signal>,
    pub simulation: SimulationResult,
    pub equity_curve: Vec<EquityPoint>,
    pub performance: PerformanceSummary,
}

/// Run the full pipeline over an already-normalized series.
pub fn run_backtest(
    symbol: &str,
    series: &[PricePoint],
    config: &BacktestConfig,
) -> Result<BacktestReport, QuantdashError> {
    config.validate()?;

    let signals = generate_signals(series, config.fast_window, config.slow_window)?;
    let simulation = simulate(&signals, series, config.starting_cash, &config.execution)?;
    let equity_curve = reconstruct_equity(&simulation.trades, series, config.starting_cash);
    let performance = PerformanceSummary::compute(
        &equity_curve,
        simulation.trades.len(),
        config.risk_free_rate,
    );

    Ok(BacktestReport {
        symbol: symbol.to_string(),
        config: config.clone(),
        signals,
        simulation,
        equity_curve,
        performance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn make_series(prices: &[f64]) -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| PricePoint::new(start + Duration::days(i as i64), p))
            .collect()
    }

    fn sample_config() -> BacktestConfig {
        BacktestConfig {
            starting_cash: 1_000.0,
            fast_window: 2,
            slow_window: 4,
            ..BacktestConfig::default()
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(BacktestConfig::default().validate().is_ok());
    }

    #[test]
    fn config_rejects_bad_windows() {
        let c = BacktestConfig {
            fast_window: 50,
            slow_window: 20,
            ..BacktestConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(QuantdashError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn config_rejects_non_positive_cash() {
        let c = BacktestConfig {
            starting_cash: 0.0,
            ..BacktestConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn config_rejects_risk_free_out_of_range() {
        let c = BacktestConfig {
            risk_free_rate: 1.5,
            ..BacktestConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn pipeline_crossover_scenario() {
        let series = make_series(&[10.0, 9.0, 8.0, 9.0, 10.0, 11.0, 10.0, 9.0, 8.0, 7.0]);
        let report = run_backtest("TEST", &series, &sample_config()).unwrap();

        assert_eq!(report.symbol, "TEST");
        assert_eq!(report.signals.len(), 2);
        assert_eq!(report.simulation.trades.len(), 2);
        assert_eq!(report.equity_curve.len(), series.len());
        assert_eq!(report.performance.trade_count, 2);

        let last = report.equity_curve.last().unwrap();
        assert!((last.total_value - report.simulation.portfolio_value).abs() < 1e-9);
    }

    #[test]
    fn pipeline_single_point() {
        let series = make_series(&[42.0]);
        let report = run_backtest("ONE", &series, &sample_config()).unwrap();

        assert!(report.signals.is_empty());
        assert_eq!(report.equity_curve.len(), 1);
        assert!((report.equity_curve[0].total_value - 1_000.0).abs() < f64::EPSILON);
        assert_eq!(report.performance.cagr, 0.0);
        assert_eq!(report.performance.sharpe, 0.0);
    }

    #[test]
    fn pipeline_empty_series() {
        let report = run_backtest("NONE", &[], &sample_config()).unwrap();
        assert!(report.equity_curve.is_empty());
        assert!((report.simulation.portfolio_value - 1_000.0).abs() < f64::EPSILON);
        assert_eq!(report.performance.cagr, 0.0);
    }

    #[test]
    fn pipeline_rejects_invalid_config() {
        let config = BacktestConfig {
            fast_window: 4,
            slow_window: 4,
            ..sample_config()
        };
        assert!(run_backtest("X", &make_series(&[1.0, 2.0]), &config).is_err());
    }
}
