//! Report generation port trait.

use crate::domain::backtest::BacktestReport;
use crate::domain::error::QuantdashError;
use std::path::Path;

/// Port for writing backtest reports.
pub trait ReportPort {
    fn write(&self, report: &BacktestReport, output_path: &Path) -> Result<(), QuantdashError>;
}
