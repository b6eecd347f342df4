//! CSV report adapter implementing ReportPort.
//!
//! Writes the equity curve, one row per price point, for charting.

use std::path::Path;

use crate::domain::backtest::BacktestReport;
use crate::domain::error::QuantdashError;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        CsvReportAdapter
    }
}

fn report_error(output_path: &Path, e: impl std::fmt::Display) -> QuantdashError {
    QuantdashError::Report {
        reason: format!("failed to write {}: {}", output_path.display(), e),
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, report: &BacktestReport, output_path: &Path) -> Result<(), QuantdashError> {
        let mut wtr = csv::Writer::from_path(output_path).map_err(|e| report_error(output_path, e))?;

        wtr.write_record(["timestamp", "cash", "position", "total_value"])
            .map_err(|e| report_error(output_path, e))?;
        for point in &report.equity_curve {
            wtr.write_record([
                point.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                format!("{:.6}", point.cash),
                point.position.to_string(),
                format!("{:.6}", point.total_value),
            ])
            .map_err(|e| report_error(output_path, e))?;
        }
        wtr.flush()?;
        Ok(())
    }
}
