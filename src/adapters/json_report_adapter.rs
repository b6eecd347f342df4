//! JSON report adapter implementing ReportPort.
//!
//! Writes the whole backtest report as pretty-printed JSON.

use std::fs;
use std::path::Path;

use crate::domain::backtest::BacktestReport;
use crate::domain::error::QuantdashError;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default)]
pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn new() -> Self {
        JsonReportAdapter
    }

    pub fn render(&self, report: &BacktestReport) -> Result<String, QuantdashError> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, report: &BacktestReport, output_path: &Path) -> Result<(), QuantdashError> {
        let content = self.render(report)?;
        fs::write(output_path, content).map_err(|e| QuantdashError::Report {
            reason: format!("failed to write {}: {}", output_path.display(), e),
        })
    }
}
