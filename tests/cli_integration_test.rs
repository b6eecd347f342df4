//! CLI integration tests for configuration handling and the backtest pipeline.
//!
//! Tests cover:
//! - Config parsing with command-line overrides (build_backtest_config)
//! - Symbol resolution (resolve_symbol)
//! - Price source construction from `[data]` and `[cache]`
//! - Dry-run and validate against real INI files on disk
//! - Full pipeline with MockPriceSource and with CSV files on disk

mod common;

use approx::assert_abs_diff_eq;
use common::*;
use quantdash::adapters::file_config_adapter::FileConfigAdapter;
use quantdash::cli::{self, Overrides};
use quantdash::domain::backtest::BacktestReport;
use quantdash::domain::error::QuantdashError;
use std::fs;
use std::io::Write;
use std::process::ExitCode;
use tempfile::TempDir;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const VALID_INI: &str = r#"
[data]
dir = /var/quotes

[cache]
enabled = true
ttl_seconds = 60

[backtest]
symbol = aapl
starting_cash = 1000.0
fast_window = 2
slow_window = 4
slippage_rate = 0.001
fee_rate = 0.0005
risk_free_rate = 0.02
"#;

fn valid_config() -> FileConfigAdapter {
    FileConfigAdapter::from_string(VALID_INI).unwrap()
}

/// Data directory holding the scenario series as `TEST.csv`, plus an INI
/// pointing at it.
fn data_dir_with_ini(extra: &str) -> (TempDir, tempfile::NamedTempFile) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("TEST.csv"), series_csv(&SCENARIO_PRICES)).unwrap();
    fs::write(dir.path().join("EMPTY.csv"), "date,close\n").unwrap();
    let ini = format!(
        "[data]\ndir = {}\n\n[backtest]\nsymbol = TEST\nstarting_cash = 1000\nfast_window = 2\nslow_window = 4\n{}",
        dir.path().display(),
        extra
    );
    let file = write_temp_ini(&ini);
    (dir, file)
}

mod config_loading {
    use super::*;

    #[test]
    fn reads_backtest_section() {
        let config = cli::build_backtest_config(&valid_config(), &Overrides::default()).unwrap();
        assert_eq!(config.starting_cash, 1000.0);
        assert_eq!(config.fast_window, 2);
        assert_eq!(config.slow_window, 4);
        assert_eq!(config.execution.slippage_rate, 0.001);
        assert_eq!(config.execution.fee_rate, 0.0005);
        assert_eq!(config.risk_free_rate, 0.02);
    }

    #[test]
    fn defaults_fill_missing_keys() {
        let adapter = FileConfigAdapter::from_string("[data]\ndir = /tmp\n").unwrap();
        let config = cli::build_backtest_config(&adapter, &Overrides::default()).unwrap();
        assert_eq!(config.starting_cash, 10_000.0);
        assert_eq!(config.fast_window, 20);
        assert_eq!(config.slow_window, 50);
        assert_eq!(config.risk_free_rate, 0.0);
    }

    #[test]
    fn overrides_take_precedence() {
        let overrides = Overrides {
            fast: Some(3),
            slow: Some(9),
            cash: Some(500.0),
        };
        let config = cli::build_backtest_config(&valid_config(), &overrides).unwrap();
        assert_eq!(config.fast_window, 3);
        assert_eq!(config.slow_window, 9);
        assert_eq!(config.starting_cash, 500.0);
    }

    #[test]
    fn override_producing_bad_windows_is_rejected() {
        let overrides = Overrides {
            fast: Some(10),
            ..Overrides::default()
        };
        let result = cli::build_backtest_config(&valid_config(), &overrides);
        assert!(matches!(
            result,
            Err(QuantdashError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn load_config_missing_file() {
        let result = cli::load_config(std::path::Path::new("/nonexistent/quantdash.ini"));
        assert!(result.is_err());
    }
}

mod symbol_resolution {
    use super::*;

    #[test]
    fn from_config_is_uppercased() {
        assert_eq!(cli::resolve_symbol(None, &valid_config()).unwrap(), "AAPL");
    }

    #[test]
    fn override_wins() {
        assert_eq!(
            cli::resolve_symbol(Some(" msft "), &valid_config()).unwrap(),
            "MSFT"
        );
    }

    #[test]
    fn missing_symbol_is_config_error() {
        let adapter = FileConfigAdapter::from_string("[data]\ndir = /tmp\n").unwrap();
        let err = cli::resolve_symbol(None, &adapter).unwrap_err();
        assert!(matches!(err, QuantdashError::ConfigMissing { .. }));
        assert_eq!(ExitCode::from(&err), ExitCode::from(2));
    }
}

mod price_source {
    use super::*;

    #[test]
    fn missing_data_dir_is_error() {
        let adapter = FileConfigAdapter::from_string("[backtest]\nsymbol = X\n").unwrap();
        assert!(matches!(
            cli::build_price_source(&adapter),
            Err(QuantdashError::ConfigMissing { .. })
        ));
    }

    #[test]
    fn reads_csv_with_and_without_cache() {
        let (dir, _ini) = data_dir_with_ini("");
        let dir_line = format!("[data]\ndir = {}\n", dir.path().display());

        for cache in ["", "[cache]\nenabled = false\n"] {
            let adapter = FileConfigAdapter::from_string(&format!("{dir_line}{cache}")).unwrap();
            let source = cli::build_price_source(&adapter).unwrap();
            assert_eq!(source.fetch_series("TEST").unwrap().len(), 10);
            assert_eq!(source.list_symbols().unwrap(), vec!["EMPTY", "TEST"]);
        }
    }

    #[test]
    fn lowercase_file_matches_listed_symbol() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("aapl.csv"), series_csv(&SCENARIO_PRICES)).unwrap();
        let adapter =
            FileConfigAdapter::from_string(&format!("[data]\ndir = {}\n", dir.path().display()))
                .unwrap();
        let source = cli::build_price_source(&adapter).unwrap();

        let listed = source.list_symbols().unwrap();
        assert_eq!(listed, vec!["AAPL"]);
        let symbol = cli::resolve_symbol(Some("aapl"), &adapter).unwrap();
        assert_eq!(symbol, listed[0]);
        assert_eq!(source.fetch_series(&symbol).unwrap().len(), 10);
    }
}

mod dry_run_and_validate {
    use super::*;

    #[test]
    fn valid_file_succeeds() {
        let (_dir, ini) = data_dir_with_ini("");
        let code = cli::run_dry_run(ini.path(), None, &Overrides::default());
        assert_eq!(code, ExitCode::SUCCESS);
    }

    fn ini_with_windows(fast: usize, slow: usize) -> (TempDir, tempfile::NamedTempFile) {
        let (dir, ini) = data_dir_with_ini("");
        let contents = fs::read_to_string(ini.path())
            .unwrap()
            .replace("fast_window = 2", &format!("fast_window = {fast}"))
            .replace("slow_window = 4", &format!("slow_window = {slow}"));
        (dir, write_temp_ini(&contents))
    }

    #[test]
    fn invalid_windows_fail_with_parameter_code() {
        let (_dir, ini) = ini_with_windows(2, 1);
        let code = cli::run_dry_run(ini.path(), None, &Overrides::default());
        assert_eq!(code, ExitCode::from(4));
    }

    #[test]
    fn overrides_repair_invalid_file_windows() {
        let (_dir, ini) = ini_with_windows(50, 20);
        let overrides = Overrides {
            fast: Some(5),
            slow: Some(10),
            ..Overrides::default()
        };
        assert_eq!(
            cli::run_dry_run(ini.path(), None, &overrides),
            ExitCode::SUCCESS
        );
    }

    #[test]
    fn single_override_pairs_with_file_value() {
        // fast = 6 in the file is replaced; slow = 4 comes from the file.
        let (_dir, ini) = ini_with_windows(6, 4);
        let overrides = Overrides {
            fast: Some(2),
            ..Overrides::default()
        };
        assert_eq!(
            cli::run_dry_run(ini.path(), None, &overrides),
            ExitCode::SUCCESS
        );
    }

    #[test]
    fn validate_command_still_rejects_file_windows() {
        let (_dir, ini) = ini_with_windows(50, 20);
        let cli = cli::Cli {
            command: cli::Command::Validate {
                config: ini.path().to_path_buf(),
            },
        };
        assert_eq!(cli::run(cli), ExitCode::from(2));
    }

    #[test]
    fn missing_config_file_fails() {
        let code = cli::run_dry_run(
            std::path::Path::new("/nonexistent/quantdash.ini"),
            None,
            &Overrides::default(),
        );
        assert_ne!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn run_validate_command() {
        let (_dir, ini) = data_dir_with_ini("");
        let cli = cli::Cli {
            command: cli::Command::Validate {
                config: ini.path().to_path_buf(),
            },
        };
        assert_eq!(cli::run(cli), ExitCode::SUCCESS);
    }
}

mod pipeline {
    use super::*;

    fn scenario_config() -> quantdash::domain::backtest::BacktestConfig {
        cli::build_backtest_config(&valid_config(), &Overrides::default()).unwrap()
    }

    #[test]
    fn mock_source_runs_backtest() {
        let source = MockPriceSource::new().with_series("TEST", scenario_series());
        let report =
            cli::run_backtest_pipeline(&source, "TEST", &scenario_config(), None).unwrap();
        assert_eq!(report.symbol, "TEST");
        assert_eq!(report.simulation.trades.len(), 2);
        assert_eq!(report.equity_curve.len(), 10);
    }

    #[test]
    fn empty_series_is_no_data() {
        let source = MockPriceSource::new().with_series("EMPTY", Vec::new());
        let err = cli::run_backtest_pipeline(&source, "EMPTY", &scenario_config(), None)
            .unwrap_err();
        assert!(matches!(err, QuantdashError::NoData { .. }));
        assert_eq!(ExitCode::from(&err), ExitCode::from(5));
    }

    #[test]
    fn source_error_propagates() {
        let source = MockPriceSource::new().with_error("BAD", "feed down");
        let err =
            cli::run_backtest_pipeline(&source, "BAD", &scenario_config(), None).unwrap_err();
        assert!(matches!(err, QuantdashError::Data { .. }));
        assert_eq!(ExitCode::from(&err), ExitCode::from(3));
    }

    #[test]
    fn writes_json_report() {
        let out_dir = TempDir::new().unwrap();
        let out = out_dir.path().join("report.json");
        let source = MockPriceSource::new().with_series("TEST", scenario_series());

        let report =
            cli::run_backtest_pipeline(&source, "TEST", &scenario_config(), Some(&out)).unwrap();

        let written: BacktestReport =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written.symbol, report.symbol);
        assert_eq!(written.signals.len(), report.signals.len());
        assert_eq!(written.simulation.trades.len(), 2);
        assert_eq!(written.equity_curve.len(), report.equity_curve.len());
        assert_abs_diff_eq!(
            written.simulation.portfolio_value,
            report.simulation.portfolio_value,
            epsilon = 1e-9
        );
    }

    #[test]
    fn writes_csv_equity_curve() {
        let out_dir = TempDir::new().unwrap();
        let out = out_dir.path().join("equity.CSV");
        let source = MockPriceSource::new().with_series("TEST", scenario_series());

        cli::run_backtest_pipeline(&source, "TEST", &scenario_config(), Some(&out)).unwrap();

        let body = fs::read_to_string(&out).unwrap();
        let mut lines = body.lines();
        assert_eq!(lines.next(), Some("timestamp,cash,position,total_value"));
        assert_eq!(lines.count(), 10);
    }

    #[test]
    fn unwritable_output_is_report_error() {
        let source = MockPriceSource::new().with_series("TEST", scenario_series());
        let out = std::path::Path::new("/nonexistent/dir/report.json");
        let err = cli::run_backtest_pipeline(&source, "TEST", &scenario_config(), Some(out))
            .unwrap_err();
        assert!(matches!(err, QuantdashError::Report { .. }));
    }

    #[test]
    fn backtest_command_end_to_end() {
        let (dir, ini) = data_dir_with_ini("[cache]\nenabled = true\nttl_seconds = 30\n");
        let out = dir.path().join("out.json");
        let cli = cli::Cli {
            command: cli::Command::Backtest {
                config: ini.path().to_path_buf(),
                symbol: None,
                fast: None,
                slow: None,
                cash: None,
                output: Some(out.clone()),
                dry_run: false,
            },
        };

        assert_eq!(cli::run(cli), ExitCode::SUCCESS);
        let written: BacktestReport =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written.symbol, "TEST");
        assert_eq!(written.simulation.trades.len(), 2);
    }

    #[test]
    fn backtest_command_empty_file_is_no_data() {
        let (_dir, ini) = data_dir_with_ini("");
        let cli = cli::Cli {
            command: cli::Command::Backtest {
                config: ini.path().to_path_buf(),
                symbol: Some("EMPTY".to_string()),
                fast: None,
                slow: None,
                cash: None,
                output: None,
                dry_run: false,
            },
        };
        assert_eq!(cli::run(cli), ExitCode::from(5));
    }
}
