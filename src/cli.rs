//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use crate::adapters::cached_price_source::CachedPriceSource;
use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::adapters::memory_cache::InMemoryCache;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, BacktestReport};
use crate::domain::config_validation::{validate_config, validate_sources};
use crate::domain::error::QuantdashError;
use crate::domain::execution::ExecutionConfig;
use crate::domain::indicator::IndicatorType;
use crate::domain::signal::generate_signals;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PriceSource;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "quantdash", about = "Moving-average crossover backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        /// Fast moving average window
        #[arg(long)]
        fast: Option<usize>,
        /// Slow moving average window
        #[arg(long)]
        slow: Option<usize>,
        /// Starting cash
        #[arg(long)]
        cash: Option<f64>,
        /// Report path; `.csv` writes the equity curve, anything else JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Print crossover signals for a symbol
    Signals {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Values given on the command line that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub fast: Option<usize>,
    pub slow: Option<usize>,
    pub cash: Option<f64>,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            fast,
            slow,
            cash,
            output,
            dry_run,
        } => {
            let overrides = Overrides { fast, slow, cash };
            if dry_run {
                run_dry_run(&config, symbol.as_deref(), &overrides)
            } else {
                run_backtest(&config, symbol.as_deref(), &overrides, output.as_deref())
            }
        }
        Command::Signals { config, symbol } => run_signals(&config, symbol.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
    }
}

fn fail(err: QuantdashError) -> ExitCode {
    log::error!("{err}");
    (&err).into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    log::info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(fail)
}

pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<BacktestConfig, QuantdashError> {
    let defaults = BacktestConfig::default();
    let config = BacktestConfig {
        starting_cash: overrides
            .cash
            .unwrap_or_else(|| adapter.get_double("backtest", "starting_cash", defaults.starting_cash)),
        fast_window: overrides
            .fast
            .unwrap_or_else(|| adapter.get_usize("backtest", "fast_window", defaults.fast_window)),
        slow_window: overrides
            .slow
            .unwrap_or_else(|| adapter.get_usize("backtest", "slow_window", defaults.slow_window)),
        execution: ExecutionConfig {
            slippage_rate: adapter.get_double(
                "backtest",
                "slippage_rate",
                defaults.execution.slippage_rate,
            ),
            fee_rate: adapter.get_double("backtest", "fee_rate", defaults.execution.fee_rate),
        },
        risk_free_rate: adapter.get_double("backtest", "risk_free_rate", defaults.risk_free_rate),
    };
    config.validate()?;
    Ok(config)
}

pub fn resolve_symbol(
    symbol_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<String, QuantdashError> {
    symbol_override
        .map(str::to_string)
        .or_else(|| config.get_string("backtest", "symbol"))
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| QuantdashError::ConfigMissing {
            section: "backtest".into(),
            key: "symbol".into(),
        })
}

/// CSV source from `[data] dir`, wrapped in an in-memory cache unless
/// `[cache] enabled = false`.
pub fn build_price_source(config: &dyn ConfigPort) -> Result<Box<dyn PriceSource>, QuantdashError> {
    let dir = config
        .get_string("data", "dir")
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| QuantdashError::ConfigMissing {
            section: "data".into(),
            key: "dir".into(),
        })?;
    let csv = CsvPriceAdapter::new(PathBuf::from(dir.trim()));

    if !config.get_bool("cache", "enabled", true) {
        return Ok(Box::new(csv));
    }
    let ttl_seconds = config.get_int("cache", "ttl_seconds", 300).max(0) as u64;
    Ok(Box::new(CachedPriceSource::new(
        csv,
        InMemoryCache::new(),
        Duration::from_secs(ttl_seconds),
    )))
}

pub fn report_writer_for(output: &Path) -> Box<dyn ReportPort> {
    match output.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => Box::new(CsvReportAdapter::new()),
        _ => Box::new(JsonReportAdapter::new()),
    }
}

pub fn run_backtest_pipeline(
    source: &dyn PriceSource,
    symbol: &str,
    bt_config: &BacktestConfig,
    output_path: Option<&Path>,
) -> Result<BacktestReport, QuantdashError> {
    // Stage 1: Fetch the normalized series
    let series = source.fetch_series(symbol)?;
    if series.is_empty() {
        return Err(QuantdashError::NoData {
            symbol: symbol.to_string(),
        });
    }

    let slow = IndicatorType::Sma(bt_config.slow_window);
    if series.len() <= slow.warmup() + 1 {
        log::warn!(
            "{}: {} points is too short for {} to produce any crossover",
            symbol,
            series.len(),
            slow
        );
    }

    // Stage 2: Run the backtest
    log::info!(
        "Running backtest: {} over {} points, {} vs {}",
        symbol,
        series.len(),
        IndicatorType::Sma(bt_config.fast_window),
        IndicatorType::Sma(bt_config.slow_window),
    );
    let report = backtest_engine::run_backtest(symbol, &series, bt_config)?;

    // Stage 3: Write the report
    if let Some(path) = output_path {
        report_writer_for(path).write(&report, path)?;
        log::info!("Report written to: {}", path.display());
    }

    Ok(report)
}

pub fn print_summary(report: &BacktestReport) {
    let sim = &report.simulation;
    let perf = &report.performance;

    println!("=== {} ===", report.symbol);
    println!("Signals:          {}", report.signals.len());
    let buys = sim.trades.iter().filter(|t| t.is_buy()).count();
    let sells = sim.trades.iter().filter(|t| t.is_sell()).count();
    println!(
        "Trades:           {} ({} buys, {} sells)",
        perf.trade_count, buys, sells
    );
    println!("Starting Cash:    {:.2}", sim.starting_cash);
    println!("Ending Cash:      {:.2}", sim.ending_cash);
    println!("Ending Position:  {}", sim.ending_position);
    println!("Final Price:      {:.2}", sim.final_price);
    println!("Portfolio Value:  {:.2}", sim.portfolio_value);
    println!("Total Return:     {:.2}%", perf.total_return * 100.0);
    println!("CAGR:             {:.2}%", perf.cagr * 100.0);
    println!("Sharpe Ratio:     {:.2}", perf.sharpe);
    println!("Max Drawdown:     -{:.1}%", perf.max_drawdown * 100.0);
}

fn run_backtest(
    config_path: &Path,
    symbol_override: Option<&str>,
    overrides: &Overrides,
    output_path: Option<&Path>,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Backtest values are checked once overrides are merged.
    if let Err(e) = validate_sources(&adapter) {
        return fail(e);
    }

    let prepared = build_backtest_config(&adapter, overrides).and_then(|bt_config| {
        let symbol = resolve_symbol(symbol_override, &adapter)?;
        let source = build_price_source(&adapter)?;
        Ok((bt_config, symbol, source))
    });
    let (bt_config, symbol, source) = match prepared {
        Ok(p) => p,
        Err(e) => return fail(e),
    };

    match run_backtest_pipeline(source.as_ref(), &symbol, &bt_config, output_path) {
        Ok(report) => {
            print_summary(&report);
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

pub fn run_dry_run(
    config_path: &Path,
    symbol_override: Option<&str>,
    overrides: &Overrides,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Backtest values are checked once overrides are merged.
    if let Err(e) = validate_sources(&adapter) {
        return fail(e);
    }

    let bt_config = match build_backtest_config(&adapter, overrides) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let symbol = match resolve_symbol(symbol_override, &adapter) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    log::info!("Config validated successfully");
    println!("Symbol:           {}", symbol);
    println!(
        "Crossover:        {} / {}",
        IndicatorType::Sma(bt_config.fast_window),
        IndicatorType::Sma(bt_config.slow_window)
    );
    println!("Starting Cash:    {:.2}", bt_config.starting_cash);
    println!("Slippage Rate:    {}", bt_config.execution.slippage_rate);
    println!("Fee Rate:         {}", bt_config.execution.fee_rate);
    println!("Risk-free Rate:   {}", bt_config.risk_free_rate);
    log::info!("Dry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_signals(config_path: &Path, symbol_override: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let result = build_backtest_config(&adapter, &Overrides::default()).and_then(|bt_config| {
        let symbol = resolve_symbol(symbol_override, &adapter)?;
        let series = build_price_source(&adapter)?.fetch_series(&symbol)?;
        generate_signals(&series, bt_config.fast_window, bt_config.slow_window)
    });

    match result {
        Ok(signals) => {
            for signal in &signals {
                println!(
                    "{}\t{}\t{}\t{:.4}",
                    signal.index, signal.timestamp, signal.kind, signal.price
                );
            }
            log::info!("{} signals", signals.len());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match validate_config(&adapter) {
        Ok(()) => {
            println!("Configuration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_list_symbols(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let symbols = match build_price_source(&adapter).and_then(|source| source.list_symbols()) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    if symbols.is_empty() {
        log::warn!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        log::info!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}
