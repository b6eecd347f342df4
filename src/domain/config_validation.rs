//! Configuration validation.
//!
//! Validates all config fields before a backtest runs.

use crate::domain::error::QuantdashError;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), QuantdashError> {
    validate_sources(config)?;
    validate_backtest_config(config)?;
    Ok(())
}

/// Checks the `[data]` and `[cache]` sections only. Used where backtest
/// values may still be overridden and are validated after merging.
pub fn validate_sources(config: &dyn ConfigPort) -> Result<(), QuantdashError> {
    validate_data_dir(config)?;
    validate_cache(config)?;
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), QuantdashError> {
    validate_starting_cash(config)?;
    validate_windows(config)?;
    validate_rate(config, "slippage_rate")?;
    validate_rate(config, "fee_rate")?;
    validate_risk_free_rate(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> QuantdashError {
    QuantdashError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), QuantdashError> {
    if config.has_value("data", "dir") {
        Ok(())
    } else {
        Err(QuantdashError::ConfigMissing {
            section: "data".to_string(),
            key: "dir".to_string(),
        })
    }
}

fn validate_cache(config: &dyn ConfigPort) -> Result<(), QuantdashError> {
    let ttl = config.get_int("cache", "ttl_seconds", 0);
    if ttl < 0 {
        return Err(invalid(
            "cache",
            "ttl_seconds",
            "ttl_seconds must be non-negative",
        ));
    }
    Ok(())
}

fn validate_starting_cash(config: &dyn ConfigPort) -> Result<(), QuantdashError> {
    let value = config.get_double("backtest", "starting_cash", 10_000.0);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "backtest",
            "starting_cash",
            "starting_cash must be positive",
        ));
    }
    Ok(())
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), QuantdashError> {
    let fast = config.get_int("backtest", "fast_window", 20);
    let slow = config.get_int("backtest", "slow_window", 50);

    if fast < 1 {
        return Err(invalid(
            "backtest",
            "fast_window",
            "fast_window must be at least 1",
        ));
    }
    if slow <= fast {
        return Err(invalid(
            "backtest",
            "slow_window",
            "slow_window must be greater than fast_window",
        ));
    }
    Ok(())
}

fn validate_rate(config: &dyn ConfigPort, key: &str) -> Result<(), QuantdashError> {
    let value = config.get_double("backtest", key, 0.0);
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(
            "backtest",
            key,
            &format!("{key} must be non-negative"),
        ));
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), QuantdashError> {
    let value = config.get_double("backtest", "risk_free_rate", 0.0);
    if !(0.0..1.0).contains(&value) {
        return Err(invalid(
            "backtest",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    Ok(())
}
