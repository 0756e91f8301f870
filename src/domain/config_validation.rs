//! Configuration validation.
//!
//! Every run validates its config sections up front so a bad value fails
//! with a precise `[section] key` message instead of a mid-run surprise.

use crate::domain::error::TurtleError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_engine_config(config: &dyn ConfigPort) -> Result<(), TurtleError> {
    let atr_period = config.get_int("engine", "atr_period", 20);
    if atr_period <= 0 {
        return Err(invalid("engine", "atr_period", "must be positive"));
    }

    let risk = config.get_double("engine", "risk_per_trade", 0.01);
    if !(risk > 0.0 && risk <= 1.0) {
        return Err(invalid(
            "engine",
            "risk_per_trade",
            "must be in (0, 1]",
        ));
    }

    let balance = config.get_double("engine", "initial_balance", 100_000.0);
    if !(balance > 0.0) {
        return Err(invalid("engine", "initial_balance", "must be positive"));
    }

    Ok(())
}

pub fn validate_optimize_config(config: &dyn ConfigPort) -> Result<(), TurtleError> {
    validate_window(config, "optimize", "train_start", "train_end")?;

    let highs = require_period_list(config, "optimize", "breakout_high_periods")?;
    let lows = require_period_list(config, "optimize", "breakout_low_periods")?;
    let mults = require_multiplier_list(config, "optimize", "atr_multipliers")?;
    debug_assert!(!highs.is_empty() && !lows.is_empty() && !mults.is_empty());

    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), TurtleError> {
    validate_window(config, "backtest", "test_start", "test_end")
}

fn validate_window(
    config: &dyn ConfigPort,
    section: &str,
    start_key: &str,
    end_key: &str,
) -> Result<(), TurtleError> {
    let start = parse_date(config.get_string(section, start_key).as_deref(), section, start_key)?;
    let end = parse_date(config.get_string(section, end_key).as_deref(), section, end_key)?;
    if start >= end {
        return Err(invalid(
            section,
            start_key,
            &format!("{start_key} must be before {end_key}"),
        ));
    }
    Ok(())
}

pub fn parse_date(
    value: Option<&str>,
    section: &str,
    key: &str,
) -> Result<NaiveDate, TurtleError> {
    match value {
        None => Err(TurtleError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
            invalid(section, key, "invalid date format (expected YYYY-MM-DD)")
        }),
    }
}

/// Comma-separated positive integers, e.g. `20,55`.
pub fn require_period_list(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Vec<usize>, TurtleError> {
    let items = config
        .get_list(section, key)
        .ok_or_else(|| TurtleError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        })?;
    if items.is_empty() {
        return Err(invalid(section, key, "list must not be empty"));
    }
    items
        .iter()
        .map(|s| match s.parse::<usize>() {
            Ok(v) if v > 0 => Ok(v),
            _ => Err(invalid(
                section,
                key,
                &format!("'{s}' is not a positive integer"),
            )),
        })
        .collect()
}

/// Comma-separated positive numbers, e.g. `2,3` or `1.5,2.5`.
pub fn require_multiplier_list(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Vec<f64>, TurtleError> {
    let items = config
        .get_list(section, key)
        .ok_or_else(|| TurtleError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        })?;
    if items.is_empty() {
        return Err(invalid(section, key, "list must not be empty"));
    }
    items
        .iter()
        .map(|s| match s.parse::<f64>() {
            Ok(v) if v > 0.0 && v.is_finite() => Ok(v),
            _ => Err(invalid(
                section,
                key,
                &format!("'{s}' is not a positive number"),
            )),
        })
        .collect()
}

fn invalid(section: &str, key: &str, reason: &str) -> TurtleError {
    TurtleError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
