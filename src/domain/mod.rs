//! Core domain types and logic.
//!
//! Pipeline: price series → signals → simulated trades → equity curve →
//! performance summary. Nothing in here performs I/O.

pub mod backtest;
pub mod config_validation;
pub mod equity;
pub mod error;
pub mod execution;
pub mod indicator;
pub mod metrics;
pub mod portfolio;
pub mod price;
pub mod signal;
pub mod trade;
