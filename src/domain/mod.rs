//! Core domain types and logic.

pub mod ohlcv;
pub mod params;
pub mod rolling;
pub mod indicator;
pub mod position;
pub mod simulator;
pub mod optimizer;
pub mod forward;
pub mod universe;
pub mod config_validation;
pub mod error;
