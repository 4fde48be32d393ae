//! CLI command implementations.

pub mod backtest;
pub mod show;
pub mod validate;
