//! Core types and traits for the backtest engine.
//!
//! This crate provides the foundational building blocks including:
//! - Run configuration (BacktestConfig)
//! - Equity curves and performance/risk metric records
//! - Trade records and the terminal BacktestResult
//! - Core traits for return sources, trading calendars, and narrators

pub mod types;
pub mod traits;
pub mod error;

pub use error::{BacktestError, EngineResult, NarrativeError};
pub use types::*;
pub use traits::*;
