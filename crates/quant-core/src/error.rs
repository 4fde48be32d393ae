//! Error types for the backtest engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Fatal simulation and analysis errors.
///
/// These are deterministic input errors: retrying with the same input
/// yields the same error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BacktestError {
    #[error("Invalid date range: end date {end} must be after start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid initial capital: {0} (must be positive)")]
    InvalidCapital(Decimal),

    #[error("Invalid {name} rate: {value} (must be non-negative)")]
    InvalidRate { name: &'static str, value: Decimal },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Equity curve is empty")]
    EmptyCurve,

    #[error("Initial equity value is zero, returns are undefined")]
    DivisionByZero,

    #[error("Equity curve dates must be strictly increasing (violated at index {index})")]
    UnorderedCurve { index: usize },

    #[error("No trading days between {start} and {end}")]
    NoTradingDays { start: NaiveDate, end: NaiveDate },

    #[error("Return source exhausted: need {required} steps, have {available}")]
    SourceExhausted { required: usize, available: usize },

    #[error("Invalid return step on {date}: {reason}")]
    InvalidReturn { date: NaiveDate, reason: String },

    #[error("Equity value overflowed on {date}")]
    Overflow { date: NaiveDate },
}

/// Narrative collaborator errors.
///
/// Never fatal to a run: callers substitute a fallback text.
#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Empty response from narrative service")]
    EmptyResponse,

    #[error("Narrative service timed out after {0} ms")]
    Timeout(u64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, BacktestError>;
