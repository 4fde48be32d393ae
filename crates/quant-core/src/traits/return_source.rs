//! Return source trait definition.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

/// One simulated day of strategy activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyStep {
    /// Portfolio return for the day, as a fraction
    pub ret: f64,
    /// Traded notional as a fraction of the previous day's equity
    pub turnover: f64,
}

impl DailyStep {
    /// Create a step with trading activity.
    pub fn new(ret: f64, turnover: f64) -> Self {
        Self { ret, turnover }
    }

    /// Create a step without trading activity.
    pub fn hold(ret: f64) -> Self {
        Self { ret, turnover: 0.0 }
    }
}

/// Supplies one step per simulated day after the first.
///
/// Implementations are either seeded pseudo-random generators or
/// deterministic strategy-driven sequences; both must be reproducible.
pub trait ReturnSource: Send {
    /// Produce the step for `date`.
    fn next_step(&mut self, date: NaiveDate) -> EngineResult<DailyStep>;

    /// Steps left to supply; `None` for unbounded sources.
    fn remaining(&self) -> Option<usize> {
        None
    }

    /// Get the source name.
    fn name(&self) -> &str;
}
