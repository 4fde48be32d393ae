//! Backtest run configuration.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{BacktestError, EngineResult};

/// Configuration of a single backtest run.
///
/// Treated as immutable once a run starts; the simulator only borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Strategy identifier
    pub strategy_id: String,
    /// Initial capital
    pub initial_capital: Decimal,
    /// First simulated day (inclusive)
    pub start_date: NaiveDate,
    /// Last simulated day (inclusive)
    pub end_date: NaiveDate,
    /// Commission as a fraction of traded notional
    pub commission_rate: Decimal,
    /// Slippage as a fraction of traded notional
    pub slippage_rate: Decimal,
}

impl BacktestConfig {
    /// Create a new configuration with zero trading costs.
    pub fn new(
        strategy_id: impl Into<String>,
        initial_capital: Decimal,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            strategy_id: strategy_id.into(),
            initial_capital,
            start_date,
            end_date,
            commission_rate: Decimal::ZERO,
            slippage_rate: Decimal::ZERO,
        }
    }

    /// Set the commission rate.
    pub fn with_commission_rate(mut self, rate: Decimal) -> Self {
        self.commission_rate = rate;
        self
    }

    /// Set the slippage rate.
    pub fn with_slippage_rate(mut self, rate: Decimal) -> Self {
        self.slippage_rate = rate;
        self
    }

    /// Combined cost rate applied to traded notional.
    pub fn cost_rate(&self) -> Decimal {
        self.commission_rate + self.slippage_rate
    }

    /// Number of calendar days in the range, both ends included.
    pub fn calendar_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Validate the configuration.
    pub fn validate(&self) -> EngineResult<()> {
        if self.end_date <= self.start_date {
            return Err(BacktestError::InvalidRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.initial_capital <= Decimal::ZERO {
            return Err(BacktestError::InvalidCapital(self.initial_capital));
        }
        if self.commission_rate < Decimal::ZERO {
            return Err(BacktestError::InvalidRate {
                name: "commission",
                value: self.commission_rate,
            });
        }
        if self.slippage_rate < Decimal::ZERO {
            return Err(BacktestError::InvalidRate {
                name: "slippage",
                value: self.slippage_rate,
            });
        }
        Ok(())
    }
}

impl Default for BacktestConfig {
    fn default() -> Self {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default();
        let end = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or_default();
        Self::new("ma_crossover", dec!(100000), start, end)
    }
}
