//! Equity curve simulation.

use chrono::NaiveDate;
use quant_core::error::{BacktestError, EngineResult};
use quant_core::traits::{DailyStep, ReturnSource, TradingCalendar};
use quant_core::types::{BacktestConfig, EquityCurve, EquityPoint};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::calendar::DayCount;

/// Produces one equity point per trading day of a run.
///
/// The first trading day carries the initial capital; every later day
/// applies `value * (1 + r) - cost_rate * turnover * |value|` with the step
/// drawn from the return source.
pub struct EquityCurveSimulator {
    calendar: Box<dyn TradingCalendar>,
}

impl EquityCurveSimulator {
    /// Create a simulator using the calendar-day policy.
    pub fn new() -> Self {
        Self::with_calendar(DayCount::Calendar)
    }

    /// Create a simulator using the given trading calendar.
    pub fn with_calendar(calendar: impl TradingCalendar + 'static) -> Self {
        Self {
            calendar: Box::new(calendar),
        }
    }

    /// Calendar in use.
    pub fn calendar(&self) -> &dyn TradingCalendar {
        self.calendar.as_ref()
    }

    /// Number of points a run over `config` will produce.
    pub fn expected_points(&self, config: &BacktestConfig) -> usize {
        self.calendar
            .trading_days(config.start_date, config.end_date)
            .len()
    }

    /// Simulate the equity curve for `config`.
    pub fn simulate(
        &self,
        config: &BacktestConfig,
        source: &mut dyn ReturnSource,
    ) -> EngineResult<EquityCurve> {
        config.validate()?;

        let days = self
            .calendar
            .trading_days(config.start_date, config.end_date);
        let Some((&first_day, rest)) = days.split_first() else {
            return Err(BacktestError::NoTradingDays {
                start: config.start_date,
                end: config.end_date,
            });
        };

        if let Some(available) = source.remaining() {
            if available < rest.len() {
                return Err(BacktestError::SourceExhausted {
                    required: rest.len(),
                    available,
                });
            }
        }

        info!(
            strategy = %config.strategy_id,
            source = source.name(),
            calendar = self.calendar.name(),
            days = days.len(),
            "Simulating equity curve"
        );

        let cost_rate = config.cost_rate();
        let mut value = config.initial_capital;
        let mut total_costs = Decimal::ZERO;
        let mut points = Vec::with_capacity(days.len());
        points.push(EquityPoint::new(first_day, value));

        for &date in rest {
            let step = source.next_step(date)?;
            let (next, cost) = apply_step(value, step, cost_rate, date)?;
            total_costs += cost;
            value = next;
            points.push(EquityPoint::new(date, value));
        }

        debug!(
            final_value = %value,
            total_costs = %total_costs,
            "Simulation complete"
        );

        EquityCurve::new(points)
    }
}

impl Default for EquityCurveSimulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply one step; returns the new value and the cost charged.
fn apply_step(
    value: Decimal,
    step: DailyStep,
    cost_rate: Decimal,
    date: NaiveDate,
) -> EngineResult<(Decimal, Decimal)> {
    if !step.turnover.is_finite() || step.turnover < 0.0 {
        return Err(BacktestError::InvalidReturn {
            date,
            reason: format!("turnover {} must be finite and non-negative", step.turnover),
        });
    }
    let ret = Decimal::try_from(step.ret).map_err(|e| BacktestError::InvalidReturn {
        date,
        reason: format!("return {}: {}", step.ret, e),
    })?;
    let turnover = Decimal::try_from(step.turnover).map_err(|e| BacktestError::InvalidReturn {
        date,
        reason: format!("turnover {}: {}", step.turnover, e),
    })?;

    let overflow = || BacktestError::Overflow { date };
    let growth = Decimal::ONE.checked_add(ret).ok_or_else(overflow)?;
    let gross = value.checked_mul(growth).ok_or_else(overflow)?;
    let notional = value.abs().checked_mul(turnover).ok_or_else(overflow)?;
    let cost = notional.checked_mul(cost_rate).ok_or_else(overflow)?;
    let next = gross.checked_sub(cost).ok_or_else(overflow)?;

    Ok((next, cost))
}
