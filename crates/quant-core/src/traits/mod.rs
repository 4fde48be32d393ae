//! Core traits for the backtest engine.

mod calendar;
mod narrator;
mod return_source;

pub use calendar::{TradingCalendar, TRADING_DAYS_PER_YEAR};
pub use narrator::{NarrativeRequest, Narrator};
pub use return_source::{DailyStep, ReturnSource};
