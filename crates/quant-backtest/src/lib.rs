//! Equity curve simulation and performance analytics.

mod calendar;
mod engine;
mod report;
mod returns;
mod risk;
mod simulator;
mod source;
mod statistics;

pub use calendar::{DayCount, HolidayCalendar};
pub use engine::BacktestRunner;
pub use report::BacktestReport;
pub use returns::DailyReturns;
pub use risk::risk_metrics;
pub use simulator::EquityCurveSimulator;
pub use source::{StrategyReturns, SyntheticReturns};
pub use statistics::{trade_stats, AnalyzerConfig, PerformanceAnalyzer};
