//! Core data types for the backtest engine.

mod config;
mod equity;
mod metrics;
mod result;
mod trade;

pub use config::BacktestConfig;
pub use equity::{EquityCurve, EquityPoint};
pub use metrics::{MetricValue, PerformanceMetrics, RiskMetrics, TradeStats};
pub use result::{BacktestResult, Narrative, NarrativeSource};
pub use trade::{Side, TradeRecord};
