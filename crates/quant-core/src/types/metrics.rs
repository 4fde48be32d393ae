//! Performance and risk metric records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A metric that may be degenerate or undefined for a given input.
///
/// Degenerate and undefined results are markers, not errors: the rest of
/// the record stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum MetricValue {
    /// Computed by the regular formula.
    Computed(f64),
    /// The regular scaling was not applicable; the raw value is reported.
    Unscaled(f64),
    /// Not computable from the available data.
    NotComputed,
}

impl MetricValue {
    /// The numeric value, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            MetricValue::Computed(v) | MetricValue::Unscaled(v) => Some(*v),
            MetricValue::NotComputed => None,
        }
    }

    /// Format as a percentage, marking degenerate values.
    pub fn display_pct(&self) -> String {
        match self {
            MetricValue::Computed(v) => format!("{:.2}%", v * 100.0),
            MetricValue::Unscaled(v) => format!("{:.2}% (unscaled)", v * 100.0),
            MetricValue::NotComputed => "n/a".to_string(),
        }
    }

    /// Format as a plain ratio with two decimals.
    pub fn display_ratio(&self) -> String {
        match self {
            MetricValue::Computed(v) => format!("{:.2}", v),
            MetricValue::Unscaled(v) => format!("{:.2} (unscaled)", v),
            MetricValue::NotComputed => "n/a".to_string(),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Computed(v) => write!(f, "{:.4}", v),
            MetricValue::Unscaled(v) => write!(f, "{:.4} (unscaled)", v),
            MetricValue::NotComputed => write!(f, "n/a"),
        }
    }
}

/// Performance statistics of one run.
///
/// All ratios are fractions (0.1 is 10%). Every float is finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// (last - first) / first
    pub total_return: f64,
    /// Total return scaled by 365 / span days
    pub annualized_return: MetricValue,
    /// Largest peak-to-trough decline as a fraction of the peak
    pub max_drawdown: f64,
    /// Annualized Sharpe ratio, 0 when volatility is zero
    pub sharpe_ratio: f64,
    /// Annualized sample standard deviation of daily returns
    pub volatility: f64,
    /// Fraction of trades with positive P&L
    pub win_rate: MetricValue,
    /// Number of trade events
    pub trades: usize,
}

/// Tail and downside risk statistics derived from daily returns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Historical 1-day Value at Risk at 95% confidence, as a positive loss fraction
    pub var_95: MetricValue,
    /// Mean loss beyond VaR (expected shortfall), as a positive loss fraction
    pub cvar_95: MetricValue,
    /// Annualized Sortino ratio, 0 when there is no downside
    pub sortino_ratio: f64,
    /// Annualized downside deviation
    pub downside_deviation: f64,
    /// Sensitivity to the benchmark's daily returns; needs a benchmark series
    pub beta: MetricValue,
}

/// Trade-level statistics, available only when a trade log is supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeStats {
    /// Total number of trade events
    pub total_trades: usize,
    /// Trades with positive P&L
    pub winning_trades: usize,
    /// Trades with negative P&L
    pub losing_trades: usize,
    /// Trades with zero or no recorded P&L
    pub breakeven_trades: usize,
    /// Sum of winning P&L
    pub gross_profit: Decimal,
    /// Sum of losing P&L (absolute)
    pub gross_loss: Decimal,
    /// Average profit per winning trade
    pub avg_win: Decimal,
    /// Average loss per losing trade (absolute)
    pub avg_loss: Decimal,
    /// Gross profit / gross loss
    pub profit_factor: MetricValue,
}
