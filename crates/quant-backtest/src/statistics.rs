//! Performance statistics.

use num_traits::ToPrimitive;
use quant_core::error::{BacktestError, EngineResult};
use quant_core::traits::{TradingCalendar, TRADING_DAYS_PER_YEAR};
use quant_core::types::{
    EquityCurve, MetricValue, PerformanceMetrics, RiskMetrics, TradeRecord, TradeStats,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::{debug, warn};

use crate::returns::DailyReturns;
use crate::risk::risk_metrics;

/// Calendar days per year used to annualize total return.
const DAYS_PER_YEAR: f64 = 365.0;

/// Standard deviations at or below this are treated as zero.
pub(crate) const STDEV_EPSILON: f64 = 1e-12;

/// Analyzer settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Annual risk-free rate, as a fraction
    pub risk_free_rate: f64,
    /// Return periods per year used for annualization; unset follows the
    /// day-count policy of the run (365 calendar, 252 weekdays)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periods_per_year: Option<f64>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.0,
            periods_per_year: None,
        }
    }
}

impl AnalyzerConfig {
    /// Validate the settings.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.risk_free_rate.is_finite() {
            return Err(BacktestError::InvalidParameter(format!(
                "risk-free rate must be finite, got {}",
                self.risk_free_rate
            )));
        }
        if let Some(periods) = self.periods_per_year {
            if !periods.is_finite() || periods <= 0.0 {
                return Err(BacktestError::InvalidParameter(format!(
                    "periods per year must be positive, got {}",
                    periods
                )));
            }
        }
        Ok(())
    }

    /// Periods per year in effect; 252 when unset and no calendar applied.
    pub fn periods(&self) -> f64 {
        self.periods_per_year.unwrap_or(TRADING_DAYS_PER_YEAR)
    }

    /// Fill an unset period count from `calendar`.
    pub fn for_calendar(self, calendar: &dyn TradingCalendar) -> Self {
        Self {
            periods_per_year: Some(
                self.periods_per_year
                    .unwrap_or_else(|| calendar.periods_per_year()),
            ),
            ..self
        }
    }

    /// Risk-free rate per return period.
    pub fn periodic_risk_free(&self) -> f64 {
        self.risk_free_rate / self.periods()
    }

    /// Multiplier converting per-period deviation to annual.
    pub fn annualization_factor(&self) -> f64 {
        self.periods().sqrt()
    }
}

/// Computes performance metrics from an equity curve.
///
/// Stateless and pure: the same inputs always yield bit-identical output.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerformanceAnalyzer {
    config: AnalyzerConfig,
}

impl PerformanceAnalyzer {
    /// Create an analyzer with validated settings.
    pub fn new(config: AnalyzerConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Settings in use.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyzer annualizing on `calendar` unless a period count is set.
    pub fn for_calendar(&self, calendar: &dyn TradingCalendar) -> Self {
        Self {
            config: self.config.for_calendar(calendar),
        }
    }

    /// Compute the metrics record.
    ///
    /// `trades` is the optional trade log; without one, win rate is marked
    /// not computed and the trade count is zero.
    ///
    /// # Errors
    /// `DivisionByZero` when the curve starts at zero. An empty curve cannot
    /// be constructed, so `EmptyCurve` surfaces when building the curve.
    pub fn analyze(
        &self,
        curve: &EquityCurve,
        initial_capital: Decimal,
        trades: Option<&[TradeRecord]>,
    ) -> EngineResult<PerformanceMetrics> {
        if curve.first().value != initial_capital {
            debug!(
                first = %curve.first().value,
                initial_capital = %initial_capital,
                "Curve does not start at initial capital; returns use the first point"
            );
        }

        let total_return = total_return(curve)?;
        let returns = DailyReturns::from_curve(curve);
        if returns.excluded() > 0 {
            warn!(
                excluded = returns.excluded(),
                "Excluded undefined daily returns after zero equity"
            );
        }

        let metrics = PerformanceMetrics {
            total_return,
            annualized_return: annualized_return(total_return, curve),
            max_drawdown: max_drawdown(curve),
            sharpe_ratio: sharpe_ratio(returns.values(), &self.config),
            volatility: volatility(returns.values(), &self.config),
            win_rate: win_rate(trades),
            trades: trades.map_or(0, |t| t.len()),
        };

        debug!(
            total_return = metrics.total_return,
            max_drawdown = metrics.max_drawdown,
            sharpe = metrics.sharpe_ratio,
            volatility = metrics.volatility,
            "Performance analysis complete"
        );

        Ok(metrics)
    }

    /// Compute tail and downside risk metrics.
    ///
    /// `benchmark` is an optional daily return series aligned with the
    /// curve's returns; without one, beta is marked not computed.
    pub fn analyze_risk(&self, curve: &EquityCurve, benchmark: Option<&[f64]>) -> RiskMetrics {
        risk_metrics(&DailyReturns::from_curve(curve), &self.config, benchmark)
    }
}

fn total_return(curve: &EquityCurve) -> EngineResult<f64> {
    let first = curve.first().value;
    if first.is_zero() {
        return Err(BacktestError::DivisionByZero);
    }
    let last = curve.last().value;
    let overflow = || BacktestError::Overflow {
        date: curve.last().date,
    };

    last.checked_sub(first)
        .and_then(|diff| diff.checked_div(first))
        .and_then(|r| r.to_f64())
        .filter(|r| r.is_finite())
        .ok_or_else(overflow)
}

fn annualized_return(total_return: f64, curve: &EquityCurve) -> MetricValue {
    // A single point has no elapsed time to scale over
    if curve.len() < 2 {
        return MetricValue::Unscaled(total_return);
    }
    let scale = DAYS_PER_YEAR / curve.span_days() as f64;
    let annualized = total_return * scale;
    if annualized.is_finite() {
        MetricValue::Computed(annualized)
    } else {
        MetricValue::Unscaled(total_return)
    }
}

fn max_drawdown(curve: &EquityCurve) -> f64 {
    let mut peak = curve.first().value;
    let mut max_dd = Decimal::ZERO;

    for value in curve.values() {
        if value > peak {
            peak = value;
        }
        if peak <= Decimal::ZERO {
            continue;
        }
        if let Some(dd) = (peak - value).checked_div(peak) {
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd.to_f64().unwrap_or(0.0)
}

fn sample_std_dev(returns: &[f64]) -> Option<f64> {
    if returns.len() < 2 {
        return None;
    }
    let sd = returns.std_dev();
    (sd.is_finite() && sd > STDEV_EPSILON).then_some(sd)
}

fn volatility(returns: &[f64], config: &AnalyzerConfig) -> f64 {
    sample_std_dev(returns).map_or(0.0, |sd| sd * config.annualization_factor())
}

fn sharpe_ratio(returns: &[f64], config: &AnalyzerConfig) -> f64 {
    let Some(sd) = sample_std_dev(returns) else {
        return 0.0;
    };
    let excess = returns.mean() - config.periodic_risk_free();
    let sharpe = excess / sd * config.annualization_factor();
    if sharpe.is_finite() {
        sharpe
    } else {
        0.0
    }
}

fn win_rate(trades: Option<&[TradeRecord]>) -> MetricValue {
    match trades {
        Some(trades) if !trades.is_empty() => {
            let wins = trades.iter().filter(|t| t.is_win()).count();
            MetricValue::Computed(wins as f64 / trades.len() as f64)
        }
        _ => MetricValue::NotComputed,
    }
}

/// Summarize a trade log; `None` for an empty log.
pub fn trade_stats(trades: &[TradeRecord]) -> Option<TradeStats> {
    if trades.is_empty() {
        return None;
    }

    let mut winning_trades = 0;
    let mut losing_trades = 0;
    let mut gross_profit = Decimal::ZERO;
    let mut gross_loss = Decimal::ZERO;

    for pnl in trades.iter().filter_map(|t| t.pnl) {
        if pnl > Decimal::ZERO {
            winning_trades += 1;
            gross_profit += pnl;
        } else if pnl < Decimal::ZERO {
            losing_trades += 1;
            gross_loss += pnl.abs();
        }
    }

    let avg_win = if winning_trades > 0 {
        gross_profit / Decimal::from(winning_trades)
    } else {
        Decimal::ZERO
    };
    let avg_loss = if losing_trades > 0 {
        gross_loss / Decimal::from(losing_trades)
    } else {
        Decimal::ZERO
    };
    let profit_factor = gross_profit
        .checked_div(gross_loss)
        .and_then(|pf| pf.to_f64())
        .map_or(MetricValue::NotComputed, MetricValue::Computed);

    Some(TradeStats {
        total_trades: trades.len(),
        winning_trades,
        losing_trades,
        breakeven_trades: trades.len() - winning_trades - losing_trades,
        gross_profit,
        gross_loss,
        avg_win,
        avg_loss,
        profit_factor,
    })
}
