//! Offline rule-based commentary.

use async_trait::async_trait;
use quant_core::error::NarrativeError;
use quant_core::traits::{NarrativeRequest, Narrator};
use quant_core::types::{MetricValue, PerformanceMetrics, RiskMetrics};

/// Deterministic narrator built from fixed thresholds.
///
/// Needs no network; the same metrics always produce the same text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateNarrator;

impl TemplateNarrator {
    /// Create a new template narrator.
    pub fn new() -> Self {
        Self
    }

    fn backtest_text(strategy_id: &str, m: &PerformanceMetrics) -> String {
        let verdict = if m.sharpe_ratio >= 1.0 && m.max_drawdown < 0.2 {
            "looks viable"
        } else if m.sharpe_ratio > 0.0 && m.total_return > 0.0 {
            "is marginal"
        } else {
            "is not viable as tested"
        };

        let strength = if m.max_drawdown < 0.05 {
            format!("drawdown stayed shallow at {:.2}%", m.max_drawdown * 100.0)
        } else if m.sharpe_ratio >= 1.0 {
            format!("risk-adjusted return is solid (Sharpe {:.2})", m.sharpe_ratio)
        } else if m.total_return > 0.0 {
            format!("it finished positive ({:+.2}%)", m.total_return * 100.0)
        } else {
            format!("volatility was {:.2}% annualized", m.volatility * 100.0)
        };

        let suggestion = if m.max_drawdown >= 0.1 {
            "tighten drawdown control with stop-losses or position scaling"
        } else if m.volatility >= 0.25 {
            "reduce position size to bring volatility down"
        } else if matches!(m.win_rate, MetricValue::NotComputed) {
            "supply a trade log so win rate can be assessed"
        } else {
            "extend the test period to confirm robustness"
        };

        format!(
            "Strategy {} {}: return {:+.2}% (annualized {}), max drawdown {:.2}%, Sharpe {:.2}. \
             Strength: {}. Suggestion: {}.",
            strategy_id,
            verdict,
            m.total_return * 100.0,
            m.annualized_return.display_pct(),
            m.max_drawdown * 100.0,
            m.sharpe_ratio,
            strength,
            suggestion
        )
    }

    fn risk_text(r: &RiskMetrics, m: &PerformanceMetrics) -> String {
        let tail = match (r.var_95, r.cvar_95) {
            (MetricValue::NotComputed, _) | (_, MetricValue::NotComputed) => {
                "1. Tail risk cannot be estimated without return history.".to_string()
            }
            (var, cvar) => format!(
                "1. One-day 95% VaR is {} with expected shortfall {}.",
                var.display_pct(),
                cvar.display_pct()
            ),
        };
        let downside = format!(
            "2. Annualized downside deviation is {:.2}%.",
            r.downside_deviation * 100.0
        );
        let downside = format!(
            "{} Total volatility is {:.2}% with max drawdown {:.2}%.",
            downside,
            m.volatility * 100.0,
            m.max_drawdown * 100.0
        );
        let sortino = if r.sortino_ratio >= 1.0 {
            format!(
                "3. Sortino {:.2} (Sharpe {:.2}) shows returns compensate downside well.",
                r.sortino_ratio, m.sharpe_ratio
            )
        } else {
            format!(
                "3. Sortino {:.2} (Sharpe {:.2}) shows weak compensation for downside.",
                r.sortino_ratio, m.sharpe_ratio
            )
        };
        let sortino = match r.beta {
            MetricValue::NotComputed => sortino,
            beta => format!("{} Beta to the benchmark is {}.", sortino, beta.display_ratio()),
        };
        let hedge = if r.cvar_95.value().unwrap_or(0.0) > 0.03 {
            "Hedge: add index futures or put protection against tail moves."
        } else {
            "Hedge: a modest index-futures overlay is sufficient."
        };

        format!("{} {} {} {}", tail, downside, sortino, hedge)
    }
}

#[async_trait]
impl Narrator for TemplateNarrator {
    async fn summarize(&self, request: NarrativeRequest<'_>) -> Result<String, NarrativeError> {
        Ok(match request {
            NarrativeRequest::Backtest {
                strategy_id,
                metrics,
            } => Self::backtest_text(strategy_id, metrics),
            NarrativeRequest::Risk { risk, metrics } => Self::risk_text(risk, metrics),
        })
    }

    fn name(&self) -> &str {
        "template"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(sharpe: f64, drawdown: f64) -> PerformanceMetrics {
        PerformanceMetrics {
            total_return: 0.12,
            annualized_return: MetricValue::Computed(0.12),
            max_drawdown: drawdown,
            sharpe_ratio: sharpe,
            volatility: 0.14,
            win_rate: MetricValue::NotComputed,
            trades: 0,
        }
    }

    #[tokio::test]
    async fn test_viable_strategy() {
        let m = metrics(1.9, 0.03);
        let text = TemplateNarrator::new()
            .summarize(NarrativeRequest::Backtest {
                strategy_id: "ma_crossover",
                metrics: &m,
            })
            .await
            .unwrap();
        assert!(text.contains("ma_crossover looks viable"));
        assert!(text.contains("drawdown stayed shallow"));
        assert!(text.contains("trade log"));
    }

    #[tokio::test]
    async fn test_deep_drawdown_suggestion() {
        let m = metrics(0.4, 0.3);
        let text = TemplateNarrator::new()
            .summarize(NarrativeRequest::Backtest {
                strategy_id: "rsi",
                metrics: &m,
            })
            .await
            .unwrap();
        assert!(text.contains("is marginal"));
        assert!(text.contains("drawdown control"));
    }

    #[tokio::test]
    async fn test_risk_text_without_history() {
        let risk = RiskMetrics {
            var_95: MetricValue::NotComputed,
            cvar_95: MetricValue::NotComputed,
            sortino_ratio: 0.0,
            downside_deviation: 0.0,
            beta: MetricValue::NotComputed,
        };
        let m = metrics(0.0, 0.0);
        let text = TemplateNarrator::new()
            .summarize(NarrativeRequest::Risk {
                risk: &risk,
                metrics: &m,
            })
            .await
            .unwrap();
        assert!(text.starts_with("1. Tail risk cannot be estimated"));
        assert!(text.contains("Hedge:"));
        assert!(!text.contains("Beta"));
    }

    #[tokio::test]
    async fn test_risk_text_uses_performance_and_beta() {
        let risk = RiskMetrics {
            var_95: MetricValue::Computed(0.021),
            cvar_95: MetricValue::Computed(0.034),
            sortino_ratio: 1.4,
            downside_deviation: 0.09,
            beta: MetricValue::Computed(0.85),
        };
        let m = metrics(1.9, 0.12);
        let text = TemplateNarrator::new()
            .summarize(NarrativeRequest::Risk {
                risk: &risk,
                metrics: &m,
            })
            .await
            .unwrap();
        assert!(text.contains("Sharpe 1.90"));
        assert!(text.contains("max drawdown 12.00%"));
        assert!(text.contains("volatility is 14.00%"));
        assert!(text.contains("Beta to the benchmark is 0.85"));
        assert!(text.contains("put protection"));
    }

    #[tokio::test]
    async fn test_is_deterministic() {
        let m = metrics(1.2, 0.12);
        let request = NarrativeRequest::Backtest {
            strategy_id: "x",
            metrics: &m,
        };
        let a = TemplateNarrator.summarize(request).await.unwrap();
        let b = TemplateNarrator.summarize(request).await.unwrap();
        assert_eq!(a, b);
    }
}
