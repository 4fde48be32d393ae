//! Fallback handling around narrators.

use async_trait::async_trait;
use quant_core::error::NarrativeError;
use quant_core::traits::{NarrativeRequest, Narrator};
use quant_core::types::{BacktestResult, Narrative};
use std::time::Duration;
use tracing::{debug, warn};

/// Ask `narrator` for commentary, substituting the fallback on any failure.
///
/// Errors, blank text and timeouts all yield [`Narrative::fallback`].
pub async fn narrate(
    narrator: &dyn Narrator,
    request: NarrativeRequest<'_>,
    timeout: Duration,
) -> Narrative {
    let outcome = match tokio::time::timeout(timeout, narrator.summarize(request)).await {
        Ok(result) => result,
        Err(_) => Err(NarrativeError::Timeout(timeout.as_millis() as u64)),
    };

    match outcome {
        Ok(text) if !text.trim().is_empty() => {
            debug!(narrator = narrator.name(), chars = text.len(), "Narrative generated");
            Narrative::generated(text.trim())
        }
        Ok(_) => {
            warn!(narrator = narrator.name(), "Narrative was empty, using fallback");
            Narrative::fallback()
        }
        Err(e) => {
            warn!(narrator = narrator.name(), error = %e, "Narrative unavailable, using fallback");
            Narrative::fallback()
        }
    }
}

/// Attach performance and risk commentary to a finished result.
///
/// The numeric contents of `result` are returned unchanged.
pub async fn attach_narratives(
    result: BacktestResult,
    narrator: &dyn Narrator,
    timeout: Duration,
) -> BacktestResult {
    let narrative = narrate(
        narrator,
        NarrativeRequest::Backtest {
            strategy_id: &result.config.strategy_id,
            metrics: &result.metrics,
        },
        timeout,
    )
    .await;
    let risk_narrative = narrate(
        narrator,
        NarrativeRequest::Risk {
            risk: &result.risk,
            metrics: &result.metrics,
        },
        timeout,
    )
    .await;

    result.with_narratives(narrative, risk_narrative)
}

/// Narrator that always fails; stands in when no provider could be built.
#[derive(Debug, Clone)]
pub struct UnavailableNarrator {
    reason: String,
}

impl UnavailableNarrator {
    /// Create with the reason the real provider is missing.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Narrator for UnavailableNarrator {
    async fn summarize(&self, _request: NarrativeRequest<'_>) -> Result<String, NarrativeError> {
        Err(NarrativeError::Configuration(self.reason.clone()))
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use quant_core::types::{
        BacktestConfig, EquityCurve, MetricValue, NarrativeSource, PerformanceMetrics,
        RiskMetrics,
    };
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    struct Fixed(&'static str);

    #[async_trait]
    impl Narrator for Fixed {
        async fn summarize(&self, _request: NarrativeRequest<'_>) -> Result<String, NarrativeError> {
            Ok(self.0.to_string())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct Slow;

    #[async_trait]
    impl Narrator for Slow {
        async fn summarize(&self, _request: NarrativeRequest<'_>) -> Result<String, NarrativeError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("too late".to_string())
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    fn result() -> BacktestResult {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        BacktestResult {
            run_id: Uuid::new_v4(),
            config: BacktestConfig::default(),
            equity_curve: EquityCurve::from_values(start, &[dec!(100000), dec!(101000)]).unwrap(),
            metrics: PerformanceMetrics {
                total_return: 0.01,
                annualized_return: MetricValue::Computed(1.825),
                max_drawdown: 0.0,
                sharpe_ratio: 0.0,
                volatility: 0.0,
                win_rate: MetricValue::NotComputed,
                trades: 0,
            },
            risk: RiskMetrics {
                var_95: MetricValue::Computed(0.0),
                cvar_95: MetricValue::Computed(0.0),
                sortino_ratio: 0.0,
                downside_deviation: 0.0,
                beta: MetricValue::NotComputed,
            },
            trade_stats: None,
            narrative: None,
            risk_narrative: None,
        }
    }

    #[tokio::test]
    async fn test_generated_text_is_trimmed() {
        let result = result();
        let narrative = narrate(
            &Fixed("  solid strategy \n"),
            NarrativeRequest::Risk {
                risk: &result.risk,
                metrics: &result.metrics,
            },
            Duration::from_secs(1),
        )
        .await;
        assert_eq!(narrative.text, "solid strategy");
        assert_eq!(narrative.source, NarrativeSource::Generated);
    }

    #[tokio::test]
    async fn test_blank_text_falls_back() {
        let result = result();
        let narrative = narrate(
            &Fixed("   "),
            NarrativeRequest::Risk {
                risk: &result.risk,
                metrics: &result.metrics,
            },
            Duration::from_secs(1),
        )
        .await;
        assert!(narrative.is_fallback());
    }

    #[tokio::test]
    async fn test_failure_keeps_numbers_intact() {
        let original = result();
        let enriched = attach_narratives(
            original.clone(),
            &UnavailableNarrator::new("no api key"),
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(enriched.metrics, original.metrics);
        assert_eq!(enriched.equity_curve, original.equity_curve);
        assert_eq!(enriched.narrative.as_ref().unwrap().text, "analysis unavailable");
        assert!(enriched.risk_narrative.as_ref().unwrap().is_fallback());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back() {
        let result = result();
        let narrative = narrate(
            &Slow,
            NarrativeRequest::Risk {
                risk: &result.risk,
                metrics: &result.metrics,
            },
            Duration::from_millis(100),
        )
        .await;
        assert!(narrative.is_fallback());
    }
}
