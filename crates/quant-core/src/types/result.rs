//! Terminal artifact of a backtest run.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BacktestConfig, EquityCurve, PerformanceMetrics, RiskMetrics, TradeStats};

/// Where narrative text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeSource {
    /// Produced by the narrative collaborator.
    Generated,
    /// Substituted after the collaborator failed.
    Fallback,
}

/// Free-text commentary attached to a result.
///
/// Opaque to the engine; never feeds back into any numeric value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    pub text: String,
    pub source: NarrativeSource,
}

impl Narrative {
    /// Text substituted when the collaborator is unavailable.
    pub const FALLBACK_TEXT: &'static str = "analysis unavailable";

    /// Narrative produced by the collaborator.
    pub fn generated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: NarrativeSource::Generated,
        }
    }

    /// The marked fallback narrative.
    pub fn fallback() -> Self {
        Self {
            text: Self::FALLBACK_TEXT.to_string(),
            source: NarrativeSource::Fallback,
        }
    }

    /// Whether this is the fallback narrative.
    pub fn is_fallback(&self) -> bool {
        self.source == NarrativeSource::Fallback
    }
}

/// Complete outcome of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Run identifier
    pub run_id: Uuid,
    /// Configuration used
    pub config: BacktestConfig,
    /// Simulated equity curve
    pub equity_curve: EquityCurve,
    /// Performance statistics
    pub metrics: PerformanceMetrics,
    /// Risk statistics
    pub risk: RiskMetrics,
    /// Trade statistics, when a trade log was supplied
    pub trade_stats: Option<TradeStats>,
    /// Commentary on the metrics
    pub narrative: Option<Narrative>,
    /// Commentary on the risk metrics
    pub risk_narrative: Option<Narrative>,
}

impl BacktestResult {
    /// Equity at the end of the run.
    pub fn final_equity(&self) -> Decimal {
        self.equity_curve.last().value
    }

    /// Attach narratives to the result.
    pub fn with_narratives(mut self, narrative: Narrative, risk_narrative: Narrative) -> Self {
        self.narrative = Some(narrative);
        self.risk_narrative = Some(risk_narrative);
        self
    }
}
