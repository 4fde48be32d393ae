//! Narrative collaborator trait definition.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::NarrativeError;
use crate::types::{PerformanceMetrics, RiskMetrics};

/// What to comment on.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NarrativeRequest<'a> {
    /// Performance statistics of a backtest.
    Backtest {
        strategy_id: &'a str,
        metrics: &'a PerformanceMetrics,
    },
    /// Risk statistics of a backtest, alongside its performance record.
    Risk {
        risk: &'a RiskMetrics,
        metrics: &'a PerformanceMetrics,
    },
}

/// Trait for free-text commentary providers.
///
/// The engine treats the output as opaque, best-effort enrichment.
#[async_trait]
pub trait Narrator: Send + Sync {
    /// Produce commentary for the request.
    async fn summarize(&self, request: NarrativeRequest<'_>) -> Result<String, NarrativeError>;

    /// Get the narrator name.
    fn name(&self) -> &str;
}
