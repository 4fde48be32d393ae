//! Configuration structures.

use chrono::NaiveDate;
use quant_backtest::{AnalyzerConfig, DayCount, SyntheticReturns};
use quant_core::error::BacktestError;
use quant_core::types::BacktestConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors found when validating loaded settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid [backtest] settings: {0}")]
    Backtest(#[source] BacktestError),

    #[error("Invalid [analysis] settings: {0}")]
    Analysis(#[source] BacktestError),

    #[error("Invalid [narrative] settings: {0}")]
    Narrative(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub backtest: BacktestSettings,
    #[serde(default)]
    pub analysis: AnalyzerConfig,
    #[serde(default)]
    pub narrative: NarrativeSettings,
}

impl AppConfig {
    /// Check every section for values a run would reject.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.backtest
            .to_backtest_config()
            .validate()
            .map_err(SettingsError::Backtest)?;
        SyntheticReturns::new(self.backtest.seed, self.backtest.drift, self.backtest.volatility)
            .map_err(SettingsError::Backtest)?;
        self.analysis.validate().map_err(SettingsError::Analysis)?;
        self.narrative.validate()
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "quant-backtest".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Whether JSON log output is selected.
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Backtest settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSettings {
    pub strategy_id: String,
    pub initial_capital: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub commission_rate: Decimal,
    pub slippage_rate: Decimal,
    /// Seed for the synthetic return stream
    pub seed: u64,
    /// Mean daily return of the synthetic stream
    pub drift: f64,
    /// Daily standard deviation of the synthetic stream
    pub volatility: f64,
    pub day_count: DayCount,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        let defaults = BacktestConfig::default();
        Self {
            strategy_id: defaults.strategy_id,
            initial_capital: defaults.initial_capital,
            start_date: defaults.start_date,
            end_date: defaults.end_date,
            commission_rate: defaults.commission_rate,
            slippage_rate: defaults.slippage_rate,
            seed: 42,
            drift: SyntheticReturns::DEFAULT_DRIFT,
            volatility: SyntheticReturns::DEFAULT_VOLATILITY,
            day_count: DayCount::default(),
        }
    }
}

impl BacktestSettings {
    /// Build the run configuration.
    pub fn to_backtest_config(&self) -> BacktestConfig {
        BacktestConfig::new(
            self.strategy_id.clone(),
            self.initial_capital,
            self.start_date,
            self.end_date,
        )
        .with_commission_rate(self.commission_rate)
        .with_slippage_rate(self.slippage_rate)
    }
}

/// Narrative provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeProvider {
    /// Offline rule-based text
    #[default]
    Template,
    /// Gemini `generateContent` API
    Gemini,
}

/// Narrative settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeSettings {
    pub enabled: bool,
    pub provider: NarrativeProvider,
    pub model: String,
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub timeout_ms: u64,
}

impl Default for NarrativeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: NarrativeProvider::Template,
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_ms: 15_000,
        }
    }
}

impl NarrativeSettings {
    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.timeout_ms == 0 {
            return Err(SettingsError::Narrative("timeout_ms must be positive".to_string()));
        }
        if self.provider == NarrativeProvider::Gemini {
            if self.model.trim().is_empty() {
                return Err(SettingsError::Narrative("model must not be empty".to_string()));
            }
            if self.api_key_env.trim().is_empty() {
                return Err(SettingsError::Narrative(
                    "api_key_env must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}
