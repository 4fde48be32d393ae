//! Gemini `generateContent` narrator.

use async_trait::async_trait;
use quant_core::error::NarrativeError;
use quant_core::traits::{NarrativeRequest, Narrator};
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Gemini API configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Default API endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com";
    /// Default model.
    pub const DEFAULT_MODEL: &'static str = "gemini-2.5-flash";

    /// Create config with the default endpoint and model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: Self::DEFAULT_MODEL.to_string(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Load the API key from the named environment variable.
    pub fn from_env(api_key_env: &str) -> Result<Self, NarrativeError> {
        let api_key = std::env::var(api_key_env)
            .map_err(|_| NarrativeError::Configuration(format!("{} not set", api_key_env)))?;
        if api_key.trim().is_empty() {
            return Err(NarrativeError::Configuration(format!("{} is empty", api_key_env)));
        }
        Ok(Self::new(api_key))
    }

    /// Override the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// API request/response types
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Narrator backed by the Gemini REST API.
pub struct GeminiNarrator {
    config: GeminiConfig,
    client: Client,
}

impl GeminiNarrator {
    /// Create a new Gemini narrator.
    pub fn new(config: GeminiConfig) -> Result<Self, NarrativeError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            header::HeaderValue::from_str(&config.api_key)
                .map_err(|e| NarrativeError::Configuration(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| NarrativeError::Configuration(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create from an environment variable holding the API key.
    pub fn from_env(api_key_env: &str) -> Result<Self, NarrativeError> {
        Self::new(GeminiConfig::from_env(api_key_env)?)
    }

    /// Model in use.
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

/// Build the prompt for a request.
fn prompt(request: &NarrativeRequest<'_>) -> Result<String, NarrativeError> {
    Ok(match request {
        NarrativeRequest::Backtest { metrics, .. } => format!(
            "As a senior fund manager, evaluate the following backtest results of an \
             equity trading strategy:\n{}\n\n\
             Give a short, professional assessment (at most 100 words) covering:\n\
             1. Whether the strategy is viable.\n\
             2. One main strength.\n\
             3. One improvement suggestion (for example drawdown management).\n\
             Ratios are fractions (0.1 means 10%). Metrics marked not_computed are unavailable.",
            serde_json::to_string_pretty(metrics)?
        ),
        NarrativeRequest::Risk { risk, metrics } => format!(
            "Analyze the following risk metrics of a simulated equity portfolio:\n{}\n\n\
             Its performance over the same period:\n{}\n\n\
             Provide three concise risk takeaways and one hedging suggestion, as plain text. \
             Ratios are fractions (0.1 means 10%). Beta is against the supplied benchmark \
             and marked not_computed without one.",
            serde_json::to_string_pretty(risk)?,
            serde_json::to_string_pretty(metrics)?
        ),
    })
}

/// Map an HTTP reply to commentary text.
fn parse_reply(status: u16, body: &str) -> Result<String, NarrativeError> {
    if !(200..300).contains(&status) {
        return Err(NarrativeError::Api {
            status,
            message: body.to_string(),
        });
    }
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| NarrativeError::Request(format!("invalid response: {}", e)))?;
    extract_text(response)
}

fn extract_text(response: GenerateResponse) -> Result<String, NarrativeError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        Err(NarrativeError::EmptyResponse)
    } else {
        Ok(text)
    }
}

#[async_trait]
impl Narrator for GeminiNarrator {
    async fn summarize(&self, request: NarrativeRequest<'_>) -> Result<String, NarrativeError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt(&request)?,
                }],
            }],
        };

        debug!(model = %self.config.model, "Requesting narrative");

        let resp = self
            .client
            .post(self.config.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| NarrativeError::Request(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| NarrativeError::Request(e.to_string()))?;

        parse_reply(status, &body)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quant_core::types::{MetricValue, PerformanceMetrics};

    #[test]
    fn test_endpoint() {
        let config = GeminiConfig::new("key").with_base_url("http://localhost:8080/");
        assert_eq!(
            config.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_missing_env_key() {
        let result = GeminiConfig::from_env("QUANT_TEST_KEY_THAT_DOES_NOT_EXIST");
        assert!(matches!(result, Err(NarrativeError::Configuration(_))));
    }

    #[test]
    fn test_prompt_embeds_metrics() {
        let metrics = PerformanceMetrics {
            total_return: 0.1,
            annualized_return: MetricValue::Computed(0.1),
            max_drawdown: 0.085,
            sharpe_ratio: 1.92,
            volatility: 0.142,
            win_rate: MetricValue::NotComputed,
            trades: 0,
        };
        let text = prompt(&NarrativeRequest::Backtest {
            strategy_id: "s",
            metrics: &metrics,
        })
        .unwrap();
        assert!(text.contains("\"sharpe_ratio\": 1.92"));
        assert!(text.contains("not_computed"));
    }

    #[test]
    fn test_risk_prompt_embeds_both_records() {
        let metrics = PerformanceMetrics {
            total_return: 0.1,
            annualized_return: MetricValue::Computed(0.1),
            max_drawdown: 0.085,
            sharpe_ratio: 1.92,
            volatility: 0.142,
            win_rate: MetricValue::NotComputed,
            trades: 0,
        };
        let risk = quant_core::types::RiskMetrics {
            var_95: MetricValue::Computed(0.02),
            cvar_95: MetricValue::Computed(0.03),
            sortino_ratio: 2.4,
            downside_deviation: 0.07,
            beta: MetricValue::NotComputed,
        };
        let text = prompt(&NarrativeRequest::Risk {
            risk: &risk,
            metrics: &metrics,
        })
        .unwrap();
        assert!(text.contains("\"sortino_ratio\": 2.4"));
        assert!(text.contains("\"max_drawdown\": 0.085"));
        assert!(text.contains("\"beta\""));
    }

    #[test]
    fn test_extract_text() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"Viable. "},{"text":"Watch drawdown."}]}}]}"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_text(response).unwrap(), "Viable. Watch drawdown.");

        let response: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(extract_text(response), Err(NarrativeError::EmptyResponse)));
    }

    #[test]
    fn test_parse_reply_status_mapping() {
        let err = parse_reply(429, "quota exceeded").unwrap_err();
        assert!(matches!(
            err,
            NarrativeError::Api { status: 429, ref message } if message == "quota exceeded"
        ));

        let ok = parse_reply(200, r#"{"candidates":[{"content":{"parts":[{"text":"Fine."}]}}]}"#);
        assert_eq!(ok.unwrap(), "Fine.");

        assert!(matches!(parse_reply(200, "<html>"), Err(NarrativeError::Request(_))));
        assert!(matches!(parse_reply(200, "{}"), Err(NarrativeError::EmptyResponse)));
    }

    #[test]
    fn test_builds_client_with_custom_settings() {
        let config = GeminiConfig::new("key")
            .with_model("gemini-2.0-pro")
            .with_timeout(Duration::from_millis(500));
        let narrator = GeminiNarrator::new(config).unwrap();
        assert_eq!(narrator.model(), "gemini-2.0-pro");
        assert_eq!(narrator.name(), "gemini");
    }
}
