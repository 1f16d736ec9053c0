//! Translation provider adapters
//!
//! Each provider performs exactly one network call per [`TranslationProvider::attempt`]
//! and folds whatever came back into a [`ProviderOutcome`]. Retry and backoff live in
//! [`crate::core::client::ProviderClient`], which switches on the outcome tag.

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::core::config::{BenchmarkConfig, ProviderSettings};
use crate::core::errors::Result;
use crate::core::models::ServiceId;

pub mod deepl;
pub mod gemini;
pub mod groq;
#[cfg(test)]
pub mod mock;

pub use deepl::DeeplProvider;
pub use gemini::GeminiProvider;
pub use groq::GroqProvider;

/// Normalized result of a single provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome {
    /// Non-empty translation
    Success(String),
    /// Throttled; retry with a doubling delay
    RateLimited,
    /// Quota exhausted or credential refused; do not retry
    QuotaExhausted,
    /// Anything else; retry with the base delay
    TransientError(String),
}

impl ProviderOutcome {
    /// Success for non-blank text, transient error otherwise
    pub fn from_text(text: Option<&str>) -> Self {
        match text.map(str::trim) {
            Some(t) if !t.is_empty() => ProviderOutcome::Success(t.to_string()),
            _ => ProviderOutcome::TransientError("empty translation in response".to_string()),
        }
    }

    /// Map a transport failure; timeouts and connection errors are transient.
    /// The request URL is stripped from the message.
    pub fn from_transport(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            ProviderOutcome::TransientError("request timed out".to_string())
        } else {
            ProviderOutcome::TransientError(err.to_string())
        }
    }
}

/// A single external translation service
#[async_trait]
pub trait TranslationProvider: Send + Sync + Debug {
    fn service(&self) -> ServiceId;

    /// Issue one translation request, without retrying
    async fn attempt(&self, text: &str, target_language: &str) -> ProviderOutcome;
}

/// Map a non-success HTTP status shared by every provider
pub fn classify_status(status: u16, body: &str) -> ProviderOutcome {
    match status {
        429 => ProviderOutcome::RateLimited,
        401 | 403 => ProviderOutcome::QuotaExhausted,
        _ => ProviderOutcome::TransientError(format!("HTTP {}: {}", status, body.trim())),
    }
}

/// Read a failed response body and classify it
async fn outcome_from_error_response(
    response: reqwest::Response,
    special: impl Fn(u16) -> Option<ProviderOutcome>,
) -> ProviderOutcome {
    let status = response.status().as_u16();
    if let Some(outcome) = special(status) {
        return outcome;
    }
    let body = response.text().await.unwrap_or_default();
    classify_status(status, &body)
}

/// Build the shared HTTP client with an explicit per-request timeout
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .pool_idle_timeout(Some(Duration::from_secs(30)))
        .pool_max_idle_per_host(10)
        .build()?;
    Ok(client)
}

/// Instantiate the adapter matching `settings.service`
pub fn build_provider(
    settings: ProviderSettings,
    config: &BenchmarkConfig,
) -> Result<Arc<dyn TranslationProvider>> {
    let client = http_client(config.request_timeout())?;
    let provider: Arc<dyn TranslationProvider> = match settings.service {
        ServiceId::Deepl => Arc::new(DeeplProvider::new(client, settings)),
        ServiceId::Gemini => Arc::new(GeminiProvider::new(client, settings)),
        ServiceId::Groq => Arc::new(GroqProvider::new(client, settings)),
    };
    Ok(provider)
}

/// Primary ISO 639-1 subtag of a code such as `ES`, `en-GB` or `pt_BR`
pub fn primary_subtag(code: &str) -> String {
    code.split(['-', '_'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Whether `code` names a known ISO 639-1 language
pub fn is_recognized_language(code: &str) -> bool {
    isolang::Language::from_639_1(&primary_subtag(code)).is_some()
}

/// English language name for prompts, falling back to the raw code
pub fn language_name(code: &str) -> String {
    isolang::Language::from_639_1(&primary_subtag(code))
        .map(|lang| lang.to_name().to_string())
        .unwrap_or_else(|| code.to_string())
}
