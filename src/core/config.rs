//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::core::errors::{BenchmarkError, Result};
use crate::core::models::ServiceId;

/// Environment prefix for tunables, e.g. `BENCH_BATCH_SIZE`
pub const ENV_PREFIX: &str = "BENCH";

/// Pipeline tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    pub batch_size: usize,
    pub batch_delay_ms: u64,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub request_timeout_ms: u64,
    pub concurrent_providers: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            batch_size: 25,
            batch_delay_ms: 61_000,
            max_attempts: 3,
            base_delay_ms: 2_000,
            request_timeout_ms: 30_000,
            concurrent_providers: false,
        }
    }
}

impl BenchmarkConfig {
    /// Load defaults, then an optional config file, then `BENCH_*` variables
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            info!("Loading configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config: Self = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        debug!("Benchmark configuration: {:?}", config);
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(BenchmarkError::config("batch_size must be greater than 0"));
        }

        if self.max_attempts == 0 {
            return Err(BenchmarkError::config("max_attempts must be greater than 0"));
        }

        if self.request_timeout_ms == 0 {
            return Err(BenchmarkError::config("request_timeout_ms must be greater than 0"));
        }

        Ok(())
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Number of batches `items` inputs split into
    pub fn batch_count(&self, items: usize) -> usize {
        items.div_ceil(self.batch_size.max(1))
    }
}

/// Credential and endpoint for one provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub service: ServiceId,
    pub api_key: String,
    pub endpoint: String,
    pub model: Option<String>,
}

/// (key variable, endpoint variable, default endpoint, model variable, default model)
type EnvLayout = (&'static str, &'static str, &'static str, Option<(&'static str, &'static str)>);

fn env_layout(service: ServiceId) -> EnvLayout {
    match service {
        ServiceId::Deepl => (
            "DEEPL_API_KEY",
            "DEEPL_API_URL",
            "https://api-free.deepl.com",
            None,
        ),
        ServiceId::Gemini => (
            "GEMINI_API_KEY",
            "GEMINI_API_URL",
            "https://generativelanguage.googleapis.com",
            Some(("GEMINI_MODEL", "gemini-1.5-flash")),
        ),
        ServiceId::Groq => (
            "GROQ_API_KEY",
            "GROQ_API_URL",
            "https://api.groq.com/openai",
            Some(("GROQ_MODEL", "llama-3.3-70b-versatile")),
        ),
    }
}

impl ProviderSettings {
    pub fn new(service: ServiceId, api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        let (_, _, _, model) = env_layout(service);
        Self {
            service,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.map(|(_, default)| default.to_string()),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Load settings for one provider from environment variables
    pub fn from_env(service: ServiceId) -> Result<Self> {
        let (key_var, endpoint_var, default_endpoint, model) = env_layout(service);

        let api_key = std::env::var(key_var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| BenchmarkError::MissingCredential {
                variable: key_var.to_string(),
            })?;

        let endpoint = std::env::var(endpoint_var).unwrap_or_else(|_| default_endpoint.to_string());

        let mut settings = Self::new(service, api_key, endpoint);
        if let Some(model) = model.and_then(|(var, _)| std::env::var(var).ok()) {
            settings = settings.with_model(model);
        }
        Ok(settings)
    }

    /// Load settings for every provider; any missing credential is fatal
    pub fn all_from_env() -> Result<Vec<Self>> {
        ServiceId::ALL.iter().map(|s| Self::from_env(*s)).collect()
    }
}
