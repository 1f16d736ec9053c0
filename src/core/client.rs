//! Provider client with bounded retry and backoff

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::core::config::BenchmarkConfig;
use crate::core::models::{ProviderResult, ServiceId};
use crate::providers::{ProviderOutcome, TranslationProvider};

/// Attempt budget and delays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &BenchmarkConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: config.base_delay(),
        }
    }

    /// Delay before the next attempt after `attempt` (0-based) ended in `outcome`.
    /// `None` means stop retrying.
    pub fn delay_after(&self, outcome: &ProviderOutcome, attempt: u32) -> Option<Duration> {
        match outcome {
            ProviderOutcome::Success(_) | ProviderOutcome::QuotaExhausted => None,
            ProviderOutcome::RateLimited => Some(
                self.base_delay
                    .saturating_mul(2_u32.saturating_pow(attempt)),
            ),
            ProviderOutcome::TransientError(_) => Some(self.base_delay),
        }
    }
}

/// One provider wrapped with the retry policy
#[derive(Debug, Clone)]
pub struct ProviderClient {
    provider: Arc<dyn TranslationProvider>,
    policy: RetryPolicy,
}

impl ProviderClient {
    pub fn new(provider: Arc<dyn TranslationProvider>, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    pub fn service(&self) -> ServiceId {
        self.provider.service()
    }

    /// Translate `text`, retrying per policy. `None` once the provider is given up on.
    pub async fn translate(&self, text: &str, target_language: &str) -> Option<ProviderResult> {
        let service = self.service();

        if text.trim().is_empty() {
            warn!("{}: refusing to translate empty text", service);
            return None;
        }

        for attempt in 0..self.policy.max_attempts {
            if attempt > 0 {
                debug!("Retry attempt {} for {}", attempt, service);
            }

            let started = Instant::now();
            let outcome = self.provider.attempt(text, target_language).await;
            let elapsed = started.elapsed();

            match &outcome {
                ProviderOutcome::Success(_) => {}
                ProviderOutcome::QuotaExhausted => {
                    warn!("{}: quota exhausted, skipping without retry", service);
                }
                ProviderOutcome::RateLimited => {
                    warn!(
                        "{}: rate limited (attempt {}/{})",
                        service,
                        attempt + 1,
                        self.policy.max_attempts
                    );
                }
                ProviderOutcome::TransientError(message) => {
                    warn!(
                        "{} translation error (attempt {}/{}): {}",
                        service,
                        attempt + 1,
                        self.policy.max_attempts,
                        message
                    );
                }
            }

            if let ProviderOutcome::Success(translated_text) = outcome {
                if attempt > 0 {
                    info!("{}: translated after {} retries", service, attempt);
                }
                return Some(ProviderResult {
                    translated_text,
                    time_taken: elapsed,
                });
            }

            let Some(delay) = self.policy.delay_after(&outcome, attempt) else {
                return None;
            };

            if attempt + 1 < self.policy.max_attempts {
                sleep(delay).await;
            }
        }

        warn!("{} did not return a translation", service);
        None
    }
}
