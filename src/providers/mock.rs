//! Scripted provider for exercising retry and scheduling without network calls

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::{ProviderOutcome, TranslationProvider};
use crate::core::models::ServiceId;

/// Plays back a fixed list of outcomes, then repeats `fallback`
#[derive(Debug)]
pub struct ScriptedProvider {
    service: ServiceId,
    script: Mutex<VecDeque<(ProviderOutcome, Duration)>>,
    fallback: ProviderOutcome,
    latency: Duration,
    calls: AtomicUsize,
    texts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(service: ServiceId) -> Self {
        Self {
            service,
            script: Mutex::new(VecDeque::new()),
            fallback: ProviderOutcome::TransientError("script exhausted".to_string()),
            latency: Duration::ZERO,
            calls: AtomicUsize::new(0),
            texts: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call by echoing the input text
    pub fn echoing(service: ServiceId) -> Self {
        Self {
            fallback: ProviderOutcome::Success(String::new()),
            ..Self::new(service)
        }
    }

    /// Answer every call with the same outcome
    pub fn always(service: ServiceId, outcome: ProviderOutcome) -> Self {
        Self {
            fallback: outcome,
            ..Self::new(service)
        }
    }

    pub fn then(self, outcome: ProviderOutcome, latency: Duration) -> Self {
        self.script.lock().unwrap().push_back((outcome, latency));
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranslationProvider for ScriptedProvider {
    fn service(&self) -> ServiceId {
        self.service
    }

    async fn attempt(&self, text: &str, _target_language: &str) -> ProviderOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.lock().unwrap().push(text.to_string());

        let next = self.script.lock().unwrap().pop_front();
        let (outcome, latency) = next.unwrap_or_else(|| (self.fallback.clone(), self.latency));

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        match outcome {
            ProviderOutcome::Success(t) if t.is_empty() => ProviderOutcome::Success(text.to_string()),
            other => other,
        }
    }
}
