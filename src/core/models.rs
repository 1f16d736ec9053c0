//! Core data models for evaluation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Translation provider identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceId {
    /// DeepL translation API
    Deepl,
    /// Google Gemini generative API
    Gemini,
    /// Groq chat completions API
    Groq,
}

impl ServiceId {
    /// All services, in the order the scheduler dispatches them
    pub const ALL: [ServiceId; 3] = [ServiceId::Deepl, ServiceId::Gemini, ServiceId::Groq];

    /// Stable lowercase identifier used in output files
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceId::Deepl => "deepl",
            ServiceId::Gemini => "gemini",
            ServiceId::Groq => "groq",
        }
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One source/reference pair of the evaluation dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationItem {
    pub id: u32,
    pub source_text: String,
    pub target_language: String,
    pub reference_text: String,
}

impl TranslationItem {
    pub fn new(
        id: u32,
        source_text: impl Into<String>,
        target_language: impl Into<String>,
        reference_text: impl Into<String>,
    ) -> Self {
        Self {
            id,
            source_text: source_text.into(),
            target_language: target_language.into(),
            reference_text: reference_text.into(),
        }
    }
}

/// Successful provider translation
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResult {
    pub translated_text: String,
    /// Duration of the successful call only, retries excluded
    pub time_taken: Duration,
}

/// BLEU and METEOR for one candidate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MetricScores {
    pub bleu_score: f64,
    pub meteor_score: f64,
}

/// Scored outcome of one (item, provider) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationRecord {
    pub service: ServiceId,
    pub source_text: String,
    pub translated_text: String,
    pub reference_text: String,
    pub bleu_score: f64,
    pub meteor_score: f64,
    #[serde(serialize_with = "serialize_secs")]
    pub time_taken: Duration,
}

impl EvaluationRecord {
    /// Record for a call that produced a translation
    pub fn scored(
        service: ServiceId,
        item: &TranslationItem,
        result: ProviderResult,
        scores: MetricScores,
    ) -> Self {
        Self {
            service,
            source_text: item.source_text.clone(),
            translated_text: result.translated_text,
            reference_text: item.reference_text.clone(),
            bleu_score: scores.bleu_score,
            meteor_score: scores.meteor_score,
            time_taken: result.time_taken,
        }
    }

    /// Zero-scored record for a provider that returned nothing
    pub fn failed(service: ServiceId, item: &TranslationItem) -> Self {
        Self {
            service,
            source_text: item.source_text.clone(),
            translated_text: String::new(),
            reference_text: item.reference_text.clone(),
            bleu_score: 0.0,
            meteor_score: 0.0,
            time_taken: Duration::ZERO,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.translated_text.is_empty()
    }
}

/// Per-provider averages
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProviderMetricsSummary {
    pub avg_bleu: f64,
    pub avg_meteor: f64,
    /// Seconds
    pub avg_time: f64,
    pub records: usize,
    pub failures: usize,
}

fn serialize_secs<S>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}
