//! Translation Bench - benchmark machine-translation providers
//!
//! Sends every sentence of a parallel corpus to DeepL, Gemini and Groq,
//! scores each translation against the reference with BLEU and METEOR,
//! and reports per-provider averages.

#![forbid(unsafe_code)]

pub mod cli;
pub mod core;
pub mod evaluation;
pub mod processors;
pub mod providers;

// Re-export key types for convenience
pub use core::{
    client::{ProviderClient, RetryPolicy},
    config::{BenchmarkConfig, ProviderSettings},
    errors::{BenchmarkError, Result},
    models::{EvaluationRecord, MetricScores, ProviderMetricsSummary, ProviderResult, ServiceId, TranslationItem},
};

pub use evaluation::{Aggregator, BatchScheduler, MetricScorer};
pub use providers::{ProviderOutcome, TranslationProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
