//! Evaluation pipeline: scoring, scheduling and aggregation

pub mod aggregator;
pub mod scheduler;
pub mod scorer;
pub mod tokenizer;

pub use aggregator::{summarize, Aggregator, RecordSink, Summary};
pub use scheduler::BatchScheduler;
pub use scorer::{MeteorParams, MetricScorer};
