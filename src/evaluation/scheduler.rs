//! Batch scheduler driving every provider over the dataset

use futures::future::join_all;
use indicatif::ProgressBar;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::core::client::{ProviderClient, RetryPolicy};
use crate::core::config::BenchmarkConfig;
use crate::core::errors::Result;
use crate::core::models::{EvaluationRecord, TranslationItem};
use crate::evaluation::aggregator::Aggregator;
use crate::evaluation::scorer::MetricScorer;
use crate::providers::TranslationProvider;

/// Runs the dataset through every configured provider, batch by batch
pub struct BatchScheduler {
    config: BenchmarkConfig,
    clients: Vec<ProviderClient>,
    scorer: MetricScorer,
    progress: Option<ProgressBar>,
}

impl BatchScheduler {
    /// Providers are dispatched in the order given
    pub fn new(
        config: BenchmarkConfig,
        providers: Vec<Arc<dyn TranslationProvider>>,
        scorer: MetricScorer,
    ) -> Result<Self> {
        config.validate()?;
        let policy = RetryPolicy::from_config(&config);
        let clients = providers
            .into_iter()
            .map(|provider| ProviderClient::new(provider, policy))
            .collect();

        Ok(Self {
            config,
            clients,
            scorer,
            progress: None,
        })
    }

    /// Advance `progress` once per finished item
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Evaluate `items` in order; one record per (item, provider) pair
    pub async fn run(&self, items: &[TranslationItem]) -> Vec<EvaluationRecord> {
        let mut aggregator = Aggregator::new();
        let total_batches = self.config.batch_count(items.len());

        for (index, batch) in items.chunks(self.config.batch_size).enumerate() {
            info!(
                "Processing batch {} of {} ({} items)",
                index + 1,
                total_batches,
                batch.len()
            );

            for item in batch {
                for record in self.evaluate_item(item).await {
                    aggregator.push(record);
                }
                if let Some(progress) = &self.progress {
                    progress.inc(1);
                }
            }

            if index + 1 < total_batches {
                info!(
                    "Waiting {:?} before next batch...",
                    self.config.batch_delay()
                );
                sleep(self.config.batch_delay()).await;
            }
        }

        info!(
            "Evaluation finished: {} items, {} records",
            items.len(),
            aggregator.len()
        );
        aggregator.into_records()
    }

    /// All providers for one item, records in provider order
    async fn evaluate_item(&self, item: &TranslationItem) -> Vec<EvaluationRecord> {
        debug!("Evaluating item {}", item.id);

        if self.config.concurrent_providers {
            join_all(self.clients.iter().map(|client| self.evaluate_with(client, item))).await
        } else {
            let mut records = Vec::with_capacity(self.clients.len());
            for client in &self.clients {
                records.push(self.evaluate_with(client, item).await);
            }
            records
        }
    }

    async fn evaluate_with(&self, client: &ProviderClient, item: &TranslationItem) -> EvaluationRecord {
        let service = client.service();
        match client
            .translate(&item.source_text, &item.target_language)
            .await
        {
            Some(result) => {
                let scores = self.scorer.score(
                    &item.reference_text,
                    &result.translated_text,
                    &item.target_language,
                );
                EvaluationRecord::scored(service, item, result, scores)
            }
            None => {
                info!("{}: recording item {} as failed", service, item.id);
                EvaluationRecord::failed(service, item)
            }
        }
    }
}
