//! CLI command definitions and handlers

use clap::Subcommand;
use std::path::PathBuf;

/// Commands for the translation benchmark
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every provider over a dataset and score the translations
    Evaluate {
        /// Dataset JSON file (required)
        #[arg(short, long)]
        dataset: PathBuf,

        /// CSV file for per-item results
        #[arg(short, long, default_value = "translation_results.csv")]
        output: PathBuf,

        /// Also write the per-provider summary as JSON
        #[arg(long)]
        summary_json: Option<PathBuf>,

        /// Config file with pipeline tunables
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Call the providers for one item concurrently
        #[arg(long)]
        concurrent_providers: bool,
    },

    /// Build a dataset from a line-aligned parallel corpus
    BuildDataset {
        /// Source-language corpus file (required)
        #[arg(short, long)]
        source: PathBuf,

        /// Target-language corpus file (required)
        #[arg(short, long)]
        target: PathBuf,

        /// Output dataset file
        #[arg(short, long, default_value = "datasets/dataset.json")]
        output: PathBuf,

        /// Number of pairs to keep (default: 200)
        #[arg(short, long, default_value_t = 200)]
        num_pairs: usize,

        /// Target language code (default: ES)
        #[arg(long, default_value = "ES")]
        target_lang: String,
    },
}

/// Handle evaluation command
pub async fn handle_evaluate(
    dataset: PathBuf,
    output: PathBuf,
    summary_json: Option<PathBuf>,
    config: Option<PathBuf>,
    concurrent_providers: bool,
) -> anyhow::Result<()> {
    use crate::core::config::{BenchmarkConfig, ProviderSettings};
    use crate::evaluation::{Aggregator, BatchScheduler, MetricScorer};
    use crate::processors::dataset::load_dataset;
    use crate::processors::results::{print_summary, write_summary_json, CsvSink};
    use crate::providers::build_provider;
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::Instant;
    use tracing::info;

    let start_time = Instant::now();

    // Configuration and credentials are checked before any provider is called
    let mut bench_config = BenchmarkConfig::load(config.as_deref())?;
    if concurrent_providers {
        bench_config.concurrent_providers = true;
    }

    let providers = ProviderSettings::all_from_env()?
        .into_iter()
        .map(|settings| build_provider(settings, &bench_config))
        .collect::<crate::core::errors::Result<Vec<_>>>()?;

    let items = load_dataset(&dataset)?;

    info!("Starting evaluation");
    info!("Dataset: {} ({} items)", dataset.display(), items.len());
    info!("Output: {}", output.display());
    info!(
        "Batch size: {}, batch delay: {:?}, max attempts: {}",
        bench_config.batch_size,
        bench_config.batch_delay(),
        bench_config.max_attempts
    );

    let pb = ProgressBar::new(items.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("=>-"),
    );

    let scheduler = BatchScheduler::new(bench_config, providers, MetricScorer::new()?)?
        .with_progress(pb.clone());

    let records = scheduler.run(&items).await;
    pb.finish_with_message("Completed");

    let sink = CsvSink::new(output);
    let aggregator = Aggregator::from_records(records);
    let summary = aggregator.finish(&sink)?;

    print_summary(&summary);

    if let Some(path) = summary_json {
        write_summary_json(&summary, aggregator.len(), &path)?;
        info!("Summary written to {}", path.display());
    }

    let duration = start_time.elapsed();
    info!(
        "Completed: {} records for {} items in {:?}",
        aggregator.len(),
        items.len(),
        duration
    );

    println!("✅ Evaluation completed!");
    println!("   Results: {}", sink.path().display());
    println!("   Time: {:?}", duration);

    Ok(())
}

/// Handle dataset construction command
pub async fn handle_build_dataset(
    source: PathBuf,
    target: PathBuf,
    output: PathBuf,
    num_pairs: usize,
    target_lang: String,
) -> anyhow::Result<()> {
    use crate::processors::dataset::{build_dataset, save_dataset};
    use tracing::info;

    info!("Building dataset");
    info!("Source: {}", source.display());
    info!("Target: {}", target.display());

    let items = build_dataset(&source, &target, num_pairs, &target_lang)?;
    if items.is_empty() {
        anyhow::bail!("No non-empty sentence pairs found");
    }

    save_dataset(&items, &output)?;

    println!("Created dataset with {} source to target translation pairs", items.len());
    println!("\nFirst 3 examples from the dataset:");
    for item in items.iter().take(3) {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "id": item.id,
                "text": item.source_text,
                "target_language": item.target_language,
                "reference": item.reference_text,
            }))?
        );
    }

    Ok(())
}
