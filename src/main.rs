//! Main entry point for the Translation Bench CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use translation_bench::cli::commands::{self, Commands};

/// Translation Bench - compare machine-translation providers
#[derive(Parser, Debug)]
#[command(name = "translation-bench", version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("translation_bench={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match args.command {
        Some(Commands::Evaluate {
            dataset,
            output,
            summary_json,
            config,
            concurrent_providers,
        }) => {
            commands::handle_evaluate(dataset, output, summary_json, config, concurrent_providers).await?;
        }
        Some(Commands::BuildDataset {
            source,
            target,
            output,
            num_pairs,
            target_lang,
        }) => {
            commands::handle_build_dataset(source, target, output, num_pairs, target_lang).await?;
        }
        None => {
            println!("Please specify a command. Use --help for more information.");
        }
    }

    Ok(())
}
