//! Result persistence: CSV records, console summary and JSON summary

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::errors::{BenchmarkError, Result};
use crate::core::models::EvaluationRecord;
use crate::evaluation::aggregator::{RecordSink, Summary};

/// Output columns, in order
pub const CSV_COLUMNS: [&str; 7] = [
    "service",
    "source_text",
    "translated_text",
    "reference_text",
    "bleu_score",
    "meteor_score",
    "time_taken",
];

/// Writes one CSV row per record
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for CsvSink {
    fn persist(&self, records: &[EvaluationRecord]) -> Result<()> {
        write_records_csv(records, &self.path)
    }
}

/// Header plus one row per record; an empty set still gets the header
pub fn write_records_csv(records: &[EvaluationRecord], path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| BenchmarkError::FileError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    writer.write_record(CSV_COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Human-readable per-provider summary, 4 decimal places
pub fn format_summary(summary: &Summary) -> String {
    let mut out = String::from("Evaluation Results:\n");
    for (service, metrics) in summary {
        let _ = write!(
            out,
            "\n{} Metrics:\nAverage BLEU Score: {:.4}\nAverage METEOR Score: {:.4}\nAverage Translation Time: {:.4} seconds\n",
            service.as_str().to_uppercase(),
            metrics.avg_bleu,
            metrics.avg_meteor,
            metrics.avg_time,
        );
        if metrics.failures > 0 {
            let _ = writeln!(out, "Failed Translations: {}/{}", metrics.failures, metrics.records);
        }
    }
    out
}

pub fn print_summary(summary: &Summary) {
    println!("\n{}", format_summary(summary));
}

#[derive(Debug, Serialize)]
struct SummaryReport<'a> {
    generated_at: DateTime<Utc>,
    total_records: usize,
    providers: &'a Summary,
}

/// Machine-readable summary alongside the CSV
pub fn write_summary_json(summary: &Summary, total_records: usize, path: &Path) -> Result<()> {
    let report = SummaryReport {
        generated_at: Utc::now(),
        total_records,
        providers: summary,
    };
    let content = serde_json::to_string_pretty(&report)?;
    std::fs::write(path, content).map_err(|e| BenchmarkError::FileError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(())
}
