//! Record collection, per-provider averages and hand-off to persistence

use std::collections::BTreeMap;

use crate::core::errors::Result;
use crate::core::models::{EvaluationRecord, ProviderMetricsSummary, ServiceId};

/// Destination for the finished record set
pub trait RecordSink {
    fn persist(&self, records: &[EvaluationRecord]) -> Result<()>;
}

/// Per-provider summaries, iterated in provider-name order
pub type Summary = BTreeMap<ServiceId, ProviderMetricsSummary>;

/// Append-only collection of evaluation records
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    records: Vec<EvaluationRecord>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<EvaluationRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: EvaluationRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[EvaluationRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<EvaluationRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summarize(&self) -> Summary {
        summarize(&self.records)
    }

    /// Persist every record, then return the summary
    pub fn finish(&self, sink: &dyn RecordSink) -> Result<Summary> {
        sink.persist(&self.records)?;
        Ok(self.summarize())
    }
}

/// Mean BLEU, METEOR and time per provider; providers without records are absent
pub fn summarize(records: &[EvaluationRecord]) -> Summary {
    #[derive(Default)]
    struct Totals {
        bleu: f64,
        meteor: f64,
        time: f64,
        count: usize,
        failures: usize,
    }

    let mut totals: BTreeMap<ServiceId, Totals> = BTreeMap::new();
    for record in records {
        let entry = totals.entry(record.service).or_default();
        entry.bleu += record.bleu_score;
        entry.meteor += record.meteor_score;
        entry.time += record.time_taken.as_secs_f64();
        entry.count += 1;
        if record.is_failure() {
            entry.failures += 1;
        }
    }

    totals
        .into_iter()
        .map(|(service, t)| {
            let n = t.count as f64;
            (
                service,
                ProviderMetricsSummary {
                    avg_bleu: t.bleu / n,
                    avg_meteor: t.meteor / n,
                    avg_time: t.time / n,
                    records: t.count,
                    failures: t.failures,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{MetricScores, ProviderResult, TranslationItem};
    use std::cell::RefCell;
    use std::time::Duration;

    fn record(service: ServiceId, bleu: f64, meteor: f64, secs: f64) -> EvaluationRecord {
        let item = TranslationItem::new(1, "Hello", "ES", "Hola");
        EvaluationRecord::scored(
            service,
            &item,
            ProviderResult {
                translated_text: "Hola".to_string(),
                time_taken: Duration::from_secs_f64(secs),
            },
            MetricScores {
                bleu_score: bleu,
                meteor_score: meteor,
            },
        )
    }

    #[test]
    fn test_average_per_provider() {
        let records = vec![
            record(ServiceId::Deepl, 0.8, 0.9, 1.0),
            record(ServiceId::Groq, 0.1, 0.2, 0.5),
            record(ServiceId::Deepl, 0.4, 0.5, 3.0),
        ];

        let summary = summarize(&records);
        let deepl = summary[&ServiceId::Deepl];

        assert!((deepl.avg_bleu - 0.6).abs() < 1e-12);
        assert!((deepl.avg_meteor - 0.7).abs() < 1e-12);
        assert!((deepl.avg_time - 2.0).abs() < 1e-12);
        assert_eq!(deepl.records, 2);
        assert_eq!(summary[&ServiceId::Groq].records, 1);
    }

    #[test]
    fn test_provider_without_records_is_absent() {
        let summary = summarize(&[record(ServiceId::Gemini, 0.5, 0.5, 1.0)]);
        assert_eq!(summary.len(), 1);
        assert!(!summary.contains_key(&ServiceId::Deepl));
        assert!(summarize(&[]).is_empty());
    }

    #[test]
    fn test_failures_count_toward_denominator() {
        let item = TranslationItem::new(2, "Bye", "ES", "Adiós");
        let records = vec![
            record(ServiceId::Deepl, 0.8, 0.8, 1.0),
            EvaluationRecord::failed(ServiceId::Deepl, &item),
        ];

        let deepl = summarize(&records)[&ServiceId::Deepl];
        assert!((deepl.avg_bleu - 0.4).abs() < 1e-12);
        assert_eq!(deepl.failures, 1);
    }

    #[derive(Default)]
    struct MemorySink {
        persisted: RefCell<Vec<EvaluationRecord>>,
    }

    impl RecordSink for MemorySink {
        fn persist(&self, records: &[EvaluationRecord]) -> Result<()> {
            self.persisted.borrow_mut().extend_from_slice(records);
            Ok(())
        }
    }

    #[test]
    fn test_finish_hands_records_to_sink() {
        let mut aggregator = Aggregator::new();
        aggregator.push(record(ServiceId::Deepl, 1.0, 1.0, 1.0));
        aggregator.push(record(ServiceId::Gemini, 0.5, 0.5, 2.0));

        let sink = MemorySink::default();
        let summary = aggregator.finish(&sink).unwrap();

        assert_eq!(sink.persisted.borrow().as_slice(), aggregator.records());
        assert_eq!(summary.keys().copied().collect::<Vec<_>>(), vec![ServiceId::Deepl, ServiceId::Gemini]);
    }
}
