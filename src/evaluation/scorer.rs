//! Sentence-level BLEU and METEOR

use std::collections::HashMap;

use crate::core::errors::Result;
use crate::core::models::MetricScores;
use crate::evaluation::tokenizer::{Stemmer, Tokenizer};

/// Highest n-gram order for BLEU
pub const BLEU_MAX_ORDER: usize = 4;

/// Added to zero n-gram match counts ("method 1" smoothing)
pub const BLEU_SMOOTHING_EPSILON: f64 = 0.1;

/// METEOR parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeteorParams {
    /// Precision weight in the harmonic mean
    pub alpha: f64,
    /// Fragmentation exponent
    pub beta: f64,
    /// Fragmentation penalty weight
    pub gamma: f64,
}

impl Default for MeteorParams {
    fn default() -> Self {
        Self {
            alpha: 0.9,
            beta: 3.0,
            gamma: 0.0,
        }
    }
}

/// Scores candidates against a single reference
#[derive(Debug, Clone)]
pub struct MetricScorer {
    tokenizer: Tokenizer,
    meteor: MeteorParams,
}

impl MetricScorer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            tokenizer: Tokenizer::new()?,
            meteor: MeteorParams::default(),
        })
    }

    /// Score `candidate` against `reference`; an empty candidate is `0.0`/`0.0`
    pub fn score(&self, reference: &str, candidate: &str, language: &str) -> MetricScores {
        if candidate.trim().is_empty() {
            return MetricScores::default();
        }

        let reference_tokens = self.tokenizer.tokenize(reference);
        let candidate_tokens = self.tokenizer.tokenize(candidate);
        let stemmer = Stemmer::for_language(language);

        MetricScores {
            bleu_score: sentence_bleu(&reference_tokens, &candidate_tokens),
            meteor_score: meteor(&reference_tokens, &candidate_tokens, &stemmer, self.meteor),
        }
    }
}

fn ngram_counts(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    if n == 0 || tokens.len() < n {
        return counts;
    }
    for gram in tokens.windows(n) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

/// Clipped n-gram matches and total candidate n-grams (at least 1)
fn modified_precision(reference: &[String], candidate: &[String], n: usize) -> (usize, usize) {
    let candidate_counts = ngram_counts(candidate, n);
    let reference_counts = ngram_counts(reference, n);

    let matches = candidate_counts
        .iter()
        .map(|(gram, count)| (*count).min(reference_counts.get(gram).copied().unwrap_or(0)))
        .sum();
    let total = candidate_counts.values().sum::<usize>().max(1);

    (matches, total)
}

fn brevity_penalty(reference_len: usize, candidate_len: usize) -> f64 {
    if candidate_len > reference_len {
        1.0
    } else if candidate_len == 0 {
        0.0
    } else {
        (1.0 - reference_len as f64 / candidate_len as f64).exp()
    }
}

/// Sentence BLEU with uniform weights and epsilon smoothing.
/// Candidates shorter than 4 tokens are scored over as many orders as they have tokens.
pub fn sentence_bleu(reference: &[String], candidate: &[String]) -> f64 {
    let max_order = BLEU_MAX_ORDER.min(candidate.len());
    if max_order == 0 {
        return 0.0;
    }

    let precisions: Vec<(usize, usize)> = (1..=max_order)
        .map(|n| modified_precision(reference, candidate, n))
        .collect();

    if precisions[0].0 == 0 {
        return 0.0;
    }

    let weight = 1.0 / max_order as f64;
    let log_sum: f64 = precisions
        .iter()
        .map(|&(matches, total)| {
            let p = if matches == 0 {
                BLEU_SMOOTHING_EPSILON / total as f64
            } else {
                matches as f64 / total as f64
            };
            weight * p.ln()
        })
        .sum();

    (brevity_penalty(reference.len(), candidate.len()) * log_sum.exp()).clamp(0.0, 1.0)
}

/// Greedy unigram alignment: exact (case-folded) matches first, then stems.
/// Returns `(candidate_index, reference_index)` pairs sorted by candidate index.
fn align(reference: &[String], candidate: &[String], stemmer: &Stemmer) -> Vec<(usize, usize)> {
    let reference: Vec<String> = reference.iter().map(|t| t.to_lowercase()).collect();
    let candidate: Vec<String> = candidate.iter().map(|t| t.to_lowercase()).collect();

    let mut reference_used = vec![false; reference.len()];
    let mut candidate_used = vec![false; candidate.len()];
    let mut alignment = Vec::new();

    for use_stems in [false, true] {
        let form = |token: &String| if use_stems { stemmer.stem(token) } else { token.clone() };
        let reference_forms: Vec<String> = reference.iter().map(form).collect();

        for (ci, token) in candidate.iter().enumerate() {
            if candidate_used[ci] {
                continue;
            }
            let wanted = form(token);
            let hit = reference_forms
                .iter()
                .enumerate()
                .find(|(ri, r)| !reference_used[*ri] && **r == wanted)
                .map(|(ri, _)| ri);
            if let Some(ri) = hit {
                reference_used[ri] = true;
                candidate_used[ci] = true;
                alignment.push((ci, ri));
            }
        }
    }

    alignment.sort_unstable();
    alignment
}

/// Runs of adjacent candidate tokens aligned to adjacent reference tokens
fn count_chunks(alignment: &[(usize, usize)]) -> usize {
    if alignment.is_empty() {
        return 0;
    }
    1 + alignment
        .windows(2)
        .filter(|w| !(w[1].0 == w[0].0 + 1 && w[1].1 == w[0].1 + 1))
        .count()
}

/// Single-reference METEOR
pub fn meteor(reference: &[String], candidate: &[String], stemmer: &Stemmer, params: MeteorParams) -> f64 {
    let alignment = align(reference, candidate, stemmer);
    let matches = alignment.len() as f64;
    if matches == 0.0 {
        return 0.0;
    }

    let precision = matches / candidate.len() as f64;
    let recall = matches / reference.len() as f64;
    let fmean = precision * recall / (params.alpha * precision + (1.0 - params.alpha) * recall);

    let penalty = if params.gamma == 0.0 {
        0.0
    } else {
        let fragmentation = count_chunks(&alignment) as f64 / matches;
        params.gamma * fragmentation.powf(params.beta)
    };

    (fmean * (1.0 - penalty)).clamp(0.0, 1.0)
}
