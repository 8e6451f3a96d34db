//! Reconciliation of local and service-side analysis results.
//!
//! The merge step is the single source of truth for the top-level
//! readability score and guarantees it always equals
//! `metrics.readability_score` in the returned result. Service metric
//! fields overlay the local ones per field, but only where the service
//! actually reported a value; zero/absent service fields never erase a
//! valid local measurement.

use crate::models::{AnalysisResult, TextMetrics};
use crate::normalize::{ServiceAnalysis, SUMMARY_UNAVAILABLE};

/// Merge locally computed metrics with the service analysis.
///
/// `service` is `None` when the generative path produced nothing at all; the
/// result is then complete but local-only: empty issues and a placeholder
/// summary. `degraded` marks a service analysis that was synthesized from
/// local data after exhaustion; its score and metrics are local already, so
/// the local side stays authoritative.
pub fn merge(
    local: &TextMetrics,
    service: Option<&ServiceAnalysis>,
    degraded: bool,
) -> AnalysisResult {
    let service = match service {
        Some(s) => s,
        None => {
            return AnalysisResult {
                metrics: local.clone(),
                issues: Vec::new(),
                summary: SUMMARY_UNAVAILABLE.to_string(),
                readability_score: local.readability_score,
                diagnostics: None,
            }
        }
    };

    let readability_score = if degraded {
        local.readability_score
    } else {
        service.readability_score
    };

    let mut metrics = local.clone();
    if !degraded {
        let s = &service.metrics;
        if s.word_count > 0 {
            metrics.word_count = s.word_count;
        }
        if s.sentence_count > 0 {
            metrics.sentence_count = s.sentence_count;
        }
        if s.paragraph_count > 0 {
            metrics.paragraph_count = s.paragraph_count;
        }
        if s.avg_words_per_sentence > 0.0 {
            metrics.avg_words_per_sentence = s.avg_words_per_sentence;
        }
        if s.complex_sentences > 0 {
            metrics.complex_sentences = s.complex_sentences;
        }
    }
    metrics.readability_score = readability_score;

    AnalysisResult {
        metrics,
        issues: service.issues.clone(),
        summary: service.summary.clone(),
        readability_score,
        diagnostics: None,
    }
}
