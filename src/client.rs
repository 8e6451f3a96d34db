//! Generative analysis client: retries, model fallback, deadlines, and
//! degraded-mode synthesis.
//!
//! One request walks an ordered list of model variants; each variant gets a
//! bounded number of attempts, each raced against a hard deadline. Attempts
//! are strictly sequential, and a timed-out call is dropped, never awaited.
//! Failures of any kind (timeout, transport, quota, unparseable output) are
//! logged and counted the same way.
//!
//! The client has no externally visible failure mode: when every
//! model/attempt combination fails, it synthesizes a structurally valid
//! result from the locally computed metrics and records the degradation in
//! the optional diagnostics.

use std::sync::Arc;
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::GenerativeConfig;
use crate::generative::GenerativeBackend;
use crate::models::{Language, TextMetrics};
use crate::normalize::{
    normalize_response, parse_service_json, ServiceAnalysis, ServiceMetrics, SUMMARY_UNAVAILABLE,
};
use crate::segment::split_sentences;

/// How much of the prompt the diagnostics record keeps.
const PROMPT_EXCERPT_CHARS: usize = 200;

/// Sentences used when synthesizing a fallback summary.
const FALLBACK_SUMMARY_SENTENCES: usize = 3;

static NUMBERED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s*").expect("invalid numbered-line pattern"));

/// Outcome of one attempt against one model variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub model: String,
    pub attempt: u32,
    pub duration_ms: u64,
    /// `"ok"` on success, otherwise the failure description.
    pub outcome: String,
    pub timed_out: bool,
}

/// Debug-mode record attached to a result without altering it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDiagnostics {
    pub request_id: String,
    pub prompt_excerpt: String,
    pub api_key_present: bool,
    /// True when every model/attempt failed and the result was synthesized.
    pub fallback_used: bool,
    pub attempts: Vec<AttemptRecord>,
}

/// Result of the analysis operation, always structurally valid.
#[derive(Debug, Clone)]
pub struct ClientAnalysis {
    pub analysis: ServiceAnalysis,
    /// True when the analysis was synthesized locally after exhaustion.
    pub degraded: bool,
    pub diagnostics: Option<RequestDiagnostics>,
}

/// Client over a [`GenerativeBackend`] with per-request retry state.
///
/// Each request owns its own attempt/backoff state; concurrent requests do
/// not interfere.
pub struct GenerativeClient {
    backend: Arc<dyn GenerativeBackend>,
    config: GenerativeConfig,
}

impl GenerativeClient {
    pub fn new(backend: Arc<dyn GenerativeBackend>, config: GenerativeConfig) -> Self {
        Self { backend, config }
    }

    /// Run the full analysis prompt, normalizing the response or degrading
    /// to a locally synthesized result. Never fails.
    pub async fn analyze(
        &self,
        prompt: &str,
        text: &str,
        language: Language,
        local_metrics: &TextMetrics,
        debug: bool,
    ) -> ClientAnalysis {
        let (parsed, attempts) = self
            .run_attempts(prompt, |raw| {
                parse_service_json(raw).map(|value| normalize_response(&value))
            })
            .await;

        let degraded = parsed.is_none();
        let analysis = parsed
            .unwrap_or_else(|| synthesize_fallback(text, language, local_metrics));

        if degraded {
            warn!("all generative attempts failed, returning local fallback analysis");
        }

        let diagnostics = debug.then(|| self.diagnostics(prompt, degraded, attempts));

        ClientAnalysis {
            analysis,
            degraded,
            diagnostics,
        }
    }

    /// Produce a bullet-point summary of the text. Degrades to a fixed
    /// placeholder.
    pub async fn summarize(&self, text: &str, language: Language) -> String {
        let prompt = format!(
            "Izveido īsu, strukturētu kopsavilkumu {} valodā šim tekstam.\n\
             Izmanto bullet points formātu.\n\nTEKSTS:\n{}\n\n\
             Atbildi tikai ar kopsavilkumu, bez papildu komentāriem.",
            language.label(),
            text
        );

        let (summary, _) = self
            .run_attempts(&prompt, |raw| {
                let trimmed = raw.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .await;

        summary.unwrap_or_else(|| SUMMARY_UNAVAILABLE.to_string())
    }

    /// Produce up to five improvement suggestions, parsed from a numbered
    /// list. Degrades to an empty list.
    pub async fn suggestions(&self, text: &str, language: Language) -> Vec<String> {
        let prompt = format!(
            "Sniedz 5 konkrētus ieteikumus, kā uzlabot šo tekstu {} valodā.\n\
             Koncentrējies uz lasāmību, skaidrību un stilu.\n\nTEKSTS:\n{}\n\n\
             Atbildi ar numurētu sarakstu, katrs ieteikums jaunā rindā.",
            language.label(),
            text
        );

        let (parsed, _) = self
            .run_attempts(&prompt, |raw| {
                let trimmed = raw.trim();
                (!trimmed.is_empty()).then(|| parse_numbered_list(trimmed))
            })
            .await;

        parsed.unwrap_or_default()
    }

    /// Walk the model/attempt matrix until `parse` accepts a response.
    ///
    /// A timed-out attempt's underlying call is dropped, not awaited; its
    /// eventual completion is ignored.
    async fn run_attempts<T>(
        &self,
        prompt: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> (Option<T>, Vec<AttemptRecord>) {
        let timeout = Duration::from_millis(self.config.timeout_ms);
        let mut records = Vec::new();

        let total_attempts = self.config.models.len() as u32 * self.config.retries;
        let mut attempt_no = 0u32;

        for (model_index, model) in self.config.models.iter().enumerate() {
            for attempt in 1..=self.config.retries {
                attempt_no += 1;
                let started = Instant::now();

                let outcome =
                    tokio::time::timeout(timeout, self.backend.generate(prompt, model)).await;
                let duration_ms = started.elapsed().as_millis() as u64;

                let failure = match outcome {
                    Ok(Ok(raw)) => match parse(&raw) {
                        Some(value) => {
                            if model_index > 0 || attempt > 1 {
                                info!(
                                    model = %model.id,
                                    attempt,
                                    "generative request succeeded after fallback"
                                );
                            } else {
                                debug!(model = %model.id, "generative request succeeded");
                            }
                            records.push(AttemptRecord {
                                model: model.id.clone(),
                                attempt,
                                duration_ms,
                                outcome: "ok".to_string(),
                                timed_out: false,
                            });
                            return (Some(value), records);
                        }
                        None => ("unparseable response".to_string(), false),
                    },
                    Ok(Err(e)) => (e.to_string(), false),
                    Err(_) => (
                        format!("timeout after {}ms", self.config.timeout_ms),
                        true,
                    ),
                };

                let (error, timed_out) = failure;
                warn!(
                    model = %model.id,
                    attempt,
                    timed_out,
                    "generative attempt failed: {}",
                    error
                );
                records.push(AttemptRecord {
                    model: model.id.clone(),
                    attempt,
                    duration_ms,
                    outcome: error,
                    timed_out,
                });

                if attempt_no < total_attempts {
                    let backoff =
                        Duration::from_millis(self.config.backoff_base_ms * attempt as u64);
                    tokio::time::sleep(backoff).await;
                }
            }
        }

        (None, records)
    }

    fn diagnostics(
        &self,
        prompt: &str,
        fallback_used: bool,
        attempts: Vec<AttemptRecord>,
    ) -> RequestDiagnostics {
        RequestDiagnostics {
            request_id: Uuid::new_v4().to_string(),
            prompt_excerpt: prompt.chars().take(PROMPT_EXCERPT_CHARS).collect(),
            api_key_present: std::env::var(&self.config.api_key_env).is_ok(),
            fallback_used,
            attempts,
        }
    }
}

/// Build a locally synthesized analysis after exhaustion.
fn synthesize_fallback(
    text: &str,
    language: Language,
    local_metrics: &TextMetrics,
) -> ServiceAnalysis {
    let sentences = split_sentences(text, language);

    let summary = if sentences.is_empty() {
        format!(
            "• Vārdu skaits: {}\n• Teikumu skaits: {}\n• Lasāmības vērtējums: {}/100",
            local_metrics.word_count,
            local_metrics.sentence_count,
            local_metrics.readability_score
        )
    } else {
        sentences
            .iter()
            .take(FALLBACK_SUMMARY_SENTENCES)
            .map(|s| format!("• {}", s))
            .collect::<Vec<_>>()
            .join("\n")
    };

    ServiceAnalysis {
        readability_score: local_metrics.readability_score,
        issues: Vec::new(),
        summary,
        metrics: ServiceMetrics {
            word_count: local_metrics.word_count,
            sentence_count: local_metrics.sentence_count,
            paragraph_count: local_metrics.paragraph_count,
            avg_words_per_sentence: local_metrics.avg_words_per_sentence,
            readability_score: local_metrics.readability_score,
            complex_sentences: local_metrics.complex_sentences,
        },
    }
}

/// Parse `1. ...` style lines, capped at five suggestions.
fn parse_numbered_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim())
        .filter(|line| NUMBERED_LINE.is_match(line))
        .map(|line| NUMBERED_LINE.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .take(5)
        .collect()
}
