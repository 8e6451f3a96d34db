//! Response normalization for the generative service.
//!
//! The service returns a text blob that should contain JSON but often does
//! not, quite: fenced output, stray prose around the object, numbers as
//! strings, missing fields. This module makes that output behave like a
//! typed contract: [`parse_service_json`] recovers a JSON object from raw
//! text, and [`normalize_response`] maps any object onto the strict
//! [`ServiceAnalysis`] shape with a default for every missing or invalid
//! field. Normalization is total; it never fails.

use serde_json::Value;

use crate::models::{Issue, IssuePosition, Severity};

/// Placeholder used when no usable summary is available.
pub const SUMMARY_UNAVAILABLE: &str = "Kopsavilkums nav pieejams";

/// Default readability score when the service omits or mangles it.
pub const DEFAULT_READABILITY: u8 = 50;

/// Strict service-side analysis payload after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceAnalysis {
    pub readability_score: u8,
    pub issues: Vec<Issue>,
    /// Bullet-formatted summary, never empty.
    pub summary: String,
    pub metrics: ServiceMetrics,
}

/// Service-reported metric fields, zero-defaulted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceMetrics {
    pub word_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub avg_words_per_sentence: f64,
    pub readability_score: u8,
    pub complex_sentences: usize,
}

/// Recover a JSON object from raw response text.
///
/// Tries a strict parse first; on failure falls back to the greedy
/// first-`{`-to-last-`}` substring. Anything that does not parse to a JSON
/// object is rejected (the caller treats that as an attempt failure).
pub fn parse_service_json(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        if value.is_object() {
            return Some(value);
        }
    }

    let extracted = extract_braces(text)?;
    match serde_json::from_str::<Value>(extracted) {
        Ok(value) if value.is_object() => Some(value),
        _ => None,
    }
}

/// Greedy brace extraction: the substring from the first `{` to the last `}`.
fn extract_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Normalize a parsed service object into the strict analysis shape.
pub fn normalize_response(raw: &Value) -> ServiceAnalysis {
    let readability_score = coerce_number(raw.get("readability_score"))
        .map(clamp_score)
        .unwrap_or(DEFAULT_READABILITY);

    let issues = raw
        .get("issues")
        .and_then(|v| v.as_array())
        .map(|items| items.iter().filter_map(normalize_issue).collect())
        .unwrap_or_default();

    let summary = normalize_summary(raw.get("summary"));

    let metrics = normalize_metrics(raw.get("metrics"), readability_score);

    ServiceAnalysis {
        readability_score,
        issues,
        summary,
        metrics,
    }
}

/// Validate and coerce one issue; `None` drops it.
fn normalize_issue(raw: &Value) -> Option<Issue> {
    let sentence = raw.get("sentence")?.as_str()?.trim();
    let suggestion = raw.get("suggestion")?.as_str()?.trim();
    if sentence.is_empty() || suggestion.is_empty() {
        return None;
    }

    let issue_type = raw
        .get("type")
        .and_then(|v| v.as_str())
        .unwrap_or("style")
        .to_string();

    let severity = raw
        .get("severity")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<Severity>().ok())
        .unwrap_or(Severity::Medium);

    let position = raw.get("position");
    let start = position
        .and_then(|p| coerce_number(p.get("start")))
        .map(|n| n.max(0.0) as usize)
        .unwrap_or(0);
    let end = position
        .and_then(|p| coerce_number(p.get("end")))
        .map(|n| n.max(0.0) as usize)
        .unwrap_or_else(|| sentence.chars().count())
        .max(start);

    Some(Issue {
        issue_type,
        severity,
        sentence: sentence.to_string(),
        suggestion: suggestion.to_string(),
        position: IssuePosition { start, end },
        accepted: false,
    })
}

fn normalize_summary(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Array(items)) if !items.is_empty() => items
            .iter()
            .map(|item| match item.as_str() {
                Some(s) => format!("• {}", s),
                None => format!("• {}", item),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        _ => SUMMARY_UNAVAILABLE.to_string(),
    }
}

fn normalize_metrics(raw: Option<&Value>, fallback_readability: u8) -> ServiceMetrics {
    let empty = Value::Null;
    let raw = raw.unwrap_or(&empty);

    ServiceMetrics {
        word_count: coerce_count(raw.get("wordCount")),
        sentence_count: coerce_count(raw.get("sentenceCount")),
        paragraph_count: coerce_count(raw.get("paragraphCount")),
        avg_words_per_sentence: coerce_number(raw.get("avgWordsPerSentence"))
            .map(|n| n.max(0.0))
            .unwrap_or(0.0),
        readability_score: coerce_number(raw.get("readabilityScore"))
            .map(clamp_score)
            .unwrap_or(fallback_readability),
        complex_sentences: coerce_count(raw.get("complexSentences")),
    }
}

/// Coerce a JSON value to a number; numeric strings are accepted.
fn coerce_number(raw: Option<&Value>) -> Option<f64> {
    match raw? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn coerce_count(raw: Option<&Value>) -> usize {
    coerce_number(raw).map(|n| n.max(0.0) as usize).unwrap_or(0)
}

fn clamp_score(x: f64) -> u8 {
    x.round().clamp(0.0, 100.0) as u8
}
