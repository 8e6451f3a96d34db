//! Core data models used throughout Prose Harness.
//!
//! These types represent the settings, metrics, issues, and admin entities
//! that flow through the analysis pipeline. Wire names are camelCase to match
//! the persisted admin document and the analysis response consumed by callers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Analysis language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Latvian
    Lv,
    /// Russian
    Ru,
    /// English
    En,
}

impl Language {
    /// Human-readable label used in prompt assembly (Latvian locale).
    pub fn label(&self) -> &'static str {
        match self {
            Language::Lv => "latviešu",
            Language::Ru => "krievu",
            Language::En => "angļu",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lv" => Ok(Language::Lv),
            "ru" => Ok(Language::Ru),
            "en" => Ok(Language::En),
            other => Err(format!("Invalid language: {}", other)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Language::Lv => "lv",
            Language::Ru => "ru",
            Language::En => "en",
        };
        write!(f, "{}", s)
    }
}

/// Editorial text category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    News,
    Sports,
    Culture,
    Business,
    Opinion,
}

impl Category {
    /// Human-readable label used in prompt assembly (Latvian locale).
    pub fn label(&self) -> &'static str {
        match self {
            Category::News => "Ziņas",
            Category::Sports => "Sports",
            Category::Culture => "Kultūra",
            Category::Business => "Bizness",
            Category::Opinion => "Viedoklis",
        }
    }
}

/// Target writing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Formal,
    Informal,
    Neutral,
}

impl Style {
    /// Human-readable label used in prompt assembly (Latvian locale).
    pub fn label(&self) -> &'static str {
        match self {
            Style::Formal => "Formāls",
            Style::Informal => "Neformāls",
            Style::Neutral => "Neitrāls",
        }
    }
}

/// Per-request analysis settings. Immutable once the request is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSettings {
    pub language: Language,
    pub category: Category,
    pub style: Style,
}

/// Qualitative compliance tier for a single guideline dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Guideline compliance assessment derived from the local metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidelineCompliance {
    #[serde(rename = "sentenceLength")]
    pub sentence_length: ComplianceTier,
    #[serde(rename = "activeVoice")]
    pub active_voice: ComplianceTier,
    pub clarity: ComplianceTier,
    /// Weighted overall score, 0–100.
    pub overall: u8,
}

/// Quantitative measures derived from segmented text.
///
/// Recomputed per analysis request; never persisted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMetrics {
    pub word_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    /// Average words per sentence, rounded to one decimal.
    pub avg_words_per_sentence: f64,
    /// Localized Flesch-family score, 0–100, higher = easier.
    pub readability_score: u8,
    /// Sentences exceeding the long-sentence word threshold.
    pub complex_sentences: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passive_voice_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passive_voice_percentage: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_sentences_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_sentences_percentage: Option<u8>,
    /// Average sentences per paragraph, rounded to one decimal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_paragraph_length: Option<f64>,
    /// 0–100; 100 means no repeated long words.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_repetition_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guideline_compliance: Option<GuidelineCompliance>,
}

/// Issue severity reported by the generative service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            other => Err(format!("Invalid severity: {}", other)),
        }
    }
}

/// Character-offset span into the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuePosition {
    pub start: usize,
    pub end: usize,
}

/// A single problem flagged in the analyzed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Free-text category, e.g. "readability", "grammar", "style", "complexity".
    #[serde(rename = "type")]
    pub issue_type: String,
    pub severity: Severity,
    /// The problematic excerpt.
    pub sentence: String,
    /// Suggested correction.
    pub suggestion: String,
    pub position: IssuePosition,
    /// User-controlled acceptance flag; always false on a fresh analysis.
    #[serde(default)]
    pub accepted: bool,
}

/// The complete analysis returned to the caller.
///
/// Invariant: `readability_score` and `metrics.readability_score` agree;
/// [`crate::merge`] is the single point that reconciles them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub metrics: TextMetrics,
    pub issues: Vec<Issue>,
    /// Bullet-formatted summary.
    pub summary: String,
    pub readability_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<crate::client::RequestDiagnostics>,
}

/// A prioritized editorial style rule, owned by the admin collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guideline {
    pub id: String,
    pub name: String,
    pub content: String,
    /// 1–10; higher priority guidelines are rendered first in the prompt.
    pub priority: u8,
    pub created_at: DateTime<Utc>,
}

/// A reference "good example" article, filtered by language and category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBaseArticle {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub language: Language,
    pub created_at: DateTime<Utc>,
}

/// A versioned prompt template. Exactly one is active at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemPrompt {
    pub id: String,
    pub content: String,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// The persisted admin dataset, stored as a single JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminData {
    pub guidelines: Vec<Guideline>,
    pub knowledge_base: Vec<KnowledgeBaseArticle>,
    pub system_prompts: Vec<SystemPrompt>,
    pub active_prompt_id: Option<String>,
}
