use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub generative: GenerativeConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub limit: LimitConfig,
}

/// Tuning constants for the local metrics engine and prompt assembly.
#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    /// Sentences with more words than this count as long/complex.
    #[serde(default = "default_long_sentence_threshold")]
    pub long_sentence_threshold: usize,
    /// Only words longer than this many chars count toward repetition.
    #[serde(default = "default_repetition_min_word_len")]
    pub repetition_min_word_len: usize,
    /// Knowledge-base excerpt budget in the assembled prompt.
    #[serde(default = "default_excerpt_max_chars")]
    pub excerpt_max_chars: usize,
    /// Hard cap on accepted input length.
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            long_sentence_threshold: default_long_sentence_threshold(),
            repetition_min_word_len: default_repetition_min_word_len(),
            excerpt_max_chars: default_excerpt_max_chars(),
            max_text_chars: default_max_text_chars(),
        }
    }
}

fn default_long_sentence_threshold() -> usize {
    25
}
fn default_repetition_min_word_len() -> usize {
    4
}
fn default_excerpt_max_chars() -> usize {
    300
}
fn default_max_text_chars() -> usize {
    50_000
}

/// One configuration of the generative service, tried in fallback order.
#[derive(Debug, Deserialize, Clone)]
pub struct ModelVariant {
    pub id: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_temperature() -> f32 {
    0.7
}
fn default_max_output_tokens() -> u32 {
    2048
}

/// Generative client settings: model fallback chain, retries, deadlines.
#[derive(Debug, Deserialize, Clone)]
pub struct GenerativeConfig {
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Ordered fallback chain, preferred model first.
    #[serde(default = "default_models")]
    pub models: Vec<ModelVariant>,
    /// Attempts per model variant.
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Hard deadline per attempt.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Wait between attempts is `backoff_base_ms × attempt_number`.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            models: default_models(),
            retries: default_retries(),
            timeout_ms: default_timeout_ms(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_models() -> Vec<ModelVariant> {
    vec![
        ModelVariant {
            id: "gemini-2.0-flash-exp".to_string(),
            temperature: 0.7,
            max_output_tokens: 2048,
        },
        ModelVariant {
            id: "gemini-1.5-flash".to_string(),
            temperature: 0.7,
            max_output_tokens: 2048,
        },
        ModelVariant {
            id: "gemini-1.5-pro".to_string(),
            temperature: 0.7,
            max_output_tokens: 2048,
        },
    ]
}

fn default_retries() -> u32 {
    2
}
fn default_timeout_ms() -> u64 {
    20_000
}
fn default_backoff_base_ms() -> u64 {
    2_000
}

/// Location of the admin dataset document.
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/admin-data.json")
}

/// Sliding-window request budget.
#[derive(Debug, Deserialize, Clone)]
pub struct LimitConfig {
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

fn default_max_requests() -> u32 {
    20
}
fn default_window_secs() -> u64 {
    60
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate_config(&config)?;

    Ok(config)
}

pub(crate) fn validate_config(config: &Config) -> Result<()> {
    if config.analysis.long_sentence_threshold == 0 {
        anyhow::bail!("analysis.long_sentence_threshold must be > 0");
    }

    if config.analysis.max_text_chars == 0 {
        anyhow::bail!("analysis.max_text_chars must be > 0");
    }

    if config.generative.models.is_empty() {
        anyhow::bail!("generative.models must list at least one model variant");
    }

    if config.generative.retries < 2 {
        anyhow::bail!("generative.retries must be >= 2");
    }

    if config.generative.timeout_ms == 0 {
        anyhow::bail!("generative.timeout_ms must be > 0");
    }

    if config.limit.max_requests == 0 {
        anyhow::bail!("limit.max_requests must be > 0");
    }

    Ok(())
}
