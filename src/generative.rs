//! Generative-text service abstraction and the Gemini implementation.
//!
//! Defines the [`GenerativeBackend`] trait and the concrete
//! [`GeminiBackend`] over the Generative Language REST API. A backend is a
//! single-shot capability: given a prompt and a model variant it returns the
//! raw response text or an error. Retry, model fallback, deadlines, and
//! response normalization all live in [`crate::client`]; backends stay dumb.
//!
//! # Error contract
//!
//! Any failure (HTTP error status, network error, empty candidate list) is
//! reported as an `anyhow` error. The caller treats every error the same:
//! log, count, retry or move on to the next model variant.

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::config::{GenerativeConfig, ModelVariant};

/// A single-shot generative text capability.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Generate text for `prompt` using the given model variant.
    async fn generate(&self, prompt: &str, model: &ModelVariant) -> Result<String>;
}

/// Backend calling the Gemini `generateContent` REST endpoint.
///
/// Requires an API key in the environment variable named by
/// `generative.api_key_env` (default `GEMINI_API_KEY`).
pub struct GeminiBackend {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
}

impl GeminiBackend {
    /// Create a backend from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key environment variable is not set.
    pub fn new(config: &GenerativeConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| anyhow::anyhow!("{} environment variable not set", config.api_key_env))?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            api_key,
            client,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        })
    }

    /// Override the API base URL (used by tests against a local server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    async fn generate(&self, prompt: &str, model: &ModelVariant) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model.id, self.api_key
        );

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": model.temperature,
                "maxOutputTokens": model.max_output_tokens,
            },
        });

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Gemini API error {}: {}", status, body_text);
        }

        let json: serde_json::Value = response.json().await?;
        parse_generate_response(&json)
    }
}

/// Extract the concatenated text parts of the first candidate.
fn parse_generate_response(json: &serde_json::Value) -> Result<String> {
    let parts = json
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid Gemini response: missing candidates"))?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.is_empty() {
        bail!("Invalid Gemini response: empty candidate text");
    }

    Ok(text)
}
