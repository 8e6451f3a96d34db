//! Caller-facing analysis operations.
//!
//! [`Analyzer`] wires the local metrics engine, prompt assembly, generative
//! client, and result merger into the operations the routing layer exposes:
//! full analysis (with a pre-assembled prompt or via the admin store),
//! summarization, and suggestions. Requests are validated up front; after
//! that point an analysis cannot fail on account of the generative service.

use std::sync::Arc;

use tracing::info;

use crate::client::{ClientAnalysis, GenerativeClient};
use crate::config::Config;
use crate::error::{AnalysisError, Result};
use crate::generative::GenerativeBackend;
use crate::merge::merge;
use crate::metrics::compute_metrics;
use crate::models::{AnalysisResult, Language, TextSettings};
use crate::prompt::{build_prompt, validate_template};
use crate::store::AdminStore;
use crate::validate::{validate_prompt, validate_text};

/// A full analysis request with a prompt the caller assembled already.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub text: String,
    pub settings: TextSettings,
    pub prompt: String,
    /// Attach per-attempt diagnostics to the result.
    pub debug: bool,
}

/// The analysis engine facade. One instance serves many requests; all
/// per-request state lives on the stack of the call.
pub struct Analyzer {
    config: Config,
    client: GenerativeClient,
}

impl Analyzer {
    pub fn new(config: Config, backend: Arc<dyn GenerativeBackend>) -> Self {
        let client = GenerativeClient::new(backend, config.generative.clone());
        Self { config, client }
    }

    /// Full analysis with a pre-assembled prompt.
    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult> {
        validate_text(&request.text, self.config.analysis.max_text_chars)?;
        validate_prompt(&request.prompt)?;

        Ok(self
            .run_analysis(
                &request.text,
                &request.settings,
                &request.prompt,
                request.debug,
            )
            .await)
    }

    /// Full analysis that assembles the prompt from the admin store.
    ///
    /// Fails fast with a configuration error when no active prompt template
    /// exists or the active template is missing placeholders.
    pub async fn analyze_with_store(
        &self,
        store: &dyn AdminStore,
        text: &str,
        settings: &TextSettings,
        debug: bool,
    ) -> Result<AnalysisResult> {
        validate_text(text, self.config.analysis.max_text_chars)?;

        let template = store
            .active_prompt()
            .await?
            .ok_or_else(|| AnalysisError::configuration("No active prompt template configured"))?;

        let validation = validate_template(&template.content);
        if !validation.valid {
            return Err(AnalysisError::configuration(format!(
                "Active prompt template is missing placeholders: {}",
                validation.missing_placeholders.join(", ")
            )));
        }

        let guidelines = store.guidelines().await?;
        let knowledge_base = store.knowledge_base().await?;

        let prompt = build_prompt(
            text,
            settings,
            &guidelines,
            &knowledge_base,
            &template.content,
            self.config.analysis.excerpt_max_chars,
        );

        Ok(self.run_analysis(text, settings, &prompt, debug).await)
    }

    /// Summarize a text. Degrades to a placeholder, never fails past
    /// validation.
    pub async fn summarize(&self, text: &str, language: Language) -> Result<String> {
        validate_text(text, self.config.analysis.max_text_chars)?;
        Ok(self.client.summarize(text, language).await)
    }

    /// Up to five improvement suggestions. Degrades to an empty list, never
    /// fails past validation.
    pub async fn suggestions(&self, text: &str, language: Language) -> Result<Vec<String>> {
        validate_text(text, self.config.analysis.max_text_chars)?;
        Ok(self.client.suggestions(text, language).await)
    }

    async fn run_analysis(
        &self,
        text: &str,
        settings: &TextSettings,
        prompt: &str,
        debug: bool,
    ) -> AnalysisResult {
        info!(
            chars = text.chars().count(),
            language = %settings.language,
            "analyzing text"
        );

        let local_metrics = compute_metrics(text, settings.language, &self.config.analysis);

        let ClientAnalysis {
            analysis,
            degraded,
            diagnostics,
        } = self
            .client
            .analyze(prompt, text, settings.language, &local_metrics, debug)
            .await;

        let mut result = merge(&local_metrics, Some(&analysis), degraded);
        result.diagnostics = diagnostics;
        result
    }
}
