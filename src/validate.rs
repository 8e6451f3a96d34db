//! Request validation.
//!
//! Runs before any processing; a request that fails here is rejected with
//! an invalid-request error and never retried. Settings enums are already
//! typed at this point, so only the free-form fields need checking.

use crate::error::{AnalysisError, Result};

/// Validate the text payload of any analysis-family request.
pub fn validate_text(text: &str, max_chars: usize) -> Result<()> {
    if text.trim().is_empty() {
        return Err(AnalysisError::invalid_request(
            "Text is required and must be a non-empty string",
        ));
    }

    if text.chars().count() > max_chars {
        return Err(AnalysisError::invalid_request(format!(
            "Text is too long (max {} characters)",
            max_chars
        )));
    }

    Ok(())
}

/// Validate the pre-assembled prompt of a full analysis request.
pub fn validate_prompt(prompt: &str) -> Result<()> {
    if prompt.trim().is_empty() {
        return Err(AnalysisError::invalid_request("Prompt is required"));
    }
    Ok(())
}
