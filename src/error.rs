//! Caller-visible error taxonomy.
//!
//! Only setup defects and bad requests surface to the caller. Generative
//! service failures are absorbed inside [`crate::client`] and degrade to a
//! locally computed fallback result, so no variant exists for them here.

use thiserror::Error;

/// Errors an analysis operation can return to its caller.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The request failed validation and was rejected before any processing.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A setup defect, e.g. no active prompt template. Not retryable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The per-key request budget was exceeded.
    #[error("Too many requests, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until the current window resets.
        retry_after_secs: u64,
    },

    /// Internal failures (store I/O, serialization).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    /// Create an invalid-request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
