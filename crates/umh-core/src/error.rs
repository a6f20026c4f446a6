//! Error types for the harvesting pipeline
//!
//! This module provides user-friendly error types with clear, actionable messages
//! that help users understand what went wrong and how to fix it.

use thiserror::Error;

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Comprehensive error type for harvest operations
///
/// All errors are designed to be user-facing with clear messages and suggestions.
#[derive(Error, Debug)]
pub enum HarvestError {
    /// HTTP transport failed (connect, DNS, timeout)
    #[error("Network request failed: {0}. Check your internet connection and the catalog URL.")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status code
    #[error("Request to '{url}' returned HTTP {status}. The catalog may be throttling or unavailable; retry later.")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Every configured attempt for one request failed
    #[error("Giving up on '{url}' after {attempts} attempts. The catalog is unreachable or persistently throttling; reduce concurrency or retry later.")]
    RetriesExhausted { url: String, attempts: u32 },

    /// Response body was not the JSON shape we expected
    #[error("Failed to parse catalog response: {0}. The API may have changed; check for a newer release.")]
    JsonParse(#[from] serde_json::Error),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your flags and UMH_* environment variables.")]
    Config(String),
}

impl HarvestError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a non-success status error
    pub fn status(url: impl Into<String>, status: reqwest::StatusCode) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    /// Create a retries-exhausted error
    pub fn retries_exhausted(url: impl Into<String>, attempts: u32) -> Self {
        Self::RetriesExhausted {
            url: url.into(),
            attempts,
        }
    }

    /// True when the error is the terminal retry outcome rather than a
    /// single failed exchange.
    pub fn is_retries_exhausted(&self) -> bool {
        matches!(self, Self::RetriesExhausted { .. })
    }
}
