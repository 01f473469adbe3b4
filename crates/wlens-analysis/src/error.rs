//! Error types for the analysis layer.

use thiserror::Error;

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors surfaced by analysis providers.
///
/// A failed call surfaces exactly one of these to the caller that
/// triggered it; callers decide whether to retry.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Provider configuration error: {0}")]
    Config(String),

    #[error("Transcript is empty, nothing to analyze")]
    EmptyTranscript,

    #[error("Provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed provider output: {0}")]
    MalformedResponse(String),
}

impl AnalysisError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }
}
