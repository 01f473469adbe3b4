//! Caption error types.

use thiserror::Error;

/// Result type for caption operations.
pub type CaptionResult<T> = Result<T, CaptionError>;

/// Errors that can occur while retrieving captions.
#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("No captions available: {0}")]
    NoCaptions(String),

    #[error("Caption fetch failed: {0}")]
    FetchFailed(String),

    #[error("Extraction tool missing: {0}")]
    ToolMissing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CaptionError {
    pub fn no_captions(msg: impl Into<String>) -> Self {
        Self::NoCaptions(msg.into())
    }

    pub fn fetch_failed(msg: impl Into<String>) -> Self {
        Self::FetchFailed(msg.into())
    }

    pub fn tool_missing(msg: impl Into<String>) -> Self {
        Self::ToolMissing(msg.into())
    }
}
