//! Engine error types.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by session-level triggers.
///
/// Polling and caption extraction failures are absorbed inside their loops
/// and never reach consumers; only explicitly triggered operations report
/// errors, exactly once, to whoever invoked them.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No video is currently active")]
    NoActiveVideo,

    #[error("Captions are not available for the current video")]
    CaptionsUnavailable,

    #[error("Analysis failed: {0}")]
    Analysis(#[from] wlens_analysis::AnalysisError),
}
