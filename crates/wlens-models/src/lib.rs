//! Shared data models for WatchLens.
//!
//! This crate provides Serde-serializable types for:
//! - Video identity and watch-URL extraction
//! - Timeline events derived from analysis
//! - Analysis and question-answer results
//! - Timestamp parsing and formatting

pub mod analysis;
pub mod event;
pub mod timestamp;
pub mod video;

// Re-export common types
pub use analysis::{AnswerReference, QuestionAnswer, VideoAnalysis};
pub use event::VideoEvent;
pub use timestamp::{format_seconds, parse_timestamp, TimestampError};
pub use video::{extract_video_id, is_valid_video_id, VideoId};
