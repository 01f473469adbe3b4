//! Analysis result models.
//!
//! The provider returns one of two tagged shapes: a full video analysis or a
//! free-form question answer. They are distinct types so callers handle each
//! exhaustively instead of probing optional fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::VideoEvent;
use crate::video::VideoId;

/// Structured result of a full video analysis.
///
/// `events` feeds the timeline; `summary` and `key_points` are opaque
/// pass-through data for the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoAnalysis {
    /// Video the analysis belongs to
    pub video_id: VideoId,

    /// Prose summary of the video
    pub summary: String,

    /// Bullet-point takeaways
    #[serde(default)]
    pub key_points: Vec<String>,

    /// Timed events, timestamps in seconds from video start
    #[serde(default)]
    pub events: Vec<VideoEvent>,

    /// Model that produced the analysis
    pub model: String,

    /// When the analysis completed
    pub analyzed_at: DateTime<Utc>,
}

impl VideoAnalysis {
    /// Create a new analysis result stamped with the current time.
    pub fn new(
        video_id: VideoId,
        summary: impl Into<String>,
        key_points: Vec<String>,
        events: Vec<VideoEvent>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            video_id,
            summary: summary.into(),
            key_points,
            events,
            model: model.into(),
            analyzed_at: Utc::now(),
        }
    }
}

/// Answer to a free-form question about a video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionAnswer {
    /// Video the question was asked about
    pub video_id: VideoId,

    /// The question as asked
    pub question: String,

    /// Answer text; may embed `[label](seconds)` timestamp references
    pub answer: String,

    /// Timestamp references extracted from the answer text
    #[serde(default)]
    pub references: Vec<AnswerReference>,

    /// Model that produced the answer
    pub model: String,

    /// When the answer completed
    pub answered_at: DateTime<Utc>,
}

impl QuestionAnswer {
    /// Create a new answer stamped with the current time.
    pub fn new(
        video_id: VideoId,
        question: impl Into<String>,
        answer: impl Into<String>,
        references: Vec<AnswerReference>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            video_id,
            question: question.into(),
            answer: answer.into(),
            references,
            model: model.into(),
            answered_at: Utc::now(),
        }
    }
}

/// A `[label](seconds)` timestamp reference inside an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerReference {
    /// Link text
    pub label: String,

    /// Position the reference points at, seconds from video start
    pub seconds: f64,
}
