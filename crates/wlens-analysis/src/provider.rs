//! Provider seam between the engine and LLM backends.

use async_trait::async_trait;

use wlens_models::{QuestionAnswer, VideoAnalysis, VideoId};

use crate::error::AnalysisResult;

/// Context handed to the provider for a full video analysis.
#[derive(Debug, Clone)]
pub struct VideoAnalysisRequest {
    pub video_id: VideoId,
    /// Timestamped transcript text, one `[HH:MM:SS] line` per row.
    pub transcript: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl VideoAnalysisRequest {
    pub fn new(video_id: VideoId, transcript: impl Into<String>) -> Self {
        Self {
            video_id,
            transcript: transcript.into(),
            title: None,
            description: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Context handed to the provider for a free-form question.
#[derive(Debug, Clone)]
pub struct QuestionRequest {
    pub video_id: VideoId,
    pub transcript: String,
    pub question: String,
    pub title: Option<String>,
}

impl QuestionRequest {
    pub fn new(video_id: VideoId, transcript: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            video_id,
            transcript: transcript.into(),
            question: question.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// An LLM-backed analysis backend.
///
/// The two operations return distinct result shapes. No timeout is imposed
/// at this seam; a call stays pending for as long as the backend takes,
/// and failures are reported once to the caller without retries.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Produce a summary, key points, and timed events for a video.
    async fn analyze_video(&self, request: &VideoAnalysisRequest) -> AnalysisResult<VideoAnalysis>;

    /// Answer a free-form question about a video.
    async fn answer_question(&self, request: &QuestionRequest) -> AnalysisResult<QuestionAnswer>;
}
