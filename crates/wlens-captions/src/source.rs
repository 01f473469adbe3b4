//! Caption source seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use wlens_models::VideoId;

use crate::error::CaptionResult;

/// Result of one caption extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionCapture {
    /// Timestamped transcript text, one `[HH:MM:SS] line` per caption cue
    pub transcript: String,

    /// Wall-clock cost of the extraction in milliseconds
    pub elapsed_time_ms: u64,
}

/// Anything that can produce captions for a video id.
///
/// The engine treats a failed fetch as "captions absent" for that video;
/// errors never travel past the caption flow. Implementations may take
/// seconds and are never cancelled mid-flight — stale results are discarded
/// by the caller instead.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    async fn fetch(&self, video_id: &VideoId) -> CaptionResult<CaptionCapture>;
}
