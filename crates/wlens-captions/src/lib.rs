//! Caption retrieval and caching for WatchLens.
//!
//! This crate owns the caption concern end to end:
//! - the `CaptionSource` seam the engine fetches through
//! - the bounded insertion-order `CaptionCache`
//! - WebVTT parsing into timestamped transcript lines
//! - a `yt-dlp`-backed source for use outside a browser

pub mod cache;
pub mod error;
pub mod source;
pub mod vtt;
pub mod ytdlp;

// Re-export common types
pub use cache::{CaptionCache, DEFAULT_CAPTION_CACHE_CAPACITY};
pub use error::{CaptionError, CaptionResult};
pub use source::{CaptionCapture, CaptionSource};
pub use vtt::{parse_vtt, transcript_has_timestamps};
pub use ytdlp::YtDlpCaptionSource;
