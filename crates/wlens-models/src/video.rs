//! Video identity and watch-URL extraction.
//!
//! The platform routes watch pages through two URL shapes: a query-parameter
//! style (`youtube.com/watch?v=VIDEO_ID`) and a shortened path style
//! (`youtu.be/VIDEO_ID`). Anything else is not a watch page, which is a
//! normal state rather than an error.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Identifier of a video on the watch platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Create from an existing string without validation.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch-page URL for this id.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Extract the video id from a page URL.
///
/// Recognized shapes:
/// - `https://www.youtube.com/watch?v=VIDEO_ID` (any `youtube.com` host,
///   extra query parameters and fragments ignored)
/// - `https://youtu.be/VIDEO_ID`
///
/// Returns `None` for every other URL, including non-watch pages on the
/// same domain (home, search, playlists). An unrecognized URL means "no
/// current video", never a failure.
pub fn extract_video_id(url: &str) -> Option<VideoId> {
    let parsed = Url::parse(url.trim()).ok()?;

    if let Some(id) = extract_from_watch_url(&parsed) {
        return validate(id);
    }

    if let Some(id) = extract_from_short_url(&parsed) {
        return validate(id);
    }

    None
}

/// Extract the `v` parameter from a `youtube.com/watch` URL.
fn extract_from_watch_url(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    if host != "youtube.com" && !host.ends_with(".youtube.com") {
        return None;
    }
    if url.path() != "/watch" {
        return None;
    }

    url.query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
}

/// Extract the path segment from a `youtu.be/VIDEO_ID` URL.
fn extract_from_short_url(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    if host != "youtu.be" {
        return None;
    }

    url.path_segments()?
        .find(|segment| !segment.is_empty())
        .map(|segment| segment.to_string())
}

/// Check whether a string is a well-formed video id.
///
/// Video ids are exactly 11 characters drawn from `[A-Za-z0-9_-]`.
pub fn is_valid_video_id(s: &str) -> bool {
    s.len() == 11
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn validate(id: String) -> Option<VideoId> {
    if is_valid_video_id(&id) {
        Some(VideoId(id))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some(VideoId::from("dQw4w9WgXcQ"))
        );

        // Without www prefix
        assert_eq!(
            extract_video_id("https://youtube.com/watch?v=dQw4w9WgXcQ"),
            Some(VideoId::from("dQw4w9WgXcQ"))
        );

        // Mobile host
        assert_eq!(
            extract_video_id("https://m.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some(VideoId::from("dQw4w9WgXcQ"))
        );

        // Extra query parameters
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PLrAXtmRdnEQy&t=30s"),
            Some(VideoId::from("dQw4w9WgXcQ"))
        );

        // v is not the first parameter
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?app=desktop&v=dQw4w9WgXcQ"),
            Some(VideoId::from("dQw4w9WgXcQ"))
        );

        // Fragment ignored
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ#t=1m"),
            Some(VideoId::from("dQw4w9WgXcQ"))
        );
    }

    #[test]
    fn test_extract_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some(VideoId::from("dQw4w9WgXcQ"))
        );

        // With query parameters
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?t=30"),
            Some(VideoId::from("dQw4w9WgXcQ"))
        );

        // Underscores and hyphens in id
        assert_eq!(
            extract_video_id("https://youtu.be/a-b_c-d_e-f"),
            Some(VideoId::from("a-b_c-d_e-f"))
        );
    }

    #[test]
    fn test_extract_non_watch_pages() {
        // Home page
        assert_eq!(extract_video_id("https://www.youtube.com/"), None);

        // Search results
        assert_eq!(
            extract_video_id("https://www.youtube.com/results?search_query=rust"),
            None
        );

        // Playlist page
        assert_eq!(
            extract_video_id("https://www.youtube.com/playlist?list=PLrAXtmRdnEQy"),
            None
        );

        // Channel page
        assert_eq!(extract_video_id("https://www.youtube.com/@somechannel"), None);

        // Watch path without a v parameter
        assert_eq!(extract_video_id("https://www.youtube.com/watch?list=PL123"), None);

        // Empty short path
        assert_eq!(extract_video_id("https://youtu.be/"), None);
    }

    #[test]
    fn test_extract_foreign_and_malformed_urls() {
        assert_eq!(extract_video_id("https://example.com/watch?v=dQw4w9WgXcQ"), None);
        assert_eq!(extract_video_id("https://vimeo.com/123456789"), None);
        assert_eq!(extract_video_id("not a url"), None);
        assert_eq!(extract_video_id(""), None);

        // Hostile lookalike domain must not match
        assert_eq!(
            extract_video_id("https://notyoutube.com/watch?v=dQw4w9WgXcQ"),
            None
        );
    }

    #[test]
    fn test_extract_invalid_ids() {
        // Too short
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=abc123"), None);

        // Too long
        assert_eq!(extract_video_id("https://youtu.be/abc123def456789"), None);

        // Invalid characters
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=abc123def!!"),
            None
        );

        // Empty id
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v="), None);
    }

    #[test]
    fn test_extract_trims_whitespace() {
        assert_eq!(
            extract_video_id("  https://www.youtube.com/watch?v=dQw4w9WgXcQ  "),
            Some(VideoId::from("dQw4w9WgXcQ"))
        );
    }

    #[test]
    fn test_is_valid_video_id() {
        assert!(is_valid_video_id("dQw4w9WgXcQ"));
        assert!(is_valid_video_id("a-b_c-d_e-f"));
        assert!(!is_valid_video_id("short"));
        assert!(!is_valid_video_id("waytoolongtobeanid"));
        assert!(!is_valid_video_id("has spaces!"));
    }

    #[test]
    fn test_watch_url_round_trip() {
        let id = VideoId::from("dQw4w9WgXcQ");
        assert_eq!(extract_video_id(&id.watch_url()), Some(id));
    }

    #[test]
    fn test_video_id_serde_transparent() {
        let id = VideoId::from("dQw4w9WgXcQ");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"dQw4w9WgXcQ\"");
    }
}
