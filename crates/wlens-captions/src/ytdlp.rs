//! yt-dlp caption source.
//!
//! Downloads subtitle tracks with yt-dlp (subtitles only, no media) into a
//! scratch directory and parses them into a timestamped transcript.

use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use wlens_models::VideoId;

use crate::error::{CaptionError, CaptionResult};
use crate::source::{CaptionCapture, CaptionSource};
use crate::vtt::{parse_vtt, transcript_has_timestamps};

/// Caption source backed by the yt-dlp CLI.
pub struct YtDlpCaptionSource {
    binary: String,
    sub_langs: String,
}

impl YtDlpCaptionSource {
    /// Locate yt-dlp on PATH.
    pub fn new() -> CaptionResult<Self> {
        let binary = which::which("yt-dlp")
            .map_err(|e| CaptionError::tool_missing(format!("yt-dlp not found on PATH: {}", e)))?;

        Ok(Self {
            binary: binary.to_string_lossy().into_owned(),
            sub_langs: "en,en-US,en-GB".to_string(),
        })
    }

    /// Override the preferred subtitle languages (yt-dlp `--sub-lang` value).
    pub fn with_sub_langs(mut self, langs: impl Into<String>) -> Self {
        self.sub_langs = langs.into();
        self
    }

    async fn download_subtitles(&self, video_id: &VideoId, workdir: &Path) -> CaptionResult<String> {
        let output_template = workdir.join("%(id)s");
        let output_template_str = output_template.to_string_lossy();
        let url = video_id.watch_url();

        let args = vec![
            "--write-auto-sub",
            "--write-sub",
            "--sub-lang",
            &self.sub_langs,
            "--skip-download",
            "--sub-format",
            "vtt",
            "--no-playlist",
            "--output",
            &output_template_str,
            &url,
        ];

        let output = tokio::process::Command::new(&self.binary)
            .args(&args)
            .output()
            .await
            .map_err(|e| CaptionError::fetch_failed(format!("Failed to run yt-dlp: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CaptionError::fetch_failed(format!(
                "yt-dlp failed to download subtitles: {}",
                stderr.trim()
            )));
        }

        // Find downloaded VTT files
        let mut vtt_files: Vec<_> = std::fs::read_dir(workdir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().and_then(|s| s.to_str()) == Some("vtt"))
            .collect();

        if vtt_files.is_empty() {
            return Err(CaptionError::no_captions(
                "no subtitle track downloaded; video may not have captions",
            ));
        }

        // Prefer English subtitles
        vtt_files.sort_by_key(|entry| {
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if name_str.contains(".en") {
                0
            } else {
                1
            }
        });

        let vtt_path = vtt_files[0].path();
        debug!(path = ?vtt_path, "reading subtitle file");
        let content = tokio::fs::read_to_string(&vtt_path).await?;
        Ok(content)
    }
}

#[async_trait]
impl CaptionSource for YtDlpCaptionSource {
    async fn fetch(&self, video_id: &VideoId) -> CaptionResult<CaptionCapture> {
        let started = Instant::now();
        info!(video_id = %video_id, "fetching captions with yt-dlp");

        let workdir = tempfile::tempdir()?;
        let vtt = self.download_subtitles(video_id, workdir.path()).await?;
        let transcript = parse_vtt(&vtt);

        if transcript.trim().is_empty() {
            return Err(CaptionError::no_captions(
                "subtitle track parsed to an empty transcript",
            ));
        }

        if !transcript_has_timestamps(&transcript) {
            warn!(video_id = %video_id, "transcript is missing timestamp markers");
        }

        let elapsed_time_ms = started.elapsed().as_millis() as u64;
        debug!(
            video_id = %video_id,
            elapsed_time_ms,
            chars = transcript.len(),
            "captions extracted"
        );

        Ok(CaptionCapture {
            transcript,
            elapsed_time_ms,
        })
    }
}
