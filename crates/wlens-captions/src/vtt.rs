//! WebVTT subtitle parsing.
//!
//! Converts VTT caption files into the timestamped transcript shape the
//! analysis provider consumes: one `[HH:MM:SS] text` line per cue, with
//! rolling-caption duplicates collapsed.

use regex::Regex;

/// Parse VTT content into a timestamped transcript.
pub fn parse_vtt(content: &str) -> String {
    let ts_pattern = Regex::new(r"((?:\d{2}:)?\d{2}:\d{2}\.\d{3}) -->.*").unwrap();
    let tag_pattern = Regex::new(r"<[^>]+>").unwrap();

    let mut transcript = String::new();
    let mut current_ts = "00:00:00".to_string();
    let mut buffer_text = String::new();

    for line in content.lines() {
        let mut line = line.trim().to_string();

        // Remove tags
        line = tag_pattern.replace_all(&line, "").to_string();

        if line.is_empty() || line == "WEBVTT" {
            continue;
        }

        // Check for timestamp
        if let Some(caps) = ts_pattern.captures(&line) {
            let mut ts = caps[1].to_string();
            // Normalize to HH:MM:SS
            if ts.split(':').count() == 2 {
                ts = format!("00:{}", ts);
            }
            current_ts = ts.split('.').next().unwrap_or(&ts).to_string();
            continue;
        }

        // Skip cue numbers
        if line.chars().all(|c| c.is_numeric()) {
            continue;
        }

        // De-duplicate rolling captions
        if line != buffer_text && !line.is_empty() {
            transcript.push_str(&format!("[{}] {}\n", current_ts, line));
            buffer_text = line;
        }
    }

    transcript
}

/// Check that a transcript carries `[HH:MM:SS]` markers.
pub fn transcript_has_timestamps(transcript: &str) -> bool {
    transcript
        .lines()
        .any(|line| line.starts_with('[') && line.contains("] "))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_VTT: &str = "\
WEBVTT

1
00:00:01.000 --> 00:00:04.000
Hello and welcome back

2
00:00:04.000 --> 00:00:07.500
Hello and welcome back
to the channel

3
00:01:30.000 --> 00:01:33.000
<c.yellow>Today</c> we talk about caching
";

    #[test]
    fn test_parse_vtt_emits_timestamped_lines() {
        let transcript = parse_vtt(SAMPLE_VTT);
        let lines: Vec<&str> = transcript.lines().collect();

        assert_eq!(lines[0], "[00:00:01] Hello and welcome back");
        assert!(lines.contains(&"[00:00:04] to the channel"));
        assert!(lines.contains(&"[00:01:30] Today we talk about caching"));
    }

    #[test]
    fn test_parse_vtt_deduplicates_rolling_captions() {
        let transcript = parse_vtt(SAMPLE_VTT);
        let repeats = transcript
            .lines()
            .filter(|l| l.ends_with("Hello and welcome back"))
            .count();
        assert_eq!(repeats, 1);
    }

    #[test]
    fn test_parse_vtt_normalizes_short_timestamps() {
        let vtt = "WEBVTT\n\n05:30.000 --> 05:33.000\nshort form cue\n";
        let transcript = parse_vtt(vtt);
        assert_eq!(transcript.trim(), "[00:05:30] short form cue");
    }

    #[test]
    fn test_parse_vtt_empty_input() {
        assert_eq!(parse_vtt(""), "");
        assert_eq!(parse_vtt("WEBVTT\n"), "");
    }

    #[test]
    fn test_transcript_has_timestamps() {
        assert!(transcript_has_timestamps("[00:00:01] hello"));
        assert!(!transcript_has_timestamps("hello without markers"));
        assert!(!transcript_has_timestamps(""));
    }
}
