//! Timeline event models.

use serde::{Deserialize, Serialize};

use crate::timestamp::format_seconds;

/// An analysis-derived event on a video's timeline.
///
/// Events are immutable values: `duration` is derived from neighboring
/// events (or the total video duration) by the timeline, never taken from
/// the analysis provider. Recomputation produces a new event rather than
/// mutating in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoEvent {
    /// Short label
    pub name: String,

    /// Free-text description
    pub description: String,

    /// Start position, seconds from video start
    pub timestamp: f64,

    /// Window length in seconds, until the next event or video end
    #[serde(default)]
    pub duration: f64,
}

impl VideoEvent {
    /// Create a new event with an unset (zero) duration.
    pub fn new(name: impl Into<String>, description: impl Into<String>, timestamp: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            timestamp,
            duration: 0.0,
        }
    }

    /// Copy of this event with the given duration.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// End of this event's window in seconds.
    pub fn end(&self) -> f64 {
        self.timestamp + self.duration
    }

    /// Display label like `[00:01:30] Chapter two`.
    pub fn label(&self) -> String {
        format!("[{}] {}", format_seconds(self.timestamp), self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_event_has_zero_duration() {
        let event = VideoEvent::new("Intro", "Opening remarks", 0.0);
        assert_eq!(event.duration, 0.0);
        assert_eq!(event.end(), 0.0);
    }

    #[test]
    fn test_with_duration_produces_new_value() {
        let event = VideoEvent::new("Intro", "Opening remarks", 10.0);
        let sized = event.clone().with_duration(50.0);
        assert_eq!(event.duration, 0.0);
        assert_eq!(sized.duration, 50.0);
        assert_eq!(sized.end(), 60.0);
    }

    #[test]
    fn test_label() {
        let event = VideoEvent::new("Chapter two", "", 90.0);
        assert_eq!(event.label(), "[00:01:30] Chapter two");
    }
}
