//! Event timeline and active-event resolution.

use serde::{Deserialize, Serialize};

use wlens_models::VideoEvent;

/// Ordered sequence of timed events with derived durations.
///
/// A timeline is an immutable value: installing events or learning the
/// total video duration builds a new timeline instead of mutating this
/// one. Construction sorts events by timestamp (stable, so events sharing
/// a timestamp keep their install order) and derives every duration: an
/// event lasts until the next one starts, and the last event lasts until
/// the end of the video when the total duration is known, else 0.
///
/// Durations are arithmetic, not sanitized. A total duration shorter than
/// the last event's timestamp yields a negative duration, which consumers
/// see as reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventTimeline {
    events: Vec<VideoEvent>,
    total_duration: Option<f64>,
}

impl EventTimeline {
    /// Build a timeline from raw events, sorting and deriving durations.
    pub fn new(events: Vec<VideoEvent>, total_duration: Option<f64>) -> Self {
        let mut events = events;
        events.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

        let starts: Vec<f64> = events.iter().map(|e| e.timestamp).collect();
        let count = events.len();
        let events = events
            .into_iter()
            .enumerate()
            .map(|(i, event)| {
                let duration = if i + 1 < count {
                    starts[i + 1] - starts[i]
                } else {
                    total_duration.map(|total| total - starts[i]).unwrap_or(0.0)
                };
                event.with_duration(duration)
            })
            .collect();

        Self {
            events,
            total_duration,
        }
    }

    /// Empty timeline with no known total duration.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rebuild with a total video duration, updating the last event's
    /// window.
    pub fn with_total_duration(&self, total_duration: f64) -> Self {
        Self::new(self.events.clone(), Some(total_duration))
    }

    /// Events in timestamp order.
    pub fn events(&self) -> &[VideoEvent] {
        &self.events
    }

    /// Total video duration, when known.
    pub fn total_duration(&self) -> Option<f64> {
        self.total_duration
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Resolve the event active at `position`: the latest event whose
    /// timestamp is at or before it.
    ///
    /// Returns `None` when the position is absent, the timeline is empty,
    /// or the position precedes every event. A position past an event's
    /// window still resolves to that event until a later one starts; ties
    /// on timestamp resolve to the event later in install order.
    pub fn resolve_active(&self, position: Option<f64>) -> Option<&VideoEvent> {
        let position = position?;
        let mut active = None;
        for event in &self.events {
            if event.timestamp <= position {
                active = Some(event);
            }
        }
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(name: &str, timestamp: f64) -> VideoEvent {
        VideoEvent::new(name, "", timestamp)
    }

    #[test]
    fn test_durations_telescope_to_total() {
        let timeline = EventTimeline::new(
            vec![
                event("a", 0.0),
                event("b", 30.0),
                event("c", 60.0),
                event("d", 90.0),
            ],
            Some(120.0),
        );

        let durations: Vec<f64> = timeline.events().iter().map(|e| e.duration).collect();
        assert_eq!(durations, vec![30.0, 30.0, 30.0, 30.0]);
        assert_eq!(durations.iter().sum::<f64>(), 120.0);
    }

    #[test]
    fn test_unsorted_install_keeps_name_timestamp_pairing() {
        let timeline = EventTimeline::new(
            vec![event("c", 60.0), event("a", 0.0), event("b", 30.0)],
            None,
        );

        let names: Vec<&str> = timeline.events().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(timeline.events()[0].timestamp, 0.0);
        assert_eq!(timeline.events()[0].duration, 30.0);
        assert_eq!(timeline.events()[1].timestamp, 30.0);
        assert_eq!(timeline.events()[2].timestamp, 60.0);
        // Unknown total: the last event gets no window.
        assert_eq!(timeline.events()[2].duration, 0.0);
    }

    #[test]
    fn test_resolve_boundaries() {
        let timeline = EventTimeline::new(
            vec![
                event("a", 0.0),
                event("b", 30.0),
                event("c", 60.0),
                event("d", 90.0),
            ],
            None,
        );

        assert_eq!(timeline.resolve_active(Some(29.0)).unwrap().timestamp, 0.0);
        assert_eq!(timeline.resolve_active(Some(30.0)).unwrap().timestamp, 30.0);
        // Past the last event's window it still resolves to the last event.
        assert_eq!(timeline.resolve_active(Some(95.0)).unwrap().timestamp, 90.0);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let timeline = EventTimeline::new(vec![event("a", 10.0), event("b", 40.0)], Some(60.0));

        let first = timeline.resolve_active(Some(45.0)).cloned();
        let second = timeline.resolve_active(Some(45.0)).cloned();
        assert_eq!(first, second);
        assert_eq!(first.unwrap().name, "b");
    }

    #[test]
    fn test_resolve_absent_cases() {
        let empty = EventTimeline::empty();
        assert!(empty.resolve_active(Some(10.0)).is_none());
        assert!(empty.resolve_active(None).is_none());

        let timeline = EventTimeline::new(vec![event("a", 10.0)], None);
        assert!(timeline.resolve_active(None).is_none());
        // Position before the first event start.
        assert!(timeline.resolve_active(Some(5.0)).is_none());
        assert!(timeline.resolve_active(Some(10.0)).is_some());
    }

    #[test]
    fn test_single_event_spans_to_total() {
        let timeline = EventTimeline::new(vec![event("only", 10.0)], Some(60.0));
        assert_eq!(timeline.events()[0].duration, 50.0);
    }

    #[test]
    fn test_total_shorter_than_last_event_yields_negative_duration() {
        let timeline = EventTimeline::new(vec![event("late", 10.0)], Some(5.0));
        assert_eq!(timeline.events()[0].duration, -5.0);
    }

    #[test]
    fn test_equal_timestamps_resolve_to_later_install_order() {
        let timeline = EventTimeline::new(
            vec![event("first", 30.0), event("second", 30.0)],
            Some(60.0),
        );

        // Stable sort keeps install order for equal timestamps.
        assert_eq!(timeline.events()[0].name, "first");
        assert_eq!(timeline.events()[1].name, "second");
        assert_eq!(timeline.events()[0].duration, 0.0);

        let active = timeline.resolve_active(Some(30.0)).unwrap();
        assert_eq!(active.name, "second");
    }

    #[test]
    fn test_with_total_duration_rebuilds_last_window() {
        let timeline = EventTimeline::new(vec![event("a", 0.0), event("b", 30.0)], None);
        assert_eq!(timeline.events()[1].duration, 0.0);

        let updated = timeline.with_total_duration(100.0);
        assert_eq!(updated.events()[1].duration, 70.0);
        assert_eq!(updated.total_duration(), Some(100.0));
        // The original is untouched.
        assert_eq!(timeline.events()[1].duration, 0.0);
    }
}
