//! Reactive state hub.
//!
//! One watch channel per observable value, so consumers subscribe to
//! exactly what they care about. Writes go through crate-private setters;
//! each value has a single owning writer (navigation owns the video id,
//! the caption flow owns captions, the playhead tracker owns position) and
//! the active event is derived, never written directly.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use wlens_models::{VideoEvent, VideoId};

use crate::timeline::EventTimeline;

/// Container for the current playback state.
#[derive(Debug)]
pub struct StateHub {
    video_id: watch::Sender<Option<VideoId>>,
    captions: watch::Sender<Option<Arc<str>>>,
    position: watch::Sender<Option<f64>>,
    timeline: watch::Sender<Arc<EventTimeline>>,
    active_event: watch::Sender<Option<VideoEvent>>,
}

impl StateHub {
    pub(crate) fn new() -> Self {
        let (video_id, _) = watch::channel(None);
        let (captions, _) = watch::channel(None);
        let (position, _) = watch::channel(None);
        let (timeline, _) = watch::channel(Arc::new(EventTimeline::empty()));
        let (active_event, _) = watch::channel(None);
        Self {
            video_id,
            captions,
            position,
            timeline,
            active_event,
        }
    }

    // Subscriptions. Receivers observe changes to one value and cannot
    // write anything back.

    pub fn watch_video_id(&self) -> watch::Receiver<Option<VideoId>> {
        self.video_id.subscribe()
    }

    pub fn watch_captions(&self) -> watch::Receiver<Option<Arc<str>>> {
        self.captions.subscribe()
    }

    pub fn watch_position(&self) -> watch::Receiver<Option<f64>> {
        self.position.subscribe()
    }

    pub fn watch_timeline(&self) -> watch::Receiver<Arc<EventTimeline>> {
        self.timeline.subscribe()
    }

    pub fn watch_active_event(&self) -> watch::Receiver<Option<VideoEvent>> {
        self.active_event.subscribe()
    }

    // Snapshots of the current values.

    pub fn current_video_id(&self) -> Option<VideoId> {
        self.video_id.borrow().clone()
    }

    pub fn current_captions(&self) -> Option<Arc<str>> {
        self.captions.borrow().clone()
    }

    pub fn current_position(&self) -> Option<f64> {
        *self.position.borrow()
    }

    pub fn current_timeline(&self) -> Arc<EventTimeline> {
        self.timeline.borrow().clone()
    }

    pub fn current_active_event(&self) -> Option<VideoEvent> {
        self.active_event.borrow().clone()
    }

    // Mutation, reserved for the owning components.

    /// Publish a navigation change. When the id actually changes, every
    /// per-video value resets in the same call, so observers never see the
    /// new id paired with the previous video's captions or events.
    pub(crate) fn set_video_id(&self, video_id: Option<VideoId>) -> bool {
        let changed = self.video_id.send_if_modified(|current| {
            if *current == video_id {
                false
            } else {
                *current = video_id.clone();
                true
            }
        });

        if changed {
            debug!(video_id = ?video_id, "Current video changed");
            self.clear_captions();
            self.set_position(None);
            self.install_timeline(EventTimeline::empty());
        }
        changed
    }

    /// Publish captions extracted for `for_video`. Refused when that video
    /// is no longer current, which happens when an extraction finishes
    /// after the user has navigated on.
    pub(crate) fn publish_captions(&self, for_video: &VideoId, captions: Arc<str>) -> bool {
        // The id borrow is held across the send, so a concurrent
        // navigation cannot land between the check and the commit.
        let current = self.video_id.borrow();
        if current.as_ref() != Some(for_video) {
            debug!(
                video_id = %for_video,
                current = ?*current,
                "Discarding stale captions"
            );
            return false;
        }

        self.captions.send_if_modified(|value| {
            if value.as_deref() == Some(captions.as_ref()) {
                false
            } else {
                *value = Some(captions);
                true
            }
        });
        true
    }

    pub(crate) fn clear_captions(&self) {
        self.captions.send_if_modified(|value| value.take().is_some());
    }

    /// Publish a playhead reading and refresh the derived active event.
    pub(crate) fn set_position(&self, position: Option<f64>) {
        let changed = self.position.send_if_modified(|current| {
            if *current == position {
                false
            } else {
                *current = position;
                true
            }
        });
        if changed {
            self.refresh_active_event();
        }
    }

    /// Install a timeline for `for_video`, unless that video is no longer
    /// current. An analysis finishing after a navigation away must not
    /// pollute the next video's timeline. The id borrow is held across the
    /// install for the same reason as in [`StateHub::publish_captions`].
    pub(crate) fn install_timeline_if_current(
        &self,
        for_video: &VideoId,
        timeline: EventTimeline,
    ) -> bool {
        let current = self.video_id.borrow();
        if current.as_ref() != Some(for_video) {
            return false;
        }
        self.install_timeline(timeline);
        true
    }

    /// Install a new timeline and refresh the derived active event.
    pub(crate) fn install_timeline(&self, timeline: EventTimeline) {
        let changed = self.timeline.send_if_modified(|current| {
            if **current == timeline {
                false
            } else {
                *current = Arc::new(timeline);
                true
            }
        });
        if changed {
            self.refresh_active_event();
        }
    }

    /// Record the total video duration, updating the last event's window.
    pub(crate) fn set_total_duration(&self, total: f64) {
        let current = self.current_timeline();
        if current.total_duration() == Some(total) {
            return;
        }
        if current.is_empty() {
            // Keep the total around so an install before the next clock
            // read still derives the last event's window.
            self.install_timeline(EventTimeline::new(Vec::new(), Some(total)));
        } else {
            self.install_timeline(current.with_total_duration(total));
        }
    }

    fn refresh_active_event(&self) {
        let position = self.current_position();
        let timeline = self.current_timeline();
        let next = timeline.resolve_active(position).cloned();
        self.active_event.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wlens_models::VideoEvent;

    fn hub_with_video(id: &str) -> StateHub {
        let hub = StateHub::new();
        hub.set_video_id(Some(VideoId::from(id)));
        hub
    }

    fn timeline_a() -> EventTimeline {
        EventTimeline::new(
            vec![
                VideoEvent::new("intro", "", 0.0),
                VideoEvent::new("main", "", 30.0),
            ],
            Some(60.0),
        )
    }

    #[test]
    fn test_navigation_resets_per_video_state() {
        let hub = hub_with_video("aaaaaaaaaaa");
        assert!(hub.publish_captions(&VideoId::from("aaaaaaaaaaa"), "captions a".into()));
        hub.install_timeline(timeline_a());
        hub.set_position(Some(31.0));
        assert!(hub.current_active_event().is_some());

        hub.set_video_id(Some(VideoId::from("bbbbbbbbbbb")));

        assert_eq!(hub.current_video_id(), Some(VideoId::from("bbbbbbbbbbb")));
        assert!(hub.current_captions().is_none());
        assert!(hub.current_position().is_none());
        assert!(hub.current_timeline().is_empty());
        assert!(hub.current_active_event().is_none());
    }

    #[test]
    fn test_set_same_video_id_is_not_a_change() {
        let hub = hub_with_video("aaaaaaaaaaa");
        assert!(hub.publish_captions(&VideoId::from("aaaaaaaaaaa"), "captions a".into()));

        let changed = hub.set_video_id(Some(VideoId::from("aaaaaaaaaaa")));
        assert!(!changed);
        // Re-publishing the same id must not wipe existing state.
        assert!(hub.current_captions().is_some());
    }

    #[test]
    fn test_publish_captions_refuses_stale_video() {
        let hub = hub_with_video("bbbbbbbbbbb");

        let accepted = hub.publish_captions(&VideoId::from("aaaaaaaaaaa"), "stale captions".into());
        assert!(!accepted);
        assert!(hub.current_captions().is_none());

        let accepted = hub.publish_captions(&VideoId::from("bbbbbbbbbbb"), "fresh captions".into());
        assert!(accepted);
        assert_eq!(hub.current_captions().as_deref(), Some("fresh captions"));
    }

    #[test]
    fn test_install_for_stale_video_is_refused() {
        let hub = hub_with_video("bbbbbbbbbbb");
        hub.set_position(Some(31.0));

        let installed =
            hub.install_timeline_if_current(&VideoId::from("aaaaaaaaaaa"), timeline_a());
        assert!(!installed);
        assert!(hub.current_timeline().is_empty());
        assert!(hub.current_active_event().is_none());

        let installed =
            hub.install_timeline_if_current(&VideoId::from("bbbbbbbbbbb"), timeline_a());
        assert!(installed);
        assert_eq!(hub.current_active_event().unwrap().name, "main");
    }

    #[test]
    fn test_active_event_follows_position() {
        let hub = hub_with_video("aaaaaaaaaaa");
        hub.install_timeline(timeline_a());

        hub.set_position(Some(10.0));
        assert_eq!(hub.current_active_event().unwrap().name, "intro");

        hub.set_position(Some(45.0));
        assert_eq!(hub.current_active_event().unwrap().name, "main");

        hub.set_position(None);
        assert!(hub.current_active_event().is_none());
    }

    #[test]
    fn test_active_event_follows_timeline_install() {
        let hub = hub_with_video("aaaaaaaaaaa");
        hub.set_position(Some(45.0));
        assert!(hub.current_active_event().is_none());

        hub.install_timeline(timeline_a());
        assert_eq!(hub.current_active_event().unwrap().name, "main");

        hub.install_timeline(EventTimeline::empty());
        assert!(hub.current_active_event().is_none());
    }

    #[test]
    fn test_set_total_duration_updates_last_window() {
        let hub = hub_with_video("aaaaaaaaaaa");
        hub.install_timeline(EventTimeline::new(
            vec![VideoEvent::new("only", "", 10.0)],
            None,
        ));
        assert_eq!(hub.current_timeline().events()[0].duration, 0.0);

        hub.set_total_duration(60.0);
        assert_eq!(hub.current_timeline().events()[0].duration, 50.0);
    }

    #[test]
    fn test_set_total_duration_before_install_is_kept() {
        let hub = hub_with_video("aaaaaaaaaaa");
        hub.set_total_duration(120.0);
        assert_eq!(hub.current_timeline().total_duration(), Some(120.0));
    }

    #[test]
    fn test_watchers_only_wake_on_real_changes() {
        let hub = hub_with_video("aaaaaaaaaaa");
        let mut position_rx = hub.watch_position();
        position_rx.borrow_and_update();

        hub.set_position(Some(5.0));
        assert!(position_rx.has_changed().unwrap());
        position_rx.borrow_and_update();

        // Same value again: no wakeup.
        hub.set_position(Some(5.0));
        assert!(!position_rx.has_changed().unwrap());
    }
}
