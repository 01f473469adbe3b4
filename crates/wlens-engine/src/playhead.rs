//! Playhead tracking.
//!
//! While a video is active, the tracker reads the media clock once a
//! second and publishes the position. The tracker stops itself when the
//! page has neither a media element nor a current video, and is otherwise
//! stopped externally on navigation away or session shutdown. Every exit
//! path clears the published position.

use std::sync::Arc;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::hub::StateHub;
use crate::visibility::Visibility;

/// Read access to the page's media element clock.
#[cfg_attr(test, automock)]
pub trait MediaClock: Send + Sync {
    /// Current playback position in seconds, or `None` when no media
    /// element is available.
    fn position_secs(&self) -> Option<f64>;

    /// Total media duration in seconds, when known.
    fn duration_secs(&self) -> Option<f64>;
}

/// Polls the media clock and publishes playhead positions to the hub.
pub(crate) struct PlayheadTracker {
    clock: Arc<dyn MediaClock>,
    hub: Arc<StateHub>,
}

impl PlayheadTracker {
    pub(crate) fn new(clock: Arc<dyn MediaClock>, hub: Arc<StateHub>) -> Self {
        Self { clock, hub }
    }

    /// One clock read. Returns false when tracking should stop: no media
    /// element and no current video means there is nothing left to track.
    fn read_once(&self) -> bool {
        match self.clock.position_secs() {
            Some(position) => {
                self.hub.set_position(Some(position));
                if let Some(total) = self.clock.duration_secs() {
                    self.hub.set_total_duration(total);
                }
                true
            }
            None => {
                self.hub.set_position(None);
                if self.hub.current_video_id().is_none() {
                    debug!("No media element and no current video, playhead tracker stopping");
                    return false;
                }
                true
            }
        }
    }

    /// Run the polling loop until stopped or self-terminated.
    pub(crate) async fn run(
        self,
        interval: Duration,
        mut visibility: watch::Receiver<Visibility>,
        mut stop: watch::Receiver<bool>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                result = stop.changed() => {
                    // A closed channel means the owner is gone.
                    if result.is_err() || *stop.borrow() {
                        break;
                    }
                }
                result = visibility.changed() => {
                    if result.is_err() {
                        break;
                    }
                    if visibility.borrow_and_update().is_hidden() {
                        // The published position must not go stale while
                        // the tab is hidden.
                        self.hub.set_position(None);
                    } else if !self.read_once() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if visibility.borrow().is_hidden() {
                        continue;
                    }
                    if !self.read_once() {
                        break;
                    }
                }
            }
        }

        // Consumers never see a position for a stopped tracker.
        self.hub.set_position(None);
    }
}
