//! Navigation monitoring.
//!
//! YouTube rewrites the URL without full page loads, so the monitor polls
//! the page location on a short interval and publishes the extracted video
//! id whenever it changes. Landing on a non-watch page publishes `None`;
//! a URL that cannot be interpreted is treated the same way, never as an
//! error. Polling suspends while the tab is hidden and re-checks
//! immediately when it becomes visible again.

use std::sync::Arc;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use wlens_models::{extract_video_id, VideoId};

use crate::hub::StateHub;
use crate::visibility::Visibility;

/// Source of the page's current location URL.
#[cfg_attr(test, automock)]
pub trait LocationSource: Send + Sync {
    /// The effective URL at the time of the check, or `None` when no
    /// location is available.
    fn current_url(&self) -> Option<String>;
}

/// Polls the location source and publishes video id changes to the hub.
pub(crate) struct NavigationMonitor {
    location: Arc<dyn LocationSource>,
    hub: Arc<StateHub>,
    last_id: Option<VideoId>,
}

impl NavigationMonitor {
    pub(crate) fn new(location: Arc<dyn LocationSource>, hub: Arc<StateHub>) -> Self {
        Self {
            location,
            hub,
            last_id: None,
        }
    }

    /// One navigation check.
    fn poll(&mut self) {
        let id = self
            .location
            .current_url()
            .as_deref()
            .and_then(extract_video_id);

        if id != self.last_id {
            info!(from = ?self.last_id, to = ?id, "Navigation detected");
            self.last_id = id.clone();
            self.hub.set_video_id(id);
        }
    }

    /// Run the polling loop until shutdown.
    pub(crate) async fn run(
        mut self,
        interval: Duration,
        mut visibility: watch::Receiver<Visibility>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    // A closed channel means the session is gone.
                    if result.is_err() || *shutdown.borrow() {
                        debug!("Navigation monitor stopping");
                        break;
                    }
                }
                result = visibility.changed() => {
                    if result.is_err() {
                        break;
                    }
                    // A navigation may have happened while hidden, so
                    // re-check as soon as the tab is visible again.
                    if visibility.borrow_and_update().is_visible() {
                        self.poll();
                    }
                }
                _ = ticker.tick() => {
                    if visibility.borrow().is_visible() {
                        self.poll();
                    }
                }
            }
        }
    }
}
