//! Watch session orchestration.
//!
//! `WatchSession` wires the collaborators around a shared [`StateHub`] and
//! owns every spawned loop: the navigation monitor, the per-video playhead
//! tracker, and a react loop that responds to video changes by managing
//! the tracker lifecycle and the caption flow (cache lookup, background
//! extraction, guarded commit).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use wlens_analysis::{AnalysisProvider, QuestionRequest, VideoAnalysisRequest};
use wlens_captions::{CaptionCache, CaptionCapture, CaptionSource};
use wlens_models::{QuestionAnswer, VideoAnalysis, VideoId};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::hub::StateHub;
use crate::navigation::{LocationSource, NavigationMonitor};
use crate::playhead::{MediaClock, PlayheadTracker};
use crate::timeline::EventTimeline;
use crate::visibility::Visibility;

/// Optional page context forwarded to the analysis provider.
#[derive(Debug, Clone, Default)]
pub struct WatchContext {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// A running engine instance.
///
/// The spawned loops stop on [`WatchSession::shutdown`]; dropping the
/// session closes its control channels, which stops them as well.
pub struct WatchSession {
    hub: Arc<StateHub>,
    provider: Arc<dyn AnalysisProvider>,
    clock: Arc<dyn MediaClock>,
    visibility: watch::Sender<Visibility>,
    shutdown: watch::Sender<bool>,
}

impl WatchSession {
    /// Build a session and start its loops. Must be called from within a
    /// Tokio runtime.
    pub fn start(
        location: Arc<dyn LocationSource>,
        clock: Arc<dyn MediaClock>,
        captions: Arc<dyn CaptionSource>,
        provider: Arc<dyn AnalysisProvider>,
        config: EngineConfig,
    ) -> Self {
        let hub = Arc::new(StateHub::new());
        let (visibility_tx, visibility_rx) = watch::channel(Visibility::Visible);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(
            nav_poll_ms = config.nav_poll_interval.as_millis() as u64,
            playhead_poll_ms = config.playhead_poll_interval.as_millis() as u64,
            cache_capacity = config.caption_cache_capacity,
            "Starting watch session"
        );

        let react = ReactLoop {
            hub: Arc::clone(&hub),
            captions,
            clock: Arc::clone(&clock),
            cache: CaptionCache::new(config.caption_cache_capacity),
            // Subscribed before the monitor spawns, so an id published on
            // its first immediate tick is still seen as a change.
            video_rx: hub.watch_video_id(),
            visibility: visibility_rx.clone(),
            shutdown: shutdown_rx.clone(),
            settle_delay: config.settle_delay,
            playhead_poll_interval: config.playhead_poll_interval,
            tracker: None,
        };
        tokio::spawn(react.run());

        let monitor = NavigationMonitor::new(location, Arc::clone(&hub));
        tokio::spawn(monitor.run(config.nav_poll_interval, visibility_rx, shutdown_rx));

        Self {
            hub,
            provider,
            clock,
            visibility: visibility_tx,
            shutdown: shutdown_tx,
        }
    }

    /// The shared state hub, for subscriptions and snapshots.
    pub fn hub(&self) -> Arc<StateHub> {
        Arc::clone(&self.hub)
    }

    /// Host-driven tab visibility signal. Hidden suspends both polling
    /// loops and clears the published position.
    pub fn set_visibility(&self, visibility: Visibility) {
        self.visibility.send_if_modified(|current| {
            if *current == visibility {
                false
            } else {
                *current = visibility;
                true
            }
        });
    }

    /// Run a full analysis of the current video and install its events on
    /// the timeline.
    ///
    /// Requires a current video with extracted captions. Provider failures
    /// surface here once and leave previously published state untouched. A
    /// result that arrives after navigating away is returned to the caller
    /// but not installed.
    pub async fn analyze(&self, context: WatchContext) -> EngineResult<VideoAnalysis> {
        let video_id = self
            .hub
            .current_video_id()
            .ok_or(EngineError::NoActiveVideo)?;
        let captions = self
            .hub
            .current_captions()
            .ok_or(EngineError::CaptionsUnavailable)?;

        let mut request = VideoAnalysisRequest::new(video_id.clone(), captions.as_ref());
        request.title = context.title;
        request.description = context.description;

        let analysis = self.provider.analyze_video(&request).await?;

        let total = self
            .hub
            .current_timeline()
            .total_duration()
            .or_else(|| self.clock.duration_secs());
        let timeline = EventTimeline::new(analysis.events.clone(), total);
        if self.hub.install_timeline_if_current(&video_id, timeline) {
            info!(
                video_id = %video_id,
                events = analysis.events.len(),
                "Installed analysis events"
            );
        } else {
            debug!(
                video_id = %video_id,
                "Analysis finished after navigation away, not installing"
            );
        }

        Ok(analysis)
    }

    /// Ask a free-form question about the current video.
    pub async fn ask(
        &self,
        question: impl Into<String>,
        context: WatchContext,
    ) -> EngineResult<QuestionAnswer> {
        let video_id = self
            .hub
            .current_video_id()
            .ok_or(EngineError::NoActiveVideo)?;
        let captions = self
            .hub
            .current_captions()
            .ok_or(EngineError::CaptionsUnavailable)?;

        let mut request = QuestionRequest::new(video_id, captions.as_ref(), question);
        request.title = context.title;

        let answer = self.provider.answer_question(&request).await?;
        Ok(answer)
    }

    /// Stop every loop owned by the session.
    pub fn shutdown(&self) {
        info!("Watch session shutting down");
        let _ = self.shutdown.send(true);
    }
}

struct TrackerHandle {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Reacts to video id changes: tracker lifecycle and caption flow.
///
/// The loop is the only writer of the caption cache and the only spawner
/// of extraction tasks, so all commits funnel through one place and go
/// through the hub's staleness guard.
struct ReactLoop {
    hub: Arc<StateHub>,
    captions: Arc<dyn CaptionSource>,
    clock: Arc<dyn MediaClock>,
    cache: CaptionCache,
    video_rx: watch::Receiver<Option<VideoId>>,
    visibility: watch::Receiver<Visibility>,
    shutdown: watch::Receiver<bool>,
    settle_delay: Duration,
    playhead_poll_interval: Duration,
    tracker: Option<TrackerHandle>,
}

impl ReactLoop {
    async fn run(mut self) {
        let (results_tx, mut results_rx) = mpsc::unbounded_channel::<(VideoId, CaptionCapture)>();

        loop {
            tokio::select! {
                changed = self.shutdown.changed() => {
                    // A closed channel means the session is gone.
                    if changed.is_err() || *self.shutdown.borrow() {
                        self.stop_tracker().await;
                        debug!("React loop stopping");
                        break;
                    }
                }
                changed = self.video_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let id = self.video_rx.borrow_and_update().clone();
                    self.handle_navigation(id, &results_tx).await;
                }
                Some((video_id, capture)) = results_rx.recv() => {
                    self.commit_captions(video_id, capture);
                }
            }
        }
    }

    async fn handle_navigation(
        &mut self,
        id: Option<VideoId>,
        results_tx: &mpsc::UnboundedSender<(VideoId, CaptionCapture)>,
    ) {
        self.stop_tracker().await;

        // The hub has already cleared per-video state on a change to None.
        let Some(id) = id else { return };

        if let Some(cached) = self.cache.lookup(&id) {
            debug!(video_id = %id, "Caption cache hit");
            self.hub.publish_captions(&id, cached);
        } else {
            let captions = Arc::clone(&self.captions);
            let tx = results_tx.clone();
            let settle_delay = self.settle_delay;
            let video_id = id.clone();
            tokio::spawn(async move {
                if !settle_delay.is_zero() {
                    tokio::time::sleep(settle_delay).await;
                }
                match captions.fetch(&video_id).await {
                    Ok(capture) => {
                        let _ = tx.send((video_id, capture));
                    }
                    Err(e) => {
                        // Captions simply stay absent for this video.
                        warn!(video_id = %video_id, error = %e, "Caption extraction failed");
                    }
                }
            });
        }

        self.start_tracker();
    }

    /// Commit a finished extraction: cache it either way, publish it only
    /// if the video is still current.
    fn commit_captions(&mut self, video_id: VideoId, capture: CaptionCapture) {
        debug!(
            video_id = %video_id,
            elapsed_time_ms = capture.elapsed_time_ms,
            "Caption extraction finished"
        );
        let text: Arc<str> = capture.transcript.into();
        self.cache.insert(video_id.clone(), Arc::clone(&text));
        if !self.hub.publish_captions(&video_id, text) {
            debug!(video_id = %video_id, "Extraction finished after navigation away");
        }
    }

    fn start_tracker(&mut self) {
        let (stop_tx, stop_rx) = watch::channel(false);
        let tracker = PlayheadTracker::new(Arc::clone(&self.clock), Arc::clone(&self.hub));
        let handle = tokio::spawn(tracker.run(
            self.playhead_poll_interval,
            self.visibility.clone(),
            stop_rx,
        ));
        self.tracker = Some(TrackerHandle {
            stop: stop_tx,
            handle,
        });
    }

    async fn stop_tracker(&mut self) {
        if let Some(tracker) = self.tracker.take() {
            let _ = tracker.stop.send(true);
            let _ = tracker.handle.await;
        }
    }
}
