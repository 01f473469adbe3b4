//! Simulated watch session.
//!
//! Drives the engine with scripted collaborators instead of a live page: a
//! location that navigates between two videos, a clock that advances once
//! a second, and canned caption/analysis backends. Prints the active event
//! as the playhead moves.
//!
//! Run with: cargo run -p wlens-engine --example watch_session_demo

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wlens_analysis::{
    AnalysisProvider, AnalysisResult, QuestionRequest, VideoAnalysisRequest,
};
use wlens_captions::{CaptionCapture, CaptionResult, CaptionSource};
use wlens_engine::{EngineConfig, LocationSource, MediaClock, WatchContext, WatchSession};
use wlens_models::{QuestionAnswer, VideoAnalysis, VideoEvent, VideoId};

struct DemoLocation {
    url: Mutex<Option<String>>,
}

impl DemoLocation {
    fn navigate(&self, url: &str) {
        *self.url.lock().unwrap() = Some(url.to_string());
    }
}

impl LocationSource for DemoLocation {
    fn current_url(&self) -> Option<String> {
        self.url.lock().unwrap().clone()
    }
}

struct DemoClock {
    position: Mutex<f64>,
}

impl DemoClock {
    fn advance(&self, seconds: f64) {
        *self.position.lock().unwrap() += seconds;
    }
}

impl MediaClock for DemoClock {
    fn position_secs(&self) -> Option<f64> {
        Some(*self.position.lock().unwrap())
    }

    fn duration_secs(&self) -> Option<f64> {
        Some(120.0)
    }
}

struct DemoCaptions;

#[async_trait]
impl CaptionSource for DemoCaptions {
    async fn fetch(&self, video_id: &VideoId) -> CaptionResult<CaptionCapture> {
        Ok(CaptionCapture {
            transcript: format!(
                "[00:00:00] welcome to {id}\n[00:00:30] the main content\n[00:01:00] wrapping up\n",
                id = video_id
            ),
            elapsed_time_ms: 12,
        })
    }
}

struct DemoProvider;

#[async_trait]
impl AnalysisProvider for DemoProvider {
    async fn analyze_video(&self, request: &VideoAnalysisRequest) -> AnalysisResult<VideoAnalysis> {
        Ok(VideoAnalysis::new(
            request.video_id.clone(),
            "A three-part walkthrough.",
            vec!["the main content is in the middle".to_string()],
            vec![
                VideoEvent::new("Welcome", "Opening remarks", 0.0),
                VideoEvent::new("Main content", "The heart of the video", 30.0),
                VideoEvent::new("Wrap-up", "Closing thoughts", 60.0),
            ],
            "demo-provider",
        ))
    }

    async fn answer_question(&self, request: &QuestionRequest) -> AnalysisResult<QuestionAnswer> {
        Ok(QuestionAnswer::new(
            request.video_id.clone(),
            request.question.clone(),
            "The main content starts at [Main content](30).",
            vec![],
            "demo-provider",
        ))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let location = Arc::new(DemoLocation {
        url: Mutex::new(None),
    });
    let clock = Arc::new(DemoClock {
        position: Mutex::new(0.0),
    });

    let config = EngineConfig {
        nav_poll_interval: Duration::from_millis(200),
        playhead_poll_interval: Duration::from_millis(200),
        settle_delay: Duration::from_millis(50),
        ..EngineConfig::default()
    };
    let session = WatchSession::start(
        Arc::clone(&location) as Arc<dyn LocationSource>,
        Arc::clone(&clock) as Arc<dyn MediaClock>,
        Arc::new(DemoCaptions),
        Arc::new(DemoProvider),
        config,
    );
    let hub = session.hub();

    location.navigate("https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    tokio::time::sleep(Duration::from_millis(500)).await;

    let analysis = session.analyze(WatchContext::default()).await?;
    info!(summary = %analysis.summary, events = analysis.events.len(), "Analysis installed");

    let mut active_rx = hub.watch_active_event();
    let mut last_label = String::new();
    for _ in 0..16 {
        clock.advance(5.0);
        tokio::time::sleep(Duration::from_millis(250)).await;

        let label = active_rx
            .borrow_and_update()
            .as_ref()
            .map(|e| e.label())
            .unwrap_or_else(|| "(before first event)".to_string());
        if label != last_label {
            let position = hub.current_position().unwrap_or_default();
            println!("t={position:6.1}s  active: {label}");
            last_label = label;
        }
    }

    let answer = session
        .ask("Where is the main content?", WatchContext::default())
        .await?;
    println!("Q: Where is the main content?");
    println!("A: {}", answer.answer);

    session.shutdown();
    Ok(())
}
