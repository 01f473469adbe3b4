//! Engine configuration.

use std::time::Duration;

/// Tunable knobs for the session loops.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How often the navigation monitor checks the page location
    pub nav_poll_interval: Duration,

    /// How often the playhead tracker reads the media clock
    pub playhead_poll_interval: Duration,

    /// Maximum number of cached caption entries
    pub caption_cache_capacity: usize,

    /// How long to wait after a navigation change before extracting
    /// captions, giving the page time to settle
    pub settle_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            nav_poll_interval: Duration::from_millis(2000),
            playhead_poll_interval: Duration::from_millis(1000),
            caption_cache_capacity: 10,
            settle_delay: Duration::from_millis(500),
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        Self {
            nav_poll_interval: Duration::from_millis(env_u64("WLENS_NAV_POLL_MS", 2000)),
            playhead_poll_interval: Duration::from_millis(env_u64("WLENS_PLAYHEAD_POLL_MS", 1000)),
            caption_cache_capacity: env_u64("WLENS_CAPTION_CACHE_CAPACITY", 10) as usize,
            settle_delay: Duration::from_millis(env_u64("WLENS_SETTLE_DELAY_MS", 500)),
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
