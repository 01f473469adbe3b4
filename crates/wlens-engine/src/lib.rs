//! Watch-page state engine.
//!
//! Tracks a single YouTube watch context through four collaborator seams
//! (page location, media clock, caption source, analysis provider) and
//! maintains the current playback state in a reactive hub:
//!
//! - [`session::WatchSession`] wires everything together and owns the
//!   polling loops
//! - [`hub::StateHub`] holds the observable values (video id, captions,
//!   playhead position, event timeline, active event)
//! - [`timeline::EventTimeline`] derives event durations and resolves
//!   which event the playhead is currently inside
//!
//! All state flows through the hub; consumers subscribe to individual
//! values and never write.

pub mod config;
pub mod error;
pub mod hub;
pub mod navigation;
pub mod playhead;
pub mod session;
pub mod timeline;
pub mod visibility;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use hub::StateHub;
pub use navigation::LocationSource;
pub use playhead::MediaClock;
pub use session::{WatchContext, WatchSession};
pub use timeline::EventTimeline;
pub use visibility::Visibility;
