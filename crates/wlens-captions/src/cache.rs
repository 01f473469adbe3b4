//! Bounded caption cache.
//!
//! Insertion-order bounded map from video id to caption text. Once the
//! configured capacity is reached the oldest-inserted entry is evicted to
//! make room. Deliberately not an LRU: lookups do not refresh recency, and
//! re-inserting an existing id keeps its original eviction slot.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tracing::debug;

use wlens_models::VideoId;

/// Default maximum number of cached videos.
pub const DEFAULT_CAPTION_CACHE_CAPACITY: usize = 10;

/// Bounded insertion-order cache mapping video id to caption text.
///
/// Caption text can run to tens of thousands of characters, so values are
/// stored as `Arc<str>` and lookups clone the pointer, not the text.
#[derive(Debug)]
pub struct CaptionCache {
    capacity: usize,
    order: VecDeque<VideoId>,
    entries: HashMap<VideoId, Arc<str>>,
}

impl CaptionCache {
    /// Create a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            order: VecDeque::new(),
            entries: HashMap::new(),
        }
    }

    /// Look up captions for a video, without touching eviction order.
    pub fn lookup(&self, video_id: &VideoId) -> Option<Arc<str>> {
        self.entries.get(video_id).cloned()
    }

    /// Whether captions for this video are cached.
    pub fn contains(&self, video_id: &VideoId) -> bool {
        self.entries.contains_key(video_id)
    }

    /// Insert captions, evicting the oldest-inserted entry at capacity.
    pub fn insert(&mut self, video_id: VideoId, captions: impl Into<Arc<str>>) {
        let captions = captions.into();

        if let Some(existing) = self.entries.get_mut(&video_id) {
            *existing = captions;
            return;
        }

        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    debug!(video_id = %oldest, "evicting oldest cached captions");
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }

        self.order.push_back(video_id.clone());
        self.entries.insert(video_id, captions);
    }

    /// Number of cached videos.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured maximum entry count.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for CaptionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPTION_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> VideoId {
        VideoId::from(s)
    }

    #[test]
    fn test_lookup_hit_and_miss() {
        let mut cache = CaptionCache::new(4);
        cache.insert(id("aaaaaaaaaaa"), "first transcript");

        assert_eq!(cache.lookup(&id("aaaaaaaaaaa")).as_deref(), Some("first transcript"));
        assert!(cache.lookup(&id("bbbbbbbbbbb")).is_none());
    }

    #[test]
    fn test_capacity_evicts_oldest_inserted() {
        let mut cache = CaptionCache::new(3);
        cache.insert(id("aaaaaaaaaaa"), "a");
        cache.insert(id("bbbbbbbbbbb"), "b");
        cache.insert(id("ccccccccccc"), "c");
        cache.insert(id("ddddddddddd"), "d");

        assert_eq!(cache.len(), 3);
        assert!(!cache.contains(&id("aaaaaaaaaaa")));
        assert!(cache.contains(&id("bbbbbbbbbbb")));
        assert!(cache.contains(&id("ccccccccccc")));
        assert!(cache.contains(&id("ddddddddddd")));
    }

    #[test]
    fn test_lookup_does_not_refresh_recency() {
        let mut cache = CaptionCache::new(2);
        cache.insert(id("aaaaaaaaaaa"), "a");
        cache.insert(id("bbbbbbbbbbb"), "b");

        // A recent lookup must not save the oldest entry from eviction.
        assert!(cache.lookup(&id("aaaaaaaaaaa")).is_some());
        cache.insert(id("ccccccccccc"), "c");

        assert!(!cache.contains(&id("aaaaaaaaaaa")));
        assert!(cache.contains(&id("bbbbbbbbbbb")));
        assert!(cache.contains(&id("ccccccccccc")));
    }

    #[test]
    fn test_reinsert_updates_value_in_place() {
        let mut cache = CaptionCache::new(2);
        cache.insert(id("aaaaaaaaaaa"), "old");
        cache.insert(id("bbbbbbbbbbb"), "b");

        cache.insert(id("aaaaaaaaaaa"), "new");
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.lookup(&id("aaaaaaaaaaa")).as_deref(), Some("new"));

        // The rewrite kept the original slot, so it is still the oldest.
        cache.insert(id("ccccccccccc"), "c");
        assert!(!cache.contains(&id("aaaaaaaaaaa")));
        assert!(cache.contains(&id("bbbbbbbbbbb")));
    }

    #[test]
    fn test_capacity_of_one() {
        let mut cache = CaptionCache::new(1);
        cache.insert(id("aaaaaaaaaaa"), "a");
        cache.insert(id("bbbbbbbbbbb"), "b");

        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&id("bbbbbbbbbbb")));
    }

    #[test]
    fn test_zero_capacity_clamps_to_one() {
        let mut cache = CaptionCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.insert(id("aaaaaaaaaaa"), "a");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(CaptionCache::default().capacity(), DEFAULT_CAPTION_CACHE_CAPACITY);
    }
}
