//! Client-side query cache
//!
//! Read-through cache for video views, comment lists and the feed. The
//! optimistic mutation flow talks to the `VideoCache` port rather than a
//! concrete store, so it carries no hidden dependency on this module's
//! in-memory implementation.
//!
//! An invalidated entry is dropped outright: the next read misses and
//! refetches, which is exactly "marked stale" as observed through the port.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::{Comment, Video};

/// Cache port used by the API layer and the optimistic mutation flow.
pub trait VideoCache: Send + Sync {
    /// Last known representation of a video, if still fresh.
    fn get_video(&self, id: u64) -> Option<Video>;
    /// Store (or optimistically patch) a video view.
    fn set_video(&self, video: Video);
    /// Drop a video view so the next read refetches.
    fn invalidate_video(&self, id: u64);

    /// Cached comment list for a video, if still fresh.
    fn get_comments(&self, video_id: u64) -> Option<Vec<Comment>>;
    /// Store a server-confirmed comment list.
    fn set_comments(&self, video_id: u64, comments: Vec<Comment>);
    /// Drop a comment list so the next read refetches.
    fn invalidate_comments(&self, video_id: u64);

    /// Drop every cached feed page (lists that may contain a mutated video).
    fn invalidate_feed(&self);
}

/// In-memory cache keyed by video id. Feed pages are keyed by page number.
#[derive(Default)]
pub struct QueryCache {
    videos: Mutex<HashMap<u64, Video>>,
    comments: Mutex<HashMap<u64, Vec<Comment>>>,
    feed: Mutex<HashMap<u32, Vec<Video>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store one feed page. The mutation flow never writes pages, it only
    /// drops them via `invalidate_feed`; callers that keep a cache alive
    /// across list fetches populate this side.
    pub fn set_feed_page(&self, page: u32, videos: Vec<Video>) {
        self.lock_feed().insert(page, videos);
    }

    /// Cached feed page, if present.
    pub fn get_feed_page(&self, page: u32) -> Option<Vec<Video>> {
        self.lock_feed().get(&page).cloned()
    }

    fn lock_videos(&self) -> std::sync::MutexGuard<'_, HashMap<u64, Video>> {
        self.videos.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_comments(&self) -> std::sync::MutexGuard<'_, HashMap<u64, Vec<Comment>>> {
        self.comments.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_feed(&self) -> std::sync::MutexGuard<'_, HashMap<u32, Vec<Video>>> {
        self.feed.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl VideoCache for QueryCache {
    fn get_video(&self, id: u64) -> Option<Video> {
        self.lock_videos().get(&id).cloned()
    }

    fn set_video(&self, video: Video) {
        self.lock_videos().insert(video.id, video);
    }

    fn invalidate_video(&self, id: u64) {
        self.lock_videos().remove(&id);
    }

    fn get_comments(&self, video_id: u64) -> Option<Vec<Comment>> {
        self.lock_comments().get(&video_id).cloned()
    }

    fn set_comments(&self, video_id: u64, comments: Vec<Comment>) {
        self.lock_comments().insert(video_id, comments);
    }

    fn invalidate_comments(&self, video_id: u64) {
        self.lock_comments().remove(&video_id);
    }

    fn invalidate_feed(&self) {
        self.lock_feed().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Visibility;

    fn sample_video(id: u64) -> Video {
        Video {
            id,
            title: format!("clip {id}"),
            description: None,
            genre: None,
            producer: None,
            age_rating: None,
            visibility: Visibility::Public,
            uploader_id: 1,
            blob_url: format!("https://cdn.example/{id}.mp4"),
            created_at: "2025-01-01T00:00:00Z".into(),
            updated_at: "2025-01-01T00:00:00Z".into(),
            avg_rating: 4.0,
            rating_count: 10,
        }
    }

    #[test]
    fn test_invalidate_forces_miss() {
        let cache = QueryCache::new();
        cache.set_video(sample_video(7));
        assert!(cache.get_video(7).is_some());

        cache.invalidate_video(7);
        assert!(cache.get_video(7).is_none());
    }

    #[test]
    fn test_feed_invalidation_drops_all_pages() {
        let cache = QueryCache::new();
        cache.set_feed_page(1, vec![sample_video(1)]);
        cache.set_feed_page(2, vec![sample_video(2)]);

        cache.invalidate_feed();
        assert!(cache.get_feed_page(1).is_none());
        assert!(cache.get_feed_page(2).is_none());
    }
}
