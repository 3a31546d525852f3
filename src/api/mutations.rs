//! Optimistic mutations over the query cache
//!
//! Ratings are patched into the cached video view before the server
//! confirms, with the prior value captured for rollback. Whatever the
//! outcome, the affected entries are invalidated and refetched exactly once
//! afterward: the provisional math is a placeholder, never authoritative.
//!
//! Comments are not edited provisionally; the cached list is refetched
//! after the server confirms, and left untouched when the server rejects.

use super::client::ApiClient;
use super::{comments, ratings, videos};
use crate::cache::VideoCache;
use crate::error::ApiError;
use crate::models::{Comment, Video};

/// Provisional aggregate after folding one more score into the average.
///
/// Computed from the currently cached aggregate, not from any per-user vote
/// history: a user rating twice double-counts in the provisional view. The
/// post-settlement refetch replaces it with the server's aggregate either way.
pub fn optimistic_aggregate(avg: f64, count: u64, rating: u8) -> (f64, u64) {
    let new_count = count + 1;
    let new_avg = (avg * count as f64 + f64::from(rating)) / new_count as f64;
    (new_avg, new_count)
}

/// Applies rating/comment mutations against an explicit cache port.
pub struct MutationController<'a> {
    client: &'a ApiClient,
    cache: &'a dyn VideoCache,
}

impl<'a> MutationController<'a> {
    pub fn new(client: &'a ApiClient, cache: &'a dyn VideoCache) -> Self {
        Self { client, cache }
    }

    /// Read-through video fetch: cached view if fresh, otherwise a server
    /// round-trip that re-primes the cache.
    pub async fn video(&self, id: u64) -> Result<Video, ApiError> {
        if let Some(video) = self.cache.get_video(id) {
            return Ok(video);
        }
        let video = videos::get_video(self.client, id).await?;
        self.cache.set_video(video.clone());
        Ok(video)
    }

    /// Read-through comment list fetch.
    pub async fn comments(&self, video_id: u64) -> Result<Vec<Comment>, ApiError> {
        if let Some(list) = self.cache.get_comments(video_id) {
            return Ok(list);
        }
        let list = comments::list_comments(self.client, video_id).await?;
        self.cache.set_comments(video_id, list.clone());
        Ok(list)
    }

    /// Rate a video with an optimistic cache patch.
    ///
    /// Returns the server-confirmed video from the mandatory post-settlement
    /// refetch. On rejection the prior cached value is restored exactly, the
    /// refetch still happens, and the rejection propagates.
    pub async fn rate_video(&self, video_id: u64, rating: u8) -> Result<Video, ApiError> {
        ratings::validate_rating(rating)?;

        let prior = self.cache.get_video(video_id);
        if let Some(current) = &prior {
            let (avg, count) =
                optimistic_aggregate(current.avg_rating, current.rating_count, rating);
            let mut patched = current.clone();
            patched.avg_rating = avg;
            patched.rating_count = count;
            self.cache.set_video(patched);
        }

        let outcome = ratings::rate_video(self.client, video_id, rating).await;

        if outcome.is_err() {
            if let Some(prior) = prior {
                self.cache.set_video(prior);
            }
        }

        // Settlement: drop the provisional view and any list containing it,
        // then refetch once so the cache reflects the server's aggregate.
        self.cache.invalidate_video(video_id);
        self.cache.invalidate_feed();
        let refetched = videos::get_video(self.client, video_id).await;
        match &refetched {
            Ok(video) => self.cache.set_video(video.clone()),
            Err(e) => tracing::warn!("Post-rating refetch of video {video_id} failed: {e}"),
        }

        match outcome {
            Ok(()) => refetched,
            Err(e) => Err(e),
        }
    }

    /// Add a comment; the cached list is refetched only after the server
    /// confirms. Returns the new comment id.
    pub async fn add_comment(&self, video_id: u64, text: &str) -> Result<u64, ApiError> {
        let id = comments::add_comment(self.client, video_id, text).await?;
        self.refetch_comments(video_id).await;
        Ok(id)
    }

    /// Remove a comment; same reconciliation as `add_comment`.
    pub async fn remove_comment(&self, video_id: u64, comment_id: u64) -> Result<(), ApiError> {
        comments::remove_comment(self.client, video_id, comment_id).await?;
        self.refetch_comments(video_id).await;
        Ok(())
    }

    async fn refetch_comments(&self, video_id: u64) {
        self.cache.invalidate_comments(video_id);
        match comments::list_comments(self.client, video_id).await {
            Ok(list) => self.cache.set_comments(video_id, list),
            Err(e) => tracing::warn!("Comment refetch for video {video_id} failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimistic_aggregate_folds_one_rating() {
        let (avg, count) = optimistic_aggregate(4.0, 10, 5);
        assert_eq!(count, 11);
        assert!((avg - 45.0 / 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_optimistic_aggregate_first_rating() {
        let (avg, count) = optimistic_aggregate(0.0, 0, 3);
        assert_eq!(count, 1);
        assert!((avg - 3.0).abs() < 1e-9);
    }
}
