//! Comment models

use serde::{Deserialize, Serialize};

/// A comment on a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub video_id: u64,
    pub user_id: u64,
    pub username: String,
    pub comment: String,
    pub created_at: String,
}
