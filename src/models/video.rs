//! Video catalog models

use serde::{Deserialize, Serialize};

/// Who can see a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Unlisted,
    Private,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Unlisted => write!(f, "unlisted"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

impl std::str::FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Visibility::Public),
            "unlisted" => Ok(Visibility::Unlisted),
            "private" => Ok(Visibility::Private),
            other => Err(format!(
                "unknown visibility '{other}' (expected public, unlisted or private)"
            )),
        }
    }
}

/// A video as returned by the server, including the rating aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_rating: Option<String>,
    pub visibility: Visibility,
    pub uploader_id: u64,
    pub blob_url: String,
    pub created_at: String,
    pub updated_at: String,
    pub avg_rating: f64,
    pub rating_count: u64,
}

/// One page of the video feed.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoPage {
    pub data: Vec<Video>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

/// `{id, url}` returned after a successful upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadReceipt {
    pub id: u64,
    pub url: String,
}
