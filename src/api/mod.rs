//! API client module for CloudFlix

pub mod client;
pub mod comments;
pub mod mutations;
pub mod ratings;
pub mod videos;

use anyhow::Result;

use crate::cache::QueryCache;
use crate::models::UserRole;
use client::ApiClient;
use mutations::MutationController;
pub use videos::{UploadSpec, VideoPatch, VideoQuery};

fn stars(avg: f64, count: u64) -> String {
    format!("{avg:.1}* ({count})")
}

/// Show current user info (verify auth works)
pub async fn whoami() -> Result<()> {
    let client = ApiClient::new().await?;
    let user = client.me().await?;

    println!();
    println!("Username: {}", user.username);
    println!("Role:     {}", user.role);
    println!("Email:    {}", user.email.as_deref().unwrap_or("(none)"));
    println!("ID:       {}", user.id);
    Ok(())
}

/// List videos matching the query
pub async fn list_videos(query: VideoQuery) -> Result<()> {
    let client = ApiClient::new().await?;
    let page = videos::list_videos(&client, &query).await?;

    if page.data.is_empty() {
        println!("No videos found.");
        return Ok(());
    }
    for video in &page.data {
        println!(
            "{:>6}  {:<40}  {:>12}  {}",
            video.id,
            video.title,
            stars(video.avg_rating, video.rating_count),
            video.visibility
        );
    }
    println!(
        "\nPage {} of {} total video(s){}",
        page.page,
        page.total,
        if page.has_more { ", more available" } else { "" }
    );
    Ok(())
}

/// Show one video's details
pub async fn show_video(id: u64) -> Result<()> {
    let client = ApiClient::new().await?;
    let video = videos::get_video(&client, id).await?;

    println!();
    println!("Title:      {}", video.title);
    if let Some(d) = &video.description {
        println!("About:      {d}");
    }
    if let Some(g) = &video.genre {
        println!("Genre:      {g}");
    }
    if let Some(p) = &video.producer {
        println!("Producer:   {p}");
    }
    if let Some(a) = &video.age_rating {
        println!("Age rating: {a}");
    }
    println!("Visibility: {}", video.visibility);
    println!("Rating:     {}", stars(video.avg_rating, video.rating_count));
    println!("Uploader:   {}", video.uploader_id);
    println!("URL:        {}", video.blob_url);
    Ok(())
}

/// Upload a video, printing transfer progress
pub async fn upload(spec: UploadSpec) -> Result<()> {
    let client = ApiClient::new().await?;
    // Creator check mirrors the server rule so the failure is immediate.
    let session = client.session().snapshot();
    if let Some(user) = &session.user {
        if user.role != UserRole::Creator {
            anyhow::bail!("Only creator accounts can upload videos.");
        }
    }

    let receipt = videos::upload_video(&client, &spec, |fraction| {
        let percent = (fraction * 100.0).round() as u32;
        tracing::info!("Upload progress: {percent}%");
    })
    .await?;

    println!("Uploaded video {} -> {}", receipt.id, receipt.url);
    Ok(())
}

/// Edit a video's metadata
pub async fn edit_video(id: u64, patch: VideoPatch) -> Result<()> {
    let client = ApiClient::new().await?;
    videos::update_video(&client, id, &patch).await?;
    println!("Video {id} updated.");
    Ok(())
}

/// Delete a video
pub async fn delete_video(id: u64) -> Result<()> {
    let client = ApiClient::new().await?;
    videos::delete_video(&client, id).await?;
    println!("Video {id} deleted.");
    Ok(())
}

/// List a video's comments
pub async fn list_comments(video_id: u64) -> Result<()> {
    let client = ApiClient::new().await?;
    let list = comments::list_comments(&client, video_id).await?;

    if list.is_empty() {
        println!("No comments yet.");
        return Ok(());
    }
    for c in &list {
        println!("[{:>6}] {}: {}", c.id, c.username, c.comment);
    }
    Ok(())
}

/// Add a comment
pub async fn add_comment(video_id: u64, text: &str) -> Result<()> {
    let client = ApiClient::new().await?;
    let cache = QueryCache::new();
    let id = MutationController::new(&client, &cache)
        .add_comment(video_id, text)
        .await?;
    println!("Comment {id} added.");
    Ok(())
}

/// Remove a comment
pub async fn remove_comment(video_id: u64, comment_id: u64) -> Result<()> {
    let client = ApiClient::new().await?;
    let cache = QueryCache::new();
    MutationController::new(&client, &cache)
        .remove_comment(video_id, comment_id)
        .await?;
    println!("Comment {comment_id} removed.");
    Ok(())
}

/// Rate a video 1-5
pub async fn rate_video(video_id: u64, rating: u8) -> Result<()> {
    let client = ApiClient::new().await?;
    let cache = QueryCache::new();
    let controller = MutationController::new(&client, &cache);

    // Prime the cache so the optimistic patch has a view to work on.
    let before = controller.video(video_id).await?;
    let after = controller.rate_video(video_id, rating).await?;

    println!(
        "Rated video {video_id}: {} -> {}",
        stars(before.avg_rating, before.rating_count),
        stars(after.avg_rating, after.rating_count)
    );
    Ok(())
}
