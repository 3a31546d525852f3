//! Comment endpoints

use serde::Deserialize;

use super::client::{decode, ApiClient};
use crate::error::ApiError;
use crate::models::Comment;

/// GET /videos/:id/comments.
pub async fn list_comments(client: &ApiClient, video_id: u64) -> Result<Vec<Comment>, ApiError> {
    #[derive(Deserialize)]
    struct CommentsResponse {
        data: Vec<Comment>,
    }

    let url = client.url(&format!("/videos/{video_id}/comments"));
    let resp = client.request(|http| http.get(&url)).await?;
    let body: CommentsResponse = decode(resp).await?;
    Ok(body.data)
}

/// POST /videos/:id/comments. Returns the new comment id.
pub async fn add_comment(client: &ApiClient, video_id: u64, text: &str) -> Result<u64, ApiError> {
    #[derive(Deserialize)]
    struct AddResponse {
        id: u64,
    }

    if text.trim().is_empty() {
        return Err(ApiError::Validation("comment must not be empty".into()));
    }

    let url = client.url(&format!("/videos/{video_id}/comments"));
    let body = serde_json::json!({ "comment": text });
    let resp = client.request(|http| http.post(&url).json(&body)).await?;
    let added: AddResponse = decode(resp).await?;
    Ok(added.id)
}

/// DELETE /videos/:id/comments/:commentId.
pub async fn remove_comment(
    client: &ApiClient,
    video_id: u64,
    comment_id: u64,
) -> Result<(), ApiError> {
    let url = client.url(&format!("/videos/{video_id}/comments/{comment_id}"));
    client.request(|http| http.delete(&url)).await?;
    Ok(())
}
