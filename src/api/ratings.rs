//! Rating endpoint

use super::client::ApiClient;
use crate::error::ApiError;

/// Validate a rating score before any network call or cache write.
pub fn validate_rating(rating: u8) -> Result<(), ApiError> {
    if !(1..=5).contains(&rating) {
        return Err(ApiError::Validation(format!(
            "rating must be between 1 and 5, got {rating}"
        )));
    }
    Ok(())
}

/// POST /videos/:id/ratings.
pub async fn rate_video(client: &ApiClient, video_id: u64, rating: u8) -> Result<(), ApiError> {
    validate_rating(rating)?;

    let url = client.url(&format!("/videos/{video_id}/ratings"));
    let body = serde_json::json!({ "rating": rating });
    client.request(|http| http.post(&url).json(&body)).await?;
    Ok(())
}
