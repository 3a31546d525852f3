//! Video catalog endpoints

use std::path::PathBuf;
use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde::{Deserialize, Serialize};

use super::client::{decode, ApiClient};
use crate::error::ApiError;
use crate::models::{UploadReceipt, Video, VideoPage, Visibility};

/// Upload body is streamed in chunks this size so progress is reported
/// incrementally during the transfer.
const UPLOAD_CHUNK: usize = 64 * 1024;

/// Query parameters for GET /videos.
#[derive(Debug, Clone, Default)]
pub struct VideoQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub q: Option<String>,
    pub genre: Option<String>,
    pub uploader_id: Option<u64>,
    pub visibility: Option<Visibility>,
}

impl VideoQuery {
    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(q) = &self.q {
            params.push(("q", q.clone()));
        }
        if let Some(genre) = &self.genre {
            params.push(("genre", genre.clone()));
        }
        if let Some(id) = self.uploader_id {
            params.push(("uploaderId", id.to_string()));
        }
        if let Some(vis) = self.visibility {
            params.push(("visibility", vis.to_string()));
        }
        params
    }
}

/// Editable fields for PATCH /videos/:id. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VideoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

/// Metadata accompanying an upload.
#[derive(Debug, Clone)]
pub struct UploadSpec {
    pub file: PathBuf,
    pub title: String,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub producer: Option<String>,
    pub age_rating: Option<String>,
    pub visibility: Option<Visibility>,
}

/// GET /videos with paging/search filters.
pub async fn list_videos(client: &ApiClient, query: &VideoQuery) -> Result<VideoPage, ApiError> {
    let url = client.url("/videos");
    let params = query.to_params();
    let resp = client
        .request(|http| http.get(&url).query(&params))
        .await?;
    decode(resp).await
}

/// GET /videos/:id.
pub async fn get_video(client: &ApiClient, id: u64) -> Result<Video, ApiError> {
    #[derive(Deserialize)]
    struct VideoResponse {
        video: Video,
    }

    let url = client.url(&format!("/videos/{id}"));
    let resp = client.request(|http| http.get(&url)).await?;
    let body: VideoResponse = decode(resp).await?;
    Ok(body.video)
}

/// PATCH /videos/:id.
pub async fn update_video(client: &ApiClient, id: u64, patch: &VideoPatch) -> Result<(), ApiError> {
    let url = client.url(&format!("/videos/{id}"));
    client.request(|http| http.patch(&url).json(patch)).await?;
    Ok(())
}

/// DELETE /videos/:id.
pub async fn delete_video(client: &ApiClient, id: u64) -> Result<(), ApiError> {
    let url = client.url(&format!("/videos/{id}"));
    client.request(|http| http.delete(&url)).await?;
    Ok(())
}

/// POST /videos/upload as a streamed multipart form.
///
/// `progress` receives the fraction of the file handed to the transport,
/// in [0, 1], as the body streams out. Progress is per attempt: the file is
/// read once up front so a retried request can rebuild its body, and that
/// rebuilt body streams again from zero, so a 401-then-retry reports a
/// second 0..=1 sweep.
pub async fn upload_video<P>(
    client: &ApiClient,
    spec: &UploadSpec,
    progress: P,
) -> Result<UploadReceipt, ApiError>
where
    P: Fn(f64) + Clone + Send + Sync + 'static,
{
    if spec.title.trim().is_empty() {
        return Err(ApiError::Validation("title is required".into()));
    }
    let data: Arc<Vec<u8>> = Arc::new(
        tokio::fs::read(&spec.file)
            .await
            .map_err(|e| ApiError::Storage(format!("cannot read {}: {e}", spec.file.display())))?,
    );
    let file_name = spec
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());

    let url = client.url("/videos/upload");
    let spec = spec.clone();
    tracing::info!("Uploading {} ({} bytes)", file_name, data.len());

    let resp = client
        .request(move |http| {
            let part = Part::stream_with_length(
                progress_body(Arc::clone(&data), progress.clone()),
                data.len() as u64,
            )
            .file_name(file_name.clone());

            let mut form = Form::new()
                .part("file", part)
                .text("title", spec.title.clone());
            if let Some(v) = &spec.description {
                form = form.text("description", v.clone());
            }
            if let Some(v) = &spec.genre {
                form = form.text("genre", v.clone());
            }
            if let Some(v) = &spec.producer {
                form = form.text("producer", v.clone());
            }
            if let Some(v) = &spec.age_rating {
                form = form.text("age_rating", v.clone());
            }
            if let Some(v) = spec.visibility {
                form = form.text("visibility", v.to_string());
            }
            http.post(&url).multipart(form)
        })
        .await?;

    decode(resp).await
}

/// Chunked body that reports cumulative progress as it is polled.
fn progress_body<P>(data: Arc<Vec<u8>>, progress: P) -> Body
where
    P: Fn(f64) + Send + Sync + 'static,
{
    let total = data.len().max(1);
    let stream = futures::stream::iter((0..data.len()).step_by(UPLOAD_CHUNK).map(move |offset| {
        let end = (offset + UPLOAD_CHUNK).min(data.len());
        let chunk = data[offset..end].to_vec();
        progress(end as f64 / total as f64);
        Ok::<_, std::io::Error>(chunk)
    }));
    Body::wrap_stream(stream)
}
