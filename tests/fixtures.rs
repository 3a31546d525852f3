//! Shared helpers for integration tests.
#![allow(dead_code)]

use tempfile::TempDir;

use cloudflix_cli::api::client::ApiClient;
use cloudflix_cli::auth::SessionStore;
use cloudflix_cli::models::{User, UserRole};

pub fn sample_user() -> User {
    User {
        id: 42,
        username: "ada".into(),
        email: Some("ada@example.com".into()),
        role: UserRole::Creator,
        created_at: None,
        updated_at: None,
    }
}

pub fn user_json() -> serde_json::Value {
    serde_json::json!({
        "id": 42,
        "username": "ada",
        "email": "ada@example.com",
        "role": "creator"
    })
}

pub fn video_json(id: u64, avg_rating: f64, rating_count: u64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": format!("clip {id}"),
        "visibility": "public",
        "uploader_id": 42,
        "blob_url": format!("https://cdn.example/{id}.mp4"),
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z",
        "avg_rating": avg_rating,
        "rating_count": rating_count
    })
}

pub fn auth_json(token: &str) -> serde_json::Value {
    serde_json::json!({
        "accessToken": token,
        "user": user_json()
    })
}

/// Client with a persisted session holding `token`, isolated in a temp dir.
/// The TempDir must stay alive for the duration of the test.
pub fn authed_client(base_url: &str, token: &str) -> (ApiClient, TempDir) {
    let dir = TempDir::new().expect("create temp session dir");
    let store = SessionStore::load(dir.path().join("session.toml")).expect("load session store");
    store
        .replace(sample_user(), token.into())
        .expect("seed session");
    let client = ApiClient::with_session(base_url, store).expect("build client");
    (client, dir)
}

/// Client with no session at all.
pub fn anonymous_client(base_url: &str) -> (ApiClient, TempDir) {
    let dir = TempDir::new().expect("create temp session dir");
    let store = SessionStore::load(dir.path().join("session.toml")).expect("load session store");
    let client = ApiClient::with_session(base_url, store).expect("build client");
    (client, dir)
}
