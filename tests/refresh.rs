//! Tests for the 401 refresh-and-retry pipeline with wiremock.
//!
//! Covers the single-flight invariant (N concurrent 401s produce exactly one
//! refresh call), the one-retry limit, and logout on a dead refresh
//! credential.

mod fixtures;

use std::time::Duration;

use fixtures::{auth_json, authed_client, video_json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cloudflix_cli::api::videos;
use cloudflix_cli::error::ApiError;

#[tokio::test]
async fn test_single_flight_refresh_for_concurrent_401s() {
    let server = MockServer::start().await;

    // Requests carrying the stale token are rejected.
    Mock::given(method("GET"))
        .and(path("/videos/7"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    // The refresh exchange is slow enough that every concurrent 401 arrives
    // while it is still in flight. Exactly one call is allowed.
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(auth_json("fresh"))
                .set_delay(Duration::from_millis(250)),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Retries with the refreshed token succeed.
    Mock::given(method("GET"))
        .and(path("/videos/7"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "video": video_json(7, 4.0, 10)
        })))
        .mount(&server)
        .await;

    let (client, _dir) = authed_client(&server.uri(), "stale");

    let (a, b, c) = tokio::join!(
        videos::get_video(&client, 7),
        videos::get_video(&client, 7),
        videos::get_video(&client, 7),
    );
    assert_eq!(a.unwrap().id, 7);
    assert_eq!(b.unwrap().id, 7);
    assert_eq!(c.unwrap().id, 7);

    // The refreshed session was persisted.
    assert_eq!(client.session().access_token().as_deref(), Some("fresh"));
}

#[tokio::test]
async fn test_401_after_refresh_is_not_retried_again() {
    let server = MockServer::start().await;

    // The server rejects every token, refreshed or not.
    Mock::given(method("GET"))
        .and(path("/videos/7"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2) // original attempt + exactly one retry, never a third
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_json("still-bad")))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _dir) = authed_client(&server.uri(), "stale");

    let err = videos::get_video(&client, 7).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn test_dead_refresh_credential_logs_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos/7"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1) // no retry happens when refresh itself fails
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    // Best-effort server-side logout; response is irrelevant.
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&server)
        .await;

    let (client, _dir) = authed_client(&server.uri(), "stale");

    let err = videos::get_video(&client, 7).await.unwrap_err();
    assert!(matches!(err, ApiError::RefreshInvalid));

    // The local session is cleared, and cleared on disk too.
    let session = client.session().snapshot();
    assert!(session.user.is_none());
    assert!(session.access_token.is_none());
}

#[tokio::test]
async fn test_non_401_errors_pass_through_without_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos/7"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_json("fresh")))
        .expect(0)
        .mount(&server)
        .await;

    let (client, _dir) = authed_client(&server.uri(), "valid");

    let err = videos::get_video(&client, 7).await.unwrap_err();
    assert!(matches!(err, ApiError::Server { status: 500, .. }));
}
