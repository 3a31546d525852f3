//! Error taxonomy for the CloudFlix API client.
//!
//! Variants own their payloads (no source types) so an outcome can be
//! broadcast to every request waiting on a shared token refresh.

use thiserror::Error;

/// Errors surfaced by the API client and session layer.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Malformed input caught before any network call.
    #[error("validation failed: {0}")]
    Validation(String),

    /// 401 that could not be recovered by a one-shot refresh-and-retry.
    #[error("unauthorized (sign in with 'cloudflix login')")]
    Unauthorized,

    /// The long-lived refresh credential is absent or expired. Fatal to the
    /// session: the client logs out and the user must sign in again.
    #[error("session expired, sign in again")]
    RefreshInvalid,

    /// Non-401 HTTP error from the server. Not retried.
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// Transport-level failure (connect, timeout, TLS). Not retried.
    #[error("network error: {0}")]
    Network(String),

    /// A rating or comment mutation the server rejected (409).
    #[error("mutation rejected: {0}")]
    MutationConflict(String),

    /// Local file I/O failure: the session file or an upload source.
    #[error("storage error: {0}")]
    Storage(String),

    /// Unexpected response body shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Maps a reqwest transport error into the taxonomy.
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Network(format!("request timed out: {e}"))
        } else if e.is_connect() {
            ApiError::Network(format!("connection failed: {e}"))
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}
