//! Authenticated HTTP client for the CloudFlix API
//!
//! Wraps reqwest::Client with bearer-token injection and a one-shot
//! refresh-and-retry on 401. Every outgoing call goes through the same
//! pipeline: attach the current token, send, and on 401 obtain a new token
//! via the single-flight refresh coordinator, then resend the original
//! request exactly once. A second 401 propagates; there is never a third
//! attempt, so a broken refresh cannot loop.
//!
//! Requests are described as rebuildable closures instead of cloned
//! `reqwest::Request`s, so the retry reconstructs the request with the
//! fresh token (and streaming bodies stay rebuildable).

use anyhow::{Context, Result};
use reqwest::StatusCode;

use crate::auth::refresh::{RefreshCoordinator, Ticket};
use crate::auth::session::SessionStore;
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{AuthSession, User};

/// Authenticated client. Owns the session store and refresh coordinator;
/// callers never touch the token or the refresh state directly.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
    refresh: RefreshCoordinator,
}

impl ApiClient {
    /// Load config and the persisted session, then build the client.
    pub async fn new() -> Result<Self> {
        let config = Config::load()?;
        let base_url = config.api_base_url()?;
        let session = SessionStore::load(Config::session_path()?)?;
        Self::with_session(base_url, session)
    }

    /// Build a client against an explicit base URL and session store.
    pub fn with_session(base_url: impl Into<String>, session: SessionStore) -> Result<Self> {
        // The cookie jar carries the long-lived refresh credential the
        // server sets out of band on login.
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;

        let base_url: String = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            refresh: RefreshCoordinator::new(),
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The request pipeline. `build` is invoked once per attempt.
    pub(crate) async fn request<F>(&self, build: F) -> Result<reqwest::Response, ApiError>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let resp = self.send_with_token(&build).await?;
        if resp.status() != StatusCode::UNAUTHORIZED {
            return check_response(resp).await;
        }

        tracing::debug!("401 received, recovering via token refresh");
        self.recover_authorization().await?;

        // Exactly one retry with the (possibly new) token. A second 401
        // falls through check_response as Unauthorized.
        let retried = self.send_with_token(&build).await?;
        check_response(retried).await
    }

    async fn send_with_token<F>(&self, build: &F) -> Result<reqwest::Response, ApiError>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let mut rb = build(&self.http);
        if let Some(token) = self.session.access_token() {
            rb = rb.bearer_auth(token);
        }
        rb.send().await.map_err(ApiError::from_transport)
    }

    /// Obtain a fresh token, collapsing concurrent 401s into one exchange.
    async fn recover_authorization(&self) -> Result<(), ApiError> {
        match self.refresh.join().await {
            Ticket::Leader => {
                let outcome = self.refresh_session().await.map(|_| ());
                if let Err(e) = &outcome {
                    tracing::warn!("Token refresh failed: {e}; logging out");
                    if let Err(e) = self.logout().await {
                        tracing::debug!("Ignoring logout failure after bad refresh: {e}");
                    }
                }
                self.refresh.settle(&outcome).await;
                outcome
            }
            Ticket::Follower(rx) => match rx.await {
                Ok(outcome) => outcome,
                // Leader dropped without settling; treat as a dead session.
                Err(_) => Err(ApiError::RefreshInvalid),
            },
        }
    }

    // --- auth endpoints -------------------------------------------------

    /// POST /auth/login. Replaces the session wholesale on success.
    pub async fn login(
        &self,
        username_or_email: &str,
        password: &str,
    ) -> Result<AuthSession, ApiError> {
        crate::auth::validate_login(username_or_email, password)?;

        let url = self.url("/auth/login");
        let body = serde_json::json!({
            "usernameOrEmail": username_or_email,
            "password": password,
        });
        let resp = self.request(|http| http.post(&url).json(&body)).await?;
        let auth: AuthSession = decode(resp).await?;
        self.session
            .replace(auth.user.clone(), auth.access_token.clone())?;
        Ok(auth)
    }

    /// POST /auth/signup. Same replacement semantics as login.
    pub async fn signup(
        &self,
        username: &str,
        email: Option<&str>,
        password: &str,
        role: crate::models::UserRole,
    ) -> Result<AuthSession, ApiError> {
        crate::auth::validate_signup(username, email, password)?;

        let url = self.url("/auth/signup");
        let mut body = serde_json::json!({
            "username": username,
            "password": password,
            "role": role.to_string(),
        });
        if let Some(email) = email {
            body["email"] = serde_json::Value::String(email.to_string());
        }
        let resp = self.request(|http| http.post(&url).json(&body)).await?;
        let auth: AuthSession = decode(resp).await?;
        self.session
            .replace(auth.user.clone(), auth.access_token.clone())?;
        Ok(auth)
    }

    /// GET /auth/me with the current token. Updates the stored user.
    pub async fn me(&self) -> Result<User, ApiError> {
        #[derive(serde::Deserialize)]
        struct MeResponse {
            user: User,
        }

        let url = self.url("/auth/me");
        let resp = self.request(|http| http.get(&url)).await?;
        let me: MeResponse = decode(resp).await?;
        self.session.set_user(me.user.clone())?;
        Ok(me.user)
    }

    /// POST /auth/refresh. Exchanges the out-of-band long-lived credential
    /// (cookie jar) for a new access token; overwrites user and token.
    ///
    /// Sent outside the retry pipeline: a 401 here means the credential is
    /// gone, not something another refresh could fix.
    pub async fn refresh_session(&self) -> Result<AuthSession, ApiError> {
        let body = match self.session.user_id() {
            Some(id) => serde_json::json!({ "userId": id }),
            None => serde_json::json!({}),
        };

        tracing::info!("Refreshing access token...");
        let resp = self
            .http
            .post(self.url("/auth/refresh"))
            .json(&body)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::RefreshInvalid);
        }
        let resp = check_response(resp).await?;
        let auth: AuthSession = decode(resp).await?;
        self.session
            .replace(auth.user.clone(), auth.access_token.clone())?;
        tracing::info!("Access token refreshed");
        Ok(auth)
    }

    /// Best-effort server-side invalidation, then unconditionally clear the
    /// local session. The network call is the only failure this client ever
    /// swallows; it also bypasses the retry pipeline so a dead token cannot
    /// trigger a refresh from inside logout.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let mut rb = self.http.post(self.url("/auth/logout"));
        if let Some(token) = self.session.access_token() {
            rb = rb.bearer_auth(token);
        }
        if let Err(e) = rb.send().await {
            tracing::debug!("Ignoring logout request failure: {e}");
        }
        self.session.clear()
    }
}

/// Map a non-401 response onto the error taxonomy; pass successes through.
pub(crate) async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }

    let message = resp.text().await.unwrap_or_default();
    if status == StatusCode::CONFLICT {
        return Err(ApiError::MutationConflict(message));
    }
    Err(ApiError::Server {
        status: status.as_u16(),
        message,
    })
}

/// Decode a JSON body into `T`.
pub(crate) async fn decode<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ApiError> {
    resp.json().await.map_err(|e| ApiError::Decode(e.to_string()))
}
