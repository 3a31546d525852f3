//! Authentication module for CloudFlix
//!
//! Session persistence, single-flight token refresh, client-side input
//! validation, and the CLI-facing login/signup/logout/status flows.

pub mod refresh;
pub mod session;

pub use session::{Session, SessionStore};

use anyhow::Result;

use crate::api::client::ApiClient;
use crate::error::ApiError;
use crate::models::UserRole;

/// Validate login input before any network call.
pub fn validate_login(username_or_email: &str, password: &str) -> Result<(), ApiError> {
    if username_or_email.trim().is_empty() {
        return Err(ApiError::Validation("username or email is required".into()));
    }
    if password.len() < 6 {
        return Err(ApiError::Validation(
            "password must be at least 6 characters".into(),
        ));
    }
    Ok(())
}

/// Validate signup input before any network call.
pub fn validate_signup(
    username: &str,
    email: Option<&str>,
    password: &str,
) -> Result<(), ApiError> {
    if username.trim().len() < 3 {
        return Err(ApiError::Validation(
            "username must be at least 3 characters".into(),
        ));
    }
    if password.len() < 6 {
        return Err(ApiError::Validation(
            "password must be at least 6 characters".into(),
        ));
    }
    if let Some(email) = email {
        let (local, domain) = email.split_once('@').unwrap_or(("", ""));
        if local.is_empty() || domain.is_empty() || !domain.contains('.') {
            return Err(ApiError::Validation(format!("invalid email '{email}'")));
        }
    }
    Ok(())
}

/// Sign in and persist the session.
pub async fn login(username_or_email: &str, password: &str) -> Result<()> {
    let client = ApiClient::new().await?;
    let auth = client.login(username_or_email, password).await?;
    println!(
        "Logged in as {} ({})",
        auth.user.username, auth.user.role
    );
    Ok(())
}

/// Create an account and persist the session.
pub async fn signup(
    username: &str,
    email: Option<&str>,
    password: &str,
    role: UserRole,
) -> Result<()> {
    let client = ApiClient::new().await?;
    let auth = client.signup(username, email, password, role).await?;
    println!(
        "Account created. Signed in as {} ({})",
        auth.user.username, auth.user.role
    );
    Ok(())
}

/// Clear stored credentials (best-effort server-side invalidation first).
pub async fn logout() -> Result<()> {
    let client = ApiClient::new().await?;
    client.logout().await?;
    println!("Logged out.");
    Ok(())
}

/// Display current session status without touching the network.
pub async fn status() -> Result<()> {
    let session = SessionStore::load(crate::config::Config::session_path()?)?.snapshot();

    match &session.user {
        Some(user) => {
            println!("User:         {} (id {})", user.username, user.id);
            println!("Role:         {}", user.role);
            if let Some(email) = &user.email {
                println!("Email:        {email}");
            }
        }
        None => println!("User:         none"),
    }
    match &session.access_token {
        Some(_) => println!("Access token: present"),
        None => println!("Access token: none"),
    }

    if !session.is_authenticated() {
        println!("\nRun 'cloudflix login' to authenticate.");
    }
    Ok(())
}
