//! Persistent session storage
//!
//! The session (current user + access token) is written to a single TOML
//! file on every change and restored verbatim at startup. The access token
//! is present exactly when the user is authenticated; user and token are
//! replaced or cleared together.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::ApiError;
use crate::models::User;

/// The persisted session state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

/// Owns the in-memory session and mirrors every change to disk.
///
/// Interior mutability via `RwLock`: the lock is never held across an
/// await point, so concurrent requests only contend for token reads.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    session: RwLock<Session>,
}

impl SessionStore {
    /// Restore the session from `path`, or start empty if the file is absent.
    pub fn load(path: PathBuf) -> Result<Self, ApiError> {
        let session = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| ApiError::Storage(format!("read {}: {e}", path.display())))?;
            toml::from_str(&content)
                .map_err(|e| ApiError::Storage(format!("parse {}: {e}", path.display())))?
        } else {
            Session::default()
        };

        Ok(Self {
            path,
            session: RwLock::new(session),
        })
    }

    /// Current access token, if authenticated.
    pub fn access_token(&self) -> Option<String> {
        self.read().access_token.clone()
    }

    /// Current user id, used as the optional refresh hint.
    pub fn user_id(&self) -> Option<u64> {
        self.read().user.as_ref().map(|u| u.id)
    }

    /// Snapshot of the whole session.
    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    /// Replace user and token wholesale (login, signup, refresh) and persist.
    pub fn replace(&self, user: User, access_token: String) -> Result<(), ApiError> {
        {
            let mut s = self.write();
            s.user = Some(user);
            s.access_token = Some(access_token);
        }
        self.persist()
    }

    /// Replace only the user (a successful `/auth/me`) and persist.
    pub fn set_user(&self, user: User) -> Result<(), ApiError> {
        self.write().user = Some(user);
        self.persist()
    }

    /// Clear user and token (logout, fatal refresh failure) and persist.
    /// Idempotent: clearing an empty session is a no-op that still succeeds.
    pub fn clear(&self) -> Result<(), ApiError> {
        {
            let mut s = self.write();
            s.user = None;
            s.access_token = None;
        }
        self.persist()
    }

    fn persist(&self) -> Result<(), ApiError> {
        let snapshot = self.snapshot();
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| ApiError::Storage(format!("create {}: {e}", dir.display())))?;
        }
        let content = toml::to_string_pretty(&snapshot)
            .map_err(|e| ApiError::Storage(format!("serialize session: {e}")))?;
        fs::write(&self.path, content)
            .map_err(|e| ApiError::Storage(format!("write {}: {e}", self.path.display())))?;

        // Restrictive permissions: the file contains a bearer token.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, perms)
                .map_err(|e| ApiError::Storage(format!("chmod {}: {e}", self.path.display())))?;
        }

        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn sample_user() -> User {
        User {
            id: 42,
            username: "ada".into(),
            email: Some("ada@example.com".into()),
            role: UserRole::Creator,
            created_at: Some("2025-01-01T00:00:00Z".into()),
            updated_at: None,
        }
    }

    #[test]
    fn test_persistence_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");

        let store = SessionStore::load(path.clone()).unwrap();
        store.replace(sample_user(), "tok-123".into()).unwrap();

        // A fresh store restores the identical session without the network.
        let restored = SessionStore::load(path).unwrap();
        assert_eq!(restored.access_token().as_deref(), Some("tok-123"));
        assert_eq!(restored.snapshot().user, Some(sample_user()));
    }

    #[test]
    fn test_logout_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::load(dir.path().join("session.toml")).unwrap();

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(!store.snapshot().is_authenticated());
    }

    #[test]
    fn test_replace_sets_user_and_token_together() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::load(dir.path().join("session.toml")).unwrap();

        store.replace(sample_user(), "tok".into()).unwrap();
        let s = store.snapshot();
        assert!(s.is_authenticated());
        assert!(s.user.is_some());

        store.clear().unwrap();
        let s = store.snapshot();
        assert!(s.user.is_none() && s.access_token.is_none());
    }
}
