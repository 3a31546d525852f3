//! User-related models

use serde::{Deserialize, Serialize};

/// Account role. Creators can upload; consumers only browse and rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Creator,
    Consumer,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Creator => write!(f, "creator"),
            UserRole::Consumer => write!(f, "consumer"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "creator" => Ok(UserRole::Creator),
            "consumer" => Ok(UserRole::Consumer),
            other => Err(format!(
                "unknown role '{other}' (expected creator or consumer)"
            )),
        }
    }
}

/// User profile, replaced wholesale on every auth operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// `{user, accessToken}` payload returned by login, signup and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: User,
    #[serde(rename = "accessToken")]
    pub access_token: String,
}
