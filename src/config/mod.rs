//! Configuration storage
//!
//! A small TOML file holding client settings. The session (user + access
//! token) lives in its own file next to it, see `auth::session`.

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment variable overriding the config/session directory.
/// Used by tests to isolate state from the real user profile.
pub const HOME_ENV: &str = "CLOUDFLIX_HOME";

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "CLOUDFLIX_API_BASE_URL";

/// Application configuration
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the CloudFlix API (e.g. https://api.cloudflix.example)
    pub api_base_url: Option<String>,
}

impl Config {
    /// Get config directory path, honoring the `CLOUDFLIX_HOME` override.
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(HOME_ENV) {
            if !dir.trim().is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }
        let proj_dirs = ProjectDirs::from("com", "cloudflix", "cloudflix-cli")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Get config file path
    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Path of the persisted session file.
    pub fn session_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("session.toml"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir).context("Failed to create config directory")?;

        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Resolve the API base URL: env var > config file. There is no baked-in
    /// default; the client refuses to guess where the API lives.
    pub fn api_base_url(&self) -> Result<String> {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                Self::validate_url(trimmed)?;
                return Ok(trimmed.trim_end_matches('/').to_string());
            }
        }
        if let Some(url) = self.api_base_url.as_deref() {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                Self::validate_url(trimmed)?;
                return Ok(trimmed.trim_end_matches('/').to_string());
            }
        }
        bail!(
            "No API base URL configured. Set {} or api_base_url in config.toml.",
            BASE_URL_ENV
        );
    }

    fn validate_url(url: &str) -> Result<()> {
        url::Url::parse(url).with_context(|| format!("Invalid API base URL: {url}"))?;
        Ok(())
    }
}

/// Show the stored configuration, or update it when a value is given.
pub fn configure(api_base_url: Option<String>) -> Result<()> {
    let mut config = Config::load()?;
    match api_base_url {
        Some(url) => {
            let url = url.trim().trim_end_matches('/').to_string();
            Config::validate_url(&url)?;
            config.api_base_url = Some(url.clone());
            config.save()?;
            println!("API base URL set to {url}");
        }
        None => match config.api_base_url.as_deref() {
            Some(url) => println!("api_base_url = {url}"),
            None => println!("api_base_url is not set (pass --api-base-url to set it)."),
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // The home override is process-global, so everything touching it stays
    // in this single test.
    #[test]
    fn test_configure_saves_and_load_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var(HOME_ENV, dir.path());
        std::env::remove_var(BASE_URL_ENV);

        configure(Some("https://api.cloudflix.example/".into())).unwrap();
        assert!(dir.path().join("config.toml").exists());

        let config = Config::load().unwrap();
        assert_eq!(
            config.api_base_url().unwrap(),
            "https://api.cloudflix.example"
        );

        // The env var still outranks the saved value.
        std::env::set_var(BASE_URL_ENV, "https://staging.cloudflix.example");
        assert_eq!(
            config.api_base_url().unwrap(),
            "https://staging.cloudflix.example"
        );
        std::env::remove_var(BASE_URL_ENV);

        // A malformed URL is rejected before anything is written.
        assert!(configure(Some("not a url".into())).is_err());
        let config = Config::load().unwrap();
        assert_eq!(
            config.api_base_url().unwrap(),
            "https://api.cloudflix.example"
        );

        std::env::remove_var(HOME_ENV);
    }
}
