//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API base URL, session length, where the token is
//! persisted, and the last used username.
//!
//! Configuration is stored at `~/.config/innkeeper/config.json`. The API URL
//! can be overridden with `INNKEEPER_API_URL`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::auth::{
    FileStore, KeyValueStore, KeyringStore, RestorePolicy, DEFAULT_SESSION_HOURS,
};

/// Application name used for config/data directory paths
const APP_NAME: &str = "innkeeper";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding `api_url`
pub const API_URL_ENV: &str = "INNKEEPER_API_URL";

/// Longest session a config file may ask for (one year)
const MAX_SESSION_HOURS: i64 = 24 * 365;

/// API used when nothing is configured
const DEFAULT_API_URL: &str = "http://localhost:5000/api/";

/// Where the session token is persisted between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenBackend {
    #[default]
    File,
    Keyring,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: Option<String>,
    pub session_hours: i64,
    pub token_backend: TokenBackend,
    pub restore_policy: RestorePolicy,
    pub last_username: Option<String>,
    /// Set from the command line; beats both the environment and the file
    #[serde(skip)]
    pub api_url_override: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            session_hours: DEFAULT_SESSION_HOURS,
            token_backend: TokenBackend::default(),
            restore_policy: RestorePolicy::default(),
            last_username: None,
            api_url_override: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// A malformed file is an error rather than a silent default, so a
    /// later `save` cannot overwrite it.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Invalid config in {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Base URL for the REST API, always ending in `/`.
    /// Precedence: command-line override, environment, config file.
    pub fn api_url(&self) -> String {
        let raw = self
            .api_url_override
            .clone()
            .or_else(|| std::env::var(API_URL_ENV).ok())
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        normalize_base_url(&raw)
    }

    /// Session length handed to the session manager after login.
    /// Non-positive values fall back to the default; long ones are capped at a year.
    pub fn session_duration(&self) -> Duration {
        let hours = if self.session_hours > 0 {
            self.session_hours.min(MAX_SESSION_HOURS)
        } else {
            DEFAULT_SESSION_HOURS
        };
        Duration::try_hours(hours).unwrap_or_else(|| Duration::hours(DEFAULT_SESSION_HOURS))
    }

    /// Build the configured token store
    pub fn token_store(&self) -> Result<Arc<dyn KeyValueStore>> {
        let store: Arc<dyn KeyValueStore> = match self.token_backend {
            TokenBackend::File => Arc::new(FileStore::in_dir(self.data_dir()?)),
            TokenBackend::Keyring => Arc::new(KeyringStore::new()),
        };
        Ok(store)
    }
}

fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}
