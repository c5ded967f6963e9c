// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration.
//!
//! Configuration is read from a TOML file in which every key is optional:
//! - `api_base_url`: base of the remote API (`/messages`, `/pdfs`, `/health`)
//! - `origin`: the application's own origin; only same-origin responses are cached
//! - `cache_name`: the current cache generation
//! - probe, sync, replay, and warm-up tuning
//! - `static_assets`: the manifest of essential assets warmed on install

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::env;

const CONFIG_FILE_NAME: &str = "config.toml";
const STORE_FILE_NAME: &str = "store.json";
const CACHE_DIR_NAME: &str = "cache";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub origin: String,
    pub cache_name: String,
    pub probe_interval_secs: u64,
    pub probe_timeout_secs: u64,
    pub sync_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub max_replay_attempts: u32,
    pub warmup: WarmupConfig,
    pub static_assets: Vec<String>,
    pub offline_page: String,
    pub static_prefixes: Vec<String>,
    pub analytics_domains: Vec<String>,
    pub notification_icon: String,
}

/// Retry policy for warming the cache with essential assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarmupConfig {
    /// Attempts per asset before it is skipped.
    pub attempts: u32,
    /// Delay before the second attempt; doubles on each further attempt.
    pub initial_delay_ms: u64,
}

impl Default for WarmupConfig {
    fn default() -> Self {
        WarmupConfig {
            attempts: 3,
            initial_delay_ms: 200,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: "http://localhost:3000/api".to_string(),
            origin: "http://localhost:5173".to_string(),
            cache_name: "offline-pwa-cache-v1".to_string(),
            probe_interval_secs: 30,
            probe_timeout_secs: 5,
            sync_interval_secs: 60,
            request_timeout_secs: 30,
            max_replay_attempts: offsync_core::MAX_REPLAY_ATTEMPTS,
            warmup: WarmupConfig::default(),
            static_assets: [
                "./",
                "./index.html",
                "./offline.html",
                "./manifest.json",
                "./pwa-192x192.png",
                "./pwa-512x512.png",
                "./favicon.ico",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            offline_page: "./offline.html".to_string(),
            static_prefixes: vec!["/assets/".to_string(), "/static/".to_string()],
            analytics_domains: vec![
                "google-analytics".to_string(),
                "googletagmanager".to_string(),
            ],
            notification_icon: offsync_core::protocol::DEFAULT_ICON.to_string(),
        }
    }
}

impl Config {
    /// Loads and validates configuration from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Finds the configuration to use.
    ///
    /// Order: an explicit path, then `OFFSYNC_CONFIG`, then `config.toml` in
    /// the state directory, then built-in defaults.
    pub fn resolve(explicit: Option<&Path>, state_dir: &Path) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Some(path) = env::config_path() {
            return Self::load(&path);
        }
        let in_state_dir = state_dir.join(CONFIG_FILE_NAME);
        if in_state_dir.is_file() {
            return Self::load(&in_state_dir);
        }
        Ok(Config::default())
    }

    /// Checks URLs, retry bounds, and that intervals and timeouts are non-zero.
    pub fn validate(&self) -> ConfigResult<()> {
        http_url("api_base_url", &self.api_base_url)?;
        http_url("origin", &self.origin)?;
        if self.cache_name.trim().is_empty() || self.cache_name.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "cache_name '{}' must be non-empty and contain no path separators",
                self.cache_name
            )));
        }
        if self.max_replay_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_replay_attempts must be at least 1".to_string(),
            ));
        }
        if self.warmup.attempts == 0 {
            return Err(ConfigError::Invalid(
                "warmup.attempts must be at least 1".to_string(),
            ));
        }
        for (key, secs) in [
            ("probe_interval_secs", self.probe_interval_secs),
            ("probe_timeout_secs", self.probe_timeout_secs),
            ("sync_interval_secs", self.sync_interval_secs),
            ("request_timeout_secs", self.request_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::Invalid(format!("{} must be at least 1", key)));
            }
        }
        Ok(())
    }

    /// The application origin as a parsed URL.
    pub fn origin_url(&self) -> ConfigResult<Url> {
        http_url("origin", &self.origin)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn http_url(key: &str, value: &str) -> ConfigResult<Url> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::Invalid(format!("{} '{}': {}", key, value, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Invalid(format!(
            "{} must use http or https, got '{}'",
            key, other
        ))),
    }
}

/// Resolves the state directory.
///
/// Order: an explicit path, then `OFFSYNC_STATE_DIR`, then
/// `$XDG_STATE_HOME/offsync`, then `~/.local/state/offsync`.
pub fn resolve_state_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Some(dir) = env::state_dir() {
        return dir;
    }
    if let Some(dir) = env::xdg_state_home() {
        return dir.join("offsync");
    }
    dirs::home_dir()
        .map(|h| h.join(".local/state/offsync"))
        .unwrap_or_else(|| PathBuf::from(".local/state/offsync"))
}

/// Path of the local key-value store blob.
pub fn store_path(state_dir: &Path) -> PathBuf {
    state_dir.join(STORE_FILE_NAME)
}

/// Directory holding cache generations.
pub fn cache_dir(state_dir: &Path) -> PathBuf {
    state_dir.join(CACHE_DIR_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
