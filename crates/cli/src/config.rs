// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration.
//!
//! Configuration is stored in `<state_dir>/config.toml`:
//!
//! ```toml
//! [server]
//! base_url = "https://api.example.com"
//! token = "..."
//! request_timeout_secs = 30
//!
//! [sync]
//! max_retries = 3
//! settle_delay_ms = 2000
//! retention_days = 7
//! probe_path = "/"
//! probe_interval_secs = 5
//! ```
//!
//! Every field is optional. A missing file means all defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::env;
use crate::error::{Error, Result};
use crate::state::StateDir;
use crate::sync::EngineConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sync: SyncSettings,
}

/// Where and how to reach the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL that endpoints are joined onto.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Bearer token. `TRANQUIL_TOKEN` takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            base_url: None,
            token: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Queue and flush policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSettings {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    /// Path probed to decide reachability, relative to the base URL.
    #[serde(default = "default_probe_path")]
    pub probe_path: String,
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            max_retries: default_max_retries(),
            settle_delay_ms: default_settle_delay_ms(),
            retention_days: default_retention_days(),
            probe_path: default_probe_path(),
            probe_interval_secs: default_probe_interval_secs(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    tq_core::DEFAULT_MAX_RETRIES
}

fn default_settle_delay_ms() -> u64 {
    2000
}

fn default_retention_days() -> u32 {
    7
}

fn default_probe_path() -> String {
    "/".to_string()
}

fn default_probe_interval_secs() -> u64 {
    5
}

impl Config {
    /// Loads configuration from the state directory, or defaults if absent.
    pub fn load(state: &StateDir) -> Result<Self> {
        let path = state.config_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => return Err(Error::Config(format!("failed to read config: {e}"))),
        };
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the state directory, creating it if needed.
    pub fn save(&self, state: &StateDir) -> Result<()> {
        fs::create_dir_all(state.root())?;
        let content = toml::to_string_pretty(self)?;
        fs::write(state.config_path(), content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.server.base_url {
            validate_url(url)?;
        }
        let minimums = [
            ("server.request_timeout_secs", self.server.request_timeout_secs),
            ("sync.max_retries", u64::from(self.sync.max_retries)),
            ("sync.retention_days", u64::from(self.sync.retention_days)),
            ("sync.probe_interval_secs", self.sync.probe_interval_secs),
        ];
        match minimums.iter().find(|(_, value)| *value == 0) {
            Some((key, _)) => Err(Error::Config(format!("{key} must be at least 1"))),
            None => Ok(()),
        }
    }

    /// The configured base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] when no server has been set up.
    pub fn base_url(&self) -> Result<&str> {
        self.server.base_url.as_deref().ok_or(Error::NotConfigured)
    }

    pub fn is_configured(&self) -> bool {
        self.server.base_url.is_some()
    }

    /// Bearer token, with `TRANQUIL_TOKEN` taking precedence over the file.
    pub fn token(&self) -> Option<String> {
        self.token_with_override(env::token())
    }

    fn token_with_override(&self, env_token: Option<String>) -> Option<String> {
        env_token.or_else(|| {
            self.server
                .token
                .clone()
                .filter(|t| !t.trim().is_empty())
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.sync.probe_interval_secs)
    }

    /// Full URL of the reachability probe.
    pub fn probe_url(&self) -> Result<String> {
        let base = self.base_url()?;
        Ok(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            self.sync.probe_path.trim_start_matches('/')
        ))
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_retries: self.sync.max_retries,
            settle_delay: Duration::from_millis(self.sync.settle_delay_ms),
            retention: chrono::Duration::days(i64::from(self.sync.retention_days)),
        }
    }
}

/// Check that `url` is an absolute http(s) URL with a host.
pub fn validate_url(url: &str) -> Result<()> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| Error::InvalidUrl(url.to_string()))?;
    let host = rest.split('/').next().unwrap_or_default();
    if host.is_empty() || host.contains(char::is_whitespace) {
        return Err(Error::InvalidUrl(url.to_string()));
    }
    Ok(())
}

/// Resolve the state directory: flag, then `TRANQUIL_STATE_DIR`, then
/// `$XDG_STATE_HOME/tranquil`, then `~/.local/state/tranquil`.
pub fn resolve_state_dir(flag: Option<&Path>) -> PathBuf {
    resolve_state_dir_from(flag, env::state_dir(), env::xdg_state_home(), dirs::home_dir())
}

fn resolve_state_dir_from(
    flag: Option<&Path>,
    env_dir: Option<PathBuf>,
    xdg_state_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> PathBuf {
    if let Some(dir) = flag {
        return dir.to_path_buf();
    }
    if let Some(dir) = env_dir {
        return dir;
    }
    if let Some(dir) = xdg_state_home.filter(|d| !d.as_os_str().is_empty()) {
        return dir.join("tranquil");
    }
    home.map(|h| h.join(".local/state/tranquil"))
        .unwrap_or_else(|| PathBuf::from(".local/state/tranquil"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
