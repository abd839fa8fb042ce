//! Configuration types and loading
//!
//! Config precedence: env vars > config file > defaults. The lookup base can
//! be overridden with `USER_CONTEXT_URL` so deployments can point at a
//! different directory without editing the file.

use serde::Deserialize;
use session::EwsMode;
use session_pool::PoolSettings;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub sessions: SessionsConfig,
}

/// Session pool and user lookup settings
#[derive(Debug, Deserialize)]
pub struct SessionsConfig {
    /// Windows domain prefixed to bare login names
    #[serde(default)]
    pub default_domain: Option<String>,
    /// Lookup base for per-user context documents (`http(s)://` or `file://`)
    #[serde(default)]
    pub user_context_url: Option<String>,
    #[serde(default)]
    pub enable_ews: EwsMode,
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_secs: u64,
}

fn default_lookup_timeout() -> u64 {
    30
}

const LOOKUP_SCHEMES: &[&str] = &["http://", "https://", "file://"];

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        if let Ok(url) = std::env::var("USER_CONTEXT_URL") {
            config.sessions.user_context_url = Some(url);
        }

        // Blank values mean "not configured"; lookups then fail at resolve time.
        config.sessions.user_context_url = config
            .sessions
            .user_context_url
            .take()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        config.sessions.default_domain = config
            .sessions
            .default_domain
            .take()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        if let Some(url) = &config.sessions.user_context_url {
            if !LOOKUP_SCHEMES.iter().any(|s| url.starts_with(s)) {
                return Err(common::Error::Config(format!(
                    "user_context_url must start with http://, https:// or file://, got: {url}"
                )));
            }
        }

        if config.sessions.lookup_timeout_secs == 0 {
            return Err(common::Error::Config(
                "lookup_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(config)
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("session-gateway.toml")
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.sessions.lookup_timeout_secs)
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            default_domain: self.sessions.default_domain.clone(),
            ews_mode: self.sessions.enable_ews,
        }
    }
}
