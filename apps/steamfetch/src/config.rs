//! steamfetch configuration.
//!
//! Configuration is stored as TOML:
//! - Linux: `$XDG_CONFIG_HOME/steamfetch/config.toml` or `~/.config/steamfetch/config.toml`
//! - Windows: `%APPDATA%/steamfetch/config.toml`
//!
//! A missing file means defaults. The API key is usually supplied through
//! `STEAM_API_KEY` instead of the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use steamfetch_web::TransportConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Steam Web API key.
    #[serde(default)]
    pub api_key: String,

    /// Two-letter country code used for store prices.
    #[serde(default)]
    pub country_code: Option<String>,

    #[serde(default)]
    pub transport: TransportSettings,
}

/// Retry and timeout settings, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportSettings {
    #[serde(default = "default_open_timeout")]
    pub open_timeout_secs: f64,

    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: f64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_base_backoff")]
    pub base_backoff_secs: f64,

    #[serde(default = "default_true")]
    pub jitter: bool,
}

fn default_open_timeout() -> f64 {
    3.0
}

fn default_read_timeout() -> f64 {
    5.0
}

fn default_max_retries() -> u32 {
    2
}

fn default_base_backoff() -> f64 {
    0.5
}

fn default_true() -> bool {
    true
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            open_timeout_secs: default_open_timeout(),
            read_timeout_secs: default_read_timeout(),
            max_retries: default_max_retries(),
            base_backoff_secs: default_base_backoff(),
            jitter: default_true(),
        }
    }
}

impl TransportSettings {
    pub fn to_transport_config(&self) -> anyhow::Result<TransportConfig> {
        Ok(TransportConfig {
            open_timeout: secs("open_timeout_secs", self.open_timeout_secs)?,
            read_timeout: secs("read_timeout_secs", self.read_timeout_secs)?,
            max_retries: self.max_retries,
            base_backoff: secs("base_backoff_secs", self.base_backoff_secs)?,
            jitter: self.jitter,
        })
    }
}

fn secs(name: &str, value: f64) -> anyhow::Result<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|_| anyhow::anyhow!("{name} must be a non-negative number of seconds, got {value}"))
}

impl Config {
    /// Loads configuration from `path`, or from the default location when
    /// `None`. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path()?,
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Applies command-line and environment overrides.
    pub fn merge(mut self, api_key: Option<String>, country_code: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = key;
        }
        if country_code.is_some() {
            self.country_code = country_code;
        }
        self
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let base = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
            .unwrap_or_else(|_| PathBuf::from("/tmp"));
        Ok(base.join("steamfetch").join("config.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("steamfetch").join("config.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("steamfetch")
            .join("config.toml"))
    }
}
