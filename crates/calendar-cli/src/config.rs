//! TOML configuration for the `calendar` CLI.
//!
//! Looked up at `--config` if given, otherwise at
//! `<config dir>/calendar/config.toml`. Missing files mean defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides the configured store path.
pub const STORE_ENV: &str = "CALENDAR_STORE";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the event collection is persisted.
    pub store_path: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// File this configuration was read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: None,
            log_filter: "warn".to_string(),
            source: None,
        }
    }
}

impl Config {
    /// Load from an explicit path (which must exist) or the default location.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.log_filter.trim().is_empty() {
            anyhow::bail!("log_filter must not be empty");
        }
        Ok(config)
    }

    /// Store path by precedence: flag, then `CALENDAR_STORE`, then config, then
    /// the platform data directory.
    pub fn resolve_store_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| std::env::var_os(STORE_ENV).map(PathBuf::from))
            .or_else(|| self.store_path.clone())
            .unwrap_or_else(default_store_path)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("calendar").join("config.toml"))
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("calendar"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("events.json")
}
