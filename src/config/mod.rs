// ABOUTME: Configuration management for sellcar
// Handles API endpoint settings, location search tuning and the draft storage location

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

const ENV_API_URL: &str = "SELLCAR_API_URL";
const ENV_API_TOKEN: &str = "SELLCAR_API_TOKEN";
const ENV_DATA_DIR: &str = "SELLCAR_DATA_DIR";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application version
    #[serde(default = "default_version")]
    pub version: String,

    /// Marketplace backend settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Location typeahead tuning
    #[serde(default)]
    pub location: LocationConfig,

    /// Where drafts and logs live
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the marketplace REST API
    #[serde(default)]
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Optional bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: default_timeout_secs(),
            token: None,
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Quiet period after the last keystroke before searching (default: 300ms)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Shorter queries never hit the network (default: 3)
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Suggestions per page (default: 20)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Distance from the bottom of the panel that triggers the next page (default: 40px)
    #[serde(default = "default_scroll_threshold_px")]
    pub scroll_threshold_px: u32,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
            page_size: default_page_size(),
            scroll_threshold_px: default_scroll_threshold_px(),
        }
    }
}

impl LocationConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Take every value the other layer changed from its default
    fn merge(&mut self, other: LocationConfig) {
        if other.debounce_ms != default_debounce_ms() {
            self.debounce_ms = other.debounce_ms;
        }
        if other.min_query_len != default_min_query_len() {
            self.min_query_len = other.min_query_len;
        }
        if other.page_size != default_page_size() {
            self.page_size = other.page_size;
        }
        if other.scroll_threshold_px != default_scroll_threshold_px() {
            self.scroll_threshold_px = other.scroll_threshold_px;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory (default: ~/.sellcar)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("sellcar/{}", env!("CARGO_PKG_VERSION"))
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_len() -> usize {
    3
}

fn default_page_size() -> u32 {
    20
}

fn default_scroll_threshold_px() -> u32 {
    40
}

impl AppConfig {
    /// Load configuration from default locations, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_paths(&Self::get_config_paths())?;
        config.apply_env(&load_from_env());
        Ok(config)
    }

    /// Load and merge the given files in order; later files win
    pub fn load_from_paths(paths: &[PathBuf]) -> Result<Self> {
        let mut config = Self {
            version: default_version(),
            ..Self::default()
        };

        for path in paths {
            if path.exists() {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config from {}", path.display()))?;

                let file_config: AppConfig = toml::from_str(&content)
                    .with_context(|| format!("Failed to parse config from {}", path.display()))?;

                debug!("Loaded config from {}", path.display());
                config.merge(file_config);
            }
        }

        Ok(config)
    }

    /// Get configuration file paths in order of precedence (lowest first)
    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        // 1. User config (~/.sellcar/config/config.toml)
        if let Ok(config_dir) = Self::get_user_config_dir() {
            paths.push(config_dir.join("config.toml"));
        }

        // 2. Local project config
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(".sellcar").join("config.toml"));
        }

        paths
    }

    /// Get user configuration directory
    fn get_user_config_dir() -> Result<PathBuf> {
        Ok(base_dir()?.join("config"))
    }

    /// Merge another config into this one
    fn merge(&mut self, other: AppConfig) {
        if !other.api.base_url.is_empty() {
            self.api.base_url = other.api.base_url;
        }
        if other.api.token.is_some() {
            self.api.token = other.api.token;
        }
        if other.api.user_agent != default_user_agent() {
            self.api.user_agent = other.api.user_agent;
        }
        if other.api.timeout_secs != default_timeout_secs() {
            self.api.timeout_secs = other.api.timeout_secs;
        }

        self.location.merge(other.location);

        if other.storage.data_dir.is_some() {
            self.storage.data_dir = other.storage.data_dir;
        }
    }

    /// Apply `SELLCAR_*` environment overrides
    pub fn apply_env(&mut self, env: &HashMap<String, String>) {
        if let Some(url) = env.get(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(token) = env.get(ENV_API_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.api.token = Some(token.trim().to_string());
        }
        if let Some(dir) = env.get(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            self.storage.data_dir = Some(PathBuf::from(dir.trim()));
        }
    }

    /// Resolved data directory
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => base_dir(),
        }
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("logs"))
    }
}

/// Base sellcar directory (~/.sellcar)
pub fn base_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".sellcar"))
}

/// Load configuration from environment
pub fn load_from_env() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with("SELLCAR_"))
        .collect()
}
