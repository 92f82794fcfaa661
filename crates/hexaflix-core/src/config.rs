use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::error::{HexaflixError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HexaflixConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Optional configured API key. `TMDB_API_KEY` in the environment and a
    /// saved session both take precedence over this.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            api_key: None,
            language: default_language(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    /// Custom path for the profile store. Defaults to
    /// `~/.config/hexaflix/profile.json`.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_web_host")]
    pub host: String,
    #[serde(default = "default_web_port")]
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
        }
    }
}

// -- Defaults --

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}
fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}
fn default_language() -> String {
    "en-US".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_storage_backend() -> String {
    "file".to_string()
}
fn default_web_host() -> String {
    "127.0.0.1".to_string()
}
fn default_web_port() -> u16 {
    5000
}

/// Valid storage backend names.
pub const VALID_STORAGE_BACKENDS: &[&str] = &["file", "memory"];

const MAX_TIMEOUT_SECS: u64 = 120;

impl HexaflixConfig {
    /// Load configuration with three-layer TOML merge:
    /// 1. ~/.config/hexaflix/config.toml (global)
    /// 2. .hexaflix/config.toml (project)
    /// 3. .hexaflix/config.local.toml (local, gitignored)
    pub fn load(project_dir: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(dir) = project_dir {
            let project_config = dir.join(".hexaflix").join("config.toml");
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }

            let local_config = dir.join(".hexaflix").join("config.local.toml");
            if local_config.exists() {
                builder = builder.add_source(File::from(local_config).required(false));
            }
        }

        let config = builder
            .build()
            .map_err(|e| HexaflixError::Config(e.to_string()))?;

        let mut cfg: Self = config
            .try_deserialize()
            .map_err(|e| HexaflixError::Config(e.to_string()))?;

        for warning in cfg.validate() {
            tracing::warn!("config: {warning}");
        }
        Ok(cfg)
    }

    /// Load with defaults only (no files).
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Validate config values, fixing out-of-range values and collecting
    /// warnings. Lenient: repairs rather than rejects.
    pub fn validate(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !VALID_STORAGE_BACKENDS.contains(&self.storage.backend.as_str()) {
            warnings.push(format!(
                "unknown storage backend '{}', valid: {}; falling back to 'file'",
                self.storage.backend,
                VALID_STORAGE_BACKENDS.join(", ")
            ));
            self.storage.backend = default_storage_backend();
        }

        if self.api.timeout_secs == 0 || self.api.timeout_secs > MAX_TIMEOUT_SECS {
            warnings.push(format!(
                "api.timeout_secs = {} out of range [1, {MAX_TIMEOUT_SECS}], resetting to default",
                self.api.timeout_secs
            ));
            self.api.timeout_secs = default_timeout_secs();
        }

        if self.api.base_url.ends_with('/') {
            self.api.base_url.truncate(self.api.base_url.len() - 1);
        }
        if self.api.image_base_url.ends_with('/') {
            let len = self.api.image_base_url.len() - 1;
            self.api.image_base_url.truncate(len);
        }

        warnings
    }

    /// The API key from the environment (`TMDB_API_KEY`) or the config file,
    /// in that order. Saved sessions are resolved separately by the profile.
    pub fn configured_api_key(&self) -> Option<String> {
        if let Ok(key) = std::env::var("TMDB_API_KEY") {
            if !key.is_empty() {
                return Some(key);
            }
        }
        self.api.api_key.clone().filter(|k| !k.is_empty())
    }
}

/// `~/.config/hexaflix/config.toml`
fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("hexaflix").join("config.toml"))
}
