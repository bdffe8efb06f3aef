//! TOML configuration shared by the trainer, the HTTP server and the form UI.
//!
//! Config keys (TOML): `model_path`, `[dataset]` (`url`, `sha256`, `cache_path`,
//! `max_bytes`, `max_attempts`, `base_delay_ms`, `max_delay_ms`), `[server]` (`bind`).
//! Every key is optional; missing keys fall back to defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::{DEFAULT_DATASET_URL, DownloadOptions, download::DEFAULT_MAX_BYTES};
use crate::http_client::RetryPolicy;

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "cultivar.toml";
/// Env var naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "CULTIVAR_CONFIG";
/// Env var overriding `model_path`.
pub const MODEL_PATH_ENV: &str = "CULTIVAR_MODEL_PATH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Location of the trained model JSON.
    pub model_path: PathBuf,
    pub dataset: DatasetSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    pub url: String,
    pub sha256: Option<String>,
    pub cache_path: Option<PathBuf>,
    pub max_bytes: usize,
    pub max_attempts: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Socket address for the HTTP endpoint.
    pub bind: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("model.json"),
            dataset: DatasetSettings::default(),
            server: ServerSettings::default(),
        }
    }
}

impl Default for DatasetSettings {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            url: DEFAULT_DATASET_URL.to_string(),
            sha256: None,
            cache_path: None,
            max_bytes: DEFAULT_MAX_BYTES,
            max_attempts: retry.max_attempts,
            base_delay_ms: retry.base_delay.as_millis() as u64,
            max_delay_ms: retry.max_delay.as_millis() as u64,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

impl DatasetSettings {
    pub fn download_options(&self) -> DownloadOptions {
        DownloadOptions {
            url: self.url.clone(),
            sha256: self.sha256.clone(),
            max_bytes: self.max_bytes,
            retry: RetryPolicy {
                max_attempts: self.max_attempts.max(1),
                base_delay: Duration::from_millis(self.base_delay_ms),
                max_delay: Duration::from_millis(self.max_delay_ms),
            },
            cache_path: self.cache_path.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found at {path}")]
    NotFound { path: PathBuf },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Load configuration using the process environment and working directory.
///
/// Resolution order: `explicit`, `CULTIVAR_CONFIG`, `./cultivar.toml`, defaults.
/// `CULTIVAR_MODEL_PATH` then overrides `model_path`.
pub fn load_or_default(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let env_path = non_empty_env(CONFIG_PATH_ENV).map(PathBuf::from);
    let local = PathBuf::from(CONFIG_FILE_NAME);
    let mut config = match resolve_config_path(explicit, env_path, &local) {
        Some(path) => {
            let config = load_from_path(&path)?;
            tracing::info!("Loaded config from {}", path.display());
            config
        }
        None => AppConfig::default(),
    };
    apply_model_path_override(&mut config, non_empty_env(MODEL_PATH_ENV));
    Ok(config)
}

/// Parse a config file; the file must exist.
pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve_config_path(
    explicit: Option<&Path>,
    env_path: Option<PathBuf>,
    local: &Path,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if env_path.is_some() {
        return env_path;
    }
    local.is_file().then(|| local.to_path_buf())
}

fn apply_model_path_override(config: &mut AppConfig, value: Option<String>) {
    if let Some(value) = value {
        config.model_path = PathBuf::from(value);
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
