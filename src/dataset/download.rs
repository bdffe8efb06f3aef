//! Fetch the wine training CSV over HTTP(S) with bounded retries.

use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;
use url::Url;

use crate::http_client::{self, RetryPolicy};

/// Public UCI location of the wine recognition data.
pub const DEFAULT_DATASET_URL: &str =
    "https://archive.ics.uci.edu/ml/machine-learning-databases/wine/wine.data";

/// Upper bound on the downloaded body; the real file is about 11 KiB.
pub const DEFAULT_MAX_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub url: String,
    /// Expected SHA-256 of the body, hex encoded.
    pub sha256: Option<String>,
    pub max_bytes: usize,
    pub retry: RetryPolicy,
    /// Where to keep a copy of the downloaded CSV.
    pub cache_path: Option<PathBuf>,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATASET_URL.to_string(),
            sha256: None,
            max_bytes: DEFAULT_MAX_BYTES,
            retry: RetryPolicy::default(),
            cache_path: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Invalid dataset URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Failed to download {url}: HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("Failed to download {url}: {reason}")]
    Transport { url: String, reason: String },
    #[error("Failed to read response from {url}: {source}")]
    Body { url: String, source: std::io::Error },
    #[error("Dataset from {url} is not valid UTF-8")]
    NotUtf8 { url: String },
    #[error("Dataset SHA-256 mismatch: expected {expected}, got {actual}")]
    Checksum { expected: String, actual: String },
    #[error("Failed to cache dataset at {path}: {source}")]
    Cache {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Transport failures and server errors are worth another attempt.
    fn is_transient(&self) -> bool {
        match self {
            DownloadError::Transport { .. } => true,
            DownloadError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Download the dataset text, verifying size, encoding and optional checksum.
pub fn fetch_dataset(options: &DownloadOptions) -> Result<String, DownloadError> {
    validate_url(&options.url)?;
    let expected_sha256 = options
        .sha256
        .as_deref()
        .map(|value| normalize_sha256(&options.url, value))
        .transpose()?;

    tracing::info!("Downloading dataset from {}", options.url);
    let bytes = http_client::with_retries(
        options.retry,
        || fetch_once(&options.url, options.max_bytes),
        DownloadError::is_transient,
        |attempt, err| tracing::warn!(attempt, "Dataset download failed, retrying: {err}"),
    )?;

    if let Some(expected) = expected_sha256 {
        let actual = format!("{:x}", Sha256::digest(&bytes));
        if actual != expected {
            return Err(DownloadError::Checksum { expected, actual });
        }
    }
    let text = String::from_utf8(bytes).map_err(|_| DownloadError::NotUtf8 {
        url: options.url.clone(),
    })?;
    if let Some(path) = &options.cache_path {
        write_cache(path, &text)?;
    }
    tracing::info!("Downloaded {} bytes", text.len());
    Ok(text)
}

fn fetch_once(url: &str, max_bytes: usize) -> Result<Vec<u8>, DownloadError> {
    let response = match http_client::agent().get(url).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(status, _)) => {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status,
            });
        }
        Err(err) => {
            return Err(DownloadError::Transport {
                url: url.to_string(),
                reason: err.to_string(),
            });
        }
    };
    http_client::read_body_capped(response, max_bytes).map_err(|source| DownloadError::Body {
        url: url.to_string(),
        source,
    })
}

fn validate_url(url: &str) -> Result<(), DownloadError> {
    let invalid = |reason: String| DownloadError::InvalidUrl {
        url: url.to_string(),
        reason,
    };
    let parsed = Url::parse(url).map_err(|err| invalid(err.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{other}'"))),
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(())
}

fn normalize_sha256(url: &str, value: &str) -> Result<String, DownloadError> {
    let trimmed = value.trim();
    if trimmed.len() != 64 || !trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(DownloadError::InvalidUrl {
            url: url.to_string(),
            reason: format!("expected SHA-256 to be 64 hex characters, got '{trimmed}'"),
        });
    }
    Ok(trimmed.to_ascii_lowercase())
}

fn write_cache(path: &Path, text: &str) -> Result<(), DownloadError> {
    let cache_err = |source: std::io::Error| DownloadError::Cache {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(cache_err)?;
    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(cache_err)?;
    tmp.write_all(text.as_bytes()).map_err(cache_err)?;
    tmp.persist(path).map_err(|err| cache_err(err.error))?;
    Ok(())
}
