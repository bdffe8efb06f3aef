use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use super::NaiveBayesModel;

/// Errors raised while reading or writing a model file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The model file does not exist; callers treat this as "untrained".
    #[error("Model file not found at {path}")]
    NotFound { path: PathBuf },
    #[error("Failed to read model file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write model file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to encode model: {0}")]
    Encode(serde_json::Error),
    /// The content is not a valid model (bad JSON, missing keys, bad leaves).
    #[error("Corrupt model store: {reason}")]
    Corrupt { reason: String },
}

/// Serialize a model to indented JSON bytes.
pub fn to_json_bytes(model: &NaiveBayesModel) -> Result<Vec<u8>, StoreError> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    model.serialize(&mut serializer).map_err(StoreError::Encode)?;
    out.push(b'\n');
    Ok(out)
}

/// Parse and validate model JSON bytes.
pub fn from_json_bytes(bytes: &[u8]) -> Result<NaiveBayesModel, StoreError> {
    let model: NaiveBayesModel =
        serde_json::from_slice(bytes).map_err(|err| StoreError::Corrupt {
            reason: err.to_string(),
        })?;
    model
        .validate()
        .map_err(|reason| StoreError::Corrupt { reason })?;
    Ok(model)
}

/// Load a model file from disk.
pub fn load_json(path: &Path) -> Result<NaiveBayesModel, StoreError> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            StoreError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            StoreError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let model = from_json_bytes(&bytes)?;
    if !model.is_complete() {
        tracing::warn!(
            "Model at {} is missing some feature statistics; those features are skipped",
            path.display()
        );
    }
    Ok(model)
}

/// Write a model file, replacing any previous file only once the write succeeded.
pub fn save_json(path: &Path, model: &NaiveBayesModel) -> Result<(), StoreError> {
    let bytes = to_json_bytes(model)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let write_err = |source: std::io::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };
    std::fs::create_dir_all(&dir).map_err(write_err)?;
    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(write_err)?;
    tmp.write_all(&bytes).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.persist(path).map_err(|err| write_err(err.error))?;
    Ok(())
}
