//! Parser for the comma-separated wine training data.
//!
//! Each non-blank line is `class,f0,f1,...,f12`: an integer class label
//! followed by the 13 measurements in model order.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::features::FEATURE_COUNT;
use crate::ml::naive_bayes::LabeledRow;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed dataset line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
    #[error("Dataset contains no rows")]
    Empty,
}

/// Parse CSV text into labeled rows. Line numbers in errors are 1-based.
pub fn parse_csv(text: &str) -> Result<Vec<LabeledRow>, DatasetError> {
    let mut rows = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        rows.push(parse_line(idx + 1, line)?);
    }
    if rows.is_empty() {
        return Err(DatasetError::Empty);
    }
    Ok(rows)
}

/// Read and parse a CSV file.
pub fn load_csv(path: &Path) -> Result<Vec<LabeledRow>, DatasetError> {
    let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = parse_csv(&text)?;
    tracing::info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn parse_line(line_no: usize, line: &str) -> Result<LabeledRow, DatasetError> {
    let malformed = |reason: String| DatasetError::MalformedRow {
        line: line_no,
        reason,
    };
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != FEATURE_COUNT + 1 {
        return Err(malformed(format!(
            "expected {} columns, got {}",
            FEATURE_COUNT + 1,
            fields.len()
        )));
    }
    let class_id = parse_class_id(fields[0])
        .ok_or_else(|| malformed(format!("invalid class label '{}'", fields[0])))?;
    let mut features = Vec::with_capacity(FEATURE_COUNT);
    for (col, raw) in fields[1..].iter().enumerate() {
        let value = raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| malformed(format!("column {} is not numeric: '{raw}'", col + 1)))?;
        features.push(value);
    }
    Ok(LabeledRow { class_id, features })
}

/// Accepts `3` as well as `3.0`.
fn parse_class_id(raw: &str) -> Option<u32> {
    if let Ok(id) = raw.parse::<u32>() {
        return Some(id);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.fract() == 0.0 && value >= 0.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}
