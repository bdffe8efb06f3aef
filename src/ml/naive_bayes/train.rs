use std::collections::BTreeMap;

use thiserror::Error;

use super::{ClassStat, FeatureStats, NaiveBayesModel};
use crate::features::FEATURE_COUNT;

/// Replacement for a zero standard deviation so the density stays finite.
pub const STDEV_FLOOR: f64 = 1e-6;

/// Sample standard deviation needs at least two rows per class.
pub const MIN_CLASS_ROWS: usize = 2;

/// One labeled training example.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledRow {
    pub class_id: u32,
    pub features: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainError {
    #[error("Empty training set")]
    EmptyDataset,
    #[error("Malformed training row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },
    #[error("Class {class_id} has {rows} row(s); at least 2 are required")]
    InsufficientData { class_id: u32, rows: usize },
}

/// Fit per-class, per-feature Gaussian parameters.
///
/// The result does not depend on row order beyond floating-point rounding.
pub fn train(rows: &[LabeledRow]) -> Result<NaiveBayesModel, TrainError> {
    if rows.is_empty() {
        return Err(TrainError::EmptyDataset);
    }
    let mut grouped: BTreeMap<u32, Vec<&[f64]>> = BTreeMap::new();
    for (idx, row) in rows.iter().enumerate() {
        check_row(idx, row)?;
        grouped.entry(row.class_id).or_default().push(&row.features);
    }

    let mut classes = BTreeMap::new();
    for (class_id, members) in grouped {
        if members.len() < MIN_CLASS_ROWS {
            return Err(TrainError::InsufficientData {
                class_id,
                rows: members.len(),
            });
        }
        let mut stats = FeatureStats::new();
        for feature in 0..FEATURE_COUNT {
            let column: Vec<f64> = members.iter().map(|row| row[feature]).collect();
            let (mean, stdev) = mean_and_sample_stdev(&column);
            let stdev = if stdev == 0.0 { STDEV_FLOOR } else { stdev };
            stats.insert(feature, ClassStat { mean, stdev });
        }
        tracing::debug!(class_id, rows = members.len(), "Fitted class statistics");
        classes.insert(class_id, stats);
    }
    Ok(NaiveBayesModel::from_classes(classes))
}

fn check_row(idx: usize, row: &LabeledRow) -> Result<(), TrainError> {
    if row.features.len() != FEATURE_COUNT {
        return Err(TrainError::MalformedRow {
            row: idx,
            reason: format!(
                "expected {FEATURE_COUNT} features, got {}",
                row.features.len()
            ),
        });
    }
    if let Some(col) = row.features.iter().position(|v| !v.is_finite()) {
        return Err(TrainError::MalformedRow {
            row: idx,
            reason: format!("feature {col} is not a finite number"),
        });
    }
    Ok(())
}

/// Mean and Bessel-corrected standard deviation of `values` (len >= 2).
///
/// The first value is used as a pivot, so a constant column has exactly zero spread.
fn mean_and_sample_stdev(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let pivot = values[0];
    let shifted_sum: f64 = values.iter().map(|v| v - pivot).sum();
    let mean = pivot + shifted_sum / n;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    let variance = sum_sq / (n - 1.0);
    (mean, variance.sqrt())
}
