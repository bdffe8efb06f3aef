//! Gaussian Naive Bayes classifier for the 13-feature wine dataset.
//!
//! - Training is a single pass computing per-class mean and sample standard deviation.
//! - Inference multiplies per-feature Gaussian densities and normalizes by the sum.
//! - Models round-trip through a flat JSON file.

mod model;
mod store;
mod train;

pub use model::{ClassStat, FeatureStats, NaiveBayesModel, Prediction, gaussian_density};
pub use store::{StoreError, from_json_bytes, load_json, save_json, to_json_bytes};
pub use train::{LabeledRow, MIN_CLASS_ROWS, STDEV_FLOOR, TrainError, train};

use thiserror::Error;

use crate::features::ShapeError;

/// Request-scoped inference failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    /// No model has been loaded (or the loaded model has no classes).
    #[error("Model not loaded")]
    ModelNotLoaded,
    /// The input is not 13 finite values in model order.
    #[error("Invalid input: {0}")]
    InputShape(#[from] ShapeError),
}
