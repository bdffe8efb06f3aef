//! Wine chemistry feature layout shared by training, inference and the front ends.
//!
//! The position of each measurement is load-bearing: index `i` here is the
//! feature index stored in the model file and column `i + 1` of the training CSV.

/// Number of chemical measurements per wine sample.
pub const FEATURE_COUNT: usize = 13;

/// Request keys for each feature, in model order.
pub const FEATURE_KEYS: [&str; FEATURE_COUNT] = [
    "alcohol",
    "malic_acid",
    "ash",
    "alcalinity_of_ash",
    "magnesium",
    "total_phenols",
    "flavanoids",
    "nonflavanoid_phenols",
    "proanthocyanins",
    "color_intensity",
    "hue",
    "od280",
    "proline",
];

/// Human-readable labels for each feature, in model order.
pub const FEATURE_LABELS: [&str; FEATURE_COUNT] = [
    "Alcohol",
    "Malic Acid",
    "Ash",
    "Alcalinity of Ash",
    "Magnesium",
    "Total Phenols",
    "Flavanoids",
    "Nonflavanoid Phenols",
    "Proanthocyanins",
    "Color Intensity",
    "Hue",
    "OD280",
    "Proline",
];

/// Ordered, shape-checked feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

/// Reasons a raw slice cannot be used as a feature vector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeError {
    #[error("expected {expected} features, got {got}")]
    Length { expected: usize, got: usize },
    #[error("feature {index} ({name}) is not a finite number")]
    NonFinite { index: usize, name: &'static str },
}

impl FeatureVector {
    /// Build a vector from values already in model order.
    pub fn new(values: [f64; FEATURE_COUNT]) -> Result<Self, ShapeError> {
        if let Some(index) = values.iter().position(|value| !value.is_finite()) {
            return Err(ShapeError::NonFinite {
                index,
                name: FEATURE_KEYS[index],
            });
        }
        Ok(Self(values))
    }

    /// Check the length and finiteness of a raw slice.
    pub fn from_slice(values: &[f64]) -> Result<Self, ShapeError> {
        let values: [f64; FEATURE_COUNT] =
            values.try_into().map_err(|_| ShapeError::Length {
                expected: FEATURE_COUNT,
                got: values.len(),
            })?;
        Self::new(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }
}
