use std::collections::BTreeMap;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::features::{FEATURE_COUNT, FeatureVector};

use super::PredictError;

/// Mean and sample standard deviation of one feature within one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassStat {
    pub mean: f64,
    pub stdev: f64,
}

/// Per-feature statistics for a single class, keyed by feature index.
pub type FeatureStats = BTreeMap<usize, ClassStat>;

/// Gaussian Naive Bayes parameters: class id -> feature index -> stats.
///
/// Serialized as a bare JSON object (`{"1": {"0": {"mean": .., "stdev": ..}}}`).
/// The model is never mutated after construction; retraining replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NaiveBayesModel {
    classes: BTreeMap<u32, FeatureStats>,
}

/// Outcome of classifying one feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Class with the largest likelihood.
    pub class_id: u32,
    /// `L(class_id) / sum(L) * 100`, or 0 when every likelihood underflowed.
    pub confidence: f64,
    /// Unnormalized likelihood of every class in the model.
    pub likelihoods: BTreeMap<u32, f64>,
}

/// Gaussian probability density of `x` under `N(mean, stdev^2)`.
pub fn gaussian_density(x: f64, mean: f64, stdev: f64) -> f64 {
    let exponent = (-(x - mean).powi(2) / (2.0 * stdev.powi(2))).exp();
    exponent / ((2.0 * PI).sqrt() * stdev)
}

impl NaiveBayesModel {
    pub fn from_classes(classes: BTreeMap<u32, FeatureStats>) -> Self {
        Self { classes }
    }

    /// Class ids in ascending order.
    pub fn class_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.classes.keys().copied()
    }

    pub fn class_stats(&self, class_id: u32) -> Option<&FeatureStats> {
        self.classes.get(&class_id)
    }

    pub fn stat(&self, class_id: u32, feature: usize) -> Option<ClassStat> {
        self.classes.get(&class_id)?.get(&feature).copied()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// True when every class carries statistics for all feature indices.
    pub fn is_complete(&self) -> bool {
        self.classes
            .values()
            .all(|stats| (0..FEATURE_COUNT).all(|idx| stats.contains_key(&idx)))
    }

    /// Validate structural invariants of a loaded model.
    pub fn validate(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("Model contains no classes".to_string());
        }
        for (class_id, stats) in &self.classes {
            for (&feature, stat) in stats {
                if feature >= FEATURE_COUNT {
                    return Err(format!(
                        "Class {class_id} has feature index {feature} (expected < {FEATURE_COUNT})"
                    ));
                }
                if !stat.mean.is_finite() {
                    return Err(format!("Class {class_id} feature {feature} mean is not finite"));
                }
                if !stat.stdev.is_finite() || stat.stdev <= 0.0 {
                    return Err(format!(
                        "Class {class_id} feature {feature} stdev must be > 0, got {}",
                        stat.stdev
                    ));
                }
                // The density divides by stdev^2.
                if !(stat.stdev * stat.stdev).is_normal() {
                    return Err(format!(
                        "Class {class_id} feature {feature} stdev {} is too small to square",
                        stat.stdev
                    ));
                }
            }
        }
        Ok(())
    }

    /// Unnormalized likelihood of `input` under one class.
    ///
    /// Features the class has no statistics for contribute a factor of 1.
    pub fn likelihood(&self, class_id: u32, input: &FeatureVector) -> Option<f64> {
        let stats = self.classes.get(&class_id)?;
        let mut product = 1.0f64;
        for (idx, &x) in input.as_slice().iter().enumerate() {
            if let Some(stat) = stats.get(&idx) {
                product *= gaussian_density(x, stat.mean, stat.stdev);
            }
        }
        Some(product)
    }

    /// Classify a 13-value feature vector.
    ///
    /// Ties go to the first class in ascending id order. No class prior is
    /// applied, so `confidence` is a likelihood share rather than a posterior.
    /// A NaN likelihood is recorded as 0.
    pub fn predict(&self, input: &[f64]) -> Result<Prediction, PredictError> {
        let input = FeatureVector::from_slice(input).map_err(PredictError::InputShape)?;
        let mut likelihoods = BTreeMap::new();
        let mut best: Option<(u32, f64)> = None;
        for &class_id in self.classes.keys() {
            let value = match self.likelihood(class_id, &input) {
                Some(value) if !value.is_nan() => value,
                _ => 0.0,
            };
            likelihoods.insert(class_id, value);
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((class_id, value)),
            }
        }
        let (class_id, best_value) = best.ok_or(PredictError::ModelNotLoaded)?;
        let confidence = likelihood_share(best_value, &likelihoods);
        Ok(Prediction {
            class_id,
            confidence,
            likelihoods,
        })
    }
}

impl Prediction {
    /// Likelihood share of any class, on the same 0..=100 scale as `confidence`.
    pub fn share_of(&self, class_id: u32) -> Option<f64> {
        let value = *self.likelihoods.get(&class_id)?;
        Some(likelihood_share(value, &self.likelihoods))
    }
}

fn likelihood_share(value: f64, likelihoods: &BTreeMap<u32, f64>) -> f64 {
    let total: f64 = likelihoods.values().sum();
    if total.is_infinite() {
        if !value.is_infinite() {
            return 0.0;
        }
        let saturated = likelihoods.values().filter(|v| v.is_infinite()).count();
        return 100.0 / saturated as f64;
    }
    if total > 0.0 { value / total * 100.0 } else { 0.0 }
}
