use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::{FeatureVector, ShapeError};
use crate::labels::class_label;
use crate::ml::naive_bayes::Prediction;

/// Named-field prediction request as posted by the HTML form or an API client.
///
/// Field order is irrelevant on the wire; [`WineSample::to_features`] fixes it.
/// Values may be JSON numbers or numeric strings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct WineSample {
    #[serde(deserialize_with = "lenient_f64")]
    pub alcohol: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub malic_acid: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub ash: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub alcalinity_of_ash: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub magnesium: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub total_phenols: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub flavanoids: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub nonflavanoid_phenols: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub proanthocyanins: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub color_intensity: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub hue: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub od280: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub proline: f64,
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

impl WineSample {
    pub fn from_json(body: &[u8]) -> Result<Self, RequestError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Values in model order, rejecting non-finite numbers.
    pub fn to_features(&self) -> Result<FeatureVector, ShapeError> {
        FeatureVector::new([
            self.alcohol,
            self.malic_acid,
            self.ash,
            self.alcalinity_of_ash,
            self.magnesium,
            self.total_phenols,
            self.flavanoids,
            self.nonflavanoid_phenols,
            self.proanthocyanins,
            self.color_intensity,
            self.hue,
            self.od280,
            self.proline,
        ])
    }
}

/// Response body of a successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: String,
    /// Percentage with two decimals, e.g. `"97.31%"`.
    pub confidence: String,
}

impl From<&Prediction> for PredictionResponse {
    fn from(prediction: &Prediction) -> Self {
        Self {
            prediction: class_label(prediction.class_id),
            confidence: format_confidence(prediction.confidence),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn format_confidence(confidence: f64) -> String {
    format!("{confidence:.2}%")
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientF64;

    impl Visitor<'_> for LenientF64 {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number or a numeric string")
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<f64, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<f64, E> {
            Ok(value as f64)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<f64, E> {
            Ok(value as f64)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<f64, E> {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("could not convert string to float: '{value}'")))
        }
    }

    deserializer.deserialize_any(LenientF64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    const SAMPLE: &str = r#"{
        "alcohol": 13.2, "malic_acid": "1.78", "ash": 2.14, "alcalinity_of_ash": 11.2,
        "magnesium": 100, "total_phenols": 2.65, "flavanoids": 2.76,
        "nonflavanoid_phenols": 0.26, "proanthocyanins": 1.28, "color_intensity": 4.38,
        "hue": 1.05, "od280": 3.4, "proline": "1050", "extra": true
    }"#;

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        let sample = WineSample::from_json(SAMPLE.as_bytes()).unwrap();
        let features = sample.to_features().unwrap();
        assert_eq!(features.get(0), Some(13.2));
        assert_eq!(features.get(1), Some(1.78));
        assert_eq!(features.get(4), Some(100.0));
        assert_eq!(features.get(12), Some(1050.0));
    }

    #[test]
    fn missing_key_names_the_field() {
        let body = SAMPLE.replace("\"hue\": 1.05,", "");
        let err = WineSample::from_json(body.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("hue"), "{err}");
    }

    #[test]
    fn non_numeric_string_is_rejected() {
        let body = SAMPLE.replace("\"1.78\"", "\"abc\"");
        let err = WineSample::from_json(body.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("abc"), "{err}");
    }

    #[test]
    fn null_value_is_rejected() {
        let body = SAMPLE.replace("2.14", "null");
        assert!(WineSample::from_json(body.as_bytes()).is_err());
    }

    #[test]
    fn nan_string_fails_shape_check() {
        let body = SAMPLE.replace("\"1050\"", "\"NaN\"");
        let sample = WineSample::from_json(body.as_bytes()).unwrap();
        assert!(matches!(
            sample.to_features(),
            Err(ShapeError::NonFinite { index: 12, .. })
        ));
    }

    #[test]
    fn response_formats_label_and_two_decimals() {
        let prediction = Prediction {
            class_id: 2,
            confidence: 97.314,
            likelihoods: BTreeMap::new(),
        };
        let response = PredictionResponse::from(&prediction);
        assert_eq!(response.prediction, "Cultivar 2 (e.g. Grignolino)");
        assert_eq!(response.confidence, "97.31%");
        assert_eq!(format_confidence(0.0), "0.00%");
    }
}
