//! Glue between the inference engine and the presentation shells.

mod handle;
mod request;

pub use handle::{ModelSource, ModelState};
pub use request::{ErrorResponse, PredictionResponse, RequestError, WineSample, format_confidence};

use crate::ml::naive_bayes::PredictError;

/// Message shown to HTTP clients when no model can be loaded.
pub const MODEL_NOT_LOADED_MESSAGE: &str = "Model not loaded. Please contact administrator.";

/// Classify a named-field sample against the given state.
pub fn classify(state: &ModelState, sample: &WineSample) -> Result<PredictionResponse, PredictError> {
    let features = sample.to_features()?;
    let prediction = state.predict(features.as_slice())?;
    tracing::debug!(
        class_id = prediction.class_id,
        confidence = prediction.confidence,
        "Classified sample"
    );
    Ok(PredictionResponse::from(&prediction))
}
