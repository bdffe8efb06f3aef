use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::ml::naive_bayes::{self, NaiveBayesModel, PredictError, Prediction, StoreError};

/// Whether a model is available to the presentation shells.
#[derive(Debug, Clone, Default)]
pub enum ModelState {
    #[default]
    Unloaded,
    Loaded(Arc<NaiveBayesModel>),
}

impl ModelState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelState::Loaded(_))
    }

    pub fn model(&self) -> Option<&Arc<NaiveBayesModel>> {
        match self {
            ModelState::Loaded(model) => Some(model),
            ModelState::Unloaded => None,
        }
    }

    /// Classify against the loaded model, or fail with `ModelNotLoaded`.
    pub fn predict(&self, input: &[f64]) -> Result<Prediction, PredictError> {
        match self {
            ModelState::Loaded(model) => model.predict(input),
            ModelState::Unloaded => Err(PredictError::ModelNotLoaded),
        }
    }
}

/// Where a [`ModelSource`] gets its model from.
#[derive(Debug)]
enum ModelOrigin {
    File(PathBuf),
    Memory(Arc<NaiveBayesModel>),
}

/// Shared model handle injected into the HTTP server and the form UI.
///
/// Holds the model origin and the current state. A missing or corrupt
/// file leaves the state `Unloaded`; callers retry through [`ModelSource::current`].
#[derive(Debug)]
pub struct ModelSource {
    origin: ModelOrigin,
    state: RwLock<ModelState>,
}

impl ModelSource {
    /// Source backed by a model file; nothing is read until the first load.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            origin: ModelOrigin::File(path.into()),
            state: RwLock::new(ModelState::Unloaded),
        }
    }

    /// Source around an in-memory model with no backing file.
    pub fn from_model(model: NaiveBayesModel) -> Self {
        let model = Arc::new(model);
        Self {
            state: RwLock::new(ModelState::Loaded(Arc::clone(&model))),
            origin: ModelOrigin::Memory(model),
        }
    }

    /// Backing file, or `None` for an in-memory source.
    pub fn path(&self) -> Option<&Path> {
        match &self.origin {
            ModelOrigin::File(path) => Some(path.as_path()),
            ModelOrigin::Memory(_) => None,
        }
    }

    /// Read the model file and swap it in.
    ///
    /// On failure the previous state is kept and the error is returned.
    /// An in-memory source hands back its model.
    pub fn try_load(&self) -> Result<Arc<NaiveBayesModel>, StoreError> {
        let path = match &self.origin {
            ModelOrigin::File(path) => path,
            ModelOrigin::Memory(model) => return Ok(Arc::clone(model)),
        };
        let model = Arc::new(naive_bayes::load_json(path)?);
        tracing::info!(
            classes = model.len(),
            "Loaded model from {}",
            path.display()
        );
        let mut state = match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *state = ModelState::Loaded(Arc::clone(&model));
        Ok(model)
    }

    /// Current state, attempting a load first when nothing is loaded yet.
    pub fn current(&self) -> ModelState {
        let state = self.snapshot();
        if state.is_loaded() {
            return state;
        }
        match self.try_load() {
            Ok(model) => ModelState::Loaded(model),
            Err(err) => {
                tracing::warn!("Model unavailable: {err}");
                ModelState::Unloaded
            }
        }
    }

    /// Current state without touching the filesystem.
    pub fn snapshot(&self) -> ModelState {
        match self.state.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_loaded()
    }
}
