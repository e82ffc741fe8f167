//! Service context shared by all handlers.

use crate::error::{Error, Result};
use crate::model::ModelState;
use std::sync::Arc;

/// Immutable service context.
///
/// Unloaded until constructed with a model; never changes afterwards.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    model: Option<Arc<ModelState>>,
}

impl AppState {
    /// Context with no model; model-dependent endpoints answer 503.
    pub fn unloaded() -> Self {
        Self::default()
    }

    /// Context serving `model`.
    pub fn loaded(model: ModelState) -> Self {
        Self {
            model: Some(Arc::new(model)),
        }
    }

    /// Whether a model is loaded.
    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// The loaded model, if any.
    pub fn model(&self) -> Option<&Arc<ModelState>> {
        self.model.as_ref()
    }

    /// Guard for model-dependent handlers.
    pub fn require_model(&self) -> Result<Arc<ModelState>> {
        self.model.clone().ok_or(Error::ModelNotLoaded)
    }
}
