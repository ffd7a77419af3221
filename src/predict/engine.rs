//! Two-state prediction: trained quantile models, or the fallback heuristic.
//!
//! The engine never fails. Any problem (missing artifacts, empty input, a
//! model that cannot score the row) moves it straight to the fallback, and the
//! reason is reported in `meta.fallback_reason`. There are no retries.
//!
//! Models are loaded on first use and cached for the lifetime of the engine.
//! The cache lock is held while loading so concurrent callers never load
//! twice; afterwards callers only clone an `Arc` and score without locking.
//! Failed loads are not cached, so artifacts dropped in later are picked up.

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::domain::{FeatureVector, Prediction, PredictionMeta};
use crate::error::{ArtifactError, ModelError, PredictError};
use crate::math::round2;
use crate::predict::artifact::{ModelLoader, ModelSlot, QuantileRegressor};
use crate::predict::fallback::fallback_bounds;

/// Loaded upper/lower regressors.
#[derive(Debug, Clone)]
pub struct ModelPair {
    pub upper: Arc<dyn QuantileRegressor>,
    pub lower: Arc<dyn QuantileRegressor>,
}

pub struct PredictionEngine {
    loader: Box<dyn ModelLoader>,
    cache: Mutex<Option<Arc<ModelPair>>>,
}

impl std::fmt::Debug for PredictionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionEngine")
            .field("loader", &self.loader.describe())
            .finish()
    }
}

impl PredictionEngine {
    pub fn new(loader: impl ModelLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            cache: Mutex::new(None),
        }
    }

    pub fn describe_loader(&self) -> String {
        self.loader.describe()
    }

    /// Return the cached models, loading both slots on first use.
    pub fn models(&self) -> Result<Arc<ModelPair>, ArtifactError> {
        let mut guard = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(pair) = guard.as_ref() {
            return Ok(Arc::clone(pair));
        }

        let upper = self.loader.load(ModelSlot::Upper)?;
        let lower = self.loader.load(ModelSlot::Lower)?;
        let pair = Arc::new(ModelPair { upper, lower });
        info!(location = %self.loader.describe(), "quantile models loaded");

        *guard = Some(Arc::clone(&pair));
        Ok(pair)
    }

    /// Predict lower/upper bounds for one feature row.
    pub fn predict(&self, features: &FeatureVector) -> Prediction {
        match self.predict_with_models(features) {
            Ok((upper, lower)) => Prediction {
                upper,
                lower,
                meta: PredictionMeta {
                    features_used: features.clone(),
                    fallback_reason: None,
                },
            },
            Err(err) => {
                let mut reason = err.to_string();
                warn!(%reason, "using fallback prediction");
                let band = fallback_bounds(features);
                if let Some(note) = band.note {
                    warn!(note, "fallback inputs discarded");
                    reason = format!("{reason}; {note}");
                }
                Prediction {
                    upper: band.upper,
                    lower: band.lower,
                    meta: PredictionMeta {
                        features_used: features.clone(),
                        fallback_reason: Some(reason),
                    },
                }
            }
        }
    }

    fn predict_with_models(&self, features: &FeatureVector) -> Result<(f64, f64), ModelError> {
        if features.is_empty() {
            return Err(PredictError::InvalidInput.into());
        }

        let models = self.models()?;
        let upper = models.upper.predict(features)?;
        let lower = models.lower.predict(features)?;

        if !upper.is_finite() {
            return Err(PredictError::NonFinite("upper").into());
        }
        if !lower.is_finite() {
            return Err(PredictError::NonFinite("lower").into());
        }
        Ok((round2(upper), round2(lower)))
    }
}
