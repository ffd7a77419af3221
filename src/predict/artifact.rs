//! Quantile model artifacts and how they are loaded.
//!
//! Artifacts live in one directory as `quantile_q90.json` (upper bound) and
//! `quantile_q10.json` (lower bound). Each holds a linear quantile regressor:
//!
//! ```json
//! { "quantile": 0.9, "intercept": 1.5, "coefficients": { "axis_0_price_last": 1.02 } }
//! ```
//!
//! Loading goes through the `ModelLoader` trait so the engine can be driven by
//! stub models in tests.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{FeatureValue, FeatureVector};
use crate::error::{ArtifactError, PredictError};

/// The two well-known artifact slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelSlot {
    /// 90th percentile regressor.
    Upper,
    /// 10th percentile regressor.
    Lower,
}

impl ModelSlot {
    pub fn label(self) -> &'static str {
        match self {
            ModelSlot::Upper => "q90",
            ModelSlot::Lower => "q10",
        }
    }

    pub fn file_name(self) -> String {
        format!("quantile_{}.json", self.label())
    }
}

impl fmt::Display for ModelSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A regressor that maps one feature row to one quantile estimate.
pub trait QuantileRegressor: Send + Sync + fmt::Debug {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictError>;
}

/// Source of regressors for the two slots.
pub trait ModelLoader: Send + Sync {
    fn load(&self, slot: ModelSlot) -> Result<Arc<dyn QuantileRegressor>, ArtifactError>;

    /// Human-readable location, used in logs and `pb status`.
    fn describe(&self) -> String;
}

/// `intercept + Σ coefficient · feature` over the named features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearQuantileModel {
    pub quantile: f64,
    #[serde(default)]
    pub intercept: f64,
    pub coefficients: BTreeMap<String, f64>,
}

impl LinearQuantileModel {
    fn validate(&self, slot: ModelSlot) -> Result<(), String> {
        if !(self.quantile > 0.0 && self.quantile < 1.0) {
            return Err(format!("quantile {} is outside (0, 1)", self.quantile));
        }
        let on_side = match slot {
            ModelSlot::Upper => self.quantile > 0.5,
            ModelSlot::Lower => self.quantile < 0.5,
        };
        if !on_side {
            return Err(format!(
                "quantile {} does not belong in the {slot} slot",
                self.quantile
            ));
        }
        if !self.intercept.is_finite() {
            return Err("intercept is not finite".to_string());
        }
        if let Some((name, _)) = self.coefficients.iter().find(|(_, w)| !w.is_finite()) {
            return Err(format!("coefficient for `{name}` is not finite"));
        }
        Ok(())
    }
}

impl QuantileRegressor for LinearQuantileModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictError> {
        let row = features.wire_map();
        let mut acc = self.intercept;
        for (name, weight) in &self.coefficients {
            let value = match row.get(name.as_str()) {
                None => return Err(PredictError::MissingFeature(name.clone())),
                Some(FeatureValue::Text(_)) => {
                    return Err(PredictError::NonNumericFeature(name.clone()));
                }
                Some(v) => v.as_f64().unwrap_or_default(),
            };
            acc += weight * value;
        }
        Ok(acc)
    }
}

/// Loads JSON artifacts from a directory.
#[derive(Debug, Clone)]
pub struct FsModelLoader {
    dir: PathBuf,
}

impl FsModelLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, slot: ModelSlot) -> PathBuf {
        self.dir.join(slot.file_name())
    }
}

impl ModelLoader for FsModelLoader {
    fn load(&self, slot: ModelSlot) -> Result<Arc<dyn QuantileRegressor>, ArtifactError> {
        let path = self.path_for(slot);
        if !path.exists() {
            return Err(ArtifactError::Missing(path));
        }

        let text = fs::read_to_string(&path).map_err(|source| ArtifactError::Io {
            path: path.clone(),
            source,
        })?;
        let model: LinearQuantileModel =
            serde_json::from_str(&text).map_err(|source| ArtifactError::Parse {
                path: path.clone(),
                source,
            })?;
        model
            .validate(slot)
            .map_err(|reason| ArtifactError::Invalid {
                path: path.clone(),
                reason,
            })?;

        debug!(slot = %slot, path = %path.display(), terms = model.coefficients.len(), "loaded model artifact");
        Ok(Arc::new(model))
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeatureKey, MetricKind, SeriesKey};

    fn write_model(dir: &Path, slot: ModelSlot, body: &str) {
        fs::write(dir.join(slot.file_name()), body).unwrap();
    }

    #[test]
    fn loads_linear_model_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_model(
            dir.path(),
            ModelSlot::Upper,
            r#"{"quantile": 0.9, "intercept": 1.0, "coefficients": {"axis_0_price_last": 2.0}}"#,
        );

        let loader = FsModelLoader::new(dir.path());
        let model = loader.load(ModelSlot::Upper).unwrap();

        let mut features = FeatureVector::new();
        features.insert_number(SeriesKey::new(0, "Price").metric(MetricKind::Last), 11.0);
        assert_eq!(model.predict(&features).unwrap(), 23.0);
    }

    #[test]
    fn missing_artifact_is_reported_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsModelLoader::new(dir.path()).load(ModelSlot::Lower).unwrap_err();
        assert!(matches!(err, ArtifactError::Missing(path) if path.ends_with("quantile_q10.json")));
    }

    #[test]
    fn corrupt_artifact_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path(), ModelSlot::Upper, "\u{80}\u{04}pickle");
        let err = FsModelLoader::new(dir.path()).load(ModelSlot::Upper).unwrap_err();
        assert!(matches!(err, ArtifactError::Parse { .. }));
    }

    #[test]
    fn out_of_range_quantile_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path(), ModelSlot::Upper, r#"{"quantile": 1.5, "coefficients": {}}"#);
        let err = FsModelLoader::new(dir.path()).load(ModelSlot::Upper).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid { .. }));
    }

    #[test]
    fn quantile_must_match_its_slot() {
        let dir = tempfile::tempdir().unwrap();
        let lower_model = r#"{"quantile": 0.1, "coefficients": {}}"#;
        write_model(dir.path(), ModelSlot::Upper, lower_model);
        write_model(dir.path(), ModelSlot::Lower, lower_model);

        let loader = FsModelLoader::new(dir.path());
        let err = loader.load(ModelSlot::Upper).unwrap_err();
        assert!(matches!(&err, ArtifactError::Invalid { reason, .. } if reason.contains("q90")));
        assert!(loader.load(ModelSlot::Lower).is_ok());

        write_model(dir.path(), ModelSlot::Lower, r#"{"quantile": 0.5, "coefficients": {}}"#);
        assert!(matches!(
            loader.load(ModelSlot::Lower).unwrap_err(),
            ArtifactError::Invalid { .. }
        ));
    }

    #[test]
    fn missing_or_textual_features_are_prediction_errors() {
        let model = LinearQuantileModel {
            quantile: 0.1,
            intercept: 0.0,
            coefficients: BTreeMap::from([("error".to_string(), 1.0)]),
        };
        assert_eq!(
            model.predict(&FeatureVector::new()),
            Err(PredictError::MissingFeature("error".to_string()))
        );

        let mut features = FeatureVector::new();
        features.insert(FeatureKey::Error, FeatureValue::Text("boom".to_string()));
        assert_eq!(
            model.predict(&features),
            Err(PredictError::NonNumericFeature("error".to_string()))
        );
    }

    #[test]
    fn sentinel_integer_feeds_the_model() {
        let model = LinearQuantileModel {
            quantile: 0.9,
            intercept: 0.5,
            coefficients: BTreeMap::from([("example_feature".to_string(), 3.0)]),
        };
        let mut features = FeatureVector::new();
        features.insert(FeatureKey::Sentinel, FeatureValue::Integer(1));
        assert_eq!(model.predict(&features).unwrap(), 3.5);
    }
}
