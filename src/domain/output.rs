//! Pipeline outputs, serialized as the external response shape.

use serde::{Deserialize, Serialize};

use crate::domain::{FeatureVector, OffsetUnit, RawValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionMeta {
    pub features_used: FeatureVector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

/// Lower/upper bound forecast.
///
/// `upper >= lower` is not guaranteed: the fallback heuristic inverts the
/// order when its base value is negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub upper: f64,
    pub lower: f64,
    pub meta: PredictionMeta,
}

impl Prediction {
    pub fn is_fallback(&self) -> bool {
        self.meta.fallback_reason.is_some()
    }
}

/// Per-input-series echo of the raw data plus its headline features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisDiagnostic {
    pub axis_index: usize,
    pub name: String,
    pub x_values: Vec<RawValue>,
    pub y_values: Vec<RawValue>,
    pub slope: f64,
    /// `days` or `observations`; `None` when the series produced no features.
    pub slope_unit: Option<OffsetUnit>,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub growth_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub features: FeatureVector,
    pub prediction: Prediction,
    pub axis_diagnostics: Vec<AxisDiagnostic>,
}
