//! Per-series descriptors and the merged document-level feature vector.
//!
//! Error containment is per series: a series that fails to clean or yields a
//! non-finite metric is reported through an `error` feature, while features
//! already computed for the other series are kept.

use tracing::{debug, warn};

use crate::domain::{
    CleanedSeries, FeatureKey, FeatureValue, FeatureVector, MetricKind, OffsetUnit, SeriesDocument,
    SeriesKey,
};
use crate::error::ExtractError;
use crate::features::cleaner::{CleanOutcome, SkipReason, clean_series};
use crate::features::tables::table_features;
use crate::math;

/// What happened to one input series.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesOutcome {
    Extracted { key: SeriesKey, unit: OffsetUnit },
    Skipped { key: SeriesKey, reason: SkipReason },
    Failed { key: SeriesKey, error: ExtractError },
}

impl SeriesOutcome {
    pub fn key(&self) -> &SeriesKey {
        match self {
            SeriesOutcome::Extracted { key, .. }
            | SeriesOutcome::Skipped { key, .. }
            | SeriesOutcome::Failed { key, .. } => key,
        }
    }
}

/// Merged features plus one outcome per input series, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub features: FeatureVector,
    pub outcomes: Vec<SeriesOutcome>,
}

/// Compute the seven descriptors of one cleaned series.
pub fn extract_series(key: &SeriesKey, series: &CleanedSeries) -> Result<FeatureVector, ExtractError> {
    let values = &series.values;
    let metrics = [
        (MetricKind::Slope, math::linear_slope(&series.offsets, values)),
        (MetricKind::Mean, math::mean(values)),
        (MetricKind::Std, math::population_std(values)),
        (MetricKind::GrowthPct, math::growth_pct(values)),
        (MetricKind::Max, math::max(values)),
        (MetricKind::Min, math::min(values)),
        (MetricKind::Last, values.last().copied()),
    ];

    let mut out = FeatureVector::new();
    for (metric, value) in metrics {
        match value {
            Some(v) if v.is_finite() => out.insert_number(key.metric(metric), v),
            _ => {
                return Err(ExtractError::NonFinite {
                    series: key.name.clone(),
                    metric: metric.as_str(),
                });
            }
        }
    }
    Ok(out)
}

/// Build the feature vector for a whole document.
///
/// Never fails: problems surface as an `error` feature, and `example_feature`
/// is added whenever no numeric feature was produced.
pub fn extract_document(doc: &SeriesDocument) -> Extraction {
    let mut features = table_features(&doc.tables);
    let mut outcomes = Vec::with_capacity(doc.axis.len());
    let mut errors = Vec::new();

    for (index, raw) in doc.axis.iter().enumerate() {
        let name = raw.display_name(index);
        let key = SeriesKey::new(index, &name);

        let outcome = match clean_series(&name, &raw.x, &raw.y) {
            CleanOutcome::Cleaned(cleaned) => match extract_series(&key, &cleaned) {
                Ok(partial) => {
                    debug!(axis = index, series = %name, points = cleaned.len(), "extracted features");
                    features.merge(partial);
                    SeriesOutcome::Extracted {
                        key,
                        unit: cleaned.offset_unit,
                    }
                }
                Err(error) => SeriesOutcome::Failed { key, error },
            },
            CleanOutcome::Skipped(reason) => {
                debug!(axis = index, series = %name, %reason, "skipped series");
                SeriesOutcome::Skipped { key, reason }
            }
            CleanOutcome::Failed(error) => SeriesOutcome::Failed {
                key,
                error: error.into(),
            },
        };

        if let SeriesOutcome::Failed { error, .. } = &outcome {
            warn!(axis = index, series = %name, %error, "feature extraction failed");
            errors.push(format!("axis {index} ({name}): {error}"));
        }
        outcomes.push(outcome);
    }

    if !errors.is_empty() {
        features.insert(
            FeatureKey::Error,
            FeatureValue::Text(format!("Feature extraction failed: {}", errors.join("; "))),
        );
    }
    if !features.has_numeric_features() {
        features.insert(FeatureKey::Sentinel, FeatureValue::Integer(1));
    }

    Extraction { features, outcomes }
}
