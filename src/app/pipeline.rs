//! Shared pipeline logic used by every CLI command.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! clean -> extract (per series) -> merge -> predict -> diagnostics
//!
//! The commands can then focus on where documents come from and how results
//! are printed.

use rayon::prelude::*;
use tracing::debug;

use crate::domain::{
    AxisDiagnostic, FeatureVector, MetricKind, PipelineOutput, SeriesDocument,
};
use crate::features::{SeriesOutcome, extract_document};
use crate::predict::PredictionEngine;

/// Runs documents through feature extraction and prediction.
///
/// Holds the engine so its model cache is shared across runs.
#[derive(Debug)]
pub struct Pipeline {
    engine: PredictionEngine,
}

impl Pipeline {
    pub fn new(engine: PredictionEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &PredictionEngine {
        &self.engine
    }

    /// Execute the full pipeline for one document. Never fails.
    pub fn run(&self, doc: &SeriesDocument) -> PipelineOutput {
        let extraction = extract_document(doc);
        debug!(
            series = doc.axis.len(),
            features = extraction.features.len(),
            "features extracted"
        );

        let prediction = self.engine.predict(&extraction.features);
        let axis_diagnostics = build_diagnostics(doc, &extraction.features, &extraction.outcomes);

        PipelineOutput {
            features: extraction.features,
            prediction,
            axis_diagnostics,
        }
    }

    /// Execute independent runs in parallel over the shared engine.
    pub fn run_batch(&self, docs: &[SeriesDocument]) -> Vec<PipelineOutput> {
        docs.par_iter().map(|doc| self.run(doc)).collect()
    }
}

/// One record per input series, read back from the merged features.
fn build_diagnostics(
    doc: &SeriesDocument,
    features: &FeatureVector,
    outcomes: &[SeriesOutcome],
) -> Vec<AxisDiagnostic> {
    doc.axis
        .iter()
        .zip(outcomes)
        .enumerate()
        .map(|(index, (raw, outcome))| {
            let key = outcome.key();
            let metric = |m: MetricKind| features.number(&key.metric(m));
            let slope_unit = match outcome {
                SeriesOutcome::Extracted { unit, .. } => Some(*unit),
                _ => None,
            };

            AxisDiagnostic {
                axis_index: index,
                name: raw.display_name(index),
                x_values: raw.x.clone(),
                y_values: raw.y.clone(),
                slope: metric(MetricKind::Slope).unwrap_or(0.0),
                slope_unit,
                mean: metric(MetricKind::Mean),
                std: metric(MetricKind::Std),
                growth_pct: metric(MetricKind::GrowthPct),
            }
        })
        .collect()
}
