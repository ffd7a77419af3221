//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw and cleaned series (`RawSeries`, `SeriesDocument`, `CleanedSeries`)
//! - typed feature keys and the flat `FeatureVector`
//! - the pipeline outputs (`Prediction`, `AxisDiagnostic`, `PipelineOutput`)

pub mod features;
pub mod output;
pub mod types;

pub use features::*;
pub use output::*;
pub use types::*;
