//! Feature extraction.
//!
//! - date-label parsing (`dates`)
//! - raw → cleaned series (`cleaner`)
//! - per-series descriptors and document merge (`extractor`)
//! - tabular `last_*` features (`tables`)

pub mod cleaner;
pub mod dates;
pub mod extractor;
pub mod tables;

pub use cleaner::{CleanOutcome, SkipReason, clean_series};
pub use extractor::{Extraction, SeriesOutcome, extract_document, extract_series};
pub use tables::table_features;
