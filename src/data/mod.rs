//! Series sources.
//!
//! A source produces one `SeriesDocument`. Fetch failures are not fatal to the
//! pipeline: `fetch_or_empty` turns them into a document with zero series and
//! the failure recorded in `error`.

pub mod file;
pub mod http;
pub mod sample;

pub use file::{CsvColumns, CsvSource, JsonFileSource, read_csv_series};
pub use http::HttpSource;
pub use sample::{SampleConfig, generate_series};

use tracing::warn;

use crate::domain::SeriesDocument;
use crate::error::SourceError;

pub trait SeriesSource {
    fn fetch(&self) -> Result<SeriesDocument, SourceError>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// Fetch a document, degrading a failure to an empty document.
pub fn fetch_or_empty(source: &dyn SeriesSource) -> SeriesDocument {
    match source.fetch() {
        Ok(doc) => {
            if let Some(err) = &doc.error {
                warn!(source = %source.describe(), error = %err, "source reported an error");
            }
            doc
        }
        Err(err) => {
            warn!(source = %source.describe(), error = %err, "series fetch failed");
            SeriesDocument::failed(err.to_string())
        }
    }
}
