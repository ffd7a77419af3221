//! File-backed sources: a JSON series document, or a price-history CSV.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use csv::StringRecord;

use crate::data::SeriesSource;
use crate::domain::{RawSeries, RawValue, SeriesDocument};
use crate::error::SourceError;

/// Reads a `SeriesDocument` serialized as JSON.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SeriesSource for JsonFileSource {
    fn fetch(&self) -> Result<SeriesDocument, SourceError> {
        let file = open(&self.path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Column names for a price-history CSV.
#[derive(Debug, Clone)]
pub struct CsvColumns {
    pub date: String,
    pub value: String,
    /// Name given to the resulting series.
    pub series_name: String,
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self {
            date: "Date".to_string(),
            value: "Close".to_string(),
            series_name: "Price".to_string(),
        }
    }
}

/// Reads one date/value series out of a CSV file.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    columns: CsvColumns,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>, columns: CsvColumns) -> Self {
        Self {
            path: path.into(),
            columns,
        }
    }
}

impl SeriesSource for CsvSource {
    fn fetch(&self) -> Result<SeriesDocument, SourceError> {
        let file = open(&self.path)?;
        let series = read_csv_series(file, &self.columns)?;
        Ok(SeriesDocument::from_series(vec![series]))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parse a CSV into a raw series.
///
/// Cells are passed through as text; rows that fail to parse as CSV are
/// skipped. Validation is the cleaner's job.
pub fn read_csv_series<R: Read>(reader: R, columns: &CsvColumns) -> Result<RawSeries, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let date_idx = find_column(&headers, &columns.date)?;
    let value_idx = find_column(&headers, &columns.value)?;

    let mut x = Vec::new();
    let mut y = Vec::new();
    for record in reader.records() {
        let Ok(record) = record else {
            continue;
        };
        x.push(cell(&record, date_idx));
        y.push(cell(&record, value_idx));
    }

    Ok(RawSeries::new(columns.series_name.clone(), x, y))
}

fn find_column(headers: &StringRecord, wanted: &str) -> Result<usize, SourceError> {
    let wanted = normalize_header_name(wanted);
    headers
        .iter()
        .position(|h| normalize_header_name(h) == wanted)
        .ok_or_else(|| SourceError::MissingColumn(wanted))
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

fn cell(record: &StringRecord, idx: usize) -> RawValue {
    match record.get(idx) {
        Some(v) if !v.is_empty() => RawValue::Text(v.to_string()),
        _ => RawValue::Null,
    }
}

fn open(path: &Path) -> Result<File, SourceError> {
    File::open(path).map_err(|source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn reads_date_and_close_columns() {
        let csv = "\u{feff}Date,Open,Close\n2025-01-01,9.5,10\n2025-01-02,10,12\n";
        let series = read_csv_series(csv.as_bytes(), &CsvColumns::default()).unwrap();

        assert_eq!(series.name.as_deref(), Some("Price"));
        assert_eq!(series.x, vec![RawValue::from("2025-01-01"), RawValue::from("2025-01-02")]);
        assert_eq!(series.y, vec![RawValue::from("10"), RawValue::from("12")]);
    }

    #[test]
    fn empty_cells_become_null() {
        let csv = "date,close\n2025-01-01,\n";
        let series = read_csv_series(csv.as_bytes(), &CsvColumns::default()).unwrap();
        assert_eq!(series.y, vec![RawValue::Null]);
    }

    #[test]
    fn missing_column_is_an_error() {
        let csv = "Date,Open\n2025-01-01,1\n";
        let err = read_csv_series(csv.as_bytes(), &CsvColumns::default()).unwrap_err();
        assert!(matches!(err, SourceError::MissingColumn(c) if c == "close"));
    }

    #[test]
    fn json_document_round_trips_through_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"axis":[{{"name":"Price","x":["2025-01-01"],"y":[10]}}],"source_url":"https://example.com"}}"#
        )
        .unwrap();

        let doc = JsonFileSource::new(file.path()).fetch().unwrap();
        assert_eq!(doc.axis.len(), 1);
        assert_eq!(doc.source_url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = JsonFileSource::new("/nonexistent/doc.json").fetch().unwrap_err();
        assert!(matches!(err, SourceError::Open { .. }));
    }
}
