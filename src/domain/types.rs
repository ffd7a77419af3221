//! Input and intermediate series types.
//!
//! Raw types mirror what a series source hands over (loosely typed JSON);
//! `CleanedSeries` is what the feature extractor works on.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One untyped cell of a raw series, as received from a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Null,
    Other(serde_json::Value),
}

impl RawValue {
    /// Textual form used for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            RawValue::Number(v) => v.to_string(),
            RawValue::Text(s) => s.clone(),
            RawValue::Null => "null".to_string(),
            RawValue::Other(v) => v.to_string(),
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// A named pair of parallel `x` (date labels) and `y` (values) sequences.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawSeries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub x: Vec<RawValue>,
    #[serde(default)]
    pub y: Vec<RawValue>,
}

impl RawSeries {
    pub fn new(name: impl Into<String>, x: Vec<RawValue>, y: Vec<RawValue>) -> Self {
        Self {
            name: Some(name.into()),
            x,
            y,
        }
    }

    /// The series name, or `series_{index}` when the source did not provide one.
    pub fn display_name(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("series_{index}"))
    }

    /// Keep only the points whose `x` label is one of `labels`.
    ///
    /// Misaligned series are left untouched so that the cleaner still skips them.
    pub fn retain_labels(&mut self, labels: &[String]) {
        if self.x.len() != self.y.len() {
            return;
        }
        let (x, y): (Vec<RawValue>, Vec<RawValue>) = self
            .x
            .drain(..)
            .zip(self.y.drain(..))
            .filter(|(label, _)| match label {
                RawValue::Text(s) => labels.iter().any(|l| l == s),
                _ => false,
            })
            .unzip();
        self.x = x;
        self.y = y;
    }
}

/// Everything a series source produced for one request.
///
/// `tables` holds row-major string tables where the first row is the header.
/// `error` is set when the source failed; the document then carries no series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesDocument {
    #[serde(default)]
    pub axis: Vec<RawSeries>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<Vec<Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SeriesDocument {
    pub fn from_series(axis: Vec<RawSeries>) -> Self {
        Self {
            axis,
            ..Self::default()
        }
    }

    /// A document standing in for a failed fetch: no series, only the reason.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Apply a requested-dates filter to every series.
    pub fn filter_dates(&mut self, labels: &[String]) {
        if labels.is_empty() {
            return;
        }
        for series in &mut self.axis {
            series.retain_labels(labels);
        }
    }
}

/// Unit of the regression axis used for the slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetUnit {
    /// Whole days since the earliest timestamp.
    Days,
    /// Position in the series (used when fewer than two points survive).
    Observations,
}

/// A validated numeric series.
///
/// `timestamps`, `values` and `offsets` always have the same, non-zero length.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedSeries {
    pub name: String,
    pub timestamps: Vec<NaiveDateTime>,
    pub values: Vec<f64>,
    pub offsets: Vec<f64>,
    pub offset_unit: OffsetUnit,
}

impl CleanedSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_values_deserialize_from_mixed_json() {
        let series: RawSeries =
            serde_json::from_str(r#"{"name":"Price","x":["2025-01-01",null],"y":[10,"12.5"]}"#)
                .unwrap();
        assert_eq!(series.x[1], RawValue::Null);
        assert_eq!(series.y[0], RawValue::Number(10.0));
        assert_eq!(series.y[1], RawValue::Text("12.5".to_string()));
    }

    #[test]
    fn display_name_defaults_to_position() {
        let series = RawSeries::default();
        assert_eq!(series.display_name(3), "series_3");
    }

    #[test]
    fn retain_labels_keeps_pairs_together() {
        let mut series = RawSeries::new(
            "Price",
            vec!["2025-01-01".into(), "2025-01-02".into(), "2025-01-03".into()],
            vec![10.0.into(), 12.0.into(), 11.0.into()],
        );
        series.retain_labels(&["2025-01-01".to_string(), "2025-01-03".to_string()]);
        assert_eq!(series.x, vec![RawValue::from("2025-01-01"), RawValue::from("2025-01-03")]);
        assert_eq!(series.y, vec![RawValue::Number(10.0), RawValue::Number(11.0)]);
    }

    #[test]
    fn failed_document_has_no_series() {
        let doc = SeriesDocument::failed("timeout");
        assert!(doc.axis.is_empty());
        assert_eq!(doc.error.as_deref(), Some("timeout"));
    }
}
