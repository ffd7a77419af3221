//! Feature keys and the flat feature vector.
//!
//! Keys are typed internally and only rendered to the `axis_{i}_{name}_{metric}`
//! string convention when the vector is serialized. Parsing goes the other way
//! for vectors that come from outside (e.g. a `features.json` file).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wire name of the placeholder feature emitted when nothing else was produced.
pub const SENTINEL_KEY: &str = "example_feature";

/// Wire name of the extraction diagnostic.
pub const ERROR_KEY: &str = "error";

/// Per-series descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetricKind {
    Slope,
    Mean,
    Std,
    GrowthPct,
    Max,
    Min,
    Last,
}

impl MetricKind {
    pub const ALL: [MetricKind; 7] = [
        MetricKind::Slope,
        MetricKind::Mean,
        MetricKind::Std,
        MetricKind::GrowthPct,
        MetricKind::Max,
        MetricKind::Min,
        MetricKind::Last,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Slope => "slope",
            MetricKind::Mean => "mean",
            MetricKind::Std => "std",
            MetricKind::GrowthPct => "growth_pct",
            MetricKind::Max => "max",
            MetricKind::Min => "min",
            MetricKind::Last => "last",
        }
    }
}

/// Lower-case a name and replace spaces with underscores.
pub fn sanitize_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Identity of one input series inside the feature vector.
///
/// Both the extractor and the diagnostics builder go through this type, so they
/// cannot disagree on how a series is keyed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesKey {
    pub index: usize,
    pub name: String,
}

impl SeriesKey {
    pub fn new(index: usize, raw_name: &str) -> Self {
        Self {
            index,
            name: sanitize_name(raw_name),
        }
    }

    pub fn metric(&self, metric: MetricKind) -> FeatureKey {
        FeatureKey::Series {
            series: self.clone(),
            metric,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureKey {
    /// `axis_{index}_{name}_{metric}`
    Series { series: SeriesKey, metric: MetricKind },
    /// `last_{column}`, taken from the last row of a tabular input.
    Table { column: String },
    /// `example_feature`
    Sentinel,
    /// `error`
    Error,
    /// Any key that does not follow a known convention.
    Other(String),
}

impl FeatureKey {
    pub fn table(column: &str) -> Self {
        FeatureKey::Table {
            column: sanitize_name(column),
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKey::Series { series, metric } => write!(
                f,
                "axis_{}_{}_{}",
                series.index,
                series.name,
                metric.as_str()
            ),
            FeatureKey::Table { column } => write!(f, "last_{column}"),
            FeatureKey::Sentinel => f.write_str(SENTINEL_KEY),
            FeatureKey::Error => f.write_str(ERROR_KEY),
            FeatureKey::Other(raw) => f.write_str(raw),
        }
    }
}

/// Series names and table columns are normalized with `sanitize_name`, so a
/// parsed key equals the one built through `SeriesKey::new` or
/// `FeatureKey::table`.
impl FromStr for FeatureKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == SENTINEL_KEY {
            return Ok(FeatureKey::Sentinel);
        }
        if s == ERROR_KEY {
            return Ok(FeatureKey::Error);
        }
        if let Some(key) = parse_series_key(s) {
            return Ok(key);
        }
        if let Some(column) = s.strip_prefix("last_") {
            if !column.is_empty() {
                return Ok(FeatureKey::table(column));
            }
        }
        Ok(FeatureKey::Other(s.to_string()))
    }
}

fn parse_series_key(s: &str) -> Option<FeatureKey> {
    let rest = s.strip_prefix("axis_")?;
    let (index, rest) = rest.split_once('_')?;
    let index: usize = index.parse().ok()?;

    // `growth_pct` is the only metric containing an underscore, so check it first.
    let mut metrics = MetricKind::ALL;
    metrics.sort_by_key(|m| std::cmp::Reverse(m.as_str().len()));
    for metric in metrics {
        let suffix = format!("_{}", metric.as_str());
        if let Some(name) = rest.strip_suffix(&suffix) {
            return Some(FeatureKey::Series {
                series: SeriesKey::new(index, name),
                metric,
            });
        }
    }
    None
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl FeatureValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Integer(v) => Some(*v as f64),
            FeatureValue::Number(v) => Some(*v),
            FeatureValue::Text(_) => None,
        }
    }
}

/// Flat mapping of features for one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    entries: BTreeMap<FeatureKey, FeatureValue>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FeatureKey, value: FeatureValue) {
        self.entries.insert(key, value);
    }

    pub fn insert_number(&mut self, key: FeatureKey, value: f64) {
        self.entries.insert(key, FeatureValue::Number(value));
    }

    pub fn get(&self, key: &FeatureKey) -> Option<&FeatureValue> {
        self.entries.get(key)
    }

    pub fn number(&self, key: &FeatureKey) -> Option<f64> {
        self.get(key).and_then(FeatureValue::as_f64)
    }

    pub fn contains(&self, key: &FeatureKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FeatureKey, &FeatureValue)> {
        self.entries.iter()
    }

    /// Move every entry of `other` into `self`.
    pub fn merge(&mut self, other: FeatureVector) {
        self.entries.extend(other.entries);
    }

    /// True when at least one real (non-sentinel, non-diagnostic) numeric feature exists.
    pub fn has_numeric_features(&self) -> bool {
        self.entries.iter().any(|(key, value)| {
            !matches!(key, FeatureKey::Sentinel | FeatureKey::Error)
                && matches!(value, FeatureValue::Number(_) | FeatureValue::Integer(_))
        })
    }

    /// Look up a metric of the series at `index`, whatever its name.
    pub fn series_metric_at(&self, index: usize, metric: MetricKind) -> Option<f64> {
        self.entries.iter().find_map(|(key, value)| match key {
            FeatureKey::Series { series, metric: m } if series.index == index && *m == metric => {
                value.as_f64()
            }
            _ => None,
        })
    }

    /// Entries keyed by their wire names.
    pub fn wire_map(&self) -> BTreeMap<String, &FeatureValue> {
        self.entries
            .iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }
}

impl FromIterator<(FeatureKey, FeatureValue)> for FeatureVector {
    fn from_iter<T: IntoIterator<Item = (FeatureKey, FeatureValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k.to_string(), v)))
    }
}

impl<'de> Deserialize<'de> for FeatureVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: BTreeMap<String, FeatureValue> = BTreeMap::deserialize(deserializer)?;
        let mut out = FeatureVector::new();
        for (key, value) in raw {
            if let FeatureValue::Number(v) = value {
                if !v.is_finite() {
                    return Err(D::Error::custom(format!("feature `{key}` is not finite")));
                }
            }
            let key = key.parse::<FeatureKey>().map_err(D::Error::custom)?;
            out.insert(key, value);
        }
        Ok(out)
    }
}
