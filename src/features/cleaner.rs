//! Raw series → `CleanedSeries`.
//!
//! Dates are allowed to be noisy: an unparseable label drops that point (and
//! its paired value). Values are not: once a point survives the date pass, its
//! value must coerce to a finite float or the whole series fails.

use std::fmt;

use crate::domain::{CleanedSeries, OffsetUnit, RawValue};
use crate::error::CleanError;
use crate::features::dates::parse_raw_label;

/// Why a series contributed nothing, without being an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Empty,
    LengthMismatch { x: usize, y: usize },
    NoValidDates,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Empty => f.write_str("empty series"),
            SkipReason::LengthMismatch { x, y } => {
                write!(f, "x/y length mismatch ({x} labels, {y} values)")
            }
            SkipReason::NoValidDates => f.write_str("no parseable dates"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CleanOutcome {
    Cleaned(CleanedSeries),
    Skipped(SkipReason),
    Failed(CleanError),
}

/// Validate and convert one raw series.
pub fn clean_series(name: &str, x_raw: &[RawValue], y_raw: &[RawValue]) -> CleanOutcome {
    if x_raw.is_empty() || y_raw.is_empty() {
        return CleanOutcome::Skipped(SkipReason::Empty);
    }
    if x_raw.len() != y_raw.len() {
        return CleanOutcome::Skipped(SkipReason::LengthMismatch {
            x: x_raw.len(),
            y: y_raw.len(),
        });
    }

    let mut timestamps = Vec::with_capacity(x_raw.len());
    let mut values = Vec::with_capacity(y_raw.len());

    for (position, (label, raw)) in x_raw.iter().zip(y_raw).enumerate() {
        let Some(ts) = parse_raw_label(label) else {
            continue;
        };
        match coerce_value(raw) {
            Some(v) => {
                timestamps.push(ts);
                values.push(v);
            }
            None => {
                return CleanOutcome::Failed(CleanError::ValueCoercion {
                    position,
                    value: raw.describe(),
                });
            }
        }
    }

    if values.is_empty() {
        return CleanOutcome::Skipped(SkipReason::NoValidDates);
    }

    let (offsets, offset_unit) = if values.len() < 2 {
        (
            (0..values.len()).map(|i| i as f64).collect(),
            OffsetUnit::Observations,
        )
    } else {
        let start = timestamps.iter().min().copied().unwrap_or(timestamps[0]);
        (
            timestamps
                .iter()
                .map(|ts| (*ts - start).num_days() as f64)
                .collect(),
            OffsetUnit::Days,
        )
    };

    CleanOutcome::Cleaned(CleanedSeries {
        name: name.to_string(),
        timestamps,
        values,
        offsets,
        offset_unit,
    })
}

/// Coerce a raw cell to a finite float.
fn coerce_value(raw: &RawValue) -> Option<f64> {
    let value = match raw {
        RawValue::Number(v) => *v,
        RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
        RawValue::Null | RawValue::Other(_) => return None,
    };
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<RawValue> {
        items.iter().map(|s| RawValue::from(*s)).collect()
    }

    fn numbers(items: &[f64]) -> Vec<RawValue> {
        items.iter().map(|v| RawValue::Number(*v)).collect()
    }

    fn cleaned(outcome: CleanOutcome) -> CleanedSeries {
        match outcome {
            CleanOutcome::Cleaned(series) => series,
            other => panic!("expected cleaned series, got {other:?}"),
        }
    }

    #[test]
    fn mismatched_lengths_are_skipped() {
        let outcome = clean_series("p", &labels(&["2025-01-01", "2025-01-02"]), &numbers(&[1.0]));
        assert_eq!(
            outcome,
            CleanOutcome::Skipped(SkipReason::LengthMismatch { x: 2, y: 1 })
        );
    }

    #[test]
    fn empty_sequences_are_skipped() {
        assert_eq!(clean_series("p", &[], &[]), CleanOutcome::Skipped(SkipReason::Empty));
        assert_eq!(
            clean_series("p", &labels(&["2025-01-01"]), &[]),
            CleanOutcome::Skipped(SkipReason::Empty)
        );
    }

    #[test]
    fn bad_date_drops_the_paired_value() {
        let series = cleaned(clean_series(
            "Price",
            &labels(&["2025-01-01", "garbage", "2025-01-03"]),
            &numbers(&[10.0, 12.0, 11.0]),
        ));
        assert_eq!(series.values, vec![10.0, 11.0]);
        assert_eq!(series.offsets, vec![0.0, 2.0]);
        assert_eq!(series.offset_unit, OffsetUnit::Days);
    }

    #[test]
    fn offsets_are_relative_to_earliest_date() {
        let series = cleaned(clean_series(
            "Price",
            &labels(&["2025-01-05", "2025-01-01", "2025-01-03"]),
            &numbers(&[3.0, 1.0, 2.0]),
        ));
        assert_eq!(series.offsets, vec![4.0, 0.0, 2.0]);
    }

    #[test]
    fn single_point_uses_positional_offsets() {
        let series = cleaned(clean_series("Price", &labels(&["2025-01-01"]), &numbers(&[7.0])));
        assert_eq!(series.offsets, vec![0.0]);
        assert_eq!(series.offset_unit, OffsetUnit::Observations);
    }

    #[test]
    fn string_values_are_coerced() {
        let series = cleaned(clean_series(
            "Price",
            &labels(&["2025-01-01", "2025-01-02"]),
            &[RawValue::from(" 10.5 "), RawValue::from("11")],
        ));
        assert_eq!(series.values, vec![10.5, 11.0]);
    }

    #[test]
    fn one_bad_value_fails_the_whole_series() {
        let outcome = clean_series(
            "Price",
            &labels(&["2025-01-01", "2025-01-02"]),
            &[RawValue::Number(10.0), RawValue::from("n/a")],
        );
        assert_eq!(
            outcome,
            CleanOutcome::Failed(CleanError::ValueCoercion {
                position: 1,
                value: "n/a".to_string()
            })
        );
    }

    #[test]
    fn bad_value_behind_bad_date_is_ignored() {
        let series = cleaned(clean_series(
            "Price",
            &labels(&["2025-01-01", "??"]),
            &[RawValue::Number(10.0), RawValue::from("n/a")],
        ));
        assert_eq!(series.values, vec![10.0]);
    }

    #[test]
    fn non_finite_and_null_values_fail() {
        let outcome = clean_series("p", &labels(&["2025-01-01"]), &[RawValue::from("inf")]);
        assert!(matches!(outcome, CleanOutcome::Failed(_)));
        let outcome = clean_series("p", &labels(&["2025-01-01"]), &[RawValue::Null]);
        assert!(matches!(outcome, CleanOutcome::Failed(_)));
    }

    #[test]
    fn no_parseable_dates_is_a_skip() {
        let outcome = clean_series("p", &labels(&["a", "b"]), &numbers(&[1.0, 2.0]));
        assert_eq!(outcome, CleanOutcome::Skipped(SkipReason::NoValidDates));
    }
}
