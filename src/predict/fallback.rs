//! Deterministic bounds used when no model can be applied.

use crate::domain::{FeatureKey, FeatureVector, MetricKind};
use crate::math::round2;

const DEFAULT_PROFIT: f64 = 100.0;
const DEFAULT_REVENUE: f64 = 1000.0;
const ZERO_REVENUE_RATIO: f64 = 0.1;
const BASE_SCALE: f64 = 0.1;
const UPPER_FACTOR: f64 = 1.2;
const LOWER_FACTOR: f64 = 0.8;

/// Flat slope keys accepted from callers, in order of precedence. The typed
/// lookup of series 0 is consulted after these.
const SLOPE_KEYS: [&str; 2] = ["axis_0_slope", "axis_0_slope_per_day"];
const GROWTH_KEY: &str = "axis_0_growth_pct";

pub const NON_FINITE_NOTE: &str = "heuristic overflowed, default base used";

/// Bounds produced by the heuristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackBand {
    pub upper: f64,
    pub lower: f64,
    /// Set when the inputs produced a non-finite band and the defaults were used.
    pub note: Option<&'static str>,
}

/// Bounds from the profit/revenue heuristic, nudged by the first series'
/// slope and growth.
///
/// The bounds swap order when the base is negative. The band is always finite.
pub fn fallback_bounds(features: &FeatureVector) -> FallbackBand {
    let profit = features
        .number(&FeatureKey::table("profit"))
        .unwrap_or(DEFAULT_PROFIT);
    let revenue = features
        .number(&FeatureKey::table("revenue"))
        .unwrap_or(DEFAULT_REVENUE);
    let slope = SLOPE_KEYS
        .iter()
        .find_map(|key| flat_number(features, key))
        .or_else(|| features.series_metric_at(0, MetricKind::Slope))
        .unwrap_or(0.0);
    let growth = flat_number(features, GROWTH_KEY)
        .or_else(|| features.series_metric_at(0, MetricKind::GrowthPct))
        .unwrap_or(0.0);

    let (upper, lower) = band(profit, revenue, slope, growth);
    if upper.is_finite() && lower.is_finite() {
        return FallbackBand {
            upper,
            lower,
            note: None,
        };
    }

    let (upper, lower) = band(DEFAULT_PROFIT, DEFAULT_REVENUE, 0.0, 0.0);
    FallbackBand {
        upper,
        lower,
        note: Some(NON_FINITE_NOTE),
    }
}

fn band(profit: f64, revenue: f64, slope: f64, growth: f64) -> (f64, f64) {
    let ratio = if revenue != 0.0 {
        profit / revenue
    } else {
        ZERO_REVENUE_RATIO
    };
    let base = revenue * ratio * BASE_SCALE + slope + growth / 100.0;
    (round2(base * UPPER_FACTOR), round2(base * LOWER_FACTOR))
}

fn flat_number(features: &FeatureVector, key: &str) -> Option<f64> {
    features.number(&FeatureKey::Other(key.to_string()))
}
