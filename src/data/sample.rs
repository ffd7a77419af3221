//! Synthetic price series for demos and smoke tests.
//!
//! Prices follow a daily geometric random walk:
//! `p_{t+1} = p_t · exp((μ - σ²/2) + σ·z)` with `z ~ N(0, 1)`.

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{RawSeries, RawValue};
use crate::error::SourceError;

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub name: String,
    pub points: usize,
    pub start: NaiveDate,
    pub start_price: f64,
    /// Daily drift of log price.
    pub drift: f64,
    /// Daily volatility of log price.
    pub volatility: f64,
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            name: "Price".to_string(),
            points: 60,
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            start_price: 100.0,
            drift: 0.0005,
            volatility: 0.02,
            seed: 42,
        }
    }
}

pub fn generate_series(config: &SampleConfig) -> Result<RawSeries, SourceError> {
    if config.points == 0 {
        return Err(SourceError::Sample("point count must be > 0".to_string()));
    }
    if !(config.start_price.is_finite() && config.start_price > 0.0) {
        return Err(SourceError::Sample("start price must be positive".to_string()));
    }
    if !(config.drift.is_finite() && config.volatility.is_finite() && config.volatility >= 0.0) {
        return Err(SourceError::Sample("invalid drift/volatility".to_string()));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| SourceError::Sample(format!("noise distribution error: {e}")))?;

    let step_mean = config.drift - 0.5 * config.volatility * config.volatility;
    let mut price = config.start_price;
    let mut x = Vec::with_capacity(config.points);
    let mut y = Vec::with_capacity(config.points);

    for i in 0..config.points {
        let date = config
            .start
            .checked_add_signed(Duration::days(i as i64))
            .unwrap_or(config.start);
        x.push(RawValue::Text(date.format("%Y-%m-%d").to_string()));
        y.push(RawValue::Number((price * 100.0).round() / 100.0));

        let z: f64 = normal.sample(&mut rng);
        price *= (step_mean + config.volatility * z).exp();
    }

    Ok(RawSeries::new(config.name.clone(), x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_series() {
        let config = SampleConfig::default();
        assert_eq!(generate_series(&config).unwrap(), generate_series(&config).unwrap());
    }

    #[test]
    fn series_is_aligned_and_dated_daily() {
        let config = SampleConfig {
            points: 5,
            ..SampleConfig::default()
        };
        let series = generate_series(&config).unwrap();
        assert_eq!(series.x.len(), 5);
        assert_eq!(series.y.len(), 5);
        assert_eq!(series.x[0], RawValue::from("2025-01-01"));
        assert_eq!(series.x[4], RawValue::from("2025-01-05"));
        assert_eq!(series.y[0], RawValue::Number(100.0));
    }

    #[test]
    fn zero_volatility_is_a_pure_drift() {
        let config = SampleConfig {
            points: 3,
            drift: 0.0,
            volatility: 0.0,
            ..SampleConfig::default()
        };
        let series = generate_series(&config).unwrap();
        assert!(series.y.iter().all(|v| *v == RawValue::Number(100.0)));
    }

    #[test]
    fn rejects_empty_samples() {
        let config = SampleConfig {
            points: 0,
            ..SampleConfig::default()
        };
        assert!(generate_series(&config).is_err());
    }
}
