//! Environment-backed settings.
//!
//! Values come from the process environment after loading `.env` (if any);
//! CLI flags override them in `app::run`.

use std::path::PathBuf;

pub const MODEL_DIR_VAR: &str = "PRICE_BAND_MODEL_DIR";
pub const SOURCE_URL_VAR: &str = "PRICE_BAND_SOURCE_URL";
pub const LOG_VAR: &str = "PRICE_BAND_LOG";

const DEFAULT_MODEL_DIR: &str = "models";
const DEFAULT_LOG_FILTER: &str = "price_band=info";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model_dir: PathBuf,
    pub source_url: Option<String>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            source_url: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            model_dir: non_empty(MODEL_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),
            source_url: non_empty(SOURCE_URL_VAR),
            log_filter: non_empty(LOG_VAR)
                .or_else(|| non_empty("RUST_LOG"))
                .unwrap_or(defaults.log_filter),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(Settings::from_lookup(lookup(&[])), Settings::default());
    }

    #[test]
    fn reads_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            (MODEL_DIR_VAR, "/srv/models"),
            (SOURCE_URL_VAR, "https://example.com/axis.json"),
            ("RUST_LOG", "debug"),
        ]));
        assert_eq!(settings.model_dir, PathBuf::from("/srv/models"));
        assert_eq!(settings.source_url.as_deref(), Some("https://example.com/axis.json"));
        assert_eq!(settings.log_filter, "debug");
    }

    #[test]
    fn dedicated_log_variable_wins_and_blanks_are_ignored() {
        let settings = Settings::from_lookup(lookup(&[
            (LOG_VAR, "price_band=trace"),
            ("RUST_LOG", "warn"),
            (MODEL_DIR_VAR, "  "),
        ]));
        assert_eq!(settings.log_filter, "price_band=trace");
        assert_eq!(settings.model_dir, PathBuf::from("models"));
    }
}
