//! Error types.
//!
//! `AppError` is the binary-facing error: a message plus the process exit code
//! (`2` for bad input/configuration, `4` for runtime failures).
//!
//! The pipeline stages have their own typed errors. None of them escape
//! `Pipeline::run`; they end up as `Skipped`/`Failed` outcomes, an `error`
//! feature, or a `fallback_reason`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        AppError::new(4, err.to_string())
    }
}

/// A series could be parsed structurally but one of its values is not a number.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CleanError {
    #[error("could not convert value {value:?} at position {position} to float")]
    ValueCoercion { position: usize, value: String },
}

/// Failure while computing features for a cleaned series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Clean(#[from] CleanError),

    #[error("metric `{metric}` is not finite for series `{series}`")]
    NonFinite { series: String, metric: &'static str },
}

/// A model artifact could not be made available.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Quantile models not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read model artifact '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("model artifact '{}' is invalid: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// Failure while applying a loaded model to a feature vector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("Invalid feature input")]
    InvalidInput,

    #[error("feature `{0}` required by the model is missing")]
    MissingFeature(String),

    #[error("feature `{0}` is not numeric")]
    NonNumericFeature(String),

    #[error("model produced a non-finite {0} bound")]
    NonFinite(&'static str),
}

/// Why the model branch of the engine was abandoned.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Predict(#[from] PredictError),
}

/// A series source could not produce a document.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid series document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing CSV column `{0}`")]
    MissingColumn(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request failed with status {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid synthetic series settings: {0}")]
    Sample(String),
}
