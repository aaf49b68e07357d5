//! Prediction-side error types.

use std::path::PathBuf;

use thiserror::Error;

/// The model artifact bundle could not be loaded.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model artifact not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed model artifact {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Running a predictor failed.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("predictor returned {actual} values for {expected} input rows")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("predictor failure: {0}")]
    Predictor(String),
}
