//! Data-layer error types.

use std::path::PathBuf;

use thiserror::Error;

/// The dataset could not be read into a table.
#[derive(Debug, Error)]
pub enum DatasetLoadError {
    #[error("dataset file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported dataset extension: .{0}")]
    UnsupportedExtension(String),

    #[error("failed to parse dataset {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Required columns are absent from the dataset.
#[derive(Debug, Error)]
#[error("missing required column(s): {}", missing.join(", "))]
pub struct SchemaError {
    pub missing: Vec<String>,
}

/// A derived feature cannot be imputed from the data at hand.
#[derive(Debug, Error)]
#[error("column {column} has no usable values to impute from")]
pub struct DataQualityError {
    pub column: String,
}

/// Feature engineering failure: either the schema or the data itself.
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Quality(#[from] DataQualityError),
}
