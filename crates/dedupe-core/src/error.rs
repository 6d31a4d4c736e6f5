//! Error types for dedupe-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in dedupe-core
///
/// Record-level problems (missing values, missing record IDs) are never
/// errors; only configuration and I/O failures are.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse CSV
    #[error("failed to parse CSV '{path}': {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Similarity threshold outside [0, 1]
    #[error("invalid threshold {0}: must be within [0, 1]")]
    InvalidThreshold(f64),

    /// Field weights are negative, non-finite, or do not sum to 1.0
    #[error("invalid field weights: {0}")]
    InvalidWeights(String),

    /// No fields configured for comparison
    #[error("no fields configured for comparison")]
    NoFields,

    /// The same field listed twice
    #[error("field '{0}' is configured more than once")]
    DuplicateField(String),

    /// A compared field is not present in the input table
    #[error("column '{column}' not found in '{path}'")]
    MissingColumn { column: String, path: PathBuf },

    /// Record index out of range
    #[error("record index {index} out of range ({count} records)")]
    RecordOutOfRange { index: usize, count: usize },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
