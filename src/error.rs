use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for filtering, grouping and view computation.
pub type ProcessingResult<T> = Result<T, ProcessingError>;

/// Convenience result type for loading configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Error type returned by ingestion functions.
///
/// This is a single error enum shared across CSV/JSON/Parquet ingestion. Malformed dates are
/// not reported here: they are coerced to missing values during ingestion.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Parquet ingestion error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// The input does not conform to the provided schema (missing required fields/columns, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}

/// Error type returned by the filter/aggregate pipeline.
///
/// Empty inputs and unknown categorical values are never errors; these variants describe
/// requests that cannot be evaluated against the dataset's schema at all.
#[derive(Debug, Error, PartialEq)]
pub enum ProcessingError {
    /// A predicate, key or aggregation referenced a column the schema does not have.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// A numeric reduction or banding was requested over a non-numeric column.
    #[error("column '{column}' is not numeric (op={op})")]
    NotNumeric { column: String, op: String },

    /// A date predicate or month key was requested over a non-date column.
    #[error("column '{0}' is not a date column")]
    NotDate(String),

    /// A grouping request is malformed (no keys, too many keys, bad band edges, ...).
    #[error("invalid grouping: {0}")]
    InvalidGrouping(String),

    /// Integer accumulation overflowed.
    #[error("integer overflow while reducing column '{0}'")]
    Overflow(String),
}

/// Error type returned when loading a [`crate::config::DashboardConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration parsed but is not usable (e.g. unsorted band edges).
    #[error("invalid config: {0}")]
    Invalid(String),
}
