use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error reading cache file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("I/O error writing cache file '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("CSV error in cache file '{0}'")]
    Polars(PathBuf, #[source] PolarsError),

    #[error("Cache file '{path}' has columns {found:?}, expected {expected:?}")]
    SchemaMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Cache file '{path}' has an invalid {column} value '{value}' in row {row}")]
    InvalidCell {
        path: PathBuf,
        column: String,
        row: usize,
        value: String,
    },

    #[error("Cache file '{path}' is not a valid index table: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Failed to create cache directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
