use crate::cache::error::CacheError;
use crate::decode::error::DecodeError;
use crate::fetch::error::FetchError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClimateIndexError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Upstream document could not be decoded")]
    Format(#[from] DecodeError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed processing DataFrame: {0}")]
    DataFrame(#[from] PolarsError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution,

    #[error("Could not resolve the requested month range")]
    DateParsing,
}
