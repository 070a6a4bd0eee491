use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Upstream document for {index} is empty")]
    EmptyInput { index: String },

    #[error("No parsable records found in the {index} document")]
    NoRecords { index: String },

    #[error("Header marker '{marker}' not found in the {index} document")]
    HeaderNotFound { index: String, marker: String },

    #[error("Parsing error processing CSV data for {index}")]
    Csv {
        index: String,
        #[source]
        source: PolarsError,
    },

    #[error("Missing required column '{column}' in the {index} document")]
    MissingColumn { index: String, column: String },
}
