//! Format-specific decoders turning raw upstream text into [`IndexTable`]s.
//!
//! Decoders are pure functions of their input. A single malformed line is
//! skipped, never fatal; only an empty or structurally unrecognisable document
//! produces a [`DecodeError`].

pub mod error;
pub mod fixed_width;
pub mod timestamped_csv;
pub mod typed_csv;
pub mod whitespace_table;
pub mod year_grid;

use crate::decode::error::DecodeError;
use crate::types::index_table::{IndexTable, Observation};
use std::fmt;

/// Non-fatal conditions noticed while decoding, carried on the resulting table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeWarning {
    /// The year-range header could not be read and default bounds were used.
    HeaderFallback { start_year: i32, end_year: i32 },
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeWarning::HeaderFallback {
                start_year,
                end_year,
            } => write!(
                f,
                "year range header not found, using default bounds {}-{}",
                start_year, end_year
            ),
        }
    }
}

/// Parses a numeric token, mapping the format's missing-value sentinel and
/// non-finite numbers to an absent value.
///
/// Returns `None` when the token is not a number at all.
pub(crate) fn parse_value(token: &str, sentinel: Option<f64>) -> Option<Option<f64>> {
    let value = token.trim().parse::<f64>().ok()?;
    let missing = !value.is_finite() || sentinel.is_some_and(|s| (value - s).abs() < 1e-6);
    Some(if missing { None } else { Some(value) })
}

pub(crate) fn ensure_not_empty(index: &str, raw: &str) -> Result<(), DecodeError> {
    if raw.lines().all(|line| line.trim().is_empty()) {
        return Err(DecodeError::EmptyInput {
            index: index.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn into_table(
    index: &str,
    column: &str,
    observations: Vec<Observation>,
) -> Result<IndexTable, DecodeError> {
    if observations.is_empty() {
        return Err(DecodeError::NoRecords {
            index: index.to_string(),
        });
    }
    Ok(IndexTable::from_observations(column, observations))
}
