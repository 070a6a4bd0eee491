//! Computed columns layered onto decoded tables: rolling means, window
//! labels, phase classification, month labels and joins.

pub mod join;
pub mod month_labels;
pub mod rolling;

use crate::error::ClimateIndexError;
use crate::types::index_table::{ColumnValues, IndexColumn, IndexTable};
use crate::types::phase::Phase;

fn source_floats<'a>(table: &'a IndexTable, source: &str) -> Result<&'a [Option<f64>], ClimateIndexError> {
    table.floats(source).ok_or_else(|| {
        ClimateIndexError::InvalidArgument(format!("table has no numeric column '{}'", source))
    })
}

/// Adds `target` as the centered rolling mean of `source`.
pub fn with_rolling_mean(
    table: IndexTable,
    source: &str,
    target: &str,
) -> Result<IndexTable, ClimateIndexError> {
    let rolled = rolling::centered_rolling_mean(source_floats(&table, source)?);
    table.with_column(IndexColumn::new(target, ColumnValues::Float(rolled)))
}

/// Adds `target` with the three-month window label of every row.
pub fn with_window_labels(table: IndexTable, target: &str) -> Result<IndexTable, ClimateIndexError> {
    let labels = rolling::window_labels(&table.periods());
    table.with_column(IndexColumn::new(target, ColumnValues::Text(labels)))
}

/// Adds `target` holding the ENSO phase of each `source` value.
pub fn with_phase(table: IndexTable, source: &str, target: &str) -> Result<IndexTable, ClimateIndexError> {
    let phases = source_floats(&table, source)?
        .iter()
        .map(|v| Phase::classify(*v))
        .collect();
    table.with_column(IndexColumn::new(target, ColumnValues::Phase(phases)))
}
