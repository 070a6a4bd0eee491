use crate::error::ClimateIndexError;
use crate::types::index_table::{IndexColumn, IndexTable, RowKey};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Full outer join of tables on their `(date, period)` keys.
///
/// The result holds every key seen in any input, ascending by date. Columns
/// keep input order: all non-key columns of the first table, then of the
/// second, and so on. Cells a table has no row for are absent. Decode
/// warnings of every input are carried over.
///
/// # Errors
///
/// [`ClimateIndexError::InvalidArgument`] if two inputs share a non-key
/// column name.
pub fn outer_join(tables: &[IndexTable]) -> Result<IndexTable, ClimateIndexError> {
    let mut seen = HashSet::new();
    for column in tables.iter().flat_map(|t| t.columns()) {
        if !seen.insert(column.name.as_str()) {
            return Err(ClimateIndexError::InvalidArgument(format!(
                "column '{}' appears in more than one joined table",
                column.name
            )));
        }
    }

    let keys: Vec<RowKey> = tables
        .iter()
        .flat_map(|t| t.keys().iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut columns = Vec::with_capacity(seen.len());
    for table in tables {
        let positions: HashMap<&RowKey, usize> = table
            .keys()
            .iter()
            .enumerate()
            .map(|(row, key)| (key, row))
            .collect();
        let rows: Vec<Option<usize>> = keys.iter().map(|k| positions.get(k).copied()).collect();
        for column in table.columns() {
            columns.push(IndexColumn::new(column.name.clone(), column.values.gather(&rows)));
        }
    }

    let joined = IndexTable::from_parts(keys, columns)?;
    let mut warnings = Vec::new();
    for warning in tables.iter().flat_map(|t| t.warnings()) {
        if !warnings.contains(warning) {
            warnings.push(*warning);
        }
    }
    Ok(warnings
        .into_iter()
        .fold(joined, |table, warning| table.with_warning(warning)))
}
