//! The uniform table every decoder normalises into.
//!
//! Tables are columnar: three key columns (`Year`, `Month`, `Date`) shared by
//! all rows, then any number of typed value or derived columns. Rows are kept
//! sorted ascending by date with unique `(date, period)` keys.

use crate::decode::DecodeWarning;
use crate::error::ClimateIndexError;
use crate::types::month::{Month, Period};
use crate::types::phase::Phase;
use chrono::NaiveDate;
use log::warn;
use polars::prelude::*;

pub const YEAR_COLUMN: &str = "Year";
pub const MONTH_COLUMN: &str = "Month";
pub const DATE_COLUMN: &str = "Date";
pub const KEY_COLUMNS: [&str; 3] = [YEAR_COLUMN, MONTH_COLUMN, DATE_COLUMN];

/// One decoded measurement before it is placed in a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub year: i32,
    pub period: Period,
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl Observation {
    /// Builds an observation dated to the first day of the period's anchor month.
    ///
    /// Returns `None` when the year is outside chrono's supported range.
    pub fn new(year: i32, period: impl Into<Period>, value: Option<f64>) -> Option<Self> {
        let period = period.into();
        let date = period.anchor_month().first_day(year)?;
        Some(Self {
            year,
            period,
            date,
            value: value.filter(|v| v.is_finite()),
        })
    }
}

/// Row key shared by all columns of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowKey {
    pub date: NaiveDate,
    pub period: Period,
    pub year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Float,
    Text,
    Phase,
}

/// Name and kind of a non-key column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, ColumnKind::Float)
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ColumnKind::Text)
    }

    pub fn phase(name: impl Into<String>) -> Self {
        Self::new(name, ColumnKind::Phase)
    }
}

/// Cells of one column. `None` marks an absent observation.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Float(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Phase(Vec<Option<Phase>>),
}

impl ColumnValues {
    pub fn absent(kind: ColumnKind, len: usize) -> Self {
        match kind {
            ColumnKind::Float => ColumnValues::Float(vec![None; len]),
            ColumnKind::Text => ColumnValues::Text(vec![None; len]),
            ColumnKind::Phase => ColumnValues::Phase(vec![None; len]),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnValues::Float(_) => ColumnKind::Float,
            ColumnValues::Text(_) => ColumnKind::Text,
            ColumnValues::Phase(_) => ColumnKind::Phase,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Float(v) => v.len(),
            ColumnValues::Text(v) => v.len(),
            ColumnValues::Phase(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gathers cells by row index; `None` positions become absent cells.
    pub(crate) fn gather(&self, rows: &[Option<usize>]) -> Self {
        match self {
            ColumnValues::Float(v) => {
                ColumnValues::Float(rows.iter().map(|r| r.and_then(|i| v[i])).collect())
            }
            ColumnValues::Text(v) => ColumnValues::Text(
                rows.iter()
                    .map(|r| r.and_then(|i| v[i].clone()))
                    .collect(),
            ),
            ColumnValues::Phase(v) => {
                ColumnValues::Phase(rows.iter().map(|r| r.and_then(|i| v[i])).collect())
            }
        }
    }

    /// Text form of a cell as written to CSV. Floats use the shortest
    /// representation that parses back to the same value.
    pub(crate) fn cell_text(&self, row: usize) -> Option<String> {
        match self {
            ColumnValues::Float(v) => v[row].map(|x| x.to_string()),
            ColumnValues::Text(v) => v[row].clone(),
            ColumnValues::Phase(v) => v[row].map(|p| p.label().to_string()),
        }
    }

    fn to_polars(&self, name: &str) -> Column {
        let name = PlSmallStr::from_str(name);
        match self {
            ColumnValues::Float(v) => Column::new(name, v.as_slice()),
            ColumnValues::Text(v) => Column::new(name, v.as_slice()),
            ColumnValues::Phase(v) => Column::new(
                name,
                v.iter()
                    .map(|p| p.map(|p| p.label()))
                    .collect::<Vec<Option<&str>>>(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexColumn {
    pub name: String,
    pub values: ColumnValues,
}

impl IndexColumn {
    pub fn new(name: impl Into<String>, values: ColumnValues) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn spec(&self) -> ColumnSpec {
        ColumnSpec::new(self.name.clone(), self.values.kind())
    }
}

/// An ordered, date-keyed table of index values and derived fields.
#[derive(Debug, Clone, Default)]
pub struct IndexTable {
    keys: Vec<RowKey>,
    columns: Vec<IndexColumn>,
    warnings: Vec<DecodeWarning>,
}

/// Equality ignores decode warnings: two tables are equal when their rows are.
impl PartialEq for IndexTable {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys && self.columns == other.columns
    }
}

impl IndexTable {
    /// Builds a single-value table from decoded observations.
    ///
    /// Observations are sorted by date; for duplicate keys the first
    /// occurrence in input order wins.
    pub fn from_observations(value_column: &str, mut observations: Vec<Observation>) -> Self {
        // Stable sort keeps input order among equal keys, so dedup keeps the first.
        observations.sort_by_key(|o| (o.date, o.period));
        let before = observations.len();
        observations.dedup_by_key(|o| (o.date, o.period));
        if observations.len() != before {
            warn!(
                "Dropped {} duplicate rows while building the {} table",
                before - observations.len(),
                value_column
            );
        }

        let keys = observations
            .iter()
            .map(|o| RowKey {
                date: o.date,
                period: o.period,
                year: o.year,
            })
            .collect();
        let values = observations.iter().map(|o| o.value).collect();

        Self {
            keys,
            columns: vec![IndexColumn::new(value_column, ColumnValues::Float(values))],
            warnings: Vec::new(),
        }
    }

    /// Assembles a table from keys and columns, validating the table invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateIndexError::InvalidArgument`] if keys are not strictly
    /// ascending, a column length differs from the key count, or a column name
    /// is repeated or collides with a key column.
    pub fn from_parts(
        keys: Vec<RowKey>,
        columns: Vec<IndexColumn>,
    ) -> Result<Self, ClimateIndexError> {
        if let Some(pair) = keys.windows(2).find(|w| (w[0].date, w[0].period) >= (w[1].date, w[1].period)) {
            return Err(ClimateIndexError::InvalidArgument(format!(
                "rows must be strictly ascending by date, found {} {} followed by {} {}",
                pair[0].date, pair[0].period, pair[1].date, pair[1].period
            )));
        }
        let mut table = Self {
            keys,
            columns: Vec::with_capacity(columns.len()),
            warnings: Vec::new(),
        };
        for column in columns {
            if table.column(&column.name).is_some() {
                return Err(ClimateIndexError::InvalidArgument(format!(
                    "duplicate column '{}'",
                    column.name
                )));
            }
            table = table.with_column(column)?;
        }
        Ok(table)
    }

    /// Adds a column, or replaces an existing column with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateIndexError::InvalidArgument`] on a length mismatch or a
    /// key column name.
    pub fn with_column(mut self, column: IndexColumn) -> Result<Self, ClimateIndexError> {
        if KEY_COLUMNS.contains(&column.name.as_str()) {
            return Err(ClimateIndexError::InvalidArgument(format!(
                "'{}' is a key column",
                column.name
            )));
        }
        if column.values.len() != self.keys.len() {
            return Err(ClimateIndexError::InvalidArgument(format!(
                "column '{}' has {} cells but the table has {} rows",
                column.name,
                column.values.len(),
                self.keys.len()
            )));
        }
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        Ok(self)
    }

    pub(crate) fn with_warning(mut self, warning: DecodeWarning) -> Self {
        self.warnings.push(warning);
        self
    }

    /// Keeps the key columns plus the requested columns, in the requested order.
    /// Names the table does not have are ignored.
    pub fn select(&self, names: &[&str]) -> IndexTable {
        let columns = names
            .iter()
            .filter_map(|name| self.column(name).cloned())
            .collect();
        IndexTable {
            keys: self.keys.clone(),
            columns,
            warnings: self.warnings.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[RowKey] {
        &self.keys
    }

    pub fn columns(&self) -> &[IndexColumn] {
        &self.columns
    }

    pub fn warnings(&self) -> &[DecodeWarning] {
        &self.warnings
    }

    /// Schema of the non-key columns.
    pub fn schema(&self) -> Vec<ColumnSpec> {
        self.columns.iter().map(IndexColumn::spec).collect()
    }

    /// All column names, key columns first.
    pub fn column_names(&self) -> Vec<&str> {
        KEY_COLUMNS
            .iter()
            .copied()
            .chain(self.columns.iter().map(|c| c.name.as_str()))
            .collect()
    }

    pub fn column(&self, name: &str) -> Option<&IndexColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn floats(&self, name: &str) -> Option<&[Option<f64>]> {
        match &self.column(name)?.values {
            ColumnValues::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn texts(&self, name: &str) -> Option<&[Option<String>]> {
        match &self.column(name)?.values {
            ColumnValues::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn phases(&self, name: &str) -> Option<&[Option<Phase>]> {
        match &self.column(name)?.values {
            ColumnValues::Phase(v) => Some(v),
            _ => None,
        }
    }

    pub fn periods(&self) -> Vec<Period> {
        self.keys.iter().map(|k| k.period).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.keys.iter().map(|k| k.date).collect()
    }

    pub fn record(&self, row: usize) -> Option<IndexRecord<'_>> {
        let key = self.keys.get(row)?;
        Some(IndexRecord {
            year: key.year,
            period: key.period,
            date: key.date,
            table: self,
            row,
        })
    }

    pub fn records(&self) -> impl Iterator<Item = IndexRecord<'_>> + '_ {
        (0..self.len()).filter_map(move |row| self.record(row))
    }

    /// Converts the table into a polars `DataFrame` with a `Date`-typed date column.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let epoch = NaiveDate::default();
        let mut columns: Vec<Column> = Vec::with_capacity(self.columns.len() + KEY_COLUMNS.len());
        columns.push(Column::new(
            PlSmallStr::from_str(YEAR_COLUMN),
            self.keys.iter().map(|k| k.year).collect::<Vec<i32>>(),
        ));
        columns.push(Column::new(
            PlSmallStr::from_str(MONTH_COLUMN),
            self.keys
                .iter()
                .map(|k| k.period.to_string())
                .collect::<Vec<String>>(),
        ));
        let days: Vec<i32> = self
            .keys
            .iter()
            .map(|k| (k.date - epoch).num_days() as i32)
            .collect();
        let dates = Series::new(PlSmallStr::from_str(DATE_COLUMN), days).cast(&DataType::Date)?;
        columns.push(dates.into());
        for column in &self.columns {
            columns.push(column.values.to_polars(&column.name));
        }
        DataFrame::new(columns)
    }
}

/// A borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct IndexRecord<'a> {
    pub year: i32,
    pub period: Period,
    pub date: NaiveDate,
    table: &'a IndexTable,
    row: usize,
}

impl<'a> IndexRecord<'a> {
    /// The calendar month, or `None` for season-labelled rows.
    pub fn month(&self) -> Option<Month> {
        self.period.as_month()
    }

    pub fn float(&self, column: &str) -> Option<f64> {
        self.table.floats(column).and_then(|v| v[self.row])
    }

    pub fn text(&self, column: &str) -> Option<&'a str> {
        self.table
            .texts(column)
            .and_then(|v| v[self.row].as_deref())
    }

    pub fn phase(&self, column: &str) -> Option<Phase> {
        self.table.phases(column).and_then(|v| v[self.row])
    }
}
