use crate::cache::error::CacheError;
use crate::types::index_table::{
    ColumnKind, ColumnSpec, ColumnValues, IndexColumn, IndexTable, RowKey, DATE_COLUMN,
    KEY_COLUMNS, MONTH_COLUMN, YEAR_COLUMN,
};
use crate::types::month::Period;
use crate::types::phase::Phase;
use chrono::NaiveDate;
use log::info;
use polars::prelude::*;
use std::path::Path;
use tokio::{fs, task};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reads and writes index tables as flat CSV files.
///
/// Layout: a header row `Year,Month,Date,<columns...>`, one row per record,
/// ISO dates and empty cells for absent values.
///
/// Single-writer contract: there is no locking, callers must not issue
/// concurrent reads and writes against the same path.
pub struct CsvStore;

impl CsvStore {
    /// Loads a table written by [`CsvStore::write`], restoring column kinds
    /// from `schema`. Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// [`CacheError::SchemaMismatch`] if the header differs from
    /// `Year,Month,Date` followed by the schema columns; other variants for
    /// unreadable files or cells.
    pub async fn read(path: &Path, schema: &[ColumnSpec]) -> Result<Option<IndexTable>, CacheError> {
        match fs::try_exists(path).await {
            Ok(true) => {}
            Ok(false) => return Ok(None),
            Err(e) => return Err(CacheError::Read(path.to_path_buf(), e)),
        }

        let path_buf = path.to_path_buf();
        let schema = schema.to_vec();
        let table = task::spawn_blocking(move || read_table(&path_buf, &schema)).await??;
        info!("Loaded {} cached rows from {:?}", table.len(), path);
        Ok(Some(table))
    }

    /// Writes `table` to `path`, creating missing parent directories and
    /// replacing any existing file.
    pub async fn write(path: &Path, table: &IndexTable) -> Result<(), CacheError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| CacheError::DirCreation(parent.to_path_buf(), e))?;
        }

        let path_buf = path.to_path_buf();
        let rows = table.len();
        let table = table.clone();
        task::spawn_blocking(move || write_table(&path_buf, &table)).await??;
        info!("Cached {} rows to {:?}", rows, path);
        Ok(())
    }
}

fn write_table(path: &Path, table: &IndexTable) -> Result<(), CacheError> {
    let mut columns: Vec<Column> = Vec::with_capacity(table.columns().len() + KEY_COLUMNS.len());
    columns.push(Column::new(
        YEAR_COLUMN.into(),
        table.keys().iter().map(|k| k.year.to_string()).collect::<Vec<_>>(),
    ));
    columns.push(Column::new(
        MONTH_COLUMN.into(),
        table.keys().iter().map(|k| k.period.to_string()).collect::<Vec<_>>(),
    ));
    columns.push(Column::new(
        DATE_COLUMN.into(),
        table
            .keys()
            .iter()
            .map(|k| k.date.format(DATE_FORMAT).to_string())
            .collect::<Vec<_>>(),
    ));
    for column in table.columns() {
        let cells: Vec<Option<String>> = (0..table.len())
            .map(|row| column.values.cell_text(row))
            .collect();
        columns.push(Column::new(column.name.as_str().into(), cells));
    }

    let mut df = DataFrame::new(columns).map_err(|e| CacheError::Polars(path.to_path_buf(), e))?;
    let mut file = std::fs::File::create(path).map_err(|e| CacheError::Write(path.to_path_buf(), e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .map_err(|e| CacheError::Polars(path.to_path_buf(), e))
}

fn read_table(path: &Path, schema: &[ColumnSpec]) -> Result<IndexTable, CacheError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| CacheError::Polars(path.to_path_buf(), e))?
        .finish()
        .map_err(|e| CacheError::Polars(path.to_path_buf(), e))?;

    let expected: Vec<String> = KEY_COLUMNS
        .iter()
        .map(|name| name.to_string())
        .chain(schema.iter().map(|spec| spec.name.clone()))
        .collect();
    let found: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    if found != expected {
        return Err(CacheError::SchemaMismatch {
            path: path.to_path_buf(),
            expected,
            found,
        });
    }

    let cells = |name: &str| -> Result<Vec<Option<String>>, CacheError> {
        let strings = df
            .column(name)
            .and_then(|c| c.str().cloned())
            .map_err(|e| CacheError::Polars(path.to_path_buf(), e))?;
        Ok(strings
            .into_iter()
            .map(|cell| cell.filter(|s| !s.is_empty()).map(str::to_string))
            .collect())
    };

    let invalid = |column: &str, row: usize, value: Option<&str>| CacheError::InvalidCell {
        path: path.to_path_buf(),
        column: column.to_string(),
        row,
        value: value.unwrap_or_default().to_string(),
    };

    let years = cells(YEAR_COLUMN)?;
    let periods = cells(MONTH_COLUMN)?;
    let dates = cells(DATE_COLUMN)?;
    let mut keys = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let year = years[row]
            .as_deref()
            .and_then(|s| s.parse::<i32>().ok())
            .ok_or_else(|| invalid(YEAR_COLUMN, row, years[row].as_deref()))?;
        let period = periods[row]
            .as_deref()
            .and_then(|s| s.parse::<Period>().ok())
            .ok_or_else(|| invalid(MONTH_COLUMN, row, periods[row].as_deref()))?;
        let date = dates[row]
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
            .ok_or_else(|| invalid(DATE_COLUMN, row, dates[row].as_deref()))?;
        keys.push(RowKey { date, period, year });
    }

    let mut columns = Vec::with_capacity(schema.len());
    for spec in schema {
        let raw = cells(&spec.name)?;
        let bad_cell = |row: usize| invalid(&spec.name, row, raw[row].as_deref());
        let values = match spec.kind {
            ColumnKind::Float => {
                ColumnValues::Float(parse_cells(&raw, |s| s.parse::<f64>().ok(), bad_cell)?)
            }
            ColumnKind::Phase => {
                ColumnValues::Phase(parse_cells(&raw, |s| s.parse::<Phase>().ok(), bad_cell)?)
            }
            ColumnKind::Text => ColumnValues::Text(raw.clone()),
        };
        columns.push(IndexColumn::new(spec.name.clone(), values));
    }

    IndexTable::from_parts(keys, columns).map_err(|e| CacheError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Parses present cells, failing on the first one `parse` rejects.
fn parse_cells<T>(
    raw: &[Option<String>],
    parse: impl Fn(&str) -> Option<T>,
    invalid: impl Fn(usize) -> CacheError,
) -> Result<Vec<Option<T>>, CacheError> {
    raw.iter()
        .enumerate()
        .map(|(row, cell)| match cell {
            None => Ok(None),
            Some(s) => parse(s).map(Some).ok_or_else(|| invalid(row)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive;
    use crate::types::index_table::Observation;
    use crate::types::month::{Month, Season};
    use tempfile::tempdir;

    fn oni_table() -> IndexTable {
        let observations = [
            (1950, Month::Jan, -1.62),
            (1950, Month::Feb, -1.32),
            (1950, Month::Mar, -1.07),
            (1950, Month::Apr, -1.11),
        ]
        .into_iter()
        .filter_map(|(y, m, v)| Observation::new(y, m, Some(v)))
        .collect();
        let table = IndexTable::from_observations("dSST3.4", observations);
        let table = derive::with_rolling_mean(table, "dSST3.4", "ONI").unwrap();
        let table = derive::with_window_labels(table, "ONI_month_window").unwrap();
        derive::with_phase(table, "ONI", "phase").unwrap()
    }

    #[tokio::test]
    async fn round_trip_preserves_table() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("oni.csv");
        let table = oni_table();

        CsvStore::write(&path, &table).await?;
        let loaded = CsvStore::read(&path, &table.schema()).await?;

        assert_eq!(loaded, Some(table));
        Ok(())
    }

    #[tokio::test]
    async fn seasons_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("mei.csv");
        let observations = vec![
            Observation::new(1979, Season::DJ, Some(0.47)).unwrap(),
            Observation::new(1979, Season::JF, None).unwrap(),
        ];
        let table = IndexTable::from_observations("MEI", observations);

        CsvStore::write(&path, &table).await?;
        let loaded = CsvStore::read(&path, &table.schema()).await?.unwrap();

        assert_eq!(loaded, table);
        assert_eq!(loaded.record(1).unwrap().period.to_string(), "JF");
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_none() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let loaded = CsvStore::read(&dir.path().join("none.csv"), &[ColumnSpec::float("AO")]).await?;
        assert!(loaded.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn header_mismatch_is_reported() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("ao.csv");
        CsvStore::write(&path, &oni_table()).await?;

        let err = CsvStore::read(&path, &[ColumnSpec::float("AO")]).await.unwrap_err();
        assert!(matches!(err, CacheError::SchemaMismatch { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn bad_numeric_cell_is_reported() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("ao.csv");
        std::fs::write(&path, "Year,Month,Date,AO\n1950,Jan,1950-01-01,oops\n")?;

        let err = CsvStore::read(&path, &[ColumnSpec::float("AO")]).await.unwrap_err();
        assert!(matches!(err, CacheError::InvalidCell { ref column, row: 0, .. } if column == "AO"));
        Ok(())
    }
}
