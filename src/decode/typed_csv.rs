//! Decoder for headed CSV files with typed columns (the asymmetric SAM feeds).
//!
//! The document is read by polars with every column as text, then each row is
//! coerced to a [`SamRecord`]. Columns other than the required ones (the daily
//! files carry a `dump` column) are ignored.

use crate::decode::error::DecodeError;
use crate::decode::{ensure_not_empty, parse_value};
use crate::types::sam_table::{SamIndex, SamMeasure, SamRecord, SamTable};
use chrono::NaiveDate;
use log::debug;
use polars::prelude::*;
use std::io::Cursor;

const LEV: &str = "Lev";
const DATE: &str = "Date";
const INDEX: &str = "Index";
const VALUE: &str = "Value";

/// Decodes a SAM CSV whose second measurement column is given by `measure`.
pub fn decode_sam_csv(index: &str, measure: SamMeasure, raw: &str) -> Result<SamTable, DecodeError> {
    ensure_not_empty(index, raw)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(raw.as_bytes().to_vec()))
        .finish()
        .map_err(|source| DecodeError::Csv {
            index: index.to_string(),
            source,
        })?;

    let text_column = |name: &str| -> Result<Vec<Option<String>>, DecodeError> {
        let column = df.column(name).map_err(|_| DecodeError::MissingColumn {
            index: index.to_string(),
            column: name.to_string(),
        })?;
        let strings = column.str().map_err(|source| DecodeError::Csv {
            index: index.to_string(),
            source,
        })?;
        Ok(strings.into_iter().map(|cell| cell.map(str::to_string)).collect())
    };

    let lev = text_column(LEV)?;
    let date = text_column(DATE)?;
    let sam_index = text_column(INDEX)?;
    let value = text_column(VALUE)?;
    let second = text_column(measure.column_name())?;

    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let record = parse_row(
            lev[row].as_deref(),
            date[row].as_deref(),
            sam_index[row].as_deref(),
            value[row].as_deref(),
            second[row].as_deref(),
        );
        match record {
            Some(record) => records.push(record),
            None => debug!("Skipping unparsable {} row {}", index, row),
        }
    }

    if records.is_empty() {
        return Err(DecodeError::NoRecords {
            index: index.to_string(),
        });
    }
    Ok(SamTable::new(measure, records))
}

fn parse_row(
    lev: Option<&str>,
    date: Option<&str>,
    index: Option<&str>,
    value: Option<&str>,
    second: Option<&str>,
) -> Option<SamRecord> {
    Some(SamRecord {
        lev: parse_level(lev?)?,
        date: parse_date(date?)?,
        index: index?.parse::<SamIndex>().ok()?,
        value: value.and_then(|v| parse_value(v, None)).flatten(),
        second: second.and_then(|v| parse_value(v, None)).flatten(),
    })
}

fn parse_level(token: &str) -> Option<i32> {
    let token = token.trim();
    token
        .parse::<i32>()
        .ok()
        .or_else(|| token.parse::<f64>().ok().filter(|v| v.fract() == 0.0).map(|v| v as i32))
}

fn parse_date(token: &str) -> Option<NaiveDate> {
    let day = token.trim().split(['T', ' ']).next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
