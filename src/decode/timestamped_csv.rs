//! Decoder for two-column `timestamp,value` CSV exports with a metadata preamble,
//! such as the ERDDAP tabledap responses.

use crate::decode::error::DecodeError;
use crate::decode::{ensure_not_empty, into_table, parse_value};
use crate::types::index_table::{IndexTable, Observation};
use crate::types::month::Month;
use chrono::{Datelike, NaiveDate};
use log::debug;

/// ERDDAP writes a column-name line and a units line before the data.
pub const ERDDAP_PREAMBLE_LINES: usize = 2;

/// Decodes `time,value` rows after `preamble_lines` lines.
///
/// Only the calendar date of each timestamp is kept and it is moved to the
/// first of its month, so `1900-01-15T00:00:00Z` and `1900-01-01` land on the
/// same row.
pub fn decode_timestamped_csv(
    index: &str,
    column: &str,
    preamble_lines: usize,
    raw: &str,
) -> Result<IndexTable, DecodeError> {
    ensure_not_empty(index, raw)?;

    let observations = raw
        .lines()
        .skip(preamble_lines)
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parsed = parse_row(line);
            if parsed.is_none() {
                debug!("Skipping unparsable {} row: {:?}", index, line);
            }
            parsed
        })
        .collect();

    into_table(index, column, observations)
}

fn parse_row(line: &str) -> Option<Observation> {
    let (timestamp, value) = line.split_once(',')?;
    let date = parse_calendar_date(timestamp)?;
    let value = parse_value(value.trim().trim_matches('"'), None)?;
    Observation::new(date.year(), Month::from_date(date), value)
}

fn parse_calendar_date(timestamp: &str) -> Option<NaiveDate> {
    let timestamp = timestamp.trim().trim_matches('"');
    let date_part = timestamp.split('T').next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
