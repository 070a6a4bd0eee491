//! Decoders for year-row tables with twelve monthly (or bi-monthly) columns.
//!
//! Three framings share the same row parser:
//! * a plain grid after a fixed number of header lines (AO, NAO),
//! * a grid found by scanning for a marker line (SOI),
//! * a grid whose first line states the year range it covers (MEI, DMI).

use crate::decode::error::DecodeError;
use crate::decode::{ensure_not_empty, into_table, parse_value, DecodeWarning};
use crate::types::index_table::{IndexTable, Observation};
use crate::types::month::{Month, Period, Season};
use log::debug;
use regex::Regex;

/// What to do with a month token that is not a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnparsableCell {
    /// Emit the record with an absent value.
    Absent,
    /// Emit no record for that month.
    Skip,
}

/// Labels assigned positionally to the twelve value columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnLabels {
    Months,
    Seasons,
}

impl ColumnLabels {
    fn period(self, column: usize) -> Period {
        match self {
            ColumnLabels::Months => Period::Month(Month::ALL[column]),
            ColumnLabels::Seasons => Period::Season(Season::ALL[column]),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GridFormat {
    pub labels: ColumnLabels,
    pub sentinel: Option<f64>,
    pub unparsable: UnparsableCell,
}

/// Inclusive range of years a bounded grid is expected to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBounds {
    pub start: i32,
    pub end: i32,
}

impl YearBounds {
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

const VALUE_COLUMNS: usize = 12;

/// Decodes a grid that starts after `skip_lines` header lines.
///
/// # Examples
///
/// ```
/// use climate_indices::decode::year_grid::{decode_year_grid, GridFormat, ColumnLabels, UnparsableCell};
///
/// let format = GridFormat { labels: ColumnLabels::Months, sentinel: None, unparsable: UnparsableCell::Skip };
/// let raw = "1979 1.1 1.2 1.3 1.4 1.5 1.6 1.7 1.8 1.9 2.0 2.1 2.2";
/// let table = decode_year_grid("AO", "AO", &format, 0, raw).unwrap();
/// assert_eq!(table.len(), 12);
/// ```
pub fn decode_year_grid(
    index: &str,
    column: &str,
    format: &GridFormat,
    skip_lines: usize,
    raw: &str,
) -> Result<IndexTable, DecodeError> {
    ensure_not_empty(index, raw)?;
    let observations = parse_rows(index, raw.lines().skip(skip_lines), format, None);
    into_table(index, column, observations)
}

/// Decodes the grid that follows the first line containing `marker` and the
/// column header line (containing `header_token`) at or after it.
///
/// # Errors
///
/// Returns [`DecodeError::HeaderNotFound`] when either line is missing; this
/// framing has no fallback.
pub fn decode_marked_grid(
    index: &str,
    column: &str,
    format: &GridFormat,
    marker: &str,
    header_token: &str,
    raw: &str,
) -> Result<IndexTable, DecodeError> {
    ensure_not_empty(index, raw)?;
    let lines: Vec<&str> = raw.lines().collect();

    let not_found = |marker: &str| DecodeError::HeaderNotFound {
        index: index.to_string(),
        marker: marker.to_string(),
    };
    let marker_idx = lines
        .iter()
        .position(|line| line.contains(marker))
        .ok_or_else(|| not_found(marker))?;
    let header_idx = lines[marker_idx..]
        .iter()
        .position(|line| line.contains(header_token))
        .map(|offset| marker_idx + offset)
        .ok_or_else(|| not_found(header_token))?;

    let observations = parse_rows(index, lines[header_idx + 1..].iter().copied(), format, None);
    into_table(index, column, observations)
}

/// Decodes a grid whose first non-blank line states its `start end` years.
/// Rows outside those years are ignored.
///
/// If the header does not carry two years, `fallback` bounds are used and
/// the table is tagged with [`DecodeWarning::HeaderFallback`].
pub fn decode_bounded_grid(
    index: &str,
    column: &str,
    format: &GridFormat,
    fallback: YearBounds,
    raw: &str,
) -> Result<IndexTable, DecodeError> {
    ensure_not_empty(index, raw)?;
    let mut lines = raw.lines().skip_while(|line| line.trim().is_empty());
    let header = lines.next().unwrap_or_default();

    let (bounds, warning) = match header_bounds(header) {
        Some(bounds) => (bounds, None),
        None => (
            fallback,
            Some(DecodeWarning::HeaderFallback {
                start_year: fallback.start,
                end_year: fallback.end,
            }),
        ),
    };

    let observations = parse_rows(index, lines, format, Some(bounds));
    let table = into_table(index, column, observations)?;
    Ok(match warning {
        Some(warning) => table.with_warning(warning),
        None => table,
    })
}

/// Reads the first two four-digit numbers of a header line.
fn header_bounds(header: &str) -> Option<YearBounds> {
    let re = Regex::new(r"\d{4}").ok()?;
    let mut years = re
        .find_iter(header)
        .filter_map(|m| m.as_str().parse::<i32>().ok());
    let start = years.next()?;
    let end = years.next()?;
    Some(YearBounds::new(start, end))
}

fn parse_rows<'a>(
    index: &str,
    lines: impl Iterator<Item = &'a str>,
    format: &GridFormat,
    bounds: Option<YearBounds>,
) -> Vec<Observation> {
    let mut observations = Vec::new();
    for line in lines.filter(|line| !line.trim().is_empty()) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < VALUE_COLUMNS + 1 {
            debug!("Skipping short {} row: {:?}", index, line);
            continue;
        }
        let Ok(year) = tokens[0].parse::<i32>() else {
            debug!("Skipping {} row without a year: {:?}", index, line);
            continue;
        };
        if bounds.is_some_and(|b| !b.contains(year)) {
            debug!("Skipping {} row outside the header year range: {}", index, year);
            continue;
        }

        for column in 0..VALUE_COLUMNS {
            let Some(token) = tokens.get(column + 1) else {
                break;
            };
            let value = match (parse_value(token, format.sentinel), format.unparsable) {
                (Some(value), _) => value,
                (None, UnparsableCell::Absent) => None,
                (None, UnparsableCell::Skip) => continue,
            };
            if let Some(observation) = Observation::new(year, format.labels.period(column), value) {
                observations.push(observation);
            }
        }
    }
    observations
}
