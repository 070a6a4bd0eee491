//! Decoder for whitespace-delimited tables holding one `year month ...` row per record.

use crate::decode::error::DecodeError;
use crate::decode::{ensure_not_empty, into_table, parse_value};
use crate::types::index_table::{IndexTable, Observation};
use crate::types::month::Month;
use log::debug;

/// Where the fields of a row live and which lines to ignore.
#[derive(Debug, Clone)]
pub struct WhitespaceLayout {
    /// Leading header lines to drop.
    pub skip_lines: usize,
    /// Lines starting with this prefix are comments.
    pub comment_prefix: Option<&'static str>,
    pub year_field: usize,
    pub month_field: usize,
    pub value_field: usize,
    pub sentinel: Option<f64>,
}

impl WhitespaceLayout {
    fn min_fields(&self) -> usize {
        self.year_field.max(self.month_field).max(self.value_field) + 1
    }
}

/// CPC detrended Niño 3.4 file: `YR MON TOTAL ClimAdjust ANOM`, one header line.
pub const NINO34_LAYOUT: WhitespaceLayout = WhitespaceLayout {
    skip_lines: 1,
    comment_prefix: None,
    year_field: 0,
    month_field: 1,
    value_field: 4,
    sentinel: None,
};

/// NPGO file: `#` comment preamble, then `YEAR MONTH NPGO`.
pub const NPGO_LAYOUT: WhitespaceLayout = WhitespaceLayout {
    skip_lines: 0,
    comment_prefix: Some("#"),
    year_field: 0,
    month_field: 1,
    value_field: 2,
    sentinel: None,
};

/// Decodes a whitespace table into a one-column table named `column`.
pub fn decode_whitespace_table(
    index: &str,
    column: &str,
    layout: &WhitespaceLayout,
    raw: &str,
) -> Result<IndexTable, DecodeError> {
    ensure_not_empty(index, raw)?;

    let observations = raw
        .lines()
        .skip(layout.skip_lines)
        .filter(|line| !line.trim().is_empty())
        .filter(|line| {
            layout
                .comment_prefix
                .map_or(true, |prefix| !line.trim_start().starts_with(prefix))
        })
        .filter_map(|line| {
            let parsed = parse_row(line, layout);
            if parsed.is_none() {
                debug!("Skipping unparsable {} row: {:?}", index, line);
            }
            parsed
        })
        .collect();

    into_table(index, column, observations)
}

fn parse_row(line: &str, layout: &WhitespaceLayout) -> Option<Observation> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < layout.min_fields() {
        return None;
    }
    let year = fields[layout.year_field].parse::<i32>().ok()?;
    let month = Month::from_number(fields[layout.month_field].parse::<u32>().ok()?).ok()?;
    let value = parse_value(fields[layout.value_field], layout.sentinel)?;
    Observation::new(year, month, value)
}
