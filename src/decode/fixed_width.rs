//! Decoder for one-record-per-line feeds laid out in fixed character columns.

use crate::decode::error::DecodeError;
use crate::decode::{ensure_not_empty, into_table, parse_value};
use crate::types::index_table::{IndexTable, Observation};
use crate::types::month::Month;
use log::debug;
use std::ops::Range;

/// Byte offsets of the year, month and value fields of a line.
#[derive(Debug, Clone)]
pub struct FixedWidthLayout {
    pub year: Range<usize>,
    pub month: Range<usize>,
    /// The value runs from here to the end of the line.
    pub value_start: usize,
    pub sentinel: Option<f64>,
}

/// `YYYY MM VALUE` layout of the CPC monthly AAO file.
pub const AAO_LAYOUT: FixedWidthLayout = FixedWidthLayout {
    year: 0..5,
    month: 5..10,
    value_start: 10,
    sentinel: None,
};

/// Decodes a fixed-width `year month value` document into a one-column table.
///
/// Lines that are blank, shorter than the value offset, or carry a
/// non-numeric field are skipped.
///
/// # Examples
///
/// ```
/// use climate_indices::decode::fixed_width::{decode_fixed_width, AAO_LAYOUT};
///
/// let table = decode_fixed_width("AAO", "AAO", &AAO_LAYOUT, "1979    1   1.23\n1979    2  -0.45\n").unwrap();
/// assert_eq!(table.floats("AAO").unwrap(), &[Some(1.23), Some(-0.45)]);
/// ```
pub fn decode_fixed_width(
    index: &str,
    column: &str,
    layout: &FixedWidthLayout,
    raw: &str,
) -> Result<IndexTable, DecodeError> {
    ensure_not_empty(index, raw)?;

    let observations = raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parsed = parse_line(line, layout);
            if parsed.is_none() {
                debug!("Skipping unparsable {} line: {:?}", index, line);
            }
            parsed
        })
        .collect();

    into_table(index, column, observations)
}

fn parse_line(line: &str, layout: &FixedWidthLayout) -> Option<Observation> {
    if line.len() < layout.value_start {
        return None;
    }
    let year = line.get(layout.year.clone())?.trim().parse::<i32>().ok()?;
    let month_number = line.get(layout.month.clone())?.trim().parse::<u32>().ok()?;
    let month = Month::from_number(month_number).ok()?;
    let value = parse_value(line.get(layout.value_start..)?, layout.sentinel)?;
    Observation::new(year, month, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn decodes_aao_lines() {
        let table =
            decode_fixed_width("AAO", "AAO", &AAO_LAYOUT, "1979    1   1.23\n1979    2  -0.45\n")
                .unwrap();

        assert_eq!(table.len(), 2);
        let first = table.record(0).unwrap();
        assert_eq!(first.year, 1979);
        assert_eq!(first.month(), Some(Month::Jan));
        assert_eq!(first.date, NaiveDate::from_ymd_opt(1979, 1, 1).unwrap());
        assert_eq!(first.float("AAO"), Some(1.23));
        let second = table.record(1).unwrap();
        assert_eq!(second.month(), Some(Month::Feb));
        assert_eq!(second.float("AAO"), Some(-0.45));
    }

    #[test]
    fn skips_short_and_malformed_lines() {
        let raw = "1979    1   1.23\nshort\n1979   13   0.10\n1979    3    abc\n\n1979    4   0.50\n";
        let table = decode_fixed_width("AAO", "AAO", &AAO_LAYOUT, raw).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.floats("AAO").unwrap(), &[Some(1.23), Some(0.5)]);
    }

    #[test]
    fn out_of_order_lines_are_sorted() {
        let raw = "1980    1   0.10\n1979   12   0.20\n";
        let table = decode_fixed_width("AAO", "AAO", &AAO_LAYOUT, raw).unwrap();
        assert_eq!(table.record(0).unwrap().year, 1979);
        assert_eq!(table.record(1).unwrap().year, 1980);
    }

    #[test]
    fn empty_and_unrecognisable_documents_fail() {
        assert!(matches!(
            decode_fixed_width("AAO", "AAO", &AAO_LAYOUT, "\n  \n"),
            Err(DecodeError::EmptyInput { .. })
        ));
        assert!(matches!(
            decode_fixed_width("AAO", "AAO", &AAO_LAYOUT, "<html>not found</html>"),
            Err(DecodeError::NoRecords { .. })
        ));
    }
}
