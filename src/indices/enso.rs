//! ENSO family: ONI, SOI, MEI and the NPGO used alongside them.

use crate::decode::error::DecodeError;
use crate::decode::whitespace_table::{decode_whitespace_table, NINO34_LAYOUT, NPGO_LAYOUT};
use crate::decode::year_grid::{
    decode_bounded_grid, decode_marked_grid, ColumnLabels, GridFormat, UnparsableCell, YearBounds,
};
use crate::derive::{with_phase, with_rolling_mean, with_window_labels};
use crate::error::ClimateIndexError;
use crate::indices::IndexSource;
use crate::types::climate_index::ClimateIndex;
use crate::types::index_table::{ColumnSpec, IndexTable};
use chrono::NaiveDate;

pub const ONI_URL: &str =
    "http://www.cpc.ncep.noaa.gov/products/analysis_monitoring/ensostuff/detrend.nino34.ascii.txt";
pub const SOI_URL: &str = "https://www.cpc.ncep.noaa.gov/data/indices/soi";
pub const MEI_URL: &str = "https://www.esrl.noaa.gov/psd/enso/mei/data/meiv2.data";
pub const NPGO_URL: &str = "http://www.oces.us/npgo/data/NPGO.txt";

const ANOMALY: &str = "dSST3.4";
const ONI: &str = "ONI";
const ONI_WINDOW: &str = "ONI_month_window";
const ONI_PHASE: &str = "phase";
const SOI: &str = "SOI";
const SOI_AVG: &str = "SOI_3MON_AVG";
const MEI: &str = "MEI";
const MEI_PHASE: &str = "Phase";
const NPGO: &str = "NPGO";

const SOI_FORMAT: GridFormat = GridFormat {
    labels: ColumnLabels::Months,
    sentinel: Some(-999.9),
    unparsable: UnparsableCell::Absent,
};

const MEI_FORMAT: GridFormat = GridFormat {
    labels: ColumnLabels::Seasons,
    sentinel: Some(-999.0),
    unparsable: UnparsableCell::Absent,
};

/// Used when the MEI header does not state its year range.
pub const MEI_FALLBACK_YEARS: YearBounds = YearBounds::new(1979, 2023);

/// Oceanic Niño Index: three-month running mean of the detrended Niño 3.4
/// anomaly, with the window label and the ENSO phase.
#[derive(Debug, Clone, Copy)]
pub struct Oni;

impl IndexSource for Oni {
    fn kind(&self) -> ClimateIndex {
        ClimateIndex::Oni
    }

    fn upstream_url(&self, _today: NaiveDate) -> String {
        ONI_URL.to_string()
    }

    fn schema(&self) -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::float(ANOMALY),
            ColumnSpec::float(ONI),
            ColumnSpec::text(ONI_WINDOW),
            ColumnSpec::phase(ONI_PHASE),
        ]
    }

    fn decode(&self, raw: &str) -> Result<IndexTable, DecodeError> {
        decode_whitespace_table(ONI, ANOMALY, &NINO34_LAYOUT, raw)
    }

    fn derive_fields(&self, table: IndexTable) -> Result<IndexTable, ClimateIndexError> {
        let table = with_rolling_mean(table, ANOMALY, ONI)?;
        let table = with_window_labels(table, ONI_WINDOW)?;
        with_phase(table, ONI, ONI_PHASE)
    }
}

/// Southern Oscillation Index, standardized Tahiti minus Darwin pressure.
#[derive(Debug, Clone, Copy)]
pub struct Soi;

impl IndexSource for Soi {
    fn kind(&self) -> ClimateIndex {
        ClimateIndex::Soi
    }

    fn upstream_url(&self, _today: NaiveDate) -> String {
        SOI_URL.to_string()
    }

    fn schema(&self) -> Vec<ColumnSpec> {
        vec![ColumnSpec::float(SOI), ColumnSpec::float(SOI_AVG)]
    }

    fn decode(&self, raw: &str) -> Result<IndexTable, DecodeError> {
        decode_marked_grid(SOI, SOI, &SOI_FORMAT, "STANDARDIZED", "YEAR", raw)
    }

    fn derive_fields(&self, table: IndexTable) -> Result<IndexTable, ClimateIndexError> {
        with_rolling_mean(table, SOI, SOI_AVG)
    }
}

/// Multivariate ENSO Index v2, published per overlapping two-month season.
#[derive(Debug, Clone, Copy)]
pub struct Mei;

impl IndexSource for Mei {
    fn kind(&self) -> ClimateIndex {
        ClimateIndex::Mei
    }

    fn upstream_url(&self, _today: NaiveDate) -> String {
        MEI_URL.to_string()
    }

    fn schema(&self) -> Vec<ColumnSpec> {
        vec![ColumnSpec::float(MEI), ColumnSpec::phase(MEI_PHASE)]
    }

    fn decode(&self, raw: &str) -> Result<IndexTable, DecodeError> {
        decode_bounded_grid(MEI, MEI, &MEI_FORMAT, MEI_FALLBACK_YEARS, raw)
    }

    fn derive_fields(&self, table: IndexTable) -> Result<IndexTable, ClimateIndexError> {
        with_phase(table, MEI, MEI_PHASE)
    }
}

/// North Pacific Gyre Oscillation.
#[derive(Debug, Clone, Copy)]
pub struct Npgo;

impl IndexSource for Npgo {
    fn kind(&self) -> ClimateIndex {
        ClimateIndex::Npgo
    }

    fn upstream_url(&self, _today: NaiveDate) -> String {
        NPGO_URL.to_string()
    }

    fn schema(&self) -> Vec<ColumnSpec> {
        vec![ColumnSpec::float(NPGO)]
    }

    fn decode(&self, raw: &str) -> Result<IndexTable, DecodeError> {
        decode_whitespace_table(NPGO, NPGO, &NPGO_LAYOUT, raw)
    }
}
