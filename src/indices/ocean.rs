//! Ocean-basin modes: Pacific Decadal Oscillation and the Indian Ocean Dipole.

use crate::decode::error::DecodeError;
use crate::decode::timestamped_csv::{decode_timestamped_csv, ERDDAP_PREAMBLE_LINES};
use crate::decode::year_grid::{
    decode_bounded_grid, ColumnLabels, GridFormat, UnparsableCell, YearBounds,
};
use crate::indices::IndexSource;
use crate::types::climate_index::ClimateIndex;
use crate::types::index_table::{ColumnSpec, IndexTable};
use chrono::NaiveDate;

const PDO_ERDDAP: &str = "https://oceanview.pfeg.noaa.gov/erddap/tabledap/cciea_OC_PDO.csv";
pub const DMI_URL: &str = "https://psl.noaa.gov/gcos_wgsp/Timeseries/Data/dmi.had.long.data";

const DMI_FORMAT: GridFormat = GridFormat {
    labels: ColumnLabels::Months,
    sentinel: Some(-9999.0),
    unparsable: UnparsableCell::Absent,
};

/// Used when the DMI header does not state its year range.
pub const DMI_FALLBACK_YEARS: YearBounds = YearBounds::new(1850, 2025);

/// ERDDAP query for the full PDO record up to (excluding) `today`.
pub fn pdo_url(today: NaiveDate) -> String {
    format!(
        "{}?time%2CPDO&time%3E=1900-01-01&time%3C={}",
        PDO_ERDDAP,
        today.format("%Y-%m-%d")
    )
}

/// Pacific Decadal Oscillation (NCEI, served through ERDDAP).
#[derive(Debug, Clone, Copy)]
pub struct Pdo;

impl IndexSource for Pdo {
    fn kind(&self) -> ClimateIndex {
        ClimateIndex::Pdo
    }

    fn upstream_url(&self, today: NaiveDate) -> String {
        pdo_url(today)
    }

    fn schema(&self) -> Vec<ColumnSpec> {
        vec![ColumnSpec::float("PDO")]
    }

    fn decode(&self, raw: &str) -> Result<IndexTable, DecodeError> {
        decode_timestamped_csv("PDO", "PDO", ERDDAP_PREAMBLE_LINES, raw)
    }
}

/// Dipole Mode Index from HadISST.
#[derive(Debug, Clone, Copy)]
pub struct Dmi;

impl IndexSource for Dmi {
    fn kind(&self) -> ClimateIndex {
        ClimateIndex::Dmi
    }

    fn upstream_url(&self, _today: NaiveDate) -> String {
        DMI_URL.to_string()
    }

    fn schema(&self) -> Vec<ColumnSpec> {
        vec![ColumnSpec::float("DMI")]
    }

    fn decode(&self, raw: &str) -> Result<IndexTable, DecodeError> {
        decode_bounded_grid("DMI", "DMI", &DMI_FORMAT, DMI_FALLBACK_YEARS, raw)
    }
}
