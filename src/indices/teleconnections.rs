//! Atmospheric teleconnection patterns published by CPC: AO, NAO and AAO.

use crate::decode::error::DecodeError;
use crate::decode::fixed_width::{decode_fixed_width, AAO_LAYOUT};
use crate::decode::year_grid::{decode_year_grid, ColumnLabels, GridFormat, UnparsableCell};
use crate::indices::IndexSource;
use crate::types::climate_index::ClimateIndex;
use crate::types::index_table::{ColumnSpec, IndexTable};
use chrono::NaiveDate;

pub const AO_URL: &str = "https://www.cpc.ncep.noaa.gov/products/precip/CWlink/daily_ao_index/monthly.ao.index.b50.current.ascii.table";
pub const NAO_URL: &str =
    "https://www.cpc.ncep.noaa.gov/products/precip/CWlink/pna/norm.nao.monthly.b5001.current.ascii.table";
pub const AAO_URL: &str = "https://www.cpc.ncep.noaa.gov/products/precip/CWlink/daily_ao_index/aao/monthly.aao.index.b79.current.ascii";

/// CPC month tables: one header line, blanks for months not yet published.
const CPC_TABLE: GridFormat = GridFormat {
    labels: ColumnLabels::Months,
    sentinel: None,
    unparsable: UnparsableCell::Skip,
};
const CPC_TABLE_HEADER_LINES: usize = 1;

/// Arctic Oscillation.
#[derive(Debug, Clone, Copy)]
pub struct Ao;

impl IndexSource for Ao {
    fn kind(&self) -> ClimateIndex {
        ClimateIndex::Ao
    }

    fn upstream_url(&self, _today: NaiveDate) -> String {
        AO_URL.to_string()
    }

    fn schema(&self) -> Vec<ColumnSpec> {
        vec![ColumnSpec::float("AO")]
    }

    fn decode(&self, raw: &str) -> Result<IndexTable, DecodeError> {
        decode_year_grid("AO", "AO", &CPC_TABLE, CPC_TABLE_HEADER_LINES, raw)
    }
}

/// North Atlantic Oscillation.
#[derive(Debug, Clone, Copy)]
pub struct Nao;

impl IndexSource for Nao {
    fn kind(&self) -> ClimateIndex {
        ClimateIndex::Nao
    }

    fn upstream_url(&self, _today: NaiveDate) -> String {
        NAO_URL.to_string()
    }

    fn schema(&self) -> Vec<ColumnSpec> {
        vec![ColumnSpec::float("NAO")]
    }

    fn decode(&self, raw: &str) -> Result<IndexTable, DecodeError> {
        decode_year_grid("NAO", "NAO", &CPC_TABLE, CPC_TABLE_HEADER_LINES, raw)
    }
}

/// Antarctic Oscillation, one `year month value` line per month.
#[derive(Debug, Clone, Copy)]
pub struct Aao;

impl IndexSource for Aao {
    fn kind(&self) -> ClimateIndex {
        ClimateIndex::Aao
    }

    fn upstream_url(&self, _today: NaiveDate) -> String {
        AAO_URL.to_string()
    }

    fn schema(&self) -> Vec<ColumnSpec> {
        vec![ColumnSpec::float("AAO")]
    }

    fn decode(&self, raw: &str) -> Result<IndexTable, DecodeError> {
        decode_fixed_width("AAO", "AAO", &AAO_LAYOUT, raw)
    }
}
