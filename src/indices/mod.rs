//! One source per climate index: where it lives upstream, how its document is
//! decoded and which fields are derived from it.

pub mod asymsam;
pub mod enso;
pub mod ocean;
pub mod teleconnections;

use crate::decode::error::DecodeError;
use crate::error::ClimateIndexError;
use crate::types::climate_index::ClimateIndex;
use crate::types::index_table::{ColumnSpec, IndexTable};
use chrono::NaiveDate;
use log::warn;

/// Everything the client needs to know about one index.
pub trait IndexSource: Send + Sync {
    fn kind(&self) -> ClimateIndex;

    /// Upstream location. Only the PDO query depends on `today`.
    fn upstream_url(&self, today: NaiveDate) -> String;

    /// Non-key output columns, in output order.
    fn schema(&self) -> Vec<ColumnSpec>;

    fn decode(&self, raw: &str) -> Result<IndexTable, DecodeError>;

    /// Adds computed columns to a freshly decoded table.
    fn derive_fields(&self, table: IndexTable) -> Result<IndexTable, ClimateIndexError> {
        Ok(table)
    }

    /// Decodes and derives, logging any decode warnings.
    fn build(&self, raw: &str) -> Result<IndexTable, ClimateIndexError> {
        let table = self.decode(raw)?;
        for warning in table.warnings() {
            warn!("{}: {}", self.kind(), warning);
        }
        self.derive_fields(table)
    }
}

impl ClimateIndex {
    /// The source implementation for this index.
    pub fn source(self) -> &'static dyn IndexSource {
        match self {
            ClimateIndex::Oni => &enso::Oni,
            ClimateIndex::Soi => &enso::Soi,
            ClimateIndex::Mei => &enso::Mei,
            ClimateIndex::Npgo => &enso::Npgo,
            ClimateIndex::Ao => &teleconnections::Ao,
            ClimateIndex::Nao => &teleconnections::Nao,
            ClimateIndex::Aao => &teleconnections::Aao,
            ClimateIndex::Pdo => &ocean::Pdo,
            ClimateIndex::Dmi => &ocean::Dmi,
        }
    }
}
