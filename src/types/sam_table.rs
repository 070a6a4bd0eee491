use crate::error::ClimateIndexError;
use chrono::NaiveDate;
use polars::prelude::*;
use std::fmt;
use std::str::FromStr;

/// Pressure levels (hPa) published for the daily asymmetric SAM feed.
pub const SAM_LEVELS: [u16; 37] = [
    1, 2, 3, 5, 7, 10, 20, 30, 50, 70, 100, 125, 150, 175, 200, 225, 250, 300, 350, 400, 450,
    500, 550, 600, 650, 700, 750, 775, 800, 825, 850, 875, 900, 925, 950, 975, 1000,
];

pub const DEFAULT_SAM_LEVEL: u16 = 700;

/// Which Southern Annular Mode component a row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SamIndex {
    /// Full SAM.
    Sam,
    /// Zonally symmetric part.
    Ssam,
    /// Zonally asymmetric part.
    Asam,
}

impl SamIndex {
    pub const ALL: [SamIndex; 3] = [SamIndex::Sam, SamIndex::Ssam, SamIndex::Asam];

    pub fn code(self) -> &'static str {
        match self {
            SamIndex::Sam => "sam",
            SamIndex::Ssam => "ssam",
            SamIndex::Asam => "asam",
        }
    }
}

impl fmt::Display for SamIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SamIndex {
    type Err = ClimateIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SamIndex::ALL
            .into_iter()
            .find(|index| index.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ClimateIndexError::InvalidArgument(format!("unknown SAM index '{}'", s)))
    }
}

/// The second measurement carried next to `Value`, which differs per feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamMeasure {
    /// Monthly feed: value divided by the index standard deviation.
    Normalized,
    /// Daily feed: variance explained by the index.
    RSquared,
}

impl SamMeasure {
    pub fn column_name(self) -> &'static str {
        match self {
            SamMeasure::Normalized => "Value_normalized",
            SamMeasure::RSquared => "R.squared",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamRecord {
    /// Pressure level in hPa.
    pub lev: i32,
    pub date: NaiveDate,
    pub index: SamIndex,
    pub value: Option<f64>,
    /// `Value_normalized` or `R.squared`, see [`SamTable::measure`].
    pub second: Option<f64>,
}

/// Long-format SAM table: one row per level, date and component.
#[derive(Debug, Clone, PartialEq)]
pub struct SamTable {
    measure: SamMeasure,
    records: Vec<SamRecord>,
}

impl SamTable {
    pub fn new(measure: SamMeasure, records: Vec<SamRecord>) -> Self {
        Self { measure, records }
    }

    /// Appends tables in order. Returns `None` for an empty input.
    pub fn concat(tables: Vec<SamTable>) -> Option<SamTable> {
        let mut tables = tables.into_iter();
        let mut combined = tables.next()?;
        for table in tables {
            combined.records.extend(table.records);
        }
        Some(combined)
    }

    pub fn measure(&self) -> SamMeasure {
        self.measure
    }

    pub fn records(&self) -> &[SamRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn levels(&self) -> Vec<i32> {
        let mut levels: Vec<i32> = self.records.iter().map(|r| r.lev).collect();
        levels.sort_unstable();
        levels.dedup();
        levels
    }

    pub fn filter_index(&self, index: SamIndex) -> impl Iterator<Item = &SamRecord> + '_ {
        self.records.iter().filter(move |r| r.index == index)
    }

    /// `Lev, Date, Index, Value, <measure>` as a polars frame.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let epoch = NaiveDate::default();
        let lev: Vec<i32> = self.records.iter().map(|r| r.lev).collect();
        let days: Vec<i32> = self
            .records
            .iter()
            .map(|r| (r.date - epoch).num_days() as i32)
            .collect();
        let index: Vec<&str> = self.records.iter().map(|r| r.index.code()).collect();
        let value: Vec<Option<f64>> = self.records.iter().map(|r| r.value).collect();
        let second: Vec<Option<f64>> = self.records.iter().map(|r| r.second).collect();

        DataFrame::new(vec![
            Column::new("Lev".into(), lev),
            Series::new("Date".into(), days).cast(&DataType::Date)?.into(),
            Column::new("Index".into(), index),
            Column::new("Value".into(), value),
            Column::new(self.measure.column_name().into(), second),
        ])
    }
}

/// Pressure levels requested from the daily SAM feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SamLevels {
    All,
    Levels(Vec<u16>),
}

impl Default for SamLevels {
    fn default() -> Self {
        SamLevels::Levels(vec![DEFAULT_SAM_LEVEL])
    }
}

impl From<u16> for SamLevels {
    fn from(level: u16) -> Self {
        SamLevels::Levels(vec![level])
    }
}

impl From<Vec<u16>> for SamLevels {
    fn from(levels: Vec<u16>) -> Self {
        SamLevels::Levels(levels)
    }
}

impl SamLevels {
    /// Expands and validates the request.
    ///
    /// # Errors
    ///
    /// [`ClimateIndexError::InvalidArgument`] naming every unpublished level
    /// together with the valid ones.
    pub fn resolve(&self) -> Result<Vec<u16>, ClimateIndexError> {
        let levels = match self {
            SamLevels::All => return Ok(SAM_LEVELS.to_vec()),
            SamLevels::Levels(levels) => levels,
        };
        let bad: Vec<String> = levels
            .iter()
            .filter(|level| !SAM_LEVELS.contains(level))
            .map(u16::to_string)
            .collect();
        if !bad.is_empty() {
            let valid: Vec<String> = SAM_LEVELS.iter().map(u16::to_string).collect();
            return Err(ClimateIndexError::InvalidArgument(format!(
                "Invalid levels: {}. Valid levels are: {}",
                bad.join(", "),
                valid.join(", ")
            )));
        }
        Ok(levels.clone())
    }
}
