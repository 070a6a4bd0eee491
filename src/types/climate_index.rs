use crate::error::ClimateIndexError;
use std::fmt;
use std::str::FromStr;

/// The closed set of monthly climate indices this crate can fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClimateIndex {
    /// Oceanic Niño Index.
    Oni,
    /// Arctic Oscillation.
    Ao,
    /// North Atlantic Oscillation.
    Nao,
    /// Southern Oscillation Index.
    Soi,
    /// Multivariate ENSO Index, version 2.
    Mei,
    /// North Pacific Gyre Oscillation.
    Npgo,
    /// Antarctic Oscillation.
    Aao,
    /// Pacific Decadal Oscillation.
    Pdo,
    /// Dipole Mode Index (Indian Ocean Dipole).
    Dmi,
}

impl ClimateIndex {
    pub const ALL: [ClimateIndex; 9] = [
        ClimateIndex::Oni,
        ClimateIndex::Ao,
        ClimateIndex::Nao,
        ClimateIndex::Soi,
        ClimateIndex::Mei,
        ClimateIndex::Npgo,
        ClimateIndex::Aao,
        ClimateIndex::Pdo,
        ClimateIndex::Dmi,
    ];

    /// Lowercase identifier, also used for cache file names.
    pub fn name(self) -> &'static str {
        match self {
            ClimateIndex::Oni => "oni",
            ClimateIndex::Ao => "ao",
            ClimateIndex::Nao => "nao",
            ClimateIndex::Soi => "soi",
            ClimateIndex::Mei => "mei",
            ClimateIndex::Npgo => "npgo",
            ClimateIndex::Aao => "aao",
            ClimateIndex::Pdo => "pdo",
            ClimateIndex::Dmi => "dmi",
        }
    }

    /// Upper-case label used in logs and as the value column name.
    pub fn label(self) -> &'static str {
        match self {
            ClimateIndex::Oni => "ONI",
            ClimateIndex::Ao => "AO",
            ClimateIndex::Nao => "NAO",
            ClimateIndex::Soi => "SOI",
            ClimateIndex::Mei => "MEI",
            ClimateIndex::Npgo => "NPGO",
            ClimateIndex::Aao => "AAO",
            ClimateIndex::Pdo => "PDO",
            ClimateIndex::Dmi => "DMI",
        }
    }
}

impl fmt::Display for ClimateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ClimateIndex {
    type Err = ClimateIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClimateIndex::ALL
            .into_iter()
            .find(|index| index.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ClimateIndexError::InvalidArgument(format!("unknown climate index '{}'", s)))
    }
}

/// Which ENSO-related output the combined download returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnsoSelector {
    /// ONI, SOI and NPGO joined on date.
    #[default]
    All,
    Oni,
    Soi,
    Npgo,
}

impl EnsoSelector {
    pub const OPTIONS: [&'static str; 4] = ["all", "soi", "oni", "npgo"];

    /// The single index behind a non-composite selector.
    pub fn single(self) -> Option<ClimateIndex> {
        match self {
            EnsoSelector::All => None,
            EnsoSelector::Oni => Some(ClimateIndex::Oni),
            EnsoSelector::Soi => Some(ClimateIndex::Soi),
            EnsoSelector::Npgo => Some(ClimateIndex::Npgo),
        }
    }
}

impl FromStr for EnsoSelector {
    type Err = ClimateIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(EnsoSelector::All),
            "oni" => Ok(EnsoSelector::Oni),
            "soi" => Ok(EnsoSelector::Soi),
            "npgo" => Ok(EnsoSelector::Npgo),
            _ => Err(ClimateIndexError::InvalidArgument(format!(
                "climate_idx must be one of {:?}, got '{}'",
                EnsoSelector::OPTIONS,
                s
            ))),
        }
    }
}
