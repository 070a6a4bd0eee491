//! Asymmetric and symmetric Southern Annular Mode indices (Campitelli et al. 2022).

use crate::decode::error::DecodeError;
use crate::decode::typed_csv::decode_sam_csv;
use crate::types::sam_table::{SamMeasure, SamTable};

const SAM_INDEX: &str = "asymsam";

/// Where the SAM files are published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamFeeds {
    pub monthly_url: String,
    /// Directory holding one `sam_<level>hPa.csv` per pressure level.
    pub daily_root: String,
}

impl Default for SamFeeds {
    fn default() -> Self {
        Self {
            monthly_url: "https://www.cima.fcen.uba.ar/~elio.campitelli/asymsam/data/sam_monthly.csv"
                .to_string(),
            daily_root: "https://www.cima.fcen.uba.ar/~elio.campitelli/asymsam/data/sam_level/"
                .to_string(),
        }
    }
}

impl SamFeeds {
    pub fn daily_url(&self, level: u16) -> String {
        let separator = if self.daily_root.ends_with('/') { "" } else { "/" };
        format!("{}{}sam_{}hPa.csv", self.daily_root, separator, level)
    }
}

/// `Lev, Date, Index, Value, Value_normalized`.
pub fn decode_monthly(raw: &str) -> Result<SamTable, DecodeError> {
    decode_sam_csv(SAM_INDEX, SamMeasure::Normalized, raw)
}

/// `Lev, Date, Index, Value, R.squared` for one level.
pub fn decode_daily(raw: &str) -> Result<SamTable, DecodeError> {
    decode_sam_csv(SAM_INDEX, SamMeasure::RSquared, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_urls_follow_level() {
        let feeds = SamFeeds::default();
        assert!(feeds.daily_url(700).ends_with("/data/sam_level/sam_700hPa.csv"));

        let mirror = SamFeeds {
            monthly_url: "http://localhost/m.csv".to_string(),
            daily_root: "http://localhost/levels".to_string(),
        };
        assert_eq!(mirror.daily_url(50), "http://localhost/levels/sam_50hPa.csv");
    }

    #[test]
    fn monthly_and_daily_use_their_measure() {
        let monthly = decode_monthly("Lev,Date,Index,Value,Value_normalized\n700,1979-01-01,sam,1.0,0.5\n").unwrap();
        assert_eq!(monthly.measure(), SamMeasure::Normalized);
        let daily = decode_daily("Lev,Date,Index,Value,R.squared\n700,1979-01-01,asam,1.0,0.5\n").unwrap();
        assert_eq!(daily.measure(), SamMeasure::RSquared);
    }
}
