use crate::error::ClimateIndexError;
use std::fmt;
use std::str::FromStr;

/// Symmetric threshold separating the ENSO phases, in index units.
pub const PHASE_THRESHOLD: f64 = 0.5;

/// ENSO phase derived from an ONI or MEI value.
///
/// Variants are ordered from cool to warm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    CoolLaNina,
    Neutral,
    WarmElNino,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::CoolLaNina, Phase::Neutral, Phase::WarmElNino];

    /// Buckets an index value using the fixed `±0.5` thresholds.
    ///
    /// Boundaries belong to the outer phases: `0.5` is warm, `-0.5` is cool.
    /// An absent value has no phase.
    ///
    /// # Examples
    ///
    /// ```
    /// use climate_indices::Phase;
    ///
    /// assert_eq!(Phase::classify(Some(0.5)), Some(Phase::WarmElNino));
    /// assert_eq!(Phase::classify(Some(-0.5)), Some(Phase::CoolLaNina));
    /// assert_eq!(Phase::classify(Some(0.0)), Some(Phase::Neutral));
    /// assert_eq!(Phase::classify(None), None);
    /// ```
    pub fn classify(value: Option<f64>) -> Option<Phase> {
        let v = value.filter(|v| v.is_finite())?;
        Some(if v <= -PHASE_THRESHOLD {
            Phase::CoolLaNina
        } else if v >= PHASE_THRESHOLD {
            Phase::WarmElNino
        } else {
            Phase::Neutral
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::CoolLaNina => "Cool Phase/La Nina",
            Phase::Neutral => "Neutral Phase",
            Phase::WarmElNino => "Warm Phase/El Nino",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Phase {
    type Err = ClimateIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|phase| phase.label() == s.trim())
            .ok_or_else(|| ClimateIndexError::InvalidArgument(format!("unknown phase '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_boundaries() {
        assert_eq!(Phase::classify(Some(0.5)), Some(Phase::WarmElNino));
        assert_eq!(Phase::classify(Some(-0.5)), Some(Phase::CoolLaNina));
        assert_eq!(Phase::classify(Some(0.0)), Some(Phase::Neutral));
        assert_eq!(Phase::classify(Some(0.49)), Some(Phase::Neutral));
        assert_eq!(Phase::classify(Some(-0.49)), Some(Phase::Neutral));
        assert_eq!(Phase::classify(Some(2.3)), Some(Phase::WarmElNino));
        assert_eq!(Phase::classify(None), None);
        assert_eq!(Phase::classify(Some(f64::NAN)), None);
    }

    #[test]
    fn labels_parse_back() {
        for phase in Phase::ALL {
            assert_eq!(phase.label().parse::<Phase>().unwrap(), phase);
        }
        assert!("Hot".parse::<Phase>().is_err());
    }

    #[test]
    fn phases_order_cool_to_warm() {
        assert!(Phase::CoolLaNina < Phase::Neutral);
        assert!(Phase::Neutral < Phase::WarmElNino);
    }
}
