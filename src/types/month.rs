//! Calendar vocabulary shared by every index: the twelve months and the twelve
//! overlapping bi-monthly seasons used by the MEI feed.

use crate::error::ClimateIndexError;
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// A calendar month. Ordering follows the calendar, not the alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    /// All months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Resolves a 1-based month number.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateIndexError::InvalidArgument`] for anything outside `1..=12`.
    ///
    /// # Examples
    ///
    /// ```
    /// use climate_indices::Month;
    ///
    /// assert_eq!(Month::from_number(3).unwrap(), Month::Mar);
    /// assert!(Month::from_number(13).is_err());
    /// ```
    pub fn from_number(number: u32) -> Result<Self, ClimateIndexError> {
        number
            .checked_sub(1)
            .and_then(|idx| Self::ALL.get(idx as usize).copied())
            .ok_or_else(|| {
                ClimateIndexError::InvalidArgument(format!(
                    "month number must be within 1..=12, got {}",
                    number
                ))
            })
    }

    /// The calendar month of a date.
    pub fn from_date(date: NaiveDate) -> Self {
        // `Datelike::month0` is always within 0..12.
        Self::ALL[date.month0() as usize]
    }

    /// 1-based month number.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn abbr(self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }

    /// First letter of the abbreviation, used to build window labels like `"JFM"`.
    pub fn initial(self) -> char {
        match self {
            Month::Jan | Month::Jun | Month::Jul => 'J',
            Month::Feb => 'F',
            Month::Mar | Month::May => 'M',
            Month::Apr | Month::Aug => 'A',
            Month::Sep => 'S',
            Month::Oct => 'O',
            Month::Nov => 'N',
            Month::Dec => 'D',
        }
    }

    /// The first day of this month in `year`.
    pub fn first_day(self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.number(), 1)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbr())
    }
}

impl FromStr for Month {
    type Err = ClimateIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.abbr().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ClimateIndexError::InvalidArgument(format!("unknown month '{}'", s)))
    }
}

/// One of the twelve overlapping two-month seasons of the MEI.v2 analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    DJ,
    JF,
    FM,
    MA,
    AM,
    MJ,
    JJ,
    JA,
    AS,
    SO,
    ON,
    ND,
}

impl Season {
    pub const ALL: [Season; 12] = [
        Season::DJ,
        Season::JF,
        Season::FM,
        Season::MA,
        Season::AM,
        Season::MJ,
        Season::JJ,
        Season::JA,
        Season::AS,
        Season::SO,
        Season::ON,
        Season::ND,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Season::DJ => "DJ",
            Season::JF => "JF",
            Season::FM => "FM",
            Season::MA => "MA",
            Season::AM => "AM",
            Season::MJ => "MJ",
            Season::JJ => "JJ",
            Season::JA => "JA",
            Season::AS => "AS",
            Season::SO => "SO",
            Season::ON => "ON",
            Season::ND => "ND",
        }
    }

    /// Month used to date a season. Seasons are assigned positionally, so the
    /// n-th season of a year is dated to the n-th month.
    pub fn anchor_month(self) -> Month {
        Month::ALL[self as usize]
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Season {
    type Err = ClimateIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|season| season.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ClimateIndexError::InvalidArgument(format!("unknown season '{}'", s)))
    }
}

/// The label written to the `Month` column of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Period {
    Month(Month),
    Season(Season),
}

impl Period {
    pub fn anchor_month(self) -> Month {
        match self {
            Period::Month(month) => month,
            Period::Season(season) => season.anchor_month(),
        }
    }

    pub fn as_month(self) -> Option<Month> {
        match self {
            Period::Month(month) => Some(month),
            Period::Season(_) => None,
        }
    }
}

impl From<Month> for Period {
    fn from(month: Month) -> Self {
        Period::Month(month)
    }
}

impl From<Season> for Period {
    fn from(season: Season) -> Self {
        Period::Season(season)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Month(month) => month.fmt(f),
            Period::Season(season) => season.fmt(f),
        }
    }
}

impl FromStr for Period {
    type Err = ClimateIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Month>()
            .map(Period::Month)
            .or_else(|_| s.parse::<Season>().map(Period::Season))
            .map_err(|_| ClimateIndexError::InvalidArgument(format!("unknown period label '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn months_are_calendar_ordered() {
        let mut shuffled = vec![Month::Dec, Month::Apr, Month::Jan, Month::Aug];
        shuffled.sort();
        assert_eq!(shuffled, vec![Month::Jan, Month::Apr, Month::Aug, Month::Dec]);
        // Alphabetically "Apr" < "Jan", calendar order must win.
        assert!(Month::Jan < Month::Apr);
    }

    #[test]
    fn month_numbers_round_trip() {
        for (idx, month) in Month::ALL.iter().enumerate() {
            assert_eq!(month.number(), idx as u32 + 1);
            assert_eq!(Month::from_number(month.number()).unwrap(), *month);
        }
        assert!(Month::from_number(0).is_err());
        assert!(Month::from_number(13).is_err());
    }

    #[test]
    fn month_from_date_and_initials() {
        let date = NaiveDate::from_ymd_opt(2022, 12, 1).unwrap();
        assert_eq!(Month::from_date(date), Month::Dec);
        let initials: String = Month::ALL.iter().map(|m| m.initial()).collect();
        assert_eq!(initials, "JFMAMJJASOND");
    }

    #[test]
    fn seasons_anchor_positionally() {
        assert_eq!(Season::DJ.anchor_month(), Month::Jan);
        assert_eq!(Season::JF.anchor_month(), Month::Feb);
        assert_eq!(Season::ND.anchor_month(), Month::Dec);
    }

    #[test]
    fn period_parses_both_vocabularies() {
        assert_eq!("Mar".parse::<Period>().unwrap(), Period::Month(Month::Mar));
        assert_eq!("SO".parse::<Period>().unwrap(), Period::Season(Season::SO));
        assert!("Foo".parse::<Period>().is_err());
    }
}
