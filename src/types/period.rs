//! Calendar spans used to slice index frames by date.

use crate::types::month::Month;
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Year(pub i32);

impl Year {
    pub fn get(self) -> i32 {
        self.0
    }
}

impl Display for Year {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// A single month of a single year.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: Month,
}

impl YearMonth {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// Day 1 of the month, the date every table row is keyed on.
    pub fn first_day(self) -> Option<NaiveDate> {
        self.month.first_day(self.year)
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month.number())
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self::new(date.year(), Month::from_date(date))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StartEndMonth {
    pub start: YearMonth,
    pub end: YearMonth,
}

/// Anything that can be resolved to an inclusive month span.
pub trait AnyMonth {
    fn get_month_range(self) -> Option<StartEndMonth>;
}

impl AnyMonth for YearMonth {
    fn get_month_range(self) -> Option<StartEndMonth> {
        Some(StartEndMonth {
            start: self,
            end: self,
        })
    }
}

impl AnyMonth for Year {
    fn get_month_range(self) -> Option<StartEndMonth> {
        Some(StartEndMonth {
            start: YearMonth::new(self.0, Month::Jan),
            end: YearMonth::new(self.0, Month::Dec),
        })
    }
}

impl AnyMonth for NaiveDate {
    fn get_month_range(self) -> Option<StartEndMonth> {
        YearMonth::from(self).get_month_range()
    }
}

/// A span given as a whole, as opposed to a pair of bounds.
pub trait MonthPeriod {
    fn get_month_period(self) -> Option<StartEndMonth>;
}

impl MonthPeriod for Year {
    fn get_month_period(self) -> Option<StartEndMonth> {
        self.get_month_range()
    }
}

impl MonthPeriod for (YearMonth, YearMonth) {
    fn get_month_period(self) -> Option<StartEndMonth> {
        (self.0 <= self.1).then_some(StartEndMonth {
            start: self.0,
            end: self.1,
        })
    }
}
