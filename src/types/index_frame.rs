//! Lazy polars view over an [`IndexTable`] for downstream analysis.

use crate::error::ClimateIndexError;
use crate::types::index_table::{IndexTable, DATE_COLUMN, YEAR_COLUMN};
use crate::types::period::{AnyMonth, MonthPeriod};
use polars::prelude::{col, lit, DataType, Expr, IntoLazy, LazyFrame};

/// A wrapper around a polars `LazyFrame` holding an index table
/// (`Year`, `Month`, `Date`, then value columns).
///
/// Row selection works on `Year` and the month of the `Date` column, which
/// is always day 1 of the row's month, so bi-monthly MEI rows are selected by
/// their anchor month.
///
/// Instances are usually obtained with [`IndexLazyFrame::from_table`].
#[derive(Clone)]
pub struct IndexLazyFrame {
    /// The underlying lazy frame.
    pub frame: LazyFrame,
}

impl IndexLazyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Converts a table into a lazy frame.
    ///
    /// # Errors
    ///
    /// [`ClimateIndexError::DataFrame`] if polars rejects the columns.
    pub fn from_table(table: &IndexTable) -> Result<Self, ClimateIndexError> {
        Ok(Self::new(table.to_dataframe()?.lazy()))
    }

    /// Applies an arbitrary polars predicate, returning a new frame.
    ///
    /// # Example
    ///
    /// ```
    /// # use climate_indices::{IndexLazyFrame, IndexTable, Month, Observation};
    /// use polars::prelude::{col, lit};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let table = IndexTable::from_observations(
    ///     "AO",
    ///     vec![
    ///         Observation::new(1950, Month::Jan, Some(-0.06)).unwrap(),
    ///         Observation::new(1950, Month::Feb, Some(0.63)).unwrap(),
    ///     ],
    /// );
    /// let positive = IndexLazyFrame::from_table(&table)?.filter(col("AO").gt(lit(0.0)));
    /// assert_eq!(positive.frame.collect()?.height(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn filter(&self, predicate: Expr) -> IndexLazyFrame {
        IndexLazyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Keeps rows from the first month of `start` through the last month of
    /// `end`, inclusive.
    ///
    /// Bounds are compared as (year, month number) so any year is accepted.
    ///
    /// # Errors
    ///
    /// [`ClimateIndexError::DateParsing`] if a bound cannot be resolved to a month.
    pub fn get_range(
        &self,
        start: impl AnyMonth,
        end: impl AnyMonth,
    ) -> Result<IndexLazyFrame, ClimateIndexError> {
        let start = start
            .get_month_range()
            .ok_or(ClimateIndexError::DateParsing)?
            .start;
        let end = end
            .get_month_range()
            .ok_or(ClimateIndexError::DateParsing)?
            .end;

        // (year > start_year) OR (year == start_year AND month >= start_month)
        let after_start = col(YEAR_COLUMN).gt(lit(start.year)).or(col(YEAR_COLUMN)
            .eq(lit(start.year))
            .and(month_number().gt_eq(lit(start.month.number() as i32))));
        // (year < end_year) OR (year == end_year AND month <= end_month)
        let before_end = col(YEAR_COLUMN).lt(lit(end.year)).or(col(YEAR_COLUMN)
            .eq(lit(end.year))
            .and(month_number().lt_eq(lit(end.month.number() as i32))));

        Ok(self.filter(after_start.and(before_end)))
    }

    /// Keeps the row(s) of a single month. For a span such as a year, its
    /// first month is used.
    pub fn get_at(&self, month: impl AnyMonth) -> Result<IndexLazyFrame, ClimateIndexError> {
        let month = month
            .get_month_range()
            .ok_or(ClimateIndexError::DateParsing)?
            .start;
        Ok(self.filter(
            col(YEAR_COLUMN)
                .eq(lit(month.year))
                .and(month_number().eq(lit(month.month.number() as i32))),
        ))
    }

    pub fn get_for_period(
        &self,
        period: impl MonthPeriod,
    ) -> Result<IndexLazyFrame, ClimateIndexError> {
        let period = period
            .get_month_period()
            .ok_or(ClimateIndexError::DateParsing)?;
        self.get_range(period.start, period.end)
    }
}

/// Calendar month of the `Date` key; for MEI seasons this is the anchor month.
fn month_number() -> Expr {
    col(DATE_COLUMN).dt().month().cast(DataType::Int32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::index_table::Observation;
    use crate::types::month::Month;
    use crate::types::period::{Year, YearMonth};

    fn frame() -> IndexLazyFrame {
        let mut observations = Vec::new();
        for year in 1997..=1999 {
            for (i, month) in Month::ALL.into_iter().enumerate() {
                observations.push(Observation::new(year, month, Some(i as f64 / 10.0)).unwrap());
            }
        }
        IndexLazyFrame::from_table(&IndexTable::from_observations("ONI", observations)).unwrap()
    }

    #[test]
    fn range_crosses_year_boundary() -> Result<(), Box<dyn std::error::Error>> {
        let df = frame()
            .get_range(YearMonth::new(1997, Month::Nov), YearMonth::new(1998, Month::Feb))?
            .frame
            .collect()?;
        assert_eq!(df.height(), 4);
        let years = df.column("Year")?.i32()?;
        assert_eq!(years.get(0), Some(1997));
        assert_eq!(years.get(3), Some(1998));
        Ok(())
    }

    #[test]
    fn get_at_selects_one_row() -> Result<(), Box<dyn std::error::Error>> {
        let df = frame()
            .get_at(YearMonth::new(1998, Month::Jul))?
            .frame
            .collect()?;
        assert_eq!(df.height(), 1);
        assert_eq!(df.column("Month")?.str()?.get(0), Some("Jul"));
        Ok(())
    }

    #[test]
    fn year_period_then_filter() -> Result<(), Box<dyn std::error::Error>> {
        let df = frame()
            .get_for_period(Year(1999))?
            .filter(col("ONI").gt(lit(0.95)))
            .frame
            .collect()?;
        // Nov (1.0) and Dec (1.1).
        assert_eq!(df.height(), 2);
        Ok(())
    }

    #[test]
    fn future_range_is_empty() -> Result<(), Box<dyn std::error::Error>> {
        let df = frame().get_for_period(Year(2300))?.frame.collect()?;
        assert_eq!(df.height(), 0);
        Ok(())
    }

    #[test]
    fn distant_past_range_is_empty() -> Result<(), Box<dyn std::error::Error>> {
        let df = frame().get_for_period(Year(1600))?.frame.collect()?;
        assert_eq!(df.height(), 0);
        let df = frame().get_at(YearMonth::new(1600, Month::Jan))?.frame.collect()?;
        assert_eq!(df.height(), 0);
        Ok(())
    }

    #[test]
    fn range_spanning_the_whole_table_keeps_every_row() -> Result<(), Box<dyn std::error::Error>> {
        let df = frame()
            .get_range(YearMonth::new(1600, Month::Jan), YearMonth::new(2300, Month::Dec))?
            .frame
            .collect()?;
        assert_eq!(df.height(), 36);
        Ok(())
    }
}
