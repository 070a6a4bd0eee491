use crate::error::ClimateIndexError;
use crate::types::month::Month;
use chrono::{Duration, NaiveDate};
use polars::prelude::{Column, DataType};

/// Maps a polars date column to calendar months. Null dates stay `None`.
///
/// # Errors
///
/// [`ClimateIndexError::InvalidArgument`] when the column is neither `Date`
/// nor `Datetime`.
///
/// # Examples
///
/// ```
/// use climate_indices::derive::month_labels::abbr_months;
/// use climate_indices::Month;
/// use polars::prelude::*;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // 1970-03-01 is day 59 of the epoch.
/// let dates = Column::new("Date".into(), [59i32]).cast(&DataType::Date)?;
/// assert_eq!(abbr_months(&dates)?, vec![Some(Month::Mar)]);
///
/// let numbers = Column::new("Date".into(), [1.5f64]);
/// assert!(abbr_months(&numbers).is_err());
/// # Ok(())
/// # }
/// ```
pub fn abbr_months(column: &Column) -> Result<Vec<Option<Month>>, ClimateIndexError> {
    let days = match column.dtype() {
        DataType::Date => column.cast(&DataType::Int32)?,
        DataType::Datetime(_, _) => column.cast(&DataType::Date)?.cast(&DataType::Int32)?,
        other => {
            return Err(ClimateIndexError::InvalidArgument(format!(
                "column '{}' must hold dates, found {}",
                column.name(),
                other
            )))
        }
    };

    let epoch = NaiveDate::default();
    Ok(days
        .i32()?
        .into_iter()
        .map(|day| {
            day.and_then(|day| epoch.checked_add_signed(Duration::days(i64::from(day))))
                .map(Month::from_date)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn datetime_columns_are_accepted() -> Result<(), Box<dyn std::error::Error>> {
        // 2000-12-31T23:00 and 2001-01-01T00:00 in milliseconds.
        let millis = [978_303_600_000i64, 978_307_200_000];
        let column = Column::new("Date".into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
        assert_eq!(abbr_months(&column)?, vec![Some(Month::Dec), Some(Month::Jan)]);
        Ok(())
    }

    #[test]
    fn nulls_stay_absent() -> Result<(), Box<dyn std::error::Error>> {
        let column = Column::new("Date".into(), [Some(0i32), None]).cast(&DataType::Date)?;
        assert_eq!(abbr_months(&column)?, vec![Some(Month::Jan), None]);
        Ok(())
    }

    #[test]
    fn text_columns_are_rejected() {
        let column = Column::new("Date".into(), ["1990-01-01"]);
        let err = abbr_months(&column).unwrap_err();
        assert!(matches!(err, ClimateIndexError::InvalidArgument(_)));
    }
}
