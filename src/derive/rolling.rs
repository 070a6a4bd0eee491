//! Centered three-month windows.

use crate::types::month::Period;

/// Width of every rolling window in this crate.
pub const WINDOW: usize = 3;

/// Centered rolling mean over [`WINDOW`] rows.
///
/// `out[i]` is the mean of rows `i-1`, `i` and `i+1` when both neighbours
/// exist and all three values are present; otherwise it is absent. The first
/// and last outputs are therefore always absent.
///
/// # Examples
///
/// ```
/// use climate_indices::derive::rolling::centered_rolling_mean;
///
/// let out = centered_rolling_mean(&[Some(1.0), Some(2.0), Some(3.0), None]);
/// assert_eq!(out, vec![None, Some(2.0), None, None]);
/// ```
pub fn centered_rolling_mean(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    for (offset, window) in values.windows(WINDOW).enumerate() {
        let sum = window.iter().try_fold(0.0, |acc, v| v.map(|v| acc + v));
        out[offset + 1] = sum.map(|s| s / WINDOW as f64);
    }
    out
}

/// Three-letter labels built from the initials of the months in each centered
/// window, e.g. `"DJF"`. First and last rows get no label, matching
/// [`centered_rolling_mean`].
pub fn window_labels(periods: &[Period]) -> Vec<Option<String>> {
    let mut out = vec![None; periods.len()];
    for (offset, window) in periods.windows(WINDOW).enumerate() {
        let label = window.iter().map(|p| p.anchor_month().initial()).collect();
        out[offset + 1] = Some(label);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::month::Month;

    #[test]
    fn rolling_mean_boundaries_are_absent() {
        let values: Vec<Option<f64>> = (1..=6).map(|v| Some(v as f64)).collect();
        let out = centered_rolling_mean(&values);
        assert_eq!(out.first(), Some(&None));
        assert_eq!(out.last(), Some(&None));
        assert_eq!(out[1], Some(2.0));
        assert_eq!(out[4], Some(5.0));
    }

    #[test]
    fn any_absent_value_poisons_its_windows() {
        let out = centered_rolling_mean(&[Some(1.0), Some(2.0), None, Some(4.0), Some(5.0), Some(6.0)]);
        assert_eq!(out, vec![None, None, None, None, Some(5.0), None]);
    }

    #[test]
    fn short_inputs_have_no_windows() {
        assert_eq!(centered_rolling_mean(&[]), Vec::<Option<f64>>::new());
        assert_eq!(centered_rolling_mean(&[Some(1.0), Some(2.0)]), vec![None, None]);
        assert_eq!(window_labels(&[Month::Jan.into()]), vec![None]);
    }

    #[test]
    fn labels_use_month_initials() {
        let periods: Vec<Period> = [Month::Dec, Month::Jan, Month::Feb, Month::Mar]
            .into_iter()
            .map(Period::from)
            .collect();
        assert_eq!(
            window_labels(&periods),
            vec![None, Some("DJF".to_string()), Some("JFM".to_string()), None]
        );
    }
}
