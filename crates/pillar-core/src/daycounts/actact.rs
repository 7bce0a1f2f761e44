//! Actual/Actual ISDA day count convention.

use super::DayCount;
use crate::types::Date;

/// Actual/Actual ISDA day count convention.
///
/// The period is split at year boundaries; days falling in a leap year are
/// divided by 366, the others by 365.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIsda;

impl DayCount for ActActIsda {
    fn name(&self) -> &'static str {
        "ACT/ACT ISDA"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        if start == end {
            return 0.0;
        }
        if start > end {
            return -self.year_fraction(end, start);
        }

        let y1 = start.year();
        let y2 = end.year();
        let basis1 = f64::from(start.days_in_year());
        let basis2 = f64::from(end.days_in_year());

        let (Ok(next_year_start), Ok(final_year_start)) =
            (Date::from_ymd(y1 + 1, 1, 1), Date::from_ymd(y2, 1, 1))
        else {
            return start.days_between(&end) as f64 / 365.0;
        };

        if y1 == y2 {
            return start.days_between(&end) as f64 / basis1;
        }

        f64::from(y2 - y1 - 1)
            + start.days_between(&next_year_start) as f64 / basis1
            + final_year_start.days_between(&end) as f64 / basis2
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_same_year() {
        let dc = ActActIsda;
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = Date::from_ymd(2025, 7, 1).unwrap();
        assert_relative_eq!(dc.year_fraction(start, end), 181.0 / 365.0, epsilon = 1e-15);
    }

    #[test]
    fn test_spanning_leap_year() {
        // ISDA reference case: 2003-11-01 to 2004-05-01
        let dc = ActActIsda;
        let start = Date::from_ymd(2003, 11, 1).unwrap();
        let end = Date::from_ymd(2004, 5, 1).unwrap();
        let expected = 61.0 / 365.0 + 121.0 / 366.0;
        assert_relative_eq!(dc.year_fraction(start, end), expected, epsilon = 1e-15);
    }

    #[test]
    fn test_whole_years() {
        let dc = ActActIsda;
        let start = Date::from_ymd(2001, 11, 8).unwrap();
        let end = Date::from_ymd(2004, 11, 8).unwrap();
        let expected = 54.0 / 365.0 + 1.0 + 1.0 + 312.0 / 366.0;
        assert_relative_eq!(dc.year_fraction(start, end), expected, epsilon = 1e-14);
    }

    #[test]
    fn test_reversed_dates() {
        let dc = ActActIsda;
        let a = Date::from_ymd(2003, 11, 1).unwrap();
        let b = Date::from_ymd(2004, 5, 1).unwrap();
        assert_relative_eq!(dc.year_fraction(b, a), -dc.year_fraction(a, b), epsilon = 1e-15);
    }
}
