//! 30/360 day count conventions.

use super::DayCount;
use crate::types::Date;

#[inline]
fn is_last_day_of_february(date: Date) -> bool {
    date.month() == 2 && date.is_end_of_month()
}

#[inline]
fn thirty_360_days(start: Date, end: Date, d1: i64, d2: i64) -> i64 {
    let y = i64::from(end.year()) - i64::from(start.year());
    let m = i64::from(end.month()) - i64::from(start.month());
    360 * y + 30 * m + (d2 - d1)
}

/// 30/360 US (bond basis).
///
/// 1. If D1 is the last day of February, change D1 to 30
/// 2. If D1 is 31, change D1 to 30
/// 3. If D2 is the last day of February and D1 was too, change D2 to 30
/// 4. If D2 is 31 and D1 is now 30, change D2 to 30
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360;

impl DayCount for Thirty360 {
    fn name(&self) -> &'static str {
        "30/360 US"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.day_count(start, end) as f64 / 360.0
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let mut d1 = i64::from(start.day());
        let mut d2 = i64::from(end.day());

        let d1_was_feb_eom = is_last_day_of_february(start);
        if d1_was_feb_eom || d1 == 31 {
            d1 = 30;
        }

        if d1_was_feb_eom && is_last_day_of_february(end) {
            d2 = 30;
        } else if d2 == 31 && d1 >= 30 {
            d2 = 30;
        }

        thirty_360_days(start, end, d1, d2)
    }
}

/// 30E/360 (Eurobond basis).
///
/// Any 31st becomes the 30th; February gets no special treatment. Standard
/// for EUR swap fixed legs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360E;

impl DayCount for Thirty360E {
    fn name(&self) -> &'static str {
        "30E/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.day_count(start, end) as f64 / 360.0
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let d1 = i64::from(start.day()).min(30);
        let d2 = i64::from(end.day()).min(30);
        thirty_360_days(start, end, d1, d2)
    }
}
