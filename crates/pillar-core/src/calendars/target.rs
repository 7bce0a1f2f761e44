//! TARGET calendar for euro settlement.

use super::Calendar;
use crate::types::Date;

/// TARGET (Trans-European Automated Real-time Gross settlement Express
/// Transfer) calendar.
///
/// ## Holidays
///
/// - Saturdays and Sundays
/// - New Year's Day
/// - Good Friday and Easter Monday (since 2000)
/// - Labour Day, 1 May (since 2000)
/// - Christmas Day
/// - 26 December (since 2000)
/// - 31 December in 1998, 1999 and 2001
///
/// Holidays falling on a weekend are not moved.
#[derive(Debug, Clone, Copy, Default)]
pub struct Target;

impl Calendar for Target {
    fn name(&self) -> &'static str {
        "TARGET"
    }

    fn is_business_day(&self, date: Date) -> bool {
        if date.is_weekend() {
            return false;
        }

        let (y, m, d) = (date.year(), date.month(), date.day());
        let easter = easter_sunday_day_of_year(y);
        let doy = date.day_of_year();

        let holiday = (m == 1 && d == 1)
            || (y >= 2000 && (doy + 2 == easter || doy == easter + 1))
            || (y >= 2000 && m == 5 && d == 1)
            || (m == 12 && d == 25)
            || (y >= 2000 && m == 12 && d == 26)
            || (m == 12 && d == 31 && matches!(y, 1998 | 1999 | 2001));

        !holiday
    }
}

/// Day of year of Easter Sunday in the Gregorian calendar.
pub(crate) fn easter_sunday_day_of_year(year: i32) -> u32 {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;

    Date::from_ymd(year, month as u32, day as u32).map_or(0, |easter| easter.day_of_year())
}
