//! Date type for curve construction.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::error::{CoreError, CoreResult};
use crate::types::{Period, TimeUnit};

/// A calendar date.
///
/// Newtype over `chrono::NaiveDate` carrying the month arithmetic used by
/// tenors and schedules.
///
/// # Example
///
/// ```rust
/// use pillar_core::types::Date;
///
/// let date = Date::from_ymd(2025, 1, 31).unwrap();
/// let next = date.add_months(1).unwrap();
/// assert_eq!(next, Date::from_ymd(2025, 2, 28).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a new date from year, month, and day.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the date does not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> CoreResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| CoreError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Parses an ISO 8601 date (YYYY-MM-DD).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the string is not a valid date.
    pub fn parse(s: &str) -> CoreResult<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|_| CoreError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the day of year (1-366).
    #[must_use]
    pub fn day_of_year(&self) -> u32 {
        self.0.ordinal()
    }

    /// Checks if the year is a leap year.
    #[must_use]
    pub fn is_leap_year(&self) -> bool {
        self.0.leap_year()
    }

    /// Returns the number of days in the date's month.
    #[must_use]
    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year(), self.month())
    }

    /// Returns the number of days in the date's year.
    #[must_use]
    pub fn days_in_year(&self) -> u32 {
        if self.is_leap_year() {
            366
        } else {
            365
        }
    }

    /// Adds a number of calendar days.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Date(self.0 + chrono::Duration::days(days))
    }

    /// Adds a number of months, clamping the day to the target month's length.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the result is out of range.
    pub fn add_months(&self, months: i32) -> CoreResult<Self> {
        let total_months = self.year() * 12 + self.month() as i32 - 1 + months;
        let new_year = total_months.div_euclid(12);
        let new_month = (total_months.rem_euclid(12) + 1) as u32;

        let new_day = self.day().min(days_in_month(new_year, new_month));
        Self::from_ymd(new_year, new_month, new_day)
    }

    /// Adds a number of years, clamping 29 February when needed.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the result is out of range.
    pub fn add_years(&self, years: i32) -> CoreResult<Self> {
        self.add_months(years * 12)
    }

    /// Moves the date by a calendar period without any business-day adjustment.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the result is out of range.
    pub fn add_period(&self, period: Period) -> CoreResult<Self> {
        let n = period.length();
        match period.unit() {
            TimeUnit::Days => Ok(self.add_days(i64::from(n))),
            TimeUnit::Weeks => Ok(self.add_days(7 * i64::from(n))),
            TimeUnit::Months => self.add_months(n),
            TimeUnit::Years => self.add_years(n),
        }
    }

    /// Number of calendar days from `self` to `other`.
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Returns the underlying `NaiveDate`.
    #[must_use]
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }

    /// Returns the last day of the date's month.
    #[must_use]
    pub fn end_of_month(&self) -> Self {
        NaiveDate::from_ymd_opt(self.year(), self.month(), self.days_in_month()).map_or(*self, Date)
    }

    /// Checks if the date is the last day of its month.
    #[must_use]
    pub fn is_end_of_month(&self) -> bool {
        self.day() == self.days_in_month()
    }

    /// Returns the day of week.
    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Checks if the date is a Saturday or Sunday.
    #[must_use]
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

/// Number of days in a given month.
pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if NaiveDate::from_ymd_opt(year, 2, 29).is_some() => 29,
        2 => 28,
        _ => 31,
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl From<Date> for NaiveDate {
    fn from(date: Date) -> Self {
        date.0
    }
}

impl Add<i64> for Date {
    type Output = Date;

    fn add(self, days: i64) -> Self::Output {
        self.add_days(days)
    }
}

impl Sub<i64> for Date {
    type Output = Date;

    fn sub(self, days: i64) -> Self::Output {
        self.add_days(-days)
    }
}

impl Sub for Date {
    type Output = i64;

    fn sub(self, other: Date) -> Self::Output {
        other.days_between(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_creation() {
        let date = Date::from_ymd(2025, 6, 15).unwrap();
        assert_eq!(date.year(), 2025);
        assert_eq!(date.month(), 6);
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_invalid_date() {
        assert!(Date::from_ymd(2025, 2, 30).is_err());
        assert!(Date::from_ymd(2025, 13, 1).is_err());
    }

    #[test]
    fn test_parse() {
        let date = Date::parse("2001-11-06").unwrap();
        assert_eq!(date, Date::from_ymd(2001, 11, 6).unwrap());
        assert!(Date::parse("06/11/2001").is_err());
    }

    #[test]
    fn test_add_months_end_of_month() {
        let jan31 = Date::from_ymd(2024, 1, 31).unwrap();
        assert_eq!(jan31.add_months(1).unwrap(), Date::from_ymd(2024, 2, 29).unwrap());
        assert_eq!(jan31.add_months(-2).unwrap(), Date::from_ymd(2023, 11, 30).unwrap());
        assert_eq!(jan31.add_months(13).unwrap(), Date::from_ymd(2025, 2, 28).unwrap());
    }

    #[test]
    fn test_add_years_leap_day() {
        let leap = Date::from_ymd(2024, 2, 29).unwrap();
        assert_eq!(leap.add_years(1).unwrap(), Date::from_ymd(2025, 2, 28).unwrap());
        assert_eq!(leap.add_years(4).unwrap(), Date::from_ymd(2028, 2, 29).unwrap());
    }

    #[test]
    fn test_add_period() {
        let d = Date::from_ymd(2001, 11, 8).unwrap();
        assert_eq!(
            d.add_period(Period::weeks(1)).unwrap(),
            Date::from_ymd(2001, 11, 15).unwrap()
        );
        assert_eq!(
            d.add_period(Period::months(9)).unwrap(),
            Date::from_ymd(2002, 8, 8).unwrap()
        );
        assert_eq!(
            d.add_period(Period::days(-8)).unwrap(),
            Date::from_ymd(2001, 10, 31).unwrap()
        );
    }

    #[test]
    fn test_day_arithmetic() {
        let a = Date::from_ymd(2012, 12, 11).unwrap();
        let b = a + 35;
        assert_eq!(b, Date::from_ymd(2013, 1, 15).unwrap());
        assert_eq!(b - a, 35);
        assert_eq!(b - 35, a);
    }

    #[test]
    fn test_end_of_month() {
        let d = Date::from_ymd(2023, 2, 10).unwrap();
        assert_eq!(d.end_of_month(), Date::from_ymd(2023, 2, 28).unwrap());
        assert!(d.end_of_month().is_end_of_month());
        assert!(!d.is_end_of_month());
    }

    #[test]
    fn test_display_and_serde() {
        let d = Date::from_ymd(2013, 2, 13).unwrap();
        assert_eq!(d.to_string(), "2013-02-13");
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"2013-02-13\"");
        let back: Date = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
