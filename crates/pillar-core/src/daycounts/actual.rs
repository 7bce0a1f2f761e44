//! Actual day counts over a fixed-length year.

use super::DayCount;
use crate::types::Date;

/// Actual/360: money-market deposits, Euribor and overnight legs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act360;

/// Actual/365 Fixed: leap days count but the year stays 365 days long.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act365Fixed;

fn actual_over(start: Date, end: Date, year_days: f64) -> f64 {
    start.days_between(&end) as f64 / year_days
}

impl DayCount for Act360 {
    fn name(&self) -> &'static str {
        "ACT/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        actual_over(start, end, 360.0)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

impl DayCount for Act365Fixed {
    fn name(&self) -> &'static str {
        "ACT/365F"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        actual_over(start, end, 365.0)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}
