//! Business day calendars and conventions.
//!
//! This module provides:
//! - The [`Calendar`] trait with date rolling by tenor
//! - Business day adjustment conventions
//! - Weekend-only, null and TARGET calendars

mod conventions;
mod target;

pub use conventions::{adjust, BusinessDayConvention};
pub use target::Target;

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::types::{Date, Period, TimeUnit};

/// Trait for business day calendars.
///
/// Calendars determine which days are business days vs holidays
/// for a specific market or jurisdiction.
pub trait Calendar: Send + Sync {
    /// Returns the name of the calendar.
    fn name(&self) -> &'static str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Returns true if the date is a holiday.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Adjusts a date according to the given business day convention.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> Date {
        conventions::adjust(date, convention, self)
    }

    /// Last business day of the date's month.
    fn end_of_month(&self, date: Date) -> Date {
        self.adjust(date.end_of_month(), BusinessDayConvention::Preceding)
    }

    /// True if no later business day falls in the same month.
    fn is_end_of_month(&self, date: Date) -> bool {
        date.month() != self.adjust(date.add_days(1), BusinessDayConvention::Following).month()
    }

    /// Moves a date by a number of business days.
    ///
    /// Zero days adjusts the date forward onto a business day.
    fn advance_business_days(&self, date: Date, days: i32) -> Date {
        if days == 0 {
            return self.adjust(date, BusinessDayConvention::Following);
        }

        let mut result = date;
        let mut remaining = days.abs();
        let direction: i64 = if days > 0 { 1 } else { -1 };

        while remaining > 0 {
            result = result.add_days(direction);
            if self.is_business_day(result) {
                remaining -= 1;
            }
        }

        result
    }

    /// Moves a date by a tenor.
    ///
    /// Day periods count business days; week, month and year periods move
    /// on the calendar and are then adjusted. With `end_of_month`, a date on
    /// the month's last business day stays on the last business day.
    fn advance(
        &self,
        date: Date,
        period: Period,
        convention: BusinessDayConvention,
        end_of_month: bool,
    ) -> CoreResult<Date> {
        match period.unit() {
            TimeUnit::Days => Ok(self.advance_business_days(date, period.length())),
            TimeUnit::Weeks => {
                let moved = date.add_period(period)?;
                Ok(self.adjust(moved, convention))
            }
            TimeUnit::Months | TimeUnit::Years => {
                let moved = date.add_period(period)?;
                if end_of_month && self.is_end_of_month(date) {
                    return Ok(self.end_of_month(moved));
                }
                Ok(self.adjust(moved, convention))
            }
        }
    }

    /// Business days in `(start, end]`.
    fn business_days_between(&self, start: Date, end: Date) -> i32 {
        let mut count = 0;
        let mut current = start.add_days(1);

        while current <= end {
            if self.is_business_day(current) {
                count += 1;
            }
            current = current.add_days(1);
        }

        count
    }
}

/// A simple weekend-only calendar (no holidays).
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &'static str {
        "Weekend Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend()
    }
}

/// Calendar in which every day is a business day.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCalendar;

impl Calendar for NullCalendar {
    fn name(&self) -> &'static str {
        "Null"
    }

    fn is_business_day(&self, _date: Date) -> bool {
        true
    }
}

/// Identifier for the built-in calendars.
///
/// Helpers and schedules store this instead of a trait object so that they
/// stay `Copy` and serializable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CalendarId {
    /// TARGET euro settlement calendar.
    #[default]
    Target,
    /// Saturdays and Sundays only.
    WeekendsOnly,
    /// No holidays at all.
    Null,
}

impl Calendar for CalendarId {
    fn name(&self) -> &'static str {
        match self {
            CalendarId::Target => Target.name(),
            CalendarId::WeekendsOnly => WeekendCalendar.name(),
            CalendarId::Null => NullCalendar.name(),
        }
    }

    fn is_business_day(&self, date: Date) -> bool {
        match self {
            CalendarId::Target => Target.is_business_day(date),
            CalendarId::WeekendsOnly => WeekendCalendar.is_business_day(date),
            CalendarId::Null => NullCalendar.is_business_day(date),
        }
    }
}
