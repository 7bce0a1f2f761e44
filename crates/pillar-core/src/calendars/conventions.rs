//! Rolling rules for dates that land on holidays.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Calendar;
use crate::types::Date;

/// How a non-business date is moved onto a business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BusinessDayConvention {
    /// Left where it is.
    Unadjusted,
    /// Next business day.
    #[default]
    Following,
    /// Next business day unless that changes the month, then the previous one.
    ModifiedFollowing,
    /// Previous business day.
    Preceding,
    /// Previous business day unless that changes the month, then the next one.
    ModifiedPreceding,
    /// Closer of next and previous; next on a tie.
    Nearest,
}

impl BusinessDayConvention {
    /// Short market name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            BusinessDayConvention::Unadjusted => "Unadjusted",
            BusinessDayConvention::Following => "Following",
            BusinessDayConvention::ModifiedFollowing => "Modified Following",
            BusinessDayConvention::Preceding => "Preceding",
            BusinessDayConvention::ModifiedPreceding => "Modified Preceding",
            BusinessDayConvention::Nearest => "Nearest",
        }
    }
}

impl fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rolls `date` onto a business day of `calendar`.
pub fn adjust<C: Calendar + ?Sized>(
    date: Date,
    convention: BusinessDayConvention,
    calendar: &C,
) -> Date {
    if calendar.is_business_day(date) {
        return date;
    }
    let next = || roll(date, 1, calendar);
    let previous = || roll(date, -1, calendar);

    match convention {
        BusinessDayConvention::Unadjusted => date,
        BusinessDayConvention::Following => next(),
        BusinessDayConvention::Preceding => previous(),
        BusinessDayConvention::ModifiedFollowing => within_month(date, next(), previous),
        BusinessDayConvention::ModifiedPreceding => within_month(date, previous(), next),
        BusinessDayConvention::Nearest => {
            let (after, before) = (next(), previous());
            if date.days_between(&after) <= before.days_between(&date) {
                after
            } else {
                before
            }
        }
    }
}

fn within_month(date: Date, rolled: Date, otherwise: impl FnOnce() -> Date) -> Date {
    if rolled.month() == date.month() {
        rolled
    } else {
        otherwise()
    }
}

fn roll<C: Calendar + ?Sized>(mut date: Date, step: i64, calendar: &C) -> Date {
    while !calendar.is_business_day(date) {
        date = date.add_days(step);
    }
    date
}
