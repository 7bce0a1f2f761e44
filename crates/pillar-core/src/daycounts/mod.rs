//! Day count conventions.
//!
//! A day count turns a pair of dates into an accrual fraction. Curves use
//! one to measure time from their reference date; helpers use them for
//! coupon accruals.
//!
//! - [`Act360`]: money market
//! - [`Act365Fixed`]: term-structure time, GBP money market
//! - [`ActActIsda`]: leap-year aware time measure
//! - [`Thirty360`]: 30/360 US bond basis
//! - [`Thirty360E`]: 30E/360, EUR swap fixed legs
//!
//! ```rust
//! use pillar_core::daycounts::{DayCount, DayCountConvention};
//! use pillar_core::types::Date;
//!
//! let dc: DayCountConvention = "ACT/360".parse().unwrap();
//! let start = Date::from_ymd(2025, 1, 1).unwrap();
//! let end = Date::from_ymd(2025, 4, 1).unwrap();
//! assert_eq!(dc.year_fraction(start, end), 0.25);
//! ```

mod actact;
mod actual;
mod thirty360;

pub use actact::ActActIsda;
pub use actual::{Act360, Act365Fixed};
pub use thirty360::{Thirty360, Thirty360E};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::Date;

/// Trait for day count conventions.
///
/// `year_fraction` is negative when `end` precedes `start`.
pub trait DayCount: Send + Sync {
    /// Returns the name of the day count convention.
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates.
    fn year_fraction(&self, start: Date, end: Date) -> f64;

    /// Calculates the day count between two dates.
    fn day_count(&self, start: Date, end: Date) -> i64;
}

/// Runtime-selectable day count convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayCountConvention {
    /// Actual/360
    Act360,
    /// Actual/365 Fixed
    Act365Fixed,
    /// Actual/Actual ISDA
    ActActIsda,
    /// 30/360 US bond basis
    Thirty360,
    /// 30E/360 Eurobond basis
    Thirty360E,
}

impl DayCountConvention {
    /// Boxed implementation of the convention.
    #[must_use]
    pub fn to_day_count(&self) -> Box<dyn DayCount> {
        match self {
            DayCountConvention::Act360 => Box::new(Act360),
            DayCountConvention::Act365Fixed => Box::new(Act365Fixed),
            DayCountConvention::ActActIsda => Box::new(ActActIsda),
            DayCountConvention::Thirty360 => Box::new(Thirty360),
            DayCountConvention::Thirty360E => Box::new(Thirty360E),
        }
    }
}

impl DayCount for DayCountConvention {
    fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act360 => Act360.name(),
            DayCountConvention::Act365Fixed => Act365Fixed.name(),
            DayCountConvention::ActActIsda => ActActIsda.name(),
            DayCountConvention::Thirty360 => Thirty360.name(),
            DayCountConvention::Thirty360E => Thirty360E.name(),
        }
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::Act360 => Act360.year_fraction(start, end),
            DayCountConvention::Act365Fixed => Act365Fixed.year_fraction(start, end),
            DayCountConvention::ActActIsda => ActActIsda.year_fraction(start, end),
            DayCountConvention::Thirty360 => Thirty360.year_fraction(start, end),
            DayCountConvention::Thirty360E => Thirty360E.year_fraction(start, end),
        }
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        match self {
            DayCountConvention::Act360 => Act360.day_count(start, end),
            DayCountConvention::Act365Fixed => Act365Fixed.day_count(start, end),
            DayCountConvention::ActActIsda => ActActIsda.day_count(start, end),
            DayCountConvention::Thirty360 => Thirty360.day_count(start, end),
            DayCountConvention::Thirty360E => Thirty360E.day_count(start, end),
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DayCountConvention {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_uppercase();

        match normalized.as_str() {
            "ACT/360" | "ACT360" | "A360" => Ok(DayCountConvention::Act360),
            "ACT/365F" | "ACT/365FIXED" | "ACT365FIXED" | "ACT/365" | "A365F" => {
                Ok(DayCountConvention::Act365Fixed)
            }
            "ACT/ACT" | "ACT/ACTISDA" | "ACTACTISDA" => Ok(DayCountConvention::ActActIsda),
            "30/360" | "30/360US" | "THIRTY360" | "BONDBASIS" => Ok(DayCountConvention::Thirty360),
            "30E/360" | "30/360E" | "THIRTY360E" | "EUROBONDBASIS" => {
                Ok(DayCountConvention::Thirty360E)
            }
            _ => Err(CoreError::day_count(format!("unknown day count '{s}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_names() {
        assert_eq!("ACT/360".parse::<DayCountConvention>().unwrap(), DayCountConvention::Act360);
        assert_eq!(
            "act/365 fixed".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::Act365Fixed
        );
        assert_eq!("30E/360".parse::<DayCountConvention>().unwrap(), DayCountConvention::Thirty360E);
        assert!("ACT/999".parse::<DayCountConvention>().is_err());
    }

    #[test]
    fn test_enum_matches_boxed() {
        let start = Date::from_ymd(2003, 11, 1).unwrap();
        let end = Date::from_ymd(2004, 5, 1).unwrap();
        for dc in [
            DayCountConvention::Act360,
            DayCountConvention::Act365Fixed,
            DayCountConvention::ActActIsda,
            DayCountConvention::Thirty360,
            DayCountConvention::Thirty360E,
        ] {
            let boxed = dc.to_day_count();
            assert_relative_eq!(dc.year_fraction(start, end), boxed.year_fraction(start, end));
            assert_eq!(dc.name(), boxed.name());
        }
    }

    #[test]
    fn test_name_round_trips_through_parse() {
        for dc in [
            DayCountConvention::Act360,
            DayCountConvention::Act365Fixed,
            DayCountConvention::ActActIsda,
            DayCountConvention::Thirty360,
            DayCountConvention::Thirty360E,
        ] {
            assert_eq!(dc.to_string().parse::<DayCountConvention>().unwrap(), dc);
        }
    }
}
