//! Tenors and periods.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Unit of a [`Period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Calendar days.
    Days,
    /// Weeks of seven days.
    Weeks,
    /// Calendar months.
    Months,
    /// Calendar years.
    Years,
}

impl TimeUnit {
    fn suffix(self) -> char {
        match self {
            TimeUnit::Days => 'D',
            TimeUnit::Weeks => 'W',
            TimeUnit::Months => 'M',
            TimeUnit::Years => 'Y',
        }
    }
}

/// A signed length of time such as `3M` or `10Y`.
///
/// Parsed from and serialized to the usual market notation.
///
/// ```rust
/// use pillar_core::types::{Period, TimeUnit};
///
/// let p: Period = "18M".parse().unwrap();
/// assert_eq!(p, Period::new(18, TimeUnit::Months));
/// assert_eq!(p.to_string(), "18M");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    length: i32,
    unit: TimeUnit,
}

impl Period {
    /// Creates a period.
    #[must_use]
    pub const fn new(length: i32, unit: TimeUnit) -> Self {
        Self { length, unit }
    }

    /// `n` calendar days.
    #[must_use]
    pub const fn days(n: i32) -> Self {
        Self::new(n, TimeUnit::Days)
    }

    /// `n` weeks.
    #[must_use]
    pub const fn weeks(n: i32) -> Self {
        Self::new(n, TimeUnit::Weeks)
    }

    /// `n` months.
    #[must_use]
    pub const fn months(n: i32) -> Self {
        Self::new(n, TimeUnit::Months)
    }

    /// `n` years.
    #[must_use]
    pub const fn years(n: i32) -> Self {
        Self::new(n, TimeUnit::Years)
    }

    /// Signed length in units.
    #[must_use]
    pub const fn length(&self) -> i32 {
        self.length
    }

    /// Unit of the period.
    #[must_use]
    pub const fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// True for a zero-length period.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.length == 0
    }

    /// Approximate length in years, used for ordering and sanity checks.
    #[must_use]
    pub fn approx_years(&self) -> f64 {
        let n = f64::from(self.length);
        match self.unit {
            TimeUnit::Days => n / 365.0,
            TimeUnit::Weeks => 7.0 * n / 365.0,
            TimeUnit::Months => n / 12.0,
            TimeUnit::Years => n,
        }
    }

    /// Length in months when the unit is months or years.
    #[must_use]
    pub fn total_months(&self) -> Option<i32> {
        match self.unit {
            TimeUnit::Months => Some(self.length),
            TimeUnit::Years => Some(self.length * 12),
            TimeUnit::Days | TimeUnit::Weeks => None,
        }
    }
}

impl Neg for Period {
    type Output = Period;

    fn neg(self) -> Self::Output {
        Period::new(-self.length, self.unit)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.length, self.unit.suffix())
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let trimmed = s.trim();
        let Some(last) = trimmed.chars().last() else {
            return Err(CoreError::invalid_period(s, "empty tenor"));
        };

        let unit = match last.to_ascii_uppercase() {
            'D' => TimeUnit::Days,
            'W' => TimeUnit::Weeks,
            'M' => TimeUnit::Months,
            'Y' => TimeUnit::Years,
            other => {
                return Err(CoreError::invalid_period(
                    s,
                    format!("unknown unit '{other}'"),
                ))
            }
        };

        let digits = &trimmed[..trimmed.len() - last.len_utf8()];
        let length = digits
            .parse::<i32>()
            .map_err(|_| CoreError::invalid_period(s, "length is not an integer"))?;

        Ok(Period::new(length, unit))
    }
}

impl TryFrom<String> for Period {
    type Error = CoreError;

    fn try_from(value: String) -> CoreResult<Self> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(value: Period) -> Self {
        value.to_string()
    }
}
