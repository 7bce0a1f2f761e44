//! Payment frequency.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Period;

/// Payment frequency of a leg or schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Frequency {
    /// A single payment at maturity.
    Once,
    /// Annual payments (1 per year)
    #[default]
    Annual,
    /// Semi-annual payments (2 per year)
    SemiAnnual,
    /// Quarterly payments (4 per year)
    Quarterly,
    /// Monthly payments (12 per year)
    Monthly,
    /// Weekly payments (52 per year)
    Weekly,
    /// Daily payments
    Daily,
}

impl Frequency {
    /// Returns the number of periods per year, zero for [`Frequency::Once`].
    #[must_use]
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Once => 0,
            Frequency::Annual => 1,
            Frequency::SemiAnnual => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
            Frequency::Weekly => 52,
            Frequency::Daily => 365,
        }
    }

    /// Returns the tenor between two payments. `Once` maps to a zero period.
    #[must_use]
    pub fn period(&self) -> Period {
        match self {
            Frequency::Once => Period::years(0),
            Frequency::Annual => Period::years(1),
            Frequency::SemiAnnual => Period::months(6),
            Frequency::Quarterly => Period::months(3),
            Frequency::Monthly => Period::months(1),
            Frequency::Weekly => Period::weeks(1),
            Frequency::Daily => Period::days(1),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Once => "Once",
            Frequency::Annual => "Annual",
            Frequency::SemiAnnual => "Semi-Annual",
            Frequency::Quarterly => "Quarterly",
            Frequency::Monthly => "Monthly",
            Frequency::Weekly => "Weekly",
            Frequency::Daily => "Daily",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_periods() {
        assert_eq!(Frequency::Annual.periods_per_year(), 1);
        assert_eq!(Frequency::SemiAnnual.periods_per_year(), 2);
        assert_eq!(Frequency::Quarterly.periods_per_year(), 4);
        assert_eq!(Frequency::Once.periods_per_year(), 0);
    }

    #[test]
    fn test_frequency_tenor() {
        assert_eq!(Frequency::SemiAnnual.period(), Period::months(6));
        assert!(Frequency::Once.period().is_zero());
    }
}
