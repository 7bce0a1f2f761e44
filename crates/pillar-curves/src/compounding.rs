//! Compounding conventions for quoting rates off discount factors.
//!
//! ```rust
//! use pillar_curves::Compounding;
//! use pillar_core::types::Frequency;
//!
//! let df = Compounding::Continuous.discount_factor(0.05, 2.0);
//! assert!((df - (-0.1_f64).exp()).abs() < 1e-15);
//!
//! let annual = Compounding::Compounded(Frequency::Annual).implied_rate(df, 2.0);
//! assert!((annual - (0.05_f64.exp() - 1.0)).abs() < 1e-12);
//! ```

use std::fmt;

use pillar_core::types::Frequency;
use serde::{Deserialize, Serialize};

/// How a rate turns into a discount factor over a horizon.
///
/// `Compounded(Frequency::Once)` behaves like simple compounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Compounding {
    /// `1 / (1 + r t)`
    Simple,
    /// `(1 + r / f)^(-f t)`
    Compounded(Frequency),
    /// `exp(-r t)`
    #[default]
    Continuous,
}

impl Compounding {
    /// Discount factor for `rate` over `t` years.
    #[must_use]
    pub fn discount_factor(&self, rate: f64, t: f64) -> f64 {
        match self.periods() {
            Periods::Simple => 1.0 / (1.0 + rate * t),
            Periods::PerYear(f) => (1.0 + rate / f).powf(-f * t),
            Periods::Continuous => (-rate * t).exp(),
        }
    }

    /// Rate that produces `df` over `t` years. `t` must be positive.
    #[must_use]
    pub fn implied_rate(&self, df: f64, t: f64) -> f64 {
        match self.periods() {
            Periods::Simple => (1.0 / df - 1.0) / t,
            Periods::PerYear(f) => f * (df.powf(-1.0 / (f * t)) - 1.0),
            Periods::Continuous => -df.ln() / t,
        }
    }

    fn periods(self) -> Periods {
        match self {
            Compounding::Simple => Periods::Simple,
            Compounding::Continuous => Periods::Continuous,
            Compounding::Compounded(freq) => match freq.periods_per_year() {
                0 => Periods::Simple,
                n => Periods::PerYear(f64::from(n)),
            },
        }
    }
}

enum Periods {
    Simple,
    PerYear(f64),
    Continuous,
}

impl fmt::Display for Compounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compounding::Simple => write!(f, "Simple"),
            Compounding::Compounded(freq) => write!(f, "Compounded({freq})"),
            Compounding::Continuous => write!(f, "Continuous"),
        }
    }
}
