//! Flat forward curve driven by a single quote.

use std::sync::{Arc, Weak};

use pillar_core::daycounts::DayCountConvention;
use pillar_core::observer::Observer;
use pillar_core::quote::SimpleQuote;
use pillar_core::types::Date;

use crate::compounding::Compounding;
use crate::error::{CurveError, CurveResult};
use crate::term_structure::YieldCurve;

/// Horizon reported as the max date; the curve always extrapolates.
const HORIZON_DAYS: i64 = 200 * 365;

/// A curve with one rate for every horizon.
///
/// The rate is read from a shared quote, so the curve follows quote changes
/// and passes notifications on to its own observers.
///
/// ```rust
/// use pillar_curves::prelude::*;
/// use pillar_core::prelude::*;
///
/// let today = Date::from_ymd(2025, 1, 2).unwrap();
/// let curve = FlatForward::new(today, 0.03, DayCountConvention::Act365Fixed);
/// let df = curve.discount(today.add_days(365)).unwrap();
/// assert!((df - (-0.03_f64).exp()).abs() < 1e-15);
/// ```
#[derive(Debug, Clone)]
pub struct FlatForward {
    reference_date: Date,
    rate: Arc<SimpleQuote>,
    day_count: DayCountConvention,
    compounding: Compounding,
}

impl FlatForward {
    /// Continuously compounded flat curve at `rate`.
    #[must_use]
    pub fn new(reference_date: Date, rate: f64, day_count: DayCountConvention) -> Self {
        Self::from_quote(reference_date, SimpleQuote::shared(rate), day_count)
    }

    /// Continuously compounded flat curve following `rate`.
    #[must_use]
    pub fn from_quote(
        reference_date: Date,
        rate: Arc<SimpleQuote>,
        day_count: DayCountConvention,
    ) -> Self {
        Self {
            reference_date,
            rate,
            day_count,
            compounding: Compounding::Continuous,
        }
    }

    /// Quotes the rate under `compounding` instead.
    #[must_use]
    pub fn with_compounding(mut self, compounding: Compounding) -> Self {
        self.compounding = compounding;
        self
    }

    /// The quote the rate is read from.
    #[must_use]
    pub fn quote(&self) -> &Arc<SimpleQuote> {
        &self.rate
    }

    /// Current rate.
    pub fn rate(&self) -> CurveResult<f64> {
        self.rate
            .value()
            .filter(|r| r.is_finite())
            .ok_or_else(|| CurveError::invalid_quote("flat forward rate", self.reference_date))
    }
}

impl YieldCurve for FlatForward {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    fn max_date(&self) -> Date {
        self.reference_date.add_days(HORIZON_DAYS)
    }

    fn allows_extrapolation(&self) -> bool {
        true
    }

    fn discount_impl(&self, t: f64) -> CurveResult<f64> {
        Ok(self.compounding.discount_factor(self.rate()?, t))
    }

    fn register_observer(&self, observer: Weak<dyn Observer>) {
        self.rate.register_observer(observer);
    }

    fn unregister_observer(&self, observer: &Weak<dyn Observer>) {
        self.rate.unregister_observer(observer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pillar_core::types::Frequency;

    fn today() -> Date {
        Date::from_ymd(2025, 1, 2).unwrap()
    }

    #[test]
    fn test_annual_compounding() {
        let curve = FlatForward::new(today(), 0.04, DayCountConvention::Act365Fixed)
            .with_compounding(Compounding::Compounded(Frequency::Annual));
        assert_relative_eq!(curve.discount_t(2.0).unwrap(), 1.04_f64.powi(-2), epsilon = 1e-15);
        assert_relative_eq!(
            curve.zero_rate(2.0, Compounding::Compounded(Frequency::Annual)).unwrap(),
            0.04,
            epsilon = 1e-13
        );
    }

    #[test]
    fn test_follows_quote() {
        let quote = SimpleQuote::shared(0.02);
        let curve = FlatForward::from_quote(today(), Arc::clone(&quote), DayCountConvention::Act360);
        let before = curve.discount_t(1.0).unwrap();
        quote.set_value(0.03);
        assert!(curve.discount_t(1.0).unwrap() < before);
        quote.reset();
        assert!(matches!(curve.discount_t(1.0), Err(CurveError::InvalidQuote { .. })));
    }

    #[test]
    fn test_rejects_negative_time_only() {
        let curve = FlatForward::new(today(), 0.01, DayCountConvention::Act365Fixed);
        assert!(curve.discount_t(500.0).is_ok());
        assert!(curve.discount_t(-1.0).is_err());
    }
}
