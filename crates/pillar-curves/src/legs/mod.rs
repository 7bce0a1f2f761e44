//! Cash-flow legs for swap pricing.
//!
//! Legs carry dates and accrual fractions only; rates and discount factors
//! come from the curves passed to each valuation. Amounts are per unit
//! notional.

mod swap;

pub use swap::VanillaSwap;

use pillar_core::calendars::Calendar;
use pillar_core::daycounts::{DayCount, DayCountConvention};
use pillar_core::schedule::Schedule;
use pillar_core::types::Date;

use crate::error::{CurveError, CurveResult};
use crate::indexes::{IborIndex, OvernightIndex};
use crate::term_structure::YieldCurve;

/// One basis point.
const BASIS_POINT: f64 = 1.0e-4;

/// A fixed-rate accrual period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedCoupon {
    /// Accrual start.
    pub accrual_start: Date,
    /// Accrual end.
    pub accrual_end: Date,
    /// Payment date.
    pub payment_date: Date,
    /// Accrual fraction.
    pub accrual: f64,
}

/// The fixed side of a swap.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedLeg {
    coupons: Vec<FixedCoupon>,
}

impl FixedLeg {
    /// Coupons over `schedule`, paid `payment_lag` business days after
    /// each accrual end.
    pub fn new<C: Calendar + ?Sized>(
        schedule: &Schedule,
        day_count: DayCountConvention,
        payment_calendar: &C,
        payment_lag: u32,
    ) -> Self {
        let coupons = schedule
            .periods()
            .map(|(start, end)| FixedCoupon {
                accrual_start: start,
                accrual_end: end,
                payment_date: pay_date(payment_calendar, end, payment_lag),
                accrual: day_count.year_fraction(start, end),
            })
            .collect();
        Self { coupons }
    }

    /// The coupons.
    #[must_use]
    pub fn coupons(&self) -> &[FixedCoupon] {
        &self.coupons
    }

    /// Sum of discounted accrual fractions.
    pub fn annuity(&self, discount: &dyn YieldCurve) -> CurveResult<f64> {
        self.coupons.iter().try_fold(0.0, |acc, c| {
            Ok(acc + c.accrual * discount.discount(c.payment_date)?)
        })
    }

    /// Value of one basis point of fixed rate.
    pub fn bps(&self, discount: &dyn YieldCurve) -> CurveResult<f64> {
        Ok(self.annuity(discount)? * BASIS_POINT)
    }

    /// Value of the leg at `rate`.
    pub fn npv(&self, rate: f64, discount: &dyn YieldCurve) -> CurveResult<f64> {
        Ok(rate * self.annuity(discount)?)
    }

    /// Last payment date.
    #[must_use]
    pub fn last_payment_date(&self) -> Option<Date> {
        self.coupons.last().map(|c| c.payment_date)
    }
}

/// A floating accrual period and the period its rate is projected over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatingCoupon {
    /// Accrual start.
    pub accrual_start: Date,
    /// Accrual end.
    pub accrual_end: Date,
    /// Payment date.
    pub payment_date: Date,
    /// Accrual fraction.
    pub accrual: f64,
    /// Start of the projected rate period.
    pub fixing_start: Date,
    /// End of the projected rate period.
    pub fixing_end: Date,
    /// Accrual fraction of the projected rate period.
    pub fixing_accrual: f64,
}

impl FloatingCoupon {
    /// Projected rate, before spread.
    pub fn forecast(&self, forecast: &dyn YieldCurve) -> CurveResult<f64> {
        crate::indexes::simple_forward(
            forecast,
            self.fixing_start,
            self.fixing_end,
            self.fixing_accrual,
        )
    }
}

/// The floating side of a swap.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingLeg {
    coupons: Vec<FloatingCoupon>,
    spread: f64,
}

impl FloatingLeg {
    /// Coupons over `schedule` each fixing the Ibor deposit that starts on
    /// the index value date for the accrual start.
    pub fn ibor(schedule: &Schedule, index: &IborIndex) -> CurveResult<Self> {
        let coupons = schedule
            .periods()
            .map(|(start, end)| {
                let fixing_start = index.value_date(index.fixing_date(start));
                let fixing_end = index.maturity_date(fixing_start)?;
                Ok(FloatingCoupon {
                    accrual_start: start,
                    accrual_end: end,
                    payment_date: end,
                    accrual: index.day_count.year_fraction(start, end),
                    fixing_start,
                    fixing_end,
                    fixing_accrual: index.day_count.year_fraction(fixing_start, fixing_end),
                })
            })
            .collect::<CurveResult<Vec<_>>>()?;
        Ok(Self {
            coupons,
            spread: 0.0,
        })
    }

    /// Coupons over `schedule` compounding the overnight index across each
    /// accrual period.
    pub fn overnight(schedule: &Schedule, index: &OvernightIndex, payment_lag: u32) -> Self {
        let coupons = schedule
            .periods()
            .map(|(start, end)| {
                let accrual = index.day_count.year_fraction(start, end);
                FloatingCoupon {
                    accrual_start: start,
                    accrual_end: end,
                    payment_date: pay_date(&index.calendar, end, payment_lag),
                    accrual,
                    fixing_start: start,
                    fixing_end: end,
                    fixing_accrual: accrual,
                }
            })
            .collect();
        Self {
            coupons,
            spread: 0.0,
        }
    }

    /// Adds a spread over the index.
    #[must_use]
    pub fn with_spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }

    /// The coupons.
    #[must_use]
    pub fn coupons(&self) -> &[FloatingCoupon] {
        &self.coupons
    }

    /// Spread over the index.
    #[must_use]
    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// Value of one basis point of spread.
    pub fn bps(&self, discount: &dyn YieldCurve) -> CurveResult<f64> {
        let annuity = self.coupons.iter().try_fold(0.0, |acc, c| {
            Ok::<_, CurveError>(acc + c.accrual * discount.discount(c.payment_date)?)
        })?;
        Ok(annuity * BASIS_POINT)
    }

    /// Value of the leg with rates projected off `forecast`.
    pub fn npv(&self, forecast: &dyn YieldCurve, discount: &dyn YieldCurve) -> CurveResult<f64> {
        self.coupons.iter().try_fold(0.0, |acc, c| {
            let rate = c.forecast(forecast)? + self.spread;
            Ok(acc + rate * c.accrual * discount.discount(c.payment_date)?)
        })
    }

    /// Latest date read off either curve.
    #[must_use]
    pub fn latest_relevant_date(&self) -> Option<Date> {
        self.coupons
            .iter()
            .map(|c| c.fixing_end.max(c.payment_date))
            .max()
    }
}

fn pay_date<C: Calendar + ?Sized>(calendar: &C, accrual_end: Date, lag: u32) -> Date {
    if lag == 0 {
        accrual_end
    } else {
        calendar.advance_business_days(accrual_end, lag as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::FlatForward;
    use approx::assert_relative_eq;
    use pillar_core::calendars::{BusinessDayConvention, CalendarId};
    use pillar_core::schedule::ScheduleConfig;
    use pillar_core::types::Period;

    fn ymd(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn schedule_with(tenor: Period, convention: BusinessDayConvention) -> Schedule {
        Schedule::generate(
            ScheduleConfig::new(ymd(2001, 11, 8), ymd(2003, 11, 8), tenor)
                .with_calendar(CalendarId::Target)
                .with_convention(convention),
        )
        .unwrap()
    }

    fn schedule(tenor: Period) -> Schedule {
        schedule_with(tenor, BusinessDayConvention::ModifiedFollowing)
    }

    #[test]
    fn test_fixed_annuity() {
        let leg = FixedLeg::new(
            &schedule_with(Period::years(1), BusinessDayConvention::Unadjusted),
            DayCountConvention::Thirty360E,
            &CalendarId::Target,
            0,
        );
        assert_eq!(leg.coupons().len(), 2);
        let curve = FlatForward::new(ymd(2001, 11, 6), 0.0, DayCountConvention::Act365Fixed);
        assert_relative_eq!(leg.annuity(&curve).unwrap(), 2.0, epsilon = 1e-14);
        assert_relative_eq!(leg.bps(&curve).unwrap(), 2.0e-4, epsilon = 1e-16);
        assert_relative_eq!(leg.npv(0.05, &curve).unwrap(), 0.1, epsilon = 1e-14);
    }

    #[test]
    fn test_ibor_fixings_follow_the_index() {
        let index = IborIndex::euribor(Period::months(6));
        let leg = FloatingLeg::ibor(&schedule(Period::months(6)), &index).unwrap();
        assert_eq!(leg.coupons().len(), 4);
        let first = leg.coupons()[0];
        assert_eq!(first.fixing_start, ymd(2001, 11, 8));
        assert_eq!(first.fixing_end, ymd(2002, 5, 8));
        assert_eq!(leg.latest_relevant_date(), Some(ymd(2003, 11, 10)));
    }

    #[test]
    fn test_overnight_leg_telescopes() {
        // Float leg with payment on accrual end equals P(start) - P(end)
        let index = OvernightIndex::eonia();
        let leg = FloatingLeg::overnight(&schedule(Period::years(1)), &index, 0);
        let curve = FlatForward::new(ymd(2001, 11, 6), 0.03, DayCountConvention::Act365Fixed);
        let expected =
            curve.discount(ymd(2001, 11, 8)).unwrap() - curve.discount(ymd(2003, 11, 10)).unwrap();
        assert_relative_eq!(leg.npv(&curve, &curve).unwrap(), expected, epsilon = 1e-14);
    }

    #[test]
    fn test_spread_adds_bps() {
        let index = OvernightIndex::eonia();
        let curve = FlatForward::new(ymd(2001, 11, 6), 0.03, DayCountConvention::Act365Fixed);
        let plain = FloatingLeg::overnight(&schedule(Period::years(1)), &index, 2);
        let spread = plain.clone().with_spread(0.001);
        let diff = spread.npv(&curve, &curve).unwrap() - plain.npv(&curve, &curve).unwrap();
        assert_relative_eq!(diff, 10.0 * plain.bps(&curve).unwrap(), epsilon = 1e-14);
    }
}
