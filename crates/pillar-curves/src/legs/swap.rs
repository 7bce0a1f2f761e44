//! Fixed-for-floating swaps.

use pillar_core::calendars::BusinessDayConvention;
use pillar_core::daycounts::DayCountConvention;
use pillar_core::schedule::{Schedule, ScheduleConfig};
use pillar_core::types::{Date, Frequency};

use super::{FixedLeg, FloatingLeg, BASIS_POINT};
use crate::error::{CurveError, CurveResult};
use crate::indexes::{IborIndex, OvernightIndex};
use crate::term_structure::YieldCurve;

/// A swap paying fixed and receiving floating, per unit notional.
///
/// Rates are projected off a forecasting curve and cash flows are
/// discounted off a discounting curve, which may be the same curve.
#[derive(Debug, Clone, PartialEq)]
pub struct VanillaSwap {
    fixed: FixedLeg,
    floating: FloatingLeg,
    start: Date,
    maturity: Date,
}

impl VanillaSwap {
    /// Fixed leg against an Ibor index.
    ///
    /// The floating schedule rolls by the index tenor with the index
    /// conventions; both legs use the index calendar.
    pub fn ibor(
        start: Date,
        end: Date,
        fixed_frequency: Frequency,
        fixed_convention: BusinessDayConvention,
        fixed_day_count: DayCountConvention,
        index: &IborIndex,
    ) -> CurveResult<Self> {
        let fixed_schedule = Schedule::generate(
            ScheduleConfig::new(start, end, fixed_frequency.period())
                .with_calendar(index.calendar)
                .with_convention(fixed_convention),
        )?;
        let float_schedule = Schedule::generate(
            ScheduleConfig::new(start, end, index.tenor)
                .with_calendar(index.calendar)
                .with_convention(index.convention),
        )?;
        let fixed = FixedLeg::new(&fixed_schedule, fixed_day_count, &index.calendar, 0);
        let floating = FloatingLeg::ibor(&float_schedule, index)?;
        Self::from_legs(fixed, floating)
    }

    /// Fixed leg against a compounded overnight index.
    ///
    /// Both legs share one schedule; payments are delayed by `payment_lag`
    /// business days.
    pub fn overnight(
        start: Date,
        end: Date,
        index: &OvernightIndex,
        payment_frequency: Frequency,
        payment_lag: u32,
        convention: BusinessDayConvention,
    ) -> CurveResult<Self> {
        let schedule = Schedule::generate(
            ScheduleConfig::new(start, end, payment_frequency.period())
                .with_calendar(index.calendar)
                .with_convention(convention),
        )?;
        let fixed = FixedLeg::new(&schedule, index.day_count, &index.calendar, payment_lag);
        let floating = FloatingLeg::overnight(&schedule, index, payment_lag);
        Self::from_legs(fixed, floating)
    }

    fn from_legs(fixed: FixedLeg, floating: FloatingLeg) -> CurveResult<Self> {
        let (Some(first_fixed), Some(first_float)) =
            (fixed.coupons().first(), floating.coupons().first())
        else {
            return Err(CurveError::configuration("swap legs must have coupons"));
        };
        let start = first_fixed.accrual_start.min(first_float.accrual_start);
        let maturity = fixed
            .coupons()
            .iter()
            .map(|c| c.accrual_end)
            .chain(floating.coupons().iter().map(|c| c.accrual_end))
            .max()
            .unwrap_or(start);
        Ok(Self {
            fixed,
            floating,
            start,
            maturity,
        })
    }

    /// Adds a spread to the floating leg.
    #[must_use]
    pub fn with_spread(mut self, spread: f64) -> Self {
        self.floating = self.floating.with_spread(spread);
        self
    }

    /// The fixed leg.
    #[must_use]
    pub fn fixed_leg(&self) -> &FixedLeg {
        &self.fixed
    }

    /// The floating leg.
    #[must_use]
    pub fn floating_leg(&self) -> &FloatingLeg {
        &self.floating
    }

    /// First accrual start.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.start
    }

    /// Last accrual end across both legs.
    #[must_use]
    pub fn maturity_date(&self) -> Date {
        self.maturity
    }

    /// Latest date any valuation reads off a curve.
    #[must_use]
    pub fn latest_relevant_date(&self) -> Date {
        [
            Some(self.maturity),
            self.fixed.last_payment_date(),
            self.floating.latest_relevant_date(),
        ]
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(self.maturity)
    }

    /// Value of one basis point on the fixed leg.
    pub fn fixed_leg_bps(&self, discount: &dyn YieldCurve) -> CurveResult<f64> {
        self.fixed.bps(discount)
    }

    /// Value of the floating leg, spread included.
    pub fn floating_leg_npv(
        &self,
        forecast: &dyn YieldCurve,
        discount: &dyn YieldCurve,
    ) -> CurveResult<f64> {
        self.floating.npv(forecast, discount)
    }

    /// Fixed rate that sets the swap value to zero.
    pub fn fair_rate(&self, forecast: &dyn YieldCurve, discount: &dyn YieldCurve) -> CurveResult<f64> {
        let annuity = self.fixed.annuity(discount)?;
        if annuity <= 0.0 {
            return Err(CurveError::configuration(format!(
                "fixed leg annuity {annuity} is not positive"
            )));
        }
        Ok(self.floating.npv(forecast, discount)? / annuity)
    }

    /// Floating spread that sets the swap value to zero at `fixed_rate`.
    pub fn fair_spread(
        &self,
        fixed_rate: f64,
        forecast: &dyn YieldCurve,
        discount: &dyn YieldCurve,
    ) -> CurveResult<f64> {
        let float_annuity = self.floating.bps(discount)? / BASIS_POINT;
        if float_annuity <= 0.0 {
            return Err(CurveError::configuration(format!(
                "floating leg annuity {float_annuity} is not positive"
            )));
        }
        let npv = self.npv(fixed_rate, forecast, discount)?;
        Ok(self.floating.spread() - npv / float_annuity)
    }

    /// Value to the fixed-rate payer.
    pub fn npv(
        &self,
        fixed_rate: f64,
        forecast: &dyn YieldCurve,
        discount: &dyn YieldCurve,
    ) -> CurveResult<f64> {
        Ok(self.floating.npv(forecast, discount)? - self.fixed.npv(fixed_rate, discount)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::FlatForward;
    use approx::assert_relative_eq;
    use pillar_core::types::Period;

    fn ymd(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn five_year() -> VanillaSwap {
        VanillaSwap::ibor(
            ymd(2001, 11, 8),
            ymd(2006, 11, 8),
            Frequency::Annual,
            BusinessDayConvention::Unadjusted,
            DayCountConvention::Thirty360E,
            &IborIndex::euribor(Period::months(6)),
        )
        .unwrap()
    }

    #[test]
    fn test_fair_rate_zeroes_npv() {
        let swap = five_year();
        let forecast = FlatForward::new(ymd(2001, 11, 6), 0.045, DayCountConvention::Act365Fixed);
        let discount = FlatForward::new(ymd(2001, 11, 6), 0.04, DayCountConvention::Act365Fixed);
        let rate = swap.fair_rate(&forecast, &discount).unwrap();
        assert!(rate > 0.04 && rate < 0.05);
        assert_relative_eq!(swap.npv(rate, &forecast, &discount).unwrap(), 0.0, epsilon = 1e-15);
        assert_relative_eq!(
            swap.fair_spread(rate, &forecast, &discount).unwrap(),
            0.0,
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_fair_spread_zeroes_npv() {
        let swap = five_year();
        let curve = FlatForward::new(ymd(2001, 11, 6), 0.045, DayCountConvention::Act365Fixed);
        let spread = swap.fair_spread(0.05, &curve, &curve).unwrap();
        let shifted = swap.clone().with_spread(spread);
        assert_relative_eq!(shifted.npv(0.05, &curve, &curve).unwrap(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_dates() {
        let swap = five_year();
        assert_eq!(swap.fixed_leg().coupons().len(), 5);
        assert_eq!(swap.floating_leg().coupons().len(), 10);
        assert_eq!(swap.start_date(), ymd(2001, 11, 8));
        assert_eq!(swap.maturity_date(), ymd(2006, 11, 8));
    }

    #[test]
    fn test_overnight_swap_single_period() {
        let swap = VanillaSwap::overnight(
            ymd(2012, 12, 13),
            ymd(2013, 1, 14),
            &OvernightIndex::eonia(),
            Frequency::Annual,
            0,
            BusinessDayConvention::ModifiedFollowing,
        )
        .unwrap();
        assert_eq!(swap.fixed_leg().coupons().len(), 1);
        let curve = FlatForward::new(ymd(2012, 12, 11), 0.001, DayCountConvention::Act360);
        let tau = 32.0_f64 / 360.0;
        assert_relative_eq!(
            swap.fair_rate(&curve, &curve).unwrap(),
            ((0.001 * tau).exp() - 1.0) / tau,
            epsilon = 1e-15
        );
    }
}
