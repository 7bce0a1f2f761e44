//! Curve interpolated over a fixed set of nodes.

use pillar_core::daycounts::{DayCount, DayCountConvention};
use pillar_core::types::Date;
use pillar_math::interpolation::{InterpolationMethod, Interpolator};

use crate::error::{CurveError, CurveResult};
use crate::term_structure::YieldCurve;
use crate::traits::CurveTrait;

/// An immutable curve over explicit nodes.
///
/// Node values hold the quantity named by the [`CurveTrait`]. Between nodes
/// the quantity is interpolated with the configured method; past the last
/// node the trait's flat-forward rule applies when extrapolation is on.
///
/// This is also the frozen form of a bootstrapped curve.
#[derive(Debug)]
pub struct InterpolatedCurve {
    reference_date: Date,
    dates: Vec<Date>,
    times: Vec<f64>,
    values: Vec<f64>,
    day_count: DayCountConvention,
    method: InterpolationMethod,
    curve_trait: CurveTrait,
    interpolator: Box<dyn Interpolator>,
    max_date: Date,
    extrapolate: bool,
}

impl InterpolatedCurve {
    /// Builds a curve from node dates and values.
    ///
    /// The first date must be the reference date and dates must be strictly
    /// increasing.
    pub fn new(
        reference_date: Date,
        dates: Vec<Date>,
        values: Vec<f64>,
        day_count: DayCountConvention,
        method: InterpolationMethod,
        curve_trait: CurveTrait,
    ) -> CurveResult<Self> {
        if dates.first() != Some(&reference_date) {
            return Err(CurveError::configuration(format!(
                "first node must be the reference date {reference_date}"
            )));
        }
        if let Some(w) = dates.windows(2).find(|w| w[1] <= w[0]) {
            return Err(CurveError::configuration(format!(
                "node dates must increase: {} then {}",
                w[0], w[1]
            )));
        }
        let times = dates
            .iter()
            .map(|&d| day_count.year_fraction(reference_date, d))
            .collect();
        let max_date = dates[dates.len() - 1];
        Self::from_nodes(
            reference_date,
            dates,
            times,
            values,
            day_count,
            method,
            curve_trait,
            max_date,
        )
    }

    /// Builds a curve from precomputed times; `max_date` may exceed the last node.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_nodes(
        reference_date: Date,
        dates: Vec<Date>,
        times: Vec<f64>,
        values: Vec<f64>,
        day_count: DayCountConvention,
        method: InterpolationMethod,
        curve_trait: CurveTrait,
        max_date: Date,
    ) -> CurveResult<Self> {
        let interpolator = method.build(times.clone(), values.clone(), false)?;
        Ok(Self {
            reference_date,
            dates,
            times,
            values,
            day_count,
            method,
            curve_trait,
            interpolator,
            max_date,
            extrapolate: false,
        })
    }

    /// Allows queries beyond the max date.
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolate: bool) -> Self {
        self.extrapolate = extrapolate;
        self
    }

    /// Node dates, starting at the reference date.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Node times.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Node values.
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.values
    }

    /// `(date, value)` pairs.
    #[must_use]
    pub fn nodes(&self) -> Vec<(Date, f64)> {
        self.dates.iter().copied().zip(self.values.iter().copied()).collect()
    }

    /// Interpolation scheme.
    #[must_use]
    pub fn interpolation(&self) -> InterpolationMethod {
        self.method
    }

    /// Quantity stored at the nodes.
    #[must_use]
    pub fn curve_trait(&self) -> CurveTrait {
        self.curve_trait
    }

    /// An independent copy with its own interpolator.
    pub(crate) fn rebuilt(&self) -> CurveResult<Self> {
        Ok(Self::from_nodes(
            self.reference_date,
            self.dates.clone(),
            self.times.clone(),
            self.values.clone(),
            self.day_count,
            self.method,
            self.curve_trait,
            self.max_date,
        )?
        .with_extrapolation(self.extrapolate))
    }

    /// Instantaneous forward at `t` without the range check.
    pub(crate) fn forward_impl(&self, t: f64) -> CurveResult<f64> {
        Ok(self
            .curve_trait
            .instantaneous_forward(&*self.interpolator, &self.times, &self.values, t)?)
    }
}

impl YieldCurve for InterpolatedCurve {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    fn max_date(&self) -> Date {
        self.max_date
    }

    fn allows_extrapolation(&self) -> bool {
        self.extrapolate
    }

    fn discount_impl(&self, t: f64) -> CurveResult<f64> {
        Ok(self
            .curve_trait
            .discount(&*self.interpolator, &self.times, &self.values, t)?)
    }

    fn instantaneous_forward(&self, t: f64) -> CurveResult<f64> {
        self.check_range(t)?;
        self.forward_impl(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compounding::Compounding;
    use approx::assert_relative_eq;

    fn ymd(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn zero_curve() -> InterpolatedCurve {
        let today = ymd(2025, 1, 2);
        InterpolatedCurve::new(
            today,
            vec![today, ymd(2026, 1, 2), ymd(2027, 1, 2), ymd(2030, 1, 2)],
            vec![0.02, 0.02, 0.025, 0.03],
            DayCountConvention::Act365Fixed,
            InterpolationMethod::Linear,
            CurveTrait::ZeroYield,
        )
        .unwrap()
    }

    #[test]
    fn test_zero_rates_at_nodes() {
        let curve = zero_curve();
        for (&t, &z) in curve.times().iter().zip(curve.data()).skip(1) {
            assert_relative_eq!(
                curve.zero_rate(t, Compounding::Continuous).unwrap(),
                z,
                epsilon = 1e-14
            );
        }
    }

    #[test]
    fn test_extrapolation_switch() {
        let curve = zero_curve();
        let past = ymd(2031, 1, 2);
        assert!(matches!(curve.discount(past), Err(CurveError::DateOutOfRange { .. })));
        let curve = curve.with_extrapolation(true);
        let df = curve.discount(past).unwrap();
        let last = curve.discount(ymd(2030, 1, 2)).unwrap();
        assert!(df < last);
    }

    #[test]
    fn test_log_linear_discount_gives_flat_forwards() {
        let today = ymd(2025, 1, 2);
        let curve = InterpolatedCurve::new(
            today,
            vec![today, ymd(2026, 1, 2), ymd(2027, 1, 2)],
            vec![1.0, (-0.02_f64).exp(), (-0.05_f64).exp()],
            DayCountConvention::Act365Fixed,
            InterpolationMethod::LogLinear,
            CurveTrait::Discount,
        )
        .unwrap();
        assert_relative_eq!(curve.instantaneous_forward(0.5).unwrap(), 0.02, epsilon = 1e-12);
        assert_relative_eq!(curve.instantaneous_forward(1.5).unwrap(), 0.03, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_bad_nodes() {
        let today = ymd(2025, 1, 2);
        let later = ymd(2026, 1, 2);
        let not_reference = InterpolatedCurve::new(
            today,
            vec![later, ymd(2027, 1, 2)],
            vec![1.0, 0.98],
            DayCountConvention::Act365Fixed,
            InterpolationMethod::LogLinear,
            CurveTrait::Discount,
        );
        assert!(not_reference.is_err());

        let unsorted = InterpolatedCurve::new(
            today,
            vec![today, later, later],
            vec![1.0, 0.98, 0.97],
            DayCountConvention::Act365Fixed,
            InterpolationMethod::LogLinear,
            CurveTrait::Discount,
        );
        assert!(matches!(unsorted, Err(CurveError::InvalidConfig { .. })));
    }
}
