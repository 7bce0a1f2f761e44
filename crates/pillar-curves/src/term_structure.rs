//! The yield term structure interface consumed by pricing code.
//!
//! A [`YieldCurve`] maps time, measured in years from its reference date with
//! its own day count, to discount factors. Rates are derived from discount
//! factors under a caller-chosen [`Compounding`].
//!
//! Range policy: times before the reference date are always rejected, and
//! times after [`max_time`](YieldCurve::max_time) are rejected unless the
//! curve allows extrapolation.

use std::fmt;
use std::sync::{Arc, Weak};

use pillar_core::daycounts::{DayCount, DayCountConvention};
use pillar_core::observer::Observer;
use pillar_core::types::Date;
use pillar_math::MathError;

use crate::compounding::Compounding;
use crate::error::{CurveError, CurveResult};

/// Step used for rates over vanishing horizons.
const SHORT_HORIZON: f64 = 1e-4;

/// Slack on the range check absorbing date-to-time rounding.
const RANGE_SLACK: f64 = 1e-12;

/// A discounting term structure.
///
/// Implementors provide [`discount_impl`](Self::discount_impl); everything
/// else has a default built on it.
pub trait YieldCurve: Send + Sync {
    /// Date at which discount factors equal one.
    fn reference_date(&self) -> Date;

    /// Day count measuring time from the reference date.
    fn day_count(&self) -> DayCountConvention;

    /// Last date the curve covers without extrapolation.
    fn max_date(&self) -> Date;

    /// Whether queries past [`max_date`](Self::max_date) are answered.
    fn allows_extrapolation(&self) -> bool;

    /// Discount factor at `t`, called after the range check.
    fn discount_impl(&self, t: f64) -> CurveResult<f64>;

    /// Last time the curve covers without extrapolation.
    fn max_time(&self) -> f64 {
        self.time_from_reference(self.max_date())
    }

    /// Year fraction from the reference date to `date`.
    fn time_from_reference(&self, date: Date) -> f64 {
        self.day_count().year_fraction(self.reference_date(), date)
    }

    /// Rejects negative times and, without extrapolation, times past the end.
    fn check_range(&self, t: f64) -> CurveResult<()> {
        if t.is_nan() {
            return Err(MathError::invalid_input("time is NaN").into());
        }
        if t < 0.0 {
            return Err(CurveError::NegativeTime { t });
        }
        if !self.allows_extrapolation() {
            let max_time = self.max_time();
            if t > max_time + RANGE_SLACK {
                return Err(CurveError::OutOfRange { t, max_time });
            }
        }
        Ok(())
    }

    /// Discount factor at time `t`.
    fn discount_t(&self, t: f64) -> CurveResult<f64> {
        self.check_range(t)?;
        self.discount_impl(t)
    }

    /// Discount factor at `date`.
    fn discount(&self, date: Date) -> CurveResult<f64> {
        if !self.allows_extrapolation() {
            let max_date = self.max_date();
            if date > max_date {
                return Err(CurveError::DateOutOfRange { date, max_date });
            }
        }
        self.discount_t(self.time_from_reference(date))
    }

    /// Zero rate to `t` under `compounding`.
    ///
    /// At `t = 0` the rate over a short horizon is returned.
    fn zero_rate(&self, t: f64, compounding: Compounding) -> CurveResult<f64> {
        let t = if t == 0.0 { SHORT_HORIZON } else { t };
        let df = self.discount_t(t)?;
        Ok(compounding.implied_rate(df, t))
    }

    /// Forward rate between `t1` and `t2` under `compounding`.
    ///
    /// Equal times give the forward over a short window around `t1`.
    fn forward_rate(&self, t1: f64, t2: f64, compounding: Compounding) -> CurveResult<f64> {
        if t2 < t1 {
            return Err(MathError::invalid_input(format!(
                "forward end {t2} precedes start {t1}"
            ))
            .into());
        }
        let (t1, t2) = if t2 - t1 < f64::EPSILON {
            let start = (t1 - SHORT_HORIZON / 2.0).max(0.0);
            (start, start + SHORT_HORIZON)
        } else {
            (t1, t2)
        };
        let df1 = self.discount_t(t1)?;
        let df2 = self.discount_t(t2)?;
        Ok(compounding.implied_rate(df2 / df1, t2 - t1))
    }

    /// Forward rate between two dates, accrued with `day_count`.
    fn forward_rate_dates(
        &self,
        start: Date,
        end: Date,
        day_count: DayCountConvention,
        compounding: Compounding,
    ) -> CurveResult<f64> {
        if end <= start {
            return Err(MathError::invalid_input(format!(
                "forward end {end} must follow start {start}"
            ))
            .into());
        }
        let df1 = self.discount(start)?;
        let df2 = self.discount(end)?;
        let tau = day_count.year_fraction(start, end);
        Ok(compounding.implied_rate(df2 / df1, tau))
    }

    /// Instantaneous continuously compounded forward at `t`.
    fn instantaneous_forward(&self, t: f64) -> CurveResult<f64> {
        self.check_range(t)?;
        let lo = (t - SHORT_HORIZON / 2.0).max(0.0);
        let hi = lo + SHORT_HORIZON;
        let ln_lo = self.discount_impl(lo)?.ln();
        let ln_hi = self.discount_impl(hi)?.ln();
        Ok(-(ln_hi - ln_lo) / (hi - lo))
    }

    /// Subscribes `observer` to changes of this curve.
    fn register_observer(&self, _observer: Weak<dyn Observer>) {}

    /// Removes a subscription made with [`register_observer`](Self::register_observer).
    fn unregister_observer(&self, _observer: &Weak<dyn Observer>) {}
}

impl fmt::Debug for dyn YieldCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YieldCurve")
            .field("reference_date", &self.reference_date())
            .field("day_count", &self.day_count())
            .field("max_date", &self.max_date())
            .finish_non_exhaustive()
    }
}

/// Shared handle to a yield curve.
pub type YieldCurveRef = Arc<dyn YieldCurve>;
