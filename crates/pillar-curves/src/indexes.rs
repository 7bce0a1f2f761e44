//! Interest rate indexes projected off a forecasting curve.

use std::fmt;

use pillar_core::calendars::{BusinessDayConvention, Calendar, CalendarId};
use pillar_core::daycounts::{DayCount, DayCountConvention};
use pillar_core::types::{Date, Period, TimeUnit};
use pillar_core::CoreResult;
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};
use crate::term_structure::YieldCurve;

/// A term rate index such as Euribor 6M.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IborIndex {
    /// Display name.
    pub name: String,
    /// Length of the underlying deposit.
    pub tenor: Period,
    /// Business days between fixing and value date.
    pub fixing_days: u32,
    /// Fixing and value-date calendar.
    pub calendar: CalendarId,
    /// Adjustment of the maturity date.
    pub convention: BusinessDayConvention,
    /// Month-end value dates roll to month-end maturities.
    pub end_of_month: bool,
    /// Accrual basis.
    pub day_count: DayCountConvention,
}

impl IborIndex {
    /// Euribor: TARGET, T+2, ACT/360, modified following.
    #[must_use]
    pub fn euribor(tenor: Period) -> Self {
        Self {
            name: format!("Euribor{tenor}"),
            tenor,
            fixing_days: 2,
            calendar: CalendarId::Target,
            convention: term_convention(tenor),
            end_of_month: rolls_month_end(tenor),
            day_count: DayCountConvention::Act360,
        }
    }

    /// USD Libor conventions on a weekend-only calendar.
    #[must_use]
    pub fn usd_libor(tenor: Period) -> Self {
        Self {
            name: format!("USDLibor{tenor}"),
            tenor,
            fixing_days: 2,
            calendar: CalendarId::WeekendsOnly,
            convention: term_convention(tenor),
            end_of_month: rolls_month_end(tenor),
            day_count: DayCountConvention::Act360,
        }
    }

    /// Fixing date for a deposit starting on `value_date`.
    #[must_use]
    pub fn fixing_date(&self, value_date: Date) -> Date {
        self.calendar
            .advance_business_days(value_date, -(self.fixing_days as i32))
    }

    /// Start of the deposit fixed on `fixing_date`.
    #[must_use]
    pub fn value_date(&self, fixing_date: Date) -> Date {
        self.calendar
            .advance_business_days(fixing_date, self.fixing_days as i32)
    }

    /// End of the deposit starting on `value_date`.
    pub fn maturity_date(&self, value_date: Date) -> CoreResult<Date> {
        self.calendar
            .advance(value_date, self.tenor, self.convention, self.end_of_month)
    }

    /// Projected fixing on `fixing_date` off `curve`.
    pub fn forecast_fixing(&self, fixing_date: Date, curve: &dyn YieldCurve) -> CurveResult<f64> {
        let start = self.value_date(fixing_date);
        let end = self.maturity_date(start)?;
        simple_forward(curve, start, end, self.day_count.year_fraction(start, end))
    }
}

impl fmt::Display for IborIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An overnight index such as €STR or SOFR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvernightIndex {
    /// Display name.
    pub name: String,
    /// Business days between fixing and value date.
    pub fixing_days: u32,
    /// Fixing calendar.
    pub calendar: CalendarId,
    /// Accrual basis.
    pub day_count: DayCountConvention,
}

impl OvernightIndex {
    /// Eonia: TARGET, ACT/360.
    #[must_use]
    pub fn eonia() -> Self {
        Self::target("Eonia")
    }

    /// €STR: TARGET, ACT/360.
    #[must_use]
    pub fn estr() -> Self {
        Self::target("ESTR")
    }

    /// SOFR: ACT/360 on a weekend-only calendar.
    #[must_use]
    pub fn sofr() -> Self {
        Self {
            name: "SOFR".into(),
            fixing_days: 0,
            calendar: CalendarId::WeekendsOnly,
            day_count: DayCountConvention::Act360,
        }
    }

    fn target(name: &str) -> Self {
        Self {
            name: name.into(),
            fixing_days: 0,
            calendar: CalendarId::Target,
            day_count: DayCountConvention::Act360,
        }
    }

    /// Daily-compounded rate over `[start, end]` projected off `curve`.
    ///
    /// Compounding every overnight fixing telescopes into the ratio of the
    /// two end discount factors.
    pub fn compounded_rate(
        &self,
        start: Date,
        end: Date,
        curve: &dyn YieldCurve,
    ) -> CurveResult<f64> {
        simple_forward(curve, start, end, self.day_count.year_fraction(start, end))
    }
}

impl fmt::Display for OvernightIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Simply compounded forward between two dates accrued over `tau`.
pub(crate) fn simple_forward(
    curve: &dyn YieldCurve,
    start: Date,
    end: Date,
    tau: f64,
) -> CurveResult<f64> {
    if tau <= 0.0 {
        return Err(CurveError::invalid_helper(
            format!("forward {start} to {end}"),
            format!("non-positive accrual fraction {tau}"),
        ));
    }
    Ok((curve.discount(start)? / curve.discount(end)? - 1.0) / tau)
}

fn rolls_month_end(tenor: Period) -> bool {
    matches!(tenor.unit(), TimeUnit::Months | TimeUnit::Years)
}

fn term_convention(tenor: Period) -> BusinessDayConvention {
    match tenor.unit() {
        TimeUnit::Days => BusinessDayConvention::Following,
        _ => BusinessDayConvention::ModifiedFollowing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::FlatForward;
    use approx::assert_relative_eq;

    fn ymd(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_euribor_dates() {
        let index = IborIndex::euribor(Period::months(6));
        assert_eq!(index.name, "Euribor6M");
        let fixing = ymd(2001, 11, 6);
        let value = index.value_date(fixing);
        assert_eq!(value, ymd(2001, 11, 8));
        assert_eq!(index.fixing_date(value), fixing);
        assert_eq!(index.maturity_date(value).unwrap(), ymd(2002, 5, 8));
    }

    #[test]
    fn test_month_end_rolls() {
        let index = IborIndex::euribor(Period::months(1));
        // 28 Feb 2003 is the last TARGET business day of the month
        assert_eq!(
            index.maturity_date(ymd(2003, 2, 28)).unwrap(),
            ymd(2003, 3, 31)
        );
        assert!(!IborIndex::euribor(Period::weeks(1)).end_of_month);
    }

    #[test]
    fn test_forecast_on_flat_curve() {
        let today = ymd(2001, 11, 6);
        let curve = FlatForward::new(today, 0.04, DayCountConvention::Act360);
        let index = IborIndex::euribor(Period::months(3));
        let start = index.value_date(today);
        let end = index.maturity_date(start).unwrap();
        let tau = DayCountConvention::Act360.year_fraction(start, end);
        let expected = ((0.04 * tau).exp() - 1.0) / tau;
        assert_relative_eq!(
            index.forecast_fixing(today, &curve).unwrap(),
            expected,
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_overnight_compounding_matches_discount_ratio() {
        let today = ymd(2012, 12, 11);
        let curve = FlatForward::new(today, 0.001, DayCountConvention::Act360);
        let eonia = OvernightIndex::eonia();
        let start = ymd(2013, 1, 16);
        let end = ymd(2013, 2, 13);
        let rate = eonia.compounded_rate(start, end, &curve).unwrap();
        let tau = 28.0_f64 / 360.0;
        assert_relative_eq!(rate, ((0.001 * tau).exp() - 1.0) / tau, epsilon = 1e-15);
        assert!(eonia.compounded_rate(end, start, &curve).is_err());
    }
}
