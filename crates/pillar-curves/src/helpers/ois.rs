//! Overnight indexed swap helpers.
//!
//! The floating leg compounds the overnight index projected off the curve
//! being built. Compounding across a period only needs the discount factors
//! at its ends, so a period whose end lies beyond the helper's pillar ties
//! this node to later ones; the bootstrap resolves that by re-iterating.

use std::sync::{Arc, Weak};

use pillar_core::calendars::{BusinessDayConvention, Calendar};
use pillar_core::observer::Observer;
use pillar_core::quote::SimpleQuote;
use pillar_core::types::{Date, Frequency, Period};
use serde::{Deserialize, Serialize};

use super::{HelperDates, HelperKind, Pillar, RateHelper};
use crate::error::CurveResult;
use crate::indexes::OvernightIndex;
use crate::legs::VanillaSwap;
use crate::term_structure::{YieldCurve, YieldCurveRef};

/// Market conventions of an OIS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OisConventions {
    /// Business days from trade date to spot.
    pub settlement_days: u32,
    /// Delay between spot and the swap start.
    pub forward_start: Period,
    /// Business days between period end and payment.
    pub payment_lag: u32,
    /// Frequency of both legs.
    pub payment_frequency: Frequency,
    /// Roll convention of the schedule.
    pub convention: BusinessDayConvention,
    /// Spread over the compounded index, added simply.
    pub spread: f64,
}

impl Default for OisConventions {
    fn default() -> Self {
        Self {
            settlement_days: 2,
            forward_start: Period::days(0),
            payment_lag: 0,
            payment_frequency: Frequency::Annual,
            convention: BusinessDayConvention::ModifiedFollowing,
            spread: 0.0,
        }
    }
}

impl OisConventions {
    /// Sets the settlement lag.
    #[must_use]
    pub fn with_settlement_days(mut self, days: u32) -> Self {
        self.settlement_days = days;
        self
    }

    /// Sets the forward start.
    #[must_use]
    pub fn with_forward_start(mut self, period: Period) -> Self {
        self.forward_start = period;
        self
    }

    /// Sets the payment lag.
    #[must_use]
    pub fn with_payment_lag(mut self, days: u32) -> Self {
        self.payment_lag = days;
        self
    }

    /// Sets the floating spread.
    #[must_use]
    pub fn with_spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }
}

/// State shared by both OIS helpers.
#[derive(Debug, Clone)]
struct OisSwap {
    quote: Arc<SimpleQuote>,
    swap: VanillaSwap,
    discount: Option<YieldCurveRef>,
    dates: HelperDates,
}

impl OisSwap {
    fn build(
        description: &str,
        quote: Arc<SimpleQuote>,
        start: Date,
        end: Date,
        index: &OvernightIndex,
        conventions: &OisConventions,
    ) -> CurveResult<Self> {
        let swap = VanillaSwap::overnight(
            start,
            end,
            index,
            conventions.payment_frequency,
            conventions.payment_lag,
            conventions.convention,
        )?
        .with_spread(conventions.spread);
        let dates = HelperDates::resolve(
            description,
            swap.start_date(),
            swap.maturity_date(),
            swap.latest_relevant_date(),
            Pillar::default(),
        )?;
        Ok(Self {
            quote,
            swap,
            discount: None,
            dates,
        })
    }

    fn implied_quote(&self, curve: &dyn YieldCurve) -> CurveResult<f64> {
        let discount: &dyn YieldCurve = match &self.discount {
            Some(external) => external.as_ref(),
            None => curve,
        };
        self.swap.fair_rate(curve, discount)
    }

    fn register_observer(&self, observer: Weak<dyn Observer>) {
        if let Some(discount) = &self.discount {
            discount.register_observer(observer.clone());
        }
        self.quote.register_observer(observer);
    }

    fn unregister_observer(&self, observer: &Weak<dyn Observer>) {
        if let Some(discount) = &self.discount {
            discount.unregister_observer(observer);
        }
        self.quote.unregister_observer(observer);
    }
}

/// An OIS quoted by tenor from spot.
#[derive(Debug, Clone)]
pub struct OisRateHelper {
    tenor: Period,
    forward_start: Period,
    inner: OisSwap,
}

impl OisRateHelper {
    /// OIS of `tenor` on `index` with default conventions.
    pub fn new(
        quote: Arc<SimpleQuote>,
        tenor: Period,
        index: &OvernightIndex,
        trade_date: Date,
    ) -> CurveResult<Self> {
        Self::with_conventions(quote, tenor, index, OisConventions::default(), trade_date)
    }

    /// OIS of `tenor` on `index` with explicit conventions.
    pub fn with_conventions(
        quote: Arc<SimpleQuote>,
        tenor: Period,
        index: &OvernightIndex,
        conventions: OisConventions,
        trade_date: Date,
    ) -> CurveResult<Self> {
        let calendar = index.calendar;
        let spot = calendar.advance_business_days(
            calendar.adjust(trade_date, BusinessDayConvention::Following),
            conventions.settlement_days as i32,
        );
        let start = calendar.advance(spot, conventions.forward_start, conventions.convention, false)?;
        let end = start.add_period(tenor)?;
        let description = describe(tenor, conventions.forward_start);
        Ok(Self {
            tenor,
            forward_start: conventions.forward_start,
            inner: OisSwap::build(&description, quote, start, end, index, &conventions)?,
        })
    }

    /// Discounts off `curve` instead of the curve being built.
    #[must_use]
    pub fn with_discount_curve(mut self, curve: YieldCurveRef) -> Self {
        self.inner.discount = Some(curve);
        self
    }

    /// Moves the node to another pillar.
    pub fn with_pillar(mut self, pillar: Pillar) -> CurveResult<Self> {
        self.inner.dates = self.inner.dates.with_pillar(&self.description(), pillar)?;
        Ok(self)
    }

    /// The underlying swap.
    #[must_use]
    pub fn swap(&self) -> &VanillaSwap {
        &self.inner.swap
    }
}

fn describe(tenor: Period, forward_start: Period) -> String {
    if forward_start.is_zero() {
        format!("{tenor} OIS")
    } else {
        format!("{forward_start} fwd {tenor} OIS")
    }
}

impl RateHelper for OisRateHelper {
    fn kind(&self) -> HelperKind {
        HelperKind::Ois
    }

    fn quote(&self) -> &Arc<SimpleQuote> {
        &self.inner.quote
    }

    fn dates(&self) -> &HelperDates {
        &self.inner.dates
    }

    fn description(&self) -> String {
        describe(self.tenor, self.forward_start)
    }

    fn implied_quote(&self, curve: &dyn YieldCurve) -> CurveResult<f64> {
        self.inner.implied_quote(curve)
    }

    fn register_observer(&self, observer: Weak<dyn Observer>) {
        self.inner.register_observer(observer);
    }

    fn unregister_observer(&self, observer: &Weak<dyn Observer>) {
        self.inner.unregister_observer(observer);
    }
}

/// An OIS over explicit start and end dates.
#[derive(Debug, Clone)]
pub struct DatedOisRateHelper {
    inner: OisSwap,
}

impl DatedOisRateHelper {
    /// OIS from `start` to `end` on `index` with default conventions.
    pub fn new(
        quote: Arc<SimpleQuote>,
        start: Date,
        end: Date,
        index: &OvernightIndex,
    ) -> CurveResult<Self> {
        Self::with_conventions(quote, start, end, index, OisConventions::default())
    }

    /// OIS from `start` to `end` on `index`; settlement and forward start
    /// in `conventions` are ignored.
    pub fn with_conventions(
        quote: Arc<SimpleQuote>,
        start: Date,
        end: Date,
        index: &OvernightIndex,
        conventions: OisConventions,
    ) -> CurveResult<Self> {
        let description = describe_dated(start, end);
        Ok(Self {
            inner: OisSwap::build(&description, quote, start, end, index, &conventions)?,
        })
    }

    /// Discounts off `curve` instead of the curve being built.
    #[must_use]
    pub fn with_discount_curve(mut self, curve: YieldCurveRef) -> Self {
        self.inner.discount = Some(curve);
        self
    }

    /// Moves the node to another pillar.
    pub fn with_pillar(mut self, pillar: Pillar) -> CurveResult<Self> {
        self.inner.dates = self.inner.dates.with_pillar(&self.description(), pillar)?;
        Ok(self)
    }

    /// The underlying swap.
    #[must_use]
    pub fn swap(&self) -> &VanillaSwap {
        &self.inner.swap
    }
}

fn describe_dated(start: Date, end: Date) -> String {
    format!("OIS {start} to {end}")
}

impl RateHelper for DatedOisRateHelper {
    fn kind(&self) -> HelperKind {
        HelperKind::DatedOis
    }

    fn quote(&self) -> &Arc<SimpleQuote> {
        &self.inner.quote
    }

    fn dates(&self) -> &HelperDates {
        &self.inner.dates
    }

    fn description(&self) -> String {
        describe_dated(self.inner.swap.start_date(), self.inner.swap.maturity_date())
    }

    fn implied_quote(&self, curve: &dyn YieldCurve) -> CurveResult<f64> {
        self.inner.implied_quote(curve)
    }

    fn register_observer(&self, observer: Weak<dyn Observer>) {
        self.inner.register_observer(observer);
    }

    fn unregister_observer(&self, observer: &Weak<dyn Observer>) {
        self.inner.unregister_observer(observer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::FlatForward;
    use approx::assert_relative_eq;
    use pillar_core::daycounts::DayCountConvention;

    fn ymd(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_spot_dates() {
        let today = ymd(2012, 12, 11);
        let helper =
            OisRateHelper::new(SimpleQuote::shared(0.0007), Period::weeks(1), &OvernightIndex::eonia(), today)
                .unwrap();
        assert_eq!(helper.earliest_date(), ymd(2012, 12, 13));
        assert_eq!(helper.maturity_date(), ymd(2012, 12, 20));
        assert_eq!(helper.pillar_date(), ymd(2012, 12, 20));
        assert_eq!(helper.description(), "1W OIS");
    }

    #[test]
    fn test_long_tenor_has_annual_periods() {
        let today = ymd(2012, 12, 11);
        let helper =
            OisRateHelper::new(SimpleQuote::shared(0.00008), Period::months(18), &OvernightIndex::eonia(), today)
                .unwrap();
        assert_eq!(helper.swap().fixed_leg().coupons().len(), 2);
        assert_eq!(helper.maturity_date(), ymd(2014, 6, 13));
    }

    #[test]
    fn test_payment_lag_extends_relevant_date() {
        let today = ymd(2012, 12, 11);
        let helper = OisRateHelper::with_conventions(
            SimpleQuote::shared(0.0007),
            Period::months(1),
            &OvernightIndex::eonia(),
            OisConventions::default().with_payment_lag(2),
            today,
        )
        .unwrap();
        assert!(helper.latest_relevant_date() > helper.maturity_date());
        assert_eq!(helper.pillar_date(), helper.latest_relevant_date());
    }

    #[test]
    fn test_dated_ois_on_flat_curve() {
        let helper = DatedOisRateHelper::new(
            SimpleQuote::shared(0.00046),
            ymd(2013, 1, 16),
            ymd(2013, 2, 13),
            &OvernightIndex::eonia(),
        )
        .unwrap();
        assert_eq!(helper.kind(), HelperKind::DatedOis);
        let curve = FlatForward::new(ymd(2012, 12, 11), 0.0005, DayCountConvention::Act360);
        let tau = 28.0_f64 / 360.0;
        assert_relative_eq!(
            helper.implied_quote(&curve).unwrap(),
            ((0.0005 * tau).exp() - 1.0) / tau,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_external_discounting_leaves_single_period_rate() {
        let today = ymd(2012, 12, 11);
        let forecast = FlatForward::new(today, 0.002, DayCountConvention::Act360);
        let discount: YieldCurveRef = Arc::new(FlatForward::new(today, 0.01, DayCountConvention::Act360));
        let helper = DatedOisRateHelper::new(
            SimpleQuote::shared(0.002),
            ymd(2013, 1, 16),
            ymd(2013, 2, 13),
            &OvernightIndex::eonia(),
        )
        .unwrap();
        let own = helper.implied_quote(&forecast).unwrap();
        let external = helper.with_discount_curve(discount).implied_quote(&forecast).unwrap();
        assert_relative_eq!(own, external, epsilon = 1e-15);
    }
}
