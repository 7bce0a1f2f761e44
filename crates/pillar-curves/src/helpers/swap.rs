//! Fixed-for-Ibor swap helper.

use std::sync::{Arc, Weak};

use pillar_core::calendars::{BusinessDayConvention, Calendar};
use pillar_core::daycounts::DayCountConvention;
use pillar_core::observer::Observer;
use pillar_core::quote::SimpleQuote;
use pillar_core::types::{Date, Frequency, Period};

use super::{HelperDates, HelperKind, Pillar, RateHelper};
use crate::error::CurveResult;
use crate::indexes::IborIndex;
use crate::legs::VanillaSwap;
use crate::term_structure::{YieldCurve, YieldCurveRef};

/// A par swap quoted by its fixed rate.
///
/// The floating leg projects `index` off the curve being built. Without an
/// external discounting curve, cash flows are discounted off the same curve.
#[derive(Debug, Clone)]
pub struct SwapRateHelper {
    quote: Arc<SimpleQuote>,
    tenor: Period,
    fixed_frequency: Frequency,
    fixed_convention: BusinessDayConvention,
    fixed_day_count: DayCountConvention,
    index: IborIndex,
    trade_date: Date,
    settlement_days: u32,
    forward_start: Period,
    spread: f64,
    pillar: Pillar,
    discount: Option<YieldCurveRef>,
    swap: VanillaSwap,
    dates: HelperDates,
}

impl SwapRateHelper {
    /// Spot-starting swap of `tenor` traded on `trade_date`.
    ///
    /// Settles after the index fixing days on the index calendar.
    pub fn new(
        quote: Arc<SimpleQuote>,
        tenor: Period,
        fixed_frequency: Frequency,
        fixed_convention: BusinessDayConvention,
        fixed_day_count: DayCountConvention,
        index: IborIndex,
        trade_date: Date,
    ) -> CurveResult<Self> {
        let settlement_days = index.fixing_days;
        let (swap, dates) = build(
            tenor,
            fixed_frequency,
            fixed_convention,
            fixed_day_count,
            &index,
            trade_date,
            settlement_days,
            Period::days(0),
            0.0,
            Pillar::default(),
        )?;
        Ok(Self {
            quote,
            tenor,
            fixed_frequency,
            fixed_convention,
            fixed_day_count,
            index,
            trade_date,
            settlement_days,
            forward_start: Period::days(0),
            spread: 0.0,
            pillar: Pillar::default(),
            discount: None,
            swap,
            dates,
        })
    }

    /// Overrides the settlement lag.
    pub fn with_settlement_days(mut self, days: u32) -> CurveResult<Self> {
        self.settlement_days = days;
        self.rebuild()
    }

    /// Starts the swap `period` after spot.
    pub fn with_forward_start(mut self, period: Period) -> CurveResult<Self> {
        self.forward_start = period;
        self.rebuild()
    }

    /// Adds a spread over the index on the floating leg.
    #[must_use]
    pub fn with_spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self.swap = self.swap.with_spread(spread);
        self
    }

    /// Discounts off `curve` instead of the curve being built.
    #[must_use]
    pub fn with_discount_curve(mut self, curve: YieldCurveRef) -> Self {
        self.discount = Some(curve);
        self
    }

    /// Moves the node to another pillar.
    pub fn with_pillar(mut self, pillar: Pillar) -> CurveResult<Self> {
        self.pillar = pillar;
        self.dates = self.dates.with_pillar(&self.description(), pillar)?;
        Ok(self)
    }

    /// The underlying swap.
    #[must_use]
    pub fn swap(&self) -> &VanillaSwap {
        &self.swap
    }

    /// Floating spread.
    #[must_use]
    pub fn spread(&self) -> f64 {
        self.spread
    }

    fn rebuild(mut self) -> CurveResult<Self> {
        let (swap, dates) = build(
            self.tenor,
            self.fixed_frequency,
            self.fixed_convention,
            self.fixed_day_count,
            &self.index,
            self.trade_date,
            self.settlement_days,
            self.forward_start,
            self.spread,
            self.pillar,
        )?;
        self.swap = swap;
        self.dates = dates;
        Ok(self)
    }
}

#[allow(clippy::too_many_arguments)]
fn build(
    tenor: Period,
    fixed_frequency: Frequency,
    fixed_convention: BusinessDayConvention,
    fixed_day_count: DayCountConvention,
    index: &IborIndex,
    trade_date: Date,
    settlement_days: u32,
    forward_start: Period,
    spread: f64,
    pillar: Pillar,
) -> CurveResult<(VanillaSwap, HelperDates)> {
    let calendar = index.calendar;
    let spot = calendar.advance_business_days(
        calendar.adjust(trade_date, BusinessDayConvention::Following),
        settlement_days as i32,
    );
    let start = calendar.advance(spot, forward_start, index.convention, false)?;
    let end = start.add_period(tenor)?;
    let swap = VanillaSwap::ibor(
        start,
        end,
        fixed_frequency,
        fixed_convention,
        fixed_day_count,
        index,
    )?
    .with_spread(spread);
    let dates = HelperDates::resolve(
        &describe(tenor, forward_start),
        swap.start_date(),
        swap.maturity_date(),
        swap.latest_relevant_date(),
        pillar,
    )?;
    Ok((swap, dates))
}

fn describe(tenor: Period, forward_start: Period) -> String {
    if forward_start.is_zero() {
        format!("{tenor} swap")
    } else {
        format!("{forward_start} fwd {tenor} swap")
    }
}

impl RateHelper for SwapRateHelper {
    fn kind(&self) -> HelperKind {
        HelperKind::Swap
    }

    fn quote(&self) -> &Arc<SimpleQuote> {
        &self.quote
    }

    fn dates(&self) -> &HelperDates {
        &self.dates
    }

    fn description(&self) -> String {
        describe(self.tenor, self.forward_start)
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
