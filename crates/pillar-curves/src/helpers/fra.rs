//! Forward rate agreement helper.

use std::sync::Arc;

use pillar_core::calendars::{BusinessDayConvention, Calendar};
use pillar_core::daycounts::DayCount;
use pillar_core::quote::SimpleQuote;
use pillar_core::types::{Date, Period};

use super::{HelperDates, HelperKind, Pillar, RateHelper};
use crate::error::CurveResult;
use crate::indexes::{simple_forward, IborIndex};
use crate::term_structure::YieldCurve;

/// A forward rate agreement on an Ibor index.
///
/// The underlying deposit starts `period_to_start` after spot and runs for
/// the index tenor.
#[derive(Debug, Clone)]
pub struct FraRateHelper {
    quote: Arc<SimpleQuote>,
    period_to_start: Period,
    index: IborIndex,
    dates: HelperDates,
    year_fraction: f64,
}

impl FraRateHelper {
    /// FRA starting `period_to_start` after spot, traded on `trade_date`.
    pub fn new(
        quote: Arc<SimpleQuote>,
        period_to_start: Period,
        index: IborIndex,
        trade_date: Date,
    ) -> CurveResult<Self> {
        let calendar = index.calendar;
        let spot = index.value_date(calendar.adjust(trade_date, BusinessDayConvention::Following));
        let earliest = calendar.advance(spot, period_to_start, index.convention, index.end_of_month)?;
        let maturity = index.maturity_date(earliest)?;
        let description = describe(period_to_start, &index);
        let dates =
            HelperDates::resolve(&description, earliest, maturity, maturity, Pillar::default())?;
        Ok(Self {
            quote,
            period_to_start,
            year_fraction: index.day_count.year_fraction(earliest, maturity),
            index,
            dates,
        })
    }

    /// Moves the node to another pillar.
    pub fn with_pillar(mut self, pillar: Pillar) -> CurveResult<Self> {
        self.dates = self.dates.with_pillar(&self.description(), pillar)?;
        Ok(self)
    }
}

fn describe(start: Period, index: &IborIndex) -> String {
    match (start.total_months(), index.tenor.total_months()) {
        (Some(s), Some(t)) => format!("{s}x{} FRA", s + t),
        _ => format!("{start} fwd {} FRA", index.tenor),
    }
}

impl RateHelper for FraRateHelper {
    fn kind(&self) -> HelperKind {
        HelperKind::Fra
    }

    fn quote(&self) -> &Arc<SimpleQuote> {
        &self.quote
    }

    fn dates(&self) -> &HelperDates {
        &self.dates
    }

    fn description(&self) -> String {
        describe(self.period_to_start, &self.index)
    }

    fn implied_quote(&self, curve: &dyn YieldCurve) -> CurveResult<f64> {
        simple_forward(
            curve,
            self.dates.earliest,
            self.dates.maturity,
            self.year_fraction,
        )
    }

    fn discount_guess(&self, curve: Option<&dyn YieldCurve>) -> Option<f64> {
        if self.dates.pillar != self.dates.maturity {
            return None;
        }
        let rate = self.quote_value().ok()?;
        let start = curve?.discount(self.dates.earliest).ok()?;
        Some(start / (1.0 + rate * self.year_fraction))
    }
}
