//! Deposit rate helper.

use std::sync::Arc;

use pillar_core::calendars::{BusinessDayConvention, Calendar, CalendarId};
use pillar_core::daycounts::{DayCount, DayCountConvention};
use pillar_core::quote::SimpleQuote;
use pillar_core::types::{Date, Period};

use super::{HelperDates, HelperKind, Pillar, RateHelper};
use crate::error::CurveResult;
use crate::indexes::{simple_forward, IborIndex};
use crate::term_structure::YieldCurve;

/// A money market deposit.
///
/// Starts `fixing_days` business days after the trade date and pays simple
/// interest at maturity:
///
/// ```text
/// implied = (P(start) / P(maturity) - 1) / tau
/// ```
#[derive(Debug, Clone)]
pub struct DepositRateHelper {
    quote: Arc<SimpleQuote>,
    index: IborIndex,
    dates: HelperDates,
    year_fraction: f64,
}

impl DepositRateHelper {
    /// Deposit with explicit conventions, traded on `trade_date`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        quote: Arc<SimpleQuote>,
        tenor: Period,
        fixing_days: u32,
        calendar: CalendarId,
        convention: BusinessDayConvention,
        end_of_month: bool,
        day_count: DayCountConvention,
        trade_date: Date,
    ) -> CurveResult<Self> {
        let index = IborIndex {
            name: format!("Deposit{tenor}"),
            tenor,
            fixing_days,
            calendar,
            convention,
            end_of_month,
            day_count,
        };
        Self::from_index(quote, &index, trade_date)
    }

    /// Deposit with the conventions of `index`, traded on `trade_date`.
    pub fn from_index(
        quote: Arc<SimpleQuote>,
        index: &IborIndex,
        trade_date: Date,
    ) -> CurveResult<Self> {
        let fixing_date = index.calendar.adjust(trade_date, BusinessDayConvention::Following);
        let earliest = index.value_date(fixing_date);
        let maturity = index.maturity_date(earliest)?;
        let description = describe(index.tenor);
        let dates =
            HelperDates::resolve(&description, earliest, maturity, maturity, Pillar::default())?;
        Ok(Self {
            quote,
            index: index.clone(),
            year_fraction: index.day_count.year_fraction(earliest, maturity),
            dates,
        })
    }

    /// Moves the node to another pillar.
    pub fn with_pillar(mut self, pillar: Pillar) -> CurveResult<Self> {
        self.dates = self.dates.with_pillar(&self.description(), pillar)?;
        Ok(self)
    }

    /// Accrual fraction of the deposit.
    #[must_use]
    pub fn year_fraction(&self) -> f64 {
        self.year_fraction
    }
}

fn describe(tenor: Period) -> String {
    format!("{tenor} deposit")
}

impl RateHelper for DepositRateHelper {
    fn kind(&self) -> HelperKind {
        HelperKind::Deposit
    }

    fn quote(&self) -> &Arc<SimpleQuote> {
        &self.quote
    }

    fn dates(&self) -> &HelperDates {
        &self.dates
    }

    fn description(&self) -> String {
        describe(self.index.tenor)
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
        let start = match curve {
            Some(c) => c.discount(self.dates.earliest).ok()?,
            None => 1.0,
        };
        Some(start / (1.0 + rate * self.year_fraction))
    }
}
