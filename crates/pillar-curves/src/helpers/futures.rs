//! Interest rate futures helper.
//!
//! Futures are quoted as `100 * (1 - rate)`. The futures rate exceeds the
//! forward rate by a convexity adjustment, supplied as a separate quote.

use std::sync::{Arc, Weak};

use chrono::Weekday;
use pillar_core::calendars::Calendar;
use pillar_core::daycounts::DayCount;
use pillar_core::observer::Observer;
use pillar_core::quote::SimpleQuote;
use pillar_core::types::{Date, Period};

use super::{HelperDates, HelperKind, Pillar, RateHelper};
use crate::error::{CurveError, CurveResult};
use crate::indexes::{simple_forward, IborIndex};
use crate::term_structure::YieldCurve;

/// True for the third Wednesday of March, June, September or December.
#[must_use]
pub fn is_imm_date(date: Date) -> bool {
    date.weekday() == Weekday::Wed
        && (15..=21).contains(&date.day())
        && date.month() % 3 == 0
}

/// First IMM date strictly after `date`.
#[must_use]
pub fn next_imm_date(date: Date) -> Date {
    let mut year = date.year();
    let mut month = date.month();
    loop {
        if month % 3 == 0 {
            if let Some(imm) = third_wednesday(year, month).filter(|&d| d > date) {
                return imm;
            }
        }
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }
}

fn third_wednesday(year: i32, month: u32) -> Option<Date> {
    let first = Date::from_ymd(year, month, 1).ok()?;
    let offset = (7 + 2 - i64::from(first.weekday().num_days_from_monday())) % 7;
    Some(first.add_days(offset + 14))
}

/// A three-month futures contract starting on an IMM date.
#[derive(Debug, Clone)]
pub struct FuturesRateHelper {
    price: Arc<SimpleQuote>,
    convexity: Option<Arc<SimpleQuote>>,
    dates: HelperDates,
    year_fraction: f64,
}

impl FuturesRateHelper {
    /// Contract on the deposit of `index` starting on `imm_date`.
    ///
    /// The contract always covers three months; the index supplies the
    /// calendar, roll convention and day count.
    pub fn new(price: Arc<SimpleQuote>, imm_date: Date, index: &IborIndex) -> CurveResult<Self> {
        let description = describe(imm_date);
        if !is_imm_date(imm_date) {
            return Err(CurveError::invalid_helper(
                description,
                format!("{imm_date} is not an IMM date"),
            ));
        }
        let maturity = index.calendar.advance(
            imm_date,
            Period::months(3),
            index.convention,
            index.end_of_month,
        )?;
        let dates =
            HelperDates::resolve(&description, imm_date, maturity, maturity, Pillar::default())?;
        Ok(Self {
            price,
            convexity: None,
            year_fraction: index.day_count.year_fraction(imm_date, maturity),
            dates,
        })
    }

    /// Adds a convexity adjustment quote.
    #[must_use]
    pub fn with_convexity(mut self, convexity: Arc<SimpleQuote>) -> Self {
        self.convexity = Some(convexity);
        self
    }

    /// Moves the node to another pillar.
    pub fn with_pillar(mut self, pillar: Pillar) -> CurveResult<Self> {
        self.dates = self.dates.with_pillar(&self.description(), pillar)?;
        Ok(self)
    }

    /// Current convexity adjustment, zero when none is attached.
    pub fn convexity_adjustment(&self) -> CurveResult<f64> {
        let Some(quote) = &self.convexity else {
            return Ok(0.0);
        };
        let value = quote
            .value()
            .filter(|v| v.is_finite())
            .ok_or_else(|| CurveError::invalid_quote(self.description(), self.dates.pillar))?;
        if value < 0.0 {
            return Err(CurveError::invalid_helper(
                self.description(),
                format!("negative convexity adjustment {value}"),
            ));
        }
        Ok(value)
    }
}

fn describe(imm_date: Date) -> String {
    format!("{imm_date} future")
}

impl RateHelper for FuturesRateHelper {
    fn kind(&self) -> HelperKind {
        HelperKind::Futures
    }

    fn quote(&self) -> &Arc<SimpleQuote> {
        &self.price
    }

    fn dates(&self) -> &HelperDates {
        &self.dates
    }

    fn description(&self) -> String {
        describe(self.dates.earliest)
    }

    fn implied_quote(&self, curve: &dyn YieldCurve) -> CurveResult<f64> {
        let forward = simple_forward(
            curve,
            self.dates.earliest,
            self.dates.maturity,
            self.year_fraction,
        )?;
        Ok(100.0 * (1.0 - (forward + self.convexity_adjustment()?)))
    }

    fn register_observer(&self, observer: Weak<dyn Observer>) {
        if let Some(convexity) = &self.convexity {
            convexity.register_observer(observer.clone());
        }
        self.price.register_observer(observer);
    }

    fn unregister_observer(&self, observer: &Weak<dyn Observer>) {
        if let Some(convexity) = &self.convexity {
            convexity.unregister_observer(observer);
        }
        self.price.unregister_observer(observer);
    }
}
