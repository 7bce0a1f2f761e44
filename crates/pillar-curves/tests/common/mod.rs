//! Market data shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use pillar_core::prelude::*;
use pillar_curves::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Routes curve logs to the test output when `RUST_LOG` is set.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

pub fn ymd(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

/// Euribor market of 6 November 2001.
pub struct EuriborMarket {
    pub today: Date,
    pub deposits: Vec<(Period, Arc<SimpleQuote>)>,
    pub swaps: Vec<(Period, Arc<SimpleQuote>)>,
}

impl EuriborMarket {
    pub fn new() -> Self {
        let deposits = [
            (Period::weeks(1), 0.0382),
            (Period::months(1), 0.0372),
            (Period::months(3), 0.0363),
            (Period::months(6), 0.0353),
            (Period::months(9), 0.0348),
            (Period::years(1), 0.0345),
        ];
        let swaps = [
            (Period::years(2), 0.037125),
            (Period::years(3), 0.0398),
            (Period::years(5), 0.0443),
            (Period::years(10), 0.05165),
            (Period::years(15), 0.055175),
        ];
        Self {
            today: ymd(2001, 11, 6),
            deposits: deposits
                .into_iter()
                .map(|(p, r)| (p, SimpleQuote::shared(r)))
                .collect(),
            swaps: swaps
                .into_iter()
                .map(|(p, r)| (p, SimpleQuote::shared(r)))
                .collect(),
        }
    }

    pub fn swap_quote(&self, tenor: Period) -> Arc<SimpleQuote> {
        self.swaps
            .iter()
            .find(|(p, _)| *p == tenor)
            .map(|(_, q)| Arc::clone(q))
            .unwrap()
    }

    pub fn deposit_helpers(&self) -> Vec<RateHelperRef> {
        self.deposits
            .iter()
            .map(|(tenor, quote)| {
                Arc::new(
                    DepositRateHelper::new(
                        Arc::clone(quote),
                        *tenor,
                        2,
                        CalendarId::Target,
                        BusinessDayConvention::ModifiedFollowing,
                        true,
                        DayCountConvention::Act360,
                        self.today,
                    )
                    .unwrap(),
                ) as RateHelperRef
            })
            .collect()
    }

    pub fn swap_helper(&self, tenor: Period, quote: Arc<SimpleQuote>) -> SwapRateHelper {
        SwapRateHelper::new(
            quote,
            tenor,
            Frequency::Annual,
            BusinessDayConvention::Unadjusted,
            DayCountConvention::Thirty360E,
            IborIndex::euribor(Period::months(6)),
            self.today,
        )
        .unwrap()
    }

    pub fn swap_helpers(&self) -> Vec<RateHelperRef> {
        self.swaps
            .iter()
            .map(|(tenor, quote)| Arc::new(self.swap_helper(*tenor, Arc::clone(quote))) as RateHelperRef)
            .collect()
    }

    pub fn helpers(&self) -> Vec<RateHelperRef> {
        let mut helpers = self.deposit_helpers();
        helpers.extend(self.swap_helpers());
        helpers
    }

    /// A spot-starting swap with the market conventions.
    pub fn swap(&self, tenor: Period) -> VanillaSwap {
        let start = ymd(2001, 11, 8);
        VanillaSwap::ibor(
            start,
            start.add_period(tenor).unwrap(),
            Frequency::Annual,
            BusinessDayConvention::Unadjusted,
            DayCountConvention::Thirty360E,
            &IborIndex::euribor(Period::months(6)),
        )
        .unwrap()
    }
}

/// EONIA market of 11 December 2012.
pub struct EoniaMarket {
    pub today: Date,
    pub overnight: Arc<SimpleQuote>,
    pub short_ois: Vec<(Period, Arc<SimpleQuote>)>,
    pub dated_ois: Vec<(Date, Date, Arc<SimpleQuote>)>,
    pub long_ois: Vec<(Period, Arc<SimpleQuote>)>,
}

impl EoniaMarket {
    pub fn new() -> Self {
        let shared = |v: f64| SimpleQuote::shared(v);
        Self {
            today: ymd(2012, 12, 11),
            overnight: shared(0.0004),
            short_ois: vec![
                (Period::weeks(1), shared(0.00070)),
                (Period::weeks(2), shared(0.00069)),
                (Period::weeks(3), shared(0.00078)),
                (Period::months(1), shared(0.00074)),
            ],
            dated_ois: vec![
                (ymd(2013, 1, 16), ymd(2013, 2, 13), shared(0.000460)),
                (ymd(2013, 2, 13), ymd(2013, 3, 13), shared(0.000160)),
                (ymd(2013, 3, 13), ymd(2013, 4, 10), shared(-0.000070)),
                (ymd(2013, 4, 10), ymd(2013, 5, 8), shared(-0.000130)),
                (ymd(2013, 5, 8), ymd(2013, 6, 12), shared(-0.000140)),
            ],
            long_ois: vec![
                (Period::months(15), shared(0.00002)),
                (Period::months(18), shared(0.00008)),
                (Period::months(21), shared(0.00021)),
                (Period::years(2), shared(0.00036)),
                (Period::years(3), shared(0.00127)),
                (Period::years(5), shared(0.00456)),
                (Period::years(10), shared(0.01280)),
                (Period::years(15), shared(0.01764)),
                (Period::years(30), shared(0.02038)),
            ],
        }
    }

    pub fn overnight_helper(&self) -> RateHelperRef {
        Arc::new(
            DepositRateHelper::new(
                Arc::clone(&self.overnight),
                Period::days(1),
                0,
                CalendarId::Target,
                BusinessDayConvention::Following,
                false,
                DayCountConvention::Act360,
                self.today,
            )
            .unwrap(),
        )
    }

    pub fn dated_helpers(&self) -> Vec<RateHelperRef> {
        let eonia = OvernightIndex::eonia();
        self.dated_ois
            .iter()
            .map(|(start, end, quote)| {
                Arc::new(DatedOisRateHelper::new(Arc::clone(quote), *start, *end, &eonia).unwrap())
                    as RateHelperRef
            })
            .collect()
    }

    pub fn helpers(&self) -> Vec<RateHelperRef> {
        let eonia = OvernightIndex::eonia();
        let tenor_helper = |(tenor, quote): &(Period, Arc<SimpleQuote>)| {
            Arc::new(OisRateHelper::new(Arc::clone(quote), *tenor, &eonia, self.today).unwrap())
                as RateHelperRef
        };
        let mut helpers = vec![self.overnight_helper()];
        helpers.extend(self.short_ois.iter().map(tenor_helper));
        helpers.extend(self.dated_helpers());
        helpers.extend(self.long_ois.iter().map(tenor_helper));
        helpers
    }
}
