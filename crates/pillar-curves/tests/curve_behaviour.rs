//! Quote updates, external discounting, futures strips and configuration.

mod common;

use std::sync::Arc;

use approx::assert_relative_eq;
use common::{init_tracing, ymd, EuriborMarket};
use pillar_core::prelude::*;
use pillar_curves::prelude::*;
use pillar_math::prelude::*;
use proptest::prelude::*;

fn euribor_curve(market: &EuriborMarket) -> PiecewiseYieldCurve {
    PiecewiseYieldCurve::builder(market.today)
        .helpers(market.helpers())
        .day_count(DayCountConvention::ActActIsda)
        .build()
        .unwrap()
}

#[test]
fn test_quote_change_moves_only_later_nodes() {
    init_tracing();
    let market = EuriborMarket::new();
    let curve = euribor_curve(&market);

    let early = ymd(2003, 11, 10);
    let late = ymd(2006, 1, 2);
    let early_before = curve.discount(early).unwrap();
    let late_before = curve.discount(late).unwrap();
    assert!(!curve.is_dirty());

    let previous = market.swap_quote(Period::years(5)).set_value(0.0453);
    assert_eq!(previous, Some(0.0443));
    assert!(curve.is_dirty());

    let early_after = curve.discount(early).unwrap();
    let late_after = curve.discount(late).unwrap();
    assert!(!curve.is_dirty());
    assert_relative_eq!(early_after, early_before, epsilon = 1e-14);
    assert!(late_after < late_before);

    let fair = market
        .swap(Period::years(5))
        .fair_rate(&curve, &curve)
        .unwrap();
    assert!((fair - 0.0453).abs() < 1e-8, "5Y fair rate {fair}");
}

#[test]
fn test_restoring_quote_restores_curve() {
    let market = EuriborMarket::new();
    let curve = euribor_curve(&market);
    let original = curve.nodes().unwrap();

    let quote = market.swap_quote(Period::years(10));
    quote.set_value(0.06);
    assert_ne!(curve.nodes().unwrap(), original);

    quote.set_value(0.05165);
    assert_eq!(curve.nodes().unwrap(), original);
}

#[test]
fn test_swaps_against_external_discount() {
    let market = EuriborMarket::new();
    let discount: YieldCurveRef =
        Arc::new(FlatForward::new(market.today, 0.035, DayCountConvention::Act365Fixed));

    let mut helpers = market.deposit_helpers();
    for (tenor, quote) in &market.swaps {
        let helper = market
            .swap_helper(*tenor, Arc::clone(quote))
            .with_discount_curve(Arc::clone(&discount));
        helpers.push(Arc::new(helper) as RateHelperRef);
    }
    let forecast = PiecewiseYieldCurve::builder(market.today)
        .helpers(helpers)
        .day_count(DayCountConvention::ActActIsda)
        .build()
        .unwrap();

    let swap = market.swap(Period::years(5));
    let fair = swap.fair_rate(&forecast, discount.as_ref()).unwrap();
    assert!((fair - 0.0443).abs() < 1e-8, "5Y fair rate {fair}");

    // Discounting on the forecast curve itself no longer reprices.
    let single = swap.fair_rate(&forecast, &forecast).unwrap();
    assert!((single - 0.0443).abs() > 1e-7, "single-curve rate {single}");
}

#[test]
fn test_futures_strip() {
    init_tracing();
    let market = EuriborMarket::new();
    let euribor3m = IborIndex::euribor(Period::months(3));

    let mut helpers: Vec<RateHelperRef> = market.deposit_helpers().into_iter().take(2).collect();
    let strip = [
        (ymd(2001, 12, 19), 96.2875),
        (ymd(2002, 3, 20), 96.7875),
        (ymd(2002, 6, 19), 96.9875),
        (ymd(2002, 9, 18), 96.6875),
        (ymd(2002, 12, 18), 96.4875),
        (ymd(2003, 3, 19), 96.3875),
        (ymd(2003, 6, 18), 96.2875),
        (ymd(2003, 9, 17), 96.0875),
    ];
    for (imm_date, price) in strip {
        let future =
            FuturesRateHelper::new(SimpleQuote::shared(price), imm_date, &euribor3m).unwrap();
        helpers.push(Arc::new(future));
    }
    for (tenor, quote) in market.swaps.iter().skip(1) {
        helpers.push(Arc::new(market.swap_helper(*tenor, Arc::clone(quote))));
    }

    let curve = PiecewiseYieldCurve::builder(market.today)
        .helpers(helpers)
        .day_count(DayCountConvention::ActActIsda)
        .build()
        .unwrap();

    let report = curve.report().unwrap();
    assert_eq!(report.checks.len(), 14);
    assert!(report.all_within(1e-9), "{report}");

    // The first contract fixes the 2001-12-19 to 2002-03-19 forward.
    let fwd = curve
        .forward_rate_dates(
            ymd(2001, 12, 19),
            ymd(2002, 3, 19),
            DayCountConvention::Act360,
            Compounding::Simple,
        )
        .unwrap();
    assert_relative_eq!(fwd, 0.037125, epsilon = 1e-9);
}

#[test]
fn test_curve_from_toml() {
    let config = CurveConfig::from_toml_str(
        r#"
        reference_date = "2001-11-06"
        day_count = "ActActIsda"
        interpolation = "Linear"
        curve_trait = "ZeroYield"

        [bootstrap]
        accuracy = 1e-12
        repricing_tolerance = 1e-9
        "#,
    )
    .unwrap();
    assert_eq!(config.interpolation, InterpolationMethod::Linear);
    assert_eq!(config.curve_trait, CurveTrait::ZeroYield);
    assert_eq!(config.bootstrap.max_iterations, 100);

    let market = EuriborMarket::new();
    let curve = PiecewiseYieldCurve::from_config(&config, market.helpers()).unwrap();
    assert_eq!(curve.reference_date(), market.today);
    assert_eq!(curve.curve_trait(), CurveTrait::ZeroYield);
    assert!(curve.report().unwrap().all_within(1e-9));
}

#[test]
fn test_invalid_toml_rejected() {
    let err = CurveConfig::from_toml_str(
        r#"
        reference_date = "2001-11-06"

        [bootstrap]
        accuracy = -1.0
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, CurveError::InvalidConfig { .. }));

    let err = CurveConfig::from_toml_str("reference_date = 12").unwrap_err();
    assert!(matches!(err, CurveError::InvalidConfig { .. }));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_flat_deposits_reprice(rate in -0.01f64..0.10) {
        let today = ymd(2001, 11, 6);
        let helpers: Vec<RateHelperRef> = [1, 3, 6, 12]
            .into_iter()
            .map(|months| {
                let index = IborIndex::euribor(Period::months(months));
                let deposit =
                    DepositRateHelper::from_index(SimpleQuote::shared(rate), &index, today).unwrap();
                Arc::new(deposit) as RateHelperRef
            })
            .collect();

        let curve = PiecewiseYieldCurve::builder(today)
            .helpers(helpers)
            .build()
            .unwrap();

        for helper in curve.helpers() {
            let error = helper.quote_error(&curve).unwrap();
            prop_assert!(error.abs() < 1e-9, "{}: {}", helper.description(), error);
        }
    }
}
