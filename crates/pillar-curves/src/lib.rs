//! # Pillar Curves
//!
//! Piecewise yield curves bootstrapped from market instruments.
//!
//! This crate provides:
//!
//! - **Term Structure**: the [`YieldCurve`] trait consumed by pricing code
//! - **Curves**: flat-forward and node-interpolated curves
//! - **Rate Helpers**: deposits, FRAs, futures, OIS and swaps repricing off a
//!   trial curve
//! - **Bootstrap Traits**: discount, zero-yield or forward nodes
//! - **Bootstrap**: sequential solve with global re-iteration when helpers
//!   reach past their pillars
//! - **Piecewise Curve**: lazily rebuilt when a quote changes
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use pillar_core::prelude::*;
//! use pillar_curves::prelude::*;
//!
//! let today = Date::from_ymd(2001, 11, 6).unwrap();
//! let euribor6m = IborIndex::euribor(Period::months(6));
//!
//! let mut helpers: Vec<RateHelperRef> = Vec::new();
//! for (months, rate) in [(3, 0.0363), (6, 0.0353)] {
//!     let index = IborIndex::euribor(Period::months(months));
//!     let deposit = DepositRateHelper::from_index(SimpleQuote::shared(rate), &index, today).unwrap();
//!     helpers.push(Arc::new(deposit));
//! }
//! for (years, rate) in [(2, 0.037125), (5, 0.0443)] {
//!     let swap = SwapRateHelper::new(
//!         SimpleQuote::shared(rate),
//!         Period::years(years),
//!         Frequency::Annual,
//!         BusinessDayConvention::Unadjusted,
//!         DayCountConvention::Thirty360E,
//!         euribor6m.clone(),
//!         today,
//!     )
//!     .unwrap();
//!     helpers.push(Arc::new(swap));
//! }
//!
//! let curve = PiecewiseYieldCurve::builder(today)
//!     .helpers(helpers)
//!     .day_count(DayCountConvention::ActActIsda)
//!     .build()
//!     .unwrap();
//!
//! let zero = curve.zero_rate(3.0, Compounding::Continuous).unwrap();
//! assert!(zero > 0.03 && zero < 0.05);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::too_many_arguments)]

pub mod bootstrap;
pub mod compounding;
pub mod config;
pub mod curves;
pub mod error;
pub mod helpers;
pub mod indexes;
pub mod legs;
pub mod piecewise;
pub mod term_structure;
pub mod traits;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bootstrap::{
        BootstrapReport, BootstrappedCurve, GlobalIterationReason, IterativeBootstrap,
        RepricingCheck,
    };
    pub use crate::compounding::Compounding;
    pub use crate::config::{BootstrapConfig, CurveConfig};
    pub use crate::curves::{FlatForward, InterpolatedCurve};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::helpers::{
        DatedOisRateHelper, DepositRateHelper, FraRateHelper, FuturesRateHelper, HelperKind,
        OisConventions, OisRateHelper, Pillar, RateHelper, RateHelperRef, SwapRateHelper,
    };
    pub use crate::indexes::{IborIndex, OvernightIndex};
    pub use crate::legs::VanillaSwap;
    pub use crate::piecewise::{PiecewiseYieldCurve, PiecewiseYieldCurveBuilder};
    pub use crate::term_structure::{YieldCurve, YieldCurveRef};
    pub use crate::traits::CurveTrait;
}

pub use compounding::Compounding;
pub use error::{CurveError, CurveResult};
pub use piecewise::PiecewiseYieldCurve;
pub use term_structure::{YieldCurve, YieldCurveRef};
