//! Curve bootstrapping.
//!
//! [`IterativeBootstrap`] turns a set of rate helpers into an
//! [`InterpolatedCurve`](crate::curves::InterpolatedCurve) on which every
//! helper reprices to its quote, and records how in a [`BootstrapReport`].
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use pillar_core::prelude::*;
//! use pillar_curves::prelude::*;
//! use pillar_math::prelude::*;
//!
//! let today = Date::from_ymd(2001, 11, 6).unwrap();
//! let helpers: Vec<RateHelperRef> = [(3, 0.0363), (6, 0.0353), (12, 0.0345)]
//!     .into_iter()
//!     .map(|(months, rate)| -> CurveResult<RateHelperRef> {
//!         let index = IborIndex::euribor(Period::months(months));
//!         let helper = DepositRateHelper::from_index(SimpleQuote::shared(rate), &index, today)?;
//!         Ok(Arc::new(helper) as RateHelperRef)
//!     })
//!     .collect::<CurveResult<_>>()
//!     .unwrap();
//!
//! let built = IterativeBootstrap::default()
//!     .bootstrap(
//!         today,
//!         DayCountConvention::Act365Fixed,
//!         &helpers,
//!         InterpolationMethod::LogLinear,
//!         CurveTrait::Discount,
//!     )
//!     .unwrap();
//! assert!(built.report().max_error() < 1e-10);
//! ```

mod iterative;
mod report;

pub use iterative::{sort_helpers, BootstrappedCurve, IterativeBootstrap};
pub use report::{BootstrapReport, GlobalIterationReason, RepricingCheck};
