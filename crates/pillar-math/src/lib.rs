//! # Pillar Math
//!
//! Numerical building blocks for curve construction.
//!
//! - **Interpolation**: linear, log-linear, backward-flat and the piecewise
//!   cubic family, each with derivative and primitive
//! - **Solvers**: bracketed one-dimensional root finders
//!
//! ## Example
//!
//! ```rust
//! use pillar_math::prelude::*;
//!
//! let times = vec![0.0, 1.0, 2.0];
//! let dfs = vec![1.0, 0.97, 0.93];
//! let curve = InterpolationMethod::LogLinear.build(times, dfs, false).unwrap();
//!
//! let df = curve.interpolate(1.5).unwrap();
//! assert!(df < 0.97 && df > 0.93);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::float_cmp)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::needless_range_loop)]

pub mod error;
pub mod interpolation;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{
        BackwardFlatInterpolator, CubicBoundary, CubicDerivative, CubicInterpolator,
        InterpolationMethod, Interpolator, LinearInterpolator, LogLinearInterpolator,
    };
    pub use crate::solvers::{
        bisection, bracket, brent, newton_safe, SolverConfig, SolverKind, SolverResult,
    };
}

pub use error::{MathError, MathResult};
