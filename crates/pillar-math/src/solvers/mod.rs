//! One-dimensional root finding.
//!
//! - [`brent`]: bracketed inverse quadratic interpolation with bisection fallback
//! - [`newton_safe`]: Newton steps on a finite-difference slope, kept inside
//!   the bracket by bisection
//! - [`bisection`]: plain interval halving
//! - [`bracket`]: outward search for a sign change around a guess
//!
//! Objective functions are fallible: `FnMut(f64) -> Result<f64, E>`. An
//! error raised by the objective aborts the search and is returned as is,
//! so callers such as a curve bootstrap can surface their own failures.
//! Solver failures are converted into `E` through `From<MathError>`.
//!
//! # Example
//!
//! ```rust
//! use pillar_math::solvers::{brent, SolverConfig};
//! use pillar_math::MathError;
//!
//! let f = |x: f64| Ok::<_, MathError>(x * x * x - x - 2.0);
//! let result = brent(f, 1.5, 1.0, 2.0, &SolverConfig::default()).unwrap();
//! assert!((result.root - 1.521_379_706_804_568).abs() < 1e-10);
//! ```

mod bisection;
mod bracket;
mod brent;
mod newton_safe;

pub use bisection::bisection;
pub use bracket::bracket;
pub use brent::brent;
pub use newton_safe::newton_safe;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MathError;

/// Default accuracy on the root.
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Default cap on objective evaluations.
pub const DEFAULT_MAX_EVALUATIONS: u32 = 100;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Accuracy on x: the search stops once the root is known this closely.
    pub tolerance: f64,
    /// Maximum number of objective evaluations.
    pub max_evaluations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_evaluations: DEFAULT_MAX_EVALUATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_evaluations: u32) -> Self {
        Self {
            tolerance,
            max_evaluations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum number of evaluations.
    #[must_use]
    pub fn with_max_evaluations(mut self, max_evaluations: u32) -> Self {
        self.max_evaluations = max_evaluations;
        self
    }

    /// Tolerance floored at machine epsilon.
    pub(crate) fn effective_tolerance(&self) -> f64 {
        self.tolerance.max(f64::EPSILON)
    }
}

/// Result of a root search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of objective evaluations used.
    pub iterations: u32,
    /// Objective value at the root.
    pub residual: f64,
}

/// Bracketed solvers selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SolverKind {
    /// Brent's method.
    #[default]
    Brent,
    /// Safeguarded Newton with a finite-difference slope.
    NewtonSafe,
    /// Bisection.
    Bisection,
}

impl SolverKind {
    /// Solves `f(x) = 0` on `[lower, upper]` starting from `guess`.
    pub fn solve<F, E>(
        self,
        f: F,
        guess: f64,
        lower: f64,
        upper: f64,
        config: &SolverConfig,
    ) -> Result<SolverResult, E>
    where
        F: FnMut(f64) -> Result<f64, E>,
        E: From<MathError>,
    {
        match self {
            SolverKind::Brent => brent(f, guess, lower, upper, config),
            SolverKind::NewtonSafe => newton_safe(f, guess, lower, upper, config),
            SolverKind::Bisection => bisection(f, lower, upper, config),
        }
    }

    /// Human-readable solver name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SolverKind::Brent => "Brent",
            SolverKind::NewtonSafe => "NewtonSafe",
            SolverKind::Bisection => "Bisection",
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Evaluates both ends of a bracket and checks for a sign change.
///
/// Returns `Ok(Some(root))` if an end is already a root.
pub(crate) fn check_bracket<F, E>(
    f: &mut F,
    lower: f64,
    upper: f64,
) -> Result<(f64, f64, Option<f64>), E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<MathError>,
{
    if lower.is_nan() || upper.is_nan() || lower >= upper {
        return Err(MathError::invalid_input(format!(
            "invalid range: lower bound ({lower}) must be less than upper bound ({upper})"
        ))
        .into());
    }
    let f_lower = f(lower)?;
    if f_lower == 0.0 {
        return Ok((f_lower, f64::NAN, Some(lower)));
    }
    let f_upper = f(upper)?;
    if f_upper == 0.0 {
        return Ok((f_lower, f_upper, Some(upper)));
    }
    let product = f_lower * f_upper;
    if product.is_nan() || product > 0.0 {
        return Err(MathError::not_bracketed(lower, upper, f_lower, f_upper).into());
    }
    Ok((f_lower, f_upper, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_minus_two(x: f64) -> Result<f64, MathError> {
        Ok(x * x - 2.0)
    }

    #[test]
    fn test_solver_config() {
        let config = SolverConfig::default()
            .with_tolerance(1e-8)
            .with_max_evaluations(50);

        assert_relative_eq!(config.tolerance, 1e-8);
        assert_eq!(config.max_evaluations, 50);
    }

    #[test]
    fn test_every_kind_finds_sqrt_2() {
        for kind in [SolverKind::Brent, SolverKind::NewtonSafe, SolverKind::Bisection] {
            let result = kind
                .solve(square_minus_two, 1.5, 1.0, 2.0, &SolverConfig::default())
                .unwrap();
            assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-11);
        }
    }

    #[test]
    fn test_objective_error_propagates() {
        #[derive(Debug, PartialEq)]
        enum Failure {
            Objective,
            Math,
        }
        impl From<MathError> for Failure {
            fn from(_: MathError) -> Self {
                Failure::Math
            }
        }

        let f = |x: f64| if x > 1.9 { Err(Failure::Objective) } else { Ok(x - 1.0) };
        let err = SolverKind::Brent
            .solve(f, 1.5, 0.0, 2.0, &SolverConfig::default())
            .unwrap_err();
        assert_eq!(err, Failure::Objective);
    }

    #[test]
    fn test_reversed_range_rejected() {
        let err = brent(square_minus_two, 1.5, 2.0, 1.0, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, MathError::InvalidInput { .. }));
    }

    #[test]
    fn test_kind_serde_and_display() {
        let json = serde_json::to_string(&SolverKind::NewtonSafe).unwrap();
        assert_eq!(json, "\"NewtonSafe\"");
        let kind: SolverKind = serde_json::from_str(&json).unwrap();
        assert_eq!(kind.to_string(), "NewtonSafe");
    }
}
