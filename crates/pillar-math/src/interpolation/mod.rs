//! Interpolation methods for curve construction.
//!
//! # Available Methods
//!
//! - [`LinearInterpolator`]: straight lines between nodes
//! - [`LogLinearInterpolator`]: linear in `ln(y)`, keeps discount factors positive
//! - [`BackwardFlatInterpolator`]: piecewise constant, value taken from the right node
//! - [`CubicInterpolator`]: piecewise cubic with a choice of derivative
//!   approximation, boundary conditions and the Hyman monotonicity filter
//!
//! [`InterpolationMethod`] is the closed set of choices a curve can be
//! configured with; it builds the matching interpolator over a node set.
//!
//! # Choosing an Interpolation Method
//!
//! | Method | Smoothness | Local | Typical use |
//! |--------|------------|-------|-------------|
//! | Linear | C0 | Yes | Zero rates |
//! | Log-Linear | C0 | Yes | Discount factors (flat forwards) |
//! | Backward-Flat | none | Yes | Instantaneous forwards |
//! | Cubic spline | C2 | No | Smooth forwards |
//! | Monotonic cubic | C1 | No | Smooth forwards without spurious oscillation |
//!
//! All interpolators fail with [`MathError::ExtrapolationNotAllowed`] outside
//! `[min_x, max_x]` unless built with extrapolation, in which case the end
//! segments are extended.

mod backward_flat;
mod cubic;
mod linear;
mod log_linear;

pub use backward_flat::BackwardFlatInterpolator;
pub use cubic::{CubicBoundary, CubicDerivative, CubicInterpolator};
pub use linear::LinearInterpolator;
pub use log_linear::LogLinearInterpolator;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MathError, MathResult};

/// Trait for interpolation methods.
///
/// All interpolation methods implement this trait, providing a unified
/// interface for curve construction.
pub trait Interpolator: Send + Sync + fmt::Debug {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the first derivative at x.
    fn derivative(&self, x: f64) -> MathResult<f64>;

    /// Returns the integral of the interpolant from `min_x` to `x`.
    fn primitive(&self, x: f64) -> MathResult<f64>;

    /// Returns true if extrapolation is allowed.
    fn allows_extrapolation(&self) -> bool {
        false
    }

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

/// The interpolation schemes a curve can be built with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum InterpolationMethod {
    /// Linear interpolation.
    Linear,
    /// Log-linear interpolation.
    #[default]
    LogLinear,
    /// Backward-flat (piecewise constant) interpolation.
    BackwardFlat,
    /// General piecewise cubic.
    Cubic {
        /// How node derivatives are obtained.
        derivative: CubicDerivative,
        /// Left boundary condition.
        left: CubicBoundary,
        /// Right boundary condition.
        right: CubicBoundary,
        /// Apply the Hyman monotonicity filter.
        monotonic: bool,
    },
    /// Natural cubic spline (zero second derivative at both ends).
    NaturalCubic,
    /// Natural cubic spline with the Hyman monotonicity filter.
    MonotonicCubic,
    /// Kruger's local cubic with natural ends.
    KrugerCubic,
}

impl InterpolationMethod {
    /// Not-a-knot cubic spline, optionally with the monotonicity filter.
    #[must_use]
    pub fn not_a_knot_spline(monotonic: bool) -> Self {
        InterpolationMethod::Cubic {
            derivative: CubicDerivative::Spline,
            left: CubicBoundary::NotAKnot,
            right: CubicBoundary::NotAKnot,
            monotonic,
        }
    }

    /// Resolves the named cubic shortcuts into their full parameters.
    fn cubic_parameters(&self) -> Option<(CubicDerivative, CubicBoundary, CubicBoundary, bool)> {
        let natural = CubicBoundary::SecondDerivative(0.0);
        match *self {
            InterpolationMethod::Cubic {
                derivative,
                left,
                right,
                monotonic,
            } => Some((derivative, left, right, monotonic)),
            InterpolationMethod::NaturalCubic => {
                Some((CubicDerivative::Spline, natural, natural, false))
            }
            InterpolationMethod::MonotonicCubic => {
                Some((CubicDerivative::Spline, natural, natural, true))
            }
            InterpolationMethod::KrugerCubic => {
                Some((CubicDerivative::Kruger, natural, natural, false))
            }
            InterpolationMethod::Linear
            | InterpolationMethod::LogLinear
            | InterpolationMethod::BackwardFlat => None,
        }
    }

    /// Builds an interpolator over the given nodes.
    ///
    /// # Errors
    ///
    /// Fails on fewer than [`required_points`](Self::required_points) nodes,
    /// mismatched lengths, non-increasing x values, or non-positive values
    /// for log-linear.
    pub fn build(
        &self,
        xs: Vec<f64>,
        ys: Vec<f64>,
        extrapolate: bool,
    ) -> MathResult<Box<dyn Interpolator>> {
        let interpolator: Box<dyn Interpolator> = match self {
            InterpolationMethod::Linear => {
                let interp = LinearInterpolator::new(xs, ys)?;
                Box::new(if extrapolate { interp.with_extrapolation() } else { interp })
            }
            InterpolationMethod::LogLinear => {
                let interp = LogLinearInterpolator::new(xs, ys)?;
                Box::new(if extrapolate { interp.with_extrapolation() } else { interp })
            }
            InterpolationMethod::BackwardFlat => {
                let interp = BackwardFlatInterpolator::new(xs, ys)?;
                Box::new(if extrapolate { interp.with_extrapolation() } else { interp })
            }
            _ => {
                let Some((derivative, left, right, monotonic)) = self.cubic_parameters() else {
                    return Err(MathError::invalid_input("not a cubic scheme"));
                };
                let interp = CubicInterpolator::new(xs, ys, derivative, left, right, monotonic)?;
                Box::new(if extrapolate { interp.with_extrapolation() } else { interp })
            }
        };
        Ok(interpolator)
    }

    /// True if moving one node can change the curve away from its two
    /// neighbouring segments.
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.cubic_parameters().is_some()
    }

    /// Minimum number of nodes the scheme needs.
    #[must_use]
    pub fn required_points(&self) -> usize {
        2
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpolationMethod::Linear => write!(f, "Linear"),
            InterpolationMethod::LogLinear => write!(f, "LogLinear"),
            InterpolationMethod::BackwardFlat => write!(f, "BackwardFlat"),
            InterpolationMethod::Cubic {
                derivative,
                monotonic,
                ..
            } => {
                if *monotonic {
                    write!(f, "Cubic({derivative:?}, monotonic)")
                } else {
                    write!(f, "Cubic({derivative:?})")
                }
            }
            InterpolationMethod::NaturalCubic => write!(f, "NaturalCubic"),
            InterpolationMethod::MonotonicCubic => write!(f, "MonotonicCubic"),
            InterpolationMethod::KrugerCubic => write!(f, "KrugerCubic"),
        }
    }
}

/// Checks node arrays shared by every interpolator.
pub(crate) fn validate_points(xs: &[f64], ys: &[f64], required: usize) -> MathResult<()> {
    if xs.len() < required {
        return Err(MathError::insufficient_data(required, xs.len()));
    }
    if xs.len() != ys.len() {
        return Err(MathError::invalid_input(format!(
            "xs and ys must have same length: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input("nodes must be finite"));
    }
    if xs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(MathError::invalid_input(
            "x values must be strictly increasing",
        ));
    }
    Ok(())
}

/// Index `i` of the segment `[xs[i], xs[i+1]]` used for `x`, clamped to the
/// first and last segments.
pub(crate) fn locate(xs: &[f64], x: f64) -> usize {
    let i = xs.partition_point(|&v| v <= x);
    i.saturating_sub(1).min(xs.len() - 2)
}

/// Rejects NaN and, without extrapolation, points outside the node range.
pub(crate) fn check_range(xs: &[f64], x: f64, allow_extrapolation: bool) -> MathResult<()> {
    if x.is_nan() {
        return Err(MathError::invalid_input("cannot interpolate at NaN"));
    }
    let min = xs[0];
    let max = xs[xs.len() - 1];
    if !allow_extrapolation && (x < min || x > max) {
        return Err(MathError::ExtrapolationNotAllowed { x, min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn all_methods() -> Vec<InterpolationMethod> {
        vec![
            InterpolationMethod::Linear,
            InterpolationMethod::LogLinear,
            InterpolationMethod::NaturalCubic,
            InterpolationMethod::MonotonicCubic,
            InterpolationMethod::KrugerCubic,
            InterpolationMethod::not_a_knot_spline(false),
            InterpolationMethod::Cubic {
                derivative: CubicDerivative::FritschButland,
                left: CubicBoundary::NotAKnot,
                right: CubicBoundary::NotAKnot,
                monotonic: false,
            },
            InterpolationMethod::Cubic {
                derivative: CubicDerivative::Parabolic,
                left: CubicBoundary::FirstDerivative(0.0),
                right: CubicBoundary::NotAKnot,
                monotonic: true,
            },
        ]
    }

    #[test]
    fn test_all_interpolators_through_points() {
        let times = vec![0.0, 0.5, 1.0, 2.0, 3.0, 5.0];
        let dfs: Vec<f64> = times.iter().map(|t: &f64| (-0.03 * t - 0.001 * t * t).exp()).collect();

        for method in all_methods() {
            let interp = method.build(times.clone(), dfs.clone(), false).unwrap();
            for (t, df) in times.iter().zip(dfs.iter()) {
                assert_relative_eq!(interp.interpolate(*t).unwrap(), *df, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_primitive_matches_midpoint_sum() {
        let xs = vec![0.0, 1.0, 2.5, 4.0];
        let ys = vec![0.02, 0.025, 0.031, 0.029];

        for method in all_methods() {
            let interp = method.build(xs.clone(), ys.clone(), false).unwrap();
            let n = 40_000;
            let h = 4.0 / f64::from(n);
            let numeric: f64 = (0..n)
                .map(|k| interp.interpolate((f64::from(k) + 0.5) * h).unwrap() * h)
                .sum();
            assert_relative_eq!(interp.primitive(4.0).unwrap(), numeric, epsilon = 1e-9);
            assert_relative_eq!(interp.primitive(0.0).unwrap(), 0.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_global_flag() {
        assert!(!InterpolationMethod::LogLinear.is_global());
        assert!(!InterpolationMethod::Linear.is_global());
        assert!(!InterpolationMethod::BackwardFlat.is_global());
        assert!(InterpolationMethod::MonotonicCubic.is_global());
        assert!(InterpolationMethod::not_a_knot_spline(true).is_global());
    }

    #[test]
    fn test_extrapolation_flag_respected() {
        let xs = vec![0.0, 1.0, 2.0];
        let ys = vec![1.0, 0.98, 0.95];
        for method in all_methods() {
            let strict = method.build(xs.clone(), ys.clone(), false).unwrap();
            assert!(matches!(
                strict.interpolate(2.5),
                Err(MathError::ExtrapolationNotAllowed { .. })
            ));
            let loose = method.build(xs.clone(), ys.clone(), true).unwrap();
            assert!(loose.interpolate(2.5).is_ok());
            assert!(loose.allows_extrapolation());
        }
    }

    #[test]
    fn test_nan_rejected() {
        let interp = InterpolationMethod::Linear
            .build(vec![0.0, 1.0], vec![0.0, 1.0], true)
            .unwrap();
        assert!(interp.interpolate(f64::NAN).is_err());
    }

    #[test]
    fn test_locate() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(locate(&xs, -1.0), 0);
        assert_eq!(locate(&xs, 0.0), 0);
        assert_eq!(locate(&xs, 1.0), 1);
        assert_eq!(locate(&xs, 2.9), 2);
        assert_eq!(locate(&xs, 3.0), 2);
        assert_eq!(locate(&xs, 10.0), 2);
    }

    #[test]
    fn test_method_serde() {
        let method = InterpolationMethod::MonotonicCubic;
        let json = serde_json::to_string(&method).unwrap();
        let back: InterpolationMethod = serde_json::from_str(&json).unwrap();
        assert_eq!(back, method);
    }
}
