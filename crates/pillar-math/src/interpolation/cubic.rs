//! Piecewise cubic interpolation.
//!
//! Every cubic scheme here is Hermite: a first derivative is chosen at each
//! node, then each segment is the unique cubic matching both end values
//! and both end derivatives. Schemes differ in how the node derivatives are
//! obtained:
//!
//! - [`CubicDerivative::Spline`]: solve for C2 continuity (global, tridiagonal)
//! - [`CubicDerivative::Parabolic`]: slope of the parabola through three nodes
//! - [`CubicDerivative::FritschButland`]: weighted harmonic mean of slopes,
//!   zero at local extrema
//! - [`CubicDerivative::Kruger`]: harmonic mean of slopes, zero at local extrema
//!
//! The optional Hyman filter then clips node derivatives so that the
//! interpolant is monotonic wherever the data are.

use serde::{Deserialize, Serialize};

use super::{check_range, locate, validate_points};
use crate::error::{MathError, MathResult};
use crate::interpolation::Interpolator;

/// How first derivatives at the nodes are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CubicDerivative {
    /// Twice-differentiable spline.
    #[default]
    Spline,
    /// Three-point parabolic estimate.
    Parabolic,
    /// Fritsch-Butland (Brodlie) weighted harmonic mean.
    FritschButland,
    /// Kruger's harmonic mean.
    Kruger,
}

/// Condition imposed at one end of the node range.
///
/// `NotAKnot` and `SecondDerivative` only take part in the spline system;
/// the local schemes use their own end formulas unless a first derivative
/// is prescribed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CubicBoundary {
    /// Third derivative continuous across the second (or penultimate) node.
    NotAKnot,
    /// Prescribed first derivative.
    FirstDerivative(f64),
    /// Prescribed second derivative (zero gives the natural spline).
    SecondDerivative(f64),
}

impl Default for CubicBoundary {
    fn default() -> Self {
        CubicBoundary::SecondDerivative(0.0)
    }
}

/// Piecewise cubic Hermite interpolator.
///
/// # Example
///
/// ```rust
/// use pillar_math::interpolation::{CubicBoundary, CubicDerivative, CubicInterpolator, Interpolator};
///
/// let xs = vec![0.0, 1.0, 2.0, 3.0, 4.0];
/// let ys: Vec<f64> = xs.iter().map(|x: &f64| x.powi(3)).collect();
///
/// let spline = CubicInterpolator::new(
///     xs,
///     ys,
///     CubicDerivative::Spline,
///     CubicBoundary::NotAKnot,
///     CubicBoundary::NotAKnot,
///     false,
/// )
/// .unwrap();
///
/// // Not-a-knot reproduces a cubic exactly
/// assert!((spline.interpolate(2.5).unwrap() - 15.625).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct CubicInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    a: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    primitive_at_node: Vec<f64>,
    monotonicity_adjustments: Vec<bool>,
    allow_extrapolation: bool,
}

impl CubicInterpolator {
    /// Creates a cubic interpolator.
    ///
    /// With two nodes the interpolant is the straight line through them.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid nodes or a singular spline system.
    pub fn new(
        xs: Vec<f64>,
        ys: Vec<f64>,
        derivative: CubicDerivative,
        left: CubicBoundary,
        right: CubicBoundary,
        monotonic: bool,
    ) -> MathResult<Self> {
        validate_points(&xs, &ys, 2)?;
        let n = xs.len();

        let dx: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let s: Vec<f64> = ys
            .windows(2)
            .zip(dx.iter())
            .map(|(y, h)| (y[1] - y[0]) / h)
            .collect();

        let mut tmp = if n == 2 {
            vec![s[0], s[0]]
        } else {
            match derivative {
                CubicDerivative::Spline => spline_derivatives(&dx, &s, left, right)?,
                CubicDerivative::Parabolic => {
                    with_prescribed_ends(parabolic_derivatives(&dx, &s), left, right)
                }
                CubicDerivative::FritschButland => {
                    with_prescribed_ends(fritsch_butland_derivatives(&dx, &s), left, right)
                }
                CubicDerivative::Kruger => {
                    with_prescribed_ends(kruger_derivatives(&s), left, right)
                }
            }
        };

        let mut monotonicity_adjustments = vec![false; n];
        if monotonic && n > 2 {
            hyman_filter(&dx, &s, &mut tmp, &mut monotonicity_adjustments);
        }

        let mut a = Vec::with_capacity(n - 1);
        let mut b = Vec::with_capacity(n - 1);
        let mut c = Vec::with_capacity(n - 1);
        for i in 0..n - 1 {
            a.push(tmp[i]);
            b.push((3.0 * s[i] - tmp[i + 1] - 2.0 * tmp[i]) / dx[i]);
            c.push((tmp[i + 1] + tmp[i] - 2.0 * s[i]) / (dx[i] * dx[i]));
        }

        let mut primitive_at_node = vec![0.0];
        for i in 1..n {
            let h = dx[i - 1];
            let k = i - 1;
            let area = h * (ys[k] + h * (a[k] / 2.0 + h * (b[k] / 3.0 + h * c[k] / 4.0)));
            primitive_at_node.push(primitive_at_node[k] + area);
        }

        Ok(Self {
            xs,
            ys,
            a,
            b,
            c,
            primitive_at_node,
            monotonicity_adjustments,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    /// Second derivative at x.
    pub fn second_derivative(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;
        let i = locate(&self.xs, x);
        let d = x - self.xs[i];
        Ok(2.0 * self.b[i] + 6.0 * self.c[i] * d)
    }

    /// Which node derivatives the monotonicity filter changed.
    #[must_use]
    pub fn monotonicity_adjustments(&self) -> &[bool] {
        &self.monotonicity_adjustments
    }
}

impl Interpolator for CubicInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;
        let i = locate(&self.xs, x);
        let d = x - self.xs[i];
        Ok(self.ys[i] + d * (self.a[i] + d * (self.b[i] + d * self.c[i])))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;
        let i = locate(&self.xs, x);
        let d = x - self.xs[i];
        Ok(self.a[i] + d * (2.0 * self.b[i] + 3.0 * self.c[i] * d))
    }

    fn primitive(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;
        let i = locate(&self.xs, x);
        let d = x - self.xs[i];
        Ok(self.primitive_at_node[i]
            + d * (self.ys[i] + d * (self.a[i] / 2.0 + d * (self.b[i] / 3.0 + d * self.c[i] / 4.0))))
    }

    fn allows_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

/// Node derivatives of the C2 spline. Requires at least three nodes.
fn spline_derivatives(
    dx: &[f64],
    s: &[f64],
    left: CubicBoundary,
    right: CubicBoundary,
) -> MathResult<Vec<f64>> {
    let n = dx.len() + 1;

    // With three nodes both not-a-knot conditions coincide: the single
    // parabola through the nodes is the answer.
    if n == 3 && left == CubicBoundary::NotAKnot && right == CubicBoundary::NotAKnot {
        return Ok(parabolic_derivatives(dx, s));
    }

    let mut lower = vec![0.0; n];
    let mut diag = vec![0.0; n];
    let mut upper = vec![0.0; n];
    let mut rhs = vec![0.0; n];

    for i in 1..n - 1 {
        lower[i] = dx[i];
        diag[i] = 2.0 * (dx[i] + dx[i - 1]);
        upper[i] = dx[i - 1];
        rhs[i] = 3.0 * (dx[i] * s[i - 1] + dx[i - 1] * s[i]);
    }

    match left {
        CubicBoundary::NotAKnot => {
            diag[0] = dx[1] * (dx[1] + dx[0]);
            upper[0] = (dx[0] + dx[1]) * (dx[0] + dx[1]);
            rhs[0] = s[0] * dx[1] * (2.0 * dx[1] + 3.0 * dx[0]) + s[1] * dx[0] * dx[0];
        }
        CubicBoundary::FirstDerivative(value) => {
            diag[0] = 1.0;
            upper[0] = 0.0;
            rhs[0] = value;
        }
        CubicBoundary::SecondDerivative(value) => {
            diag[0] = 2.0;
            upper[0] = 1.0;
            rhs[0] = 3.0 * s[0] - value * dx[0] / 2.0;
        }
    }

    let last = n - 1;
    match right {
        CubicBoundary::NotAKnot => {
            let (h1, h2) = (dx[n - 3], dx[n - 2]);
            lower[last] = -(h2 + h1) * (h2 + h1);
            diag[last] = -h1 * (h1 + h2);
            rhs[last] = -s[n - 3] * h2 * h2 - s[n - 2] * h1 * (3.0 * h2 + 2.0 * h1);
        }
        CubicBoundary::FirstDerivative(value) => {
            lower[last] = 0.0;
            diag[last] = 1.0;
            rhs[last] = value;
        }
        CubicBoundary::SecondDerivative(value) => {
            lower[last] = 1.0;
            diag[last] = 2.0;
            rhs[last] = 3.0 * s[n - 2] + value * dx[n - 2] / 2.0;
        }
    }

    solve_tridiagonal(&lower, &diag, &upper, &rhs)
}

/// Thomas algorithm. `lower[0]` and `upper[n-1]` are ignored.
fn solve_tridiagonal(lower: &[f64], diag: &[f64], upper: &[f64], rhs: &[f64]) -> MathResult<Vec<f64>> {
    let n = diag.len();
    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];

    if diag[0].abs() < f64::EPSILON {
        return Err(MathError::SingularSystem { row: 0, pivot: diag[0] });
    }
    c_prime[0] = upper[0] / diag[0];
    d_prime[0] = rhs[0] / diag[0];

    for i in 1..n {
        let m = diag[i] - lower[i] * c_prime[i - 1];
        if m.abs() < f64::EPSILON {
            return Err(MathError::SingularSystem { row: i, pivot: m });
        }
        if i < n - 1 {
            c_prime[i] = upper[i] / m;
        }
        d_prime[i] = (rhs[i] - lower[i] * d_prime[i - 1]) / m;
    }

    let mut x = vec![0.0; n];
    x[n - 1] = d_prime[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d_prime[i] - c_prime[i] * x[i + 1];
    }
    Ok(x)
}

fn parabolic_derivatives(dx: &[f64], s: &[f64]) -> Vec<f64> {
    let n = dx.len() + 1;
    let mut tmp = vec![0.0; n];
    for i in 1..n - 1 {
        tmp[i] = (dx[i - 1] * s[i] + dx[i] * s[i - 1]) / (dx[i] + dx[i - 1]);
    }
    tmp[0] = ((2.0 * dx[0] + dx[1]) * s[0] - dx[0] * s[1]) / (dx[0] + dx[1]);
    tmp[n - 1] = ((2.0 * dx[n - 2] + dx[n - 3]) * s[n - 2] - dx[n - 2] * s[n - 3])
        / (dx[n - 2] + dx[n - 3]);
    tmp
}

fn fritsch_butland_derivatives(dx: &[f64], s: &[f64]) -> Vec<f64> {
    let n = dx.len() + 1;
    let mut tmp = parabolic_derivatives(dx, s);
    for i in 1..n - 1 {
        tmp[i] = if s[i - 1] * s[i] <= 0.0 {
            0.0
        } else {
            let alpha = (dx[i - 1] + 2.0 * dx[i]) / (3.0 * (dx[i - 1] + dx[i]));
            s[i - 1] * s[i] / (alpha * s[i] + (1.0 - alpha) * s[i - 1])
        };
    }
    if tmp[0] * s[0] < 0.0 {
        tmp[0] = 0.0;
    }
    if tmp[n - 1] * s[n - 2] < 0.0 {
        tmp[n - 1] = 0.0;
    }
    tmp
}

fn kruger_derivatives(s: &[f64]) -> Vec<f64> {
    let n = s.len() + 1;
    let mut tmp = vec![0.0; n];
    for i in 1..n - 1 {
        tmp[i] = if s[i - 1] * s[i] <= 0.0 {
            0.0
        } else {
            2.0 / (1.0 / s[i - 1] + 1.0 / s[i])
        };
    }
    tmp[0] = (3.0 * s[0] - tmp[1]) / 2.0;
    tmp[n - 1] = (3.0 * s[n - 2] - tmp[n - 2]) / 2.0;
    tmp
}

fn with_prescribed_ends(mut tmp: Vec<f64>, left: CubicBoundary, right: CubicBoundary) -> Vec<f64> {
    if let CubicBoundary::FirstDerivative(value) = left {
        tmp[0] = value;
    }
    if let CubicBoundary::FirstDerivative(value) = right {
        if let Some(last) = tmp.last_mut() {
            *last = value;
        }
    }
    tmp
}

/// Hyman (1983) monotonicity-preserving filter on node derivatives.
fn hyman_filter(dx: &[f64], s: &[f64], tmp: &mut [f64], adjusted: &mut [bool]) {
    let n = tmp.len();
    let clip = |value: f64, bound: f64| value.signum() * value.abs().min(bound);

    for i in 0..n {
        let correction = if i == 0 {
            if tmp[0] * s[0] > 0.0 {
                clip(tmp[0], (3.0 * s[0]).abs())
            } else {
                0.0
            }
        } else if i == n - 1 {
            if tmp[i] * s[n - 2] > 0.0 {
                clip(tmp[i], (3.0 * s[n - 2]).abs())
            } else {
                0.0
            }
        } else {
            let pm = (s[i - 1] * dx[i] + s[i] * dx[i - 1]) / (dx[i - 1] + dx[i]);
            let mut m = 3.0 * s[i - 1].abs().min(s[i].abs()).min(pm.abs());

            if i > 1 && (s[i - 1] - s[i - 2]) * (s[i] - s[i - 1]) > 0.0 {
                let pd = (s[i - 1] * (2.0 * dx[i - 1] + dx[i - 2]) - s[i - 2] * dx[i - 1])
                    / (dx[i - 2] + dx[i - 1]);
                if pm * pd > 0.0 && pm * (s[i - 1] - s[i - 2]) > 0.0 {
                    m = m.max(1.5 * pm.abs().min(pd.abs()));
                }
            }
            if i < n - 2 && (s[i] - s[i - 1]) * (s[i + 1] - s[i]) > 0.0 {
                let pu = (s[i] * (2.0 * dx[i] + dx[i + 1]) - s[i + 1] * dx[i]) / (dx[i] + dx[i + 1]);
                if pm * pu > 0.0 && -pm * (s[i] - s[i - 1]) > 0.0 {
                    m = m.max(1.5 * pm.abs().min(pu.abs()));
                }
            }

            if tmp[i] * pm > 0.0 {
                clip(tmp[i], m)
            } else {
                0.0
            }
        };

        if correction != tmp[i] {
            tmp[i] = correction;
            adjusted[i] = true;
        }
    }
}
