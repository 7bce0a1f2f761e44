//! Linear interpolation.

use super::{check_range, locate, validate_points};
use crate::error::MathResult;
use crate::interpolation::Interpolator;

/// Linear interpolation between data points.
///
/// # Example
///
/// ```rust
/// use pillar_math::interpolation::{LinearInterpolator, Interpolator};
///
/// let xs = vec![0.0, 1.0, 2.0, 3.0];
/// let ys = vec![0.0, 1.0, 4.0, 9.0];
///
/// let interp = LinearInterpolator::new(xs, ys).unwrap();
/// assert_eq!(interp.interpolate(1.5).unwrap(), 2.5);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    slopes: Vec<f64>,
    /// Integral from `xs[0]` to `xs[i]`.
    primitive_at_node: Vec<f64>,
    allow_extrapolation: bool,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points, lengths differ or
    /// x values are not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_points(&xs, &ys, 2)?;

        let slopes: Vec<f64> = xs
            .windows(2)
            .zip(ys.windows(2))
            .map(|(x, y)| (y[1] - y[0]) / (x[1] - x[0]))
            .collect();

        let mut primitive_at_node = Vec::with_capacity(xs.len());
        primitive_at_node.push(0.0);
        for i in 1..xs.len() {
            let dx = xs[i] - xs[i - 1];
            let area = dx * (ys[i - 1] + 0.5 * dx * slopes[i - 1]);
            primitive_at_node.push(primitive_at_node[i - 1] + area);
        }

        Ok(Self {
            xs,
            ys,
            slopes,
            primitive_at_node,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;
        let i = locate(&self.xs, x);
        Ok(self.ys[i] + (x - self.xs[i]) * self.slopes[i])
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;
        Ok(self.slopes[locate(&self.xs, x)])
    }

    fn primitive(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;
        let i = locate(&self.xs, x);
        let dx = x - self.xs[i];
        Ok(self.primitive_at_node[i] + dx * (self.ys[i] + 0.5 * dx * self.slopes[i]))
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
