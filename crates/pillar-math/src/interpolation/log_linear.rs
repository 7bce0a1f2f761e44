//! Log-linear interpolation.
//!
//! Interpolates the logarithm of values. On discount factors this gives
//! piecewise-constant instantaneous forwards and keeps every value positive.

use super::{check_range, locate, validate_points};
use crate::error::{MathError, MathResult};
use crate::interpolation::Interpolator;

/// Log-linear interpolation between data points.
///
/// ```text
/// y(x) = exp(linear_interpolate(x, ln(y)))
/// ```
///
/// # Example
///
/// ```rust
/// use pillar_math::interpolation::{LogLinearInterpolator, Interpolator};
///
/// let times = vec![0.0, 1.0, 2.0, 3.0];
/// let discount_factors = vec![1.0, 0.97, 0.94, 0.91];
///
/// let interp = LogLinearInterpolator::new(times, discount_factors).unwrap();
/// let df = interp.interpolate(1.5).unwrap();
/// assert!(df > 0.94 && df < 0.97);
/// ```
#[derive(Debug, Clone)]
pub struct LogLinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    log_ys: Vec<f64>,
    /// Slope of `ln(y)` per segment.
    log_slopes: Vec<f64>,
    primitive_at_node: Vec<f64>,
    allow_extrapolation: bool,
}

impl LogLinearInterpolator {
    /// Creates a new log-linear interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - There are fewer than 2 points
    /// - Lengths differ or x values are not strictly increasing
    /// - Any y value is non-positive
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_points(&xs, &ys, 2)?;

        if let Some((i, y)) = ys.iter().enumerate().find(|(_, &y)| y <= 0.0) {
            return Err(MathError::invalid_input(format!(
                "log-linear interpolation requires positive values, y[{i}] = {y}"
            )));
        }

        let log_ys: Vec<f64> = ys.iter().map(|y| y.ln()).collect();
        let log_slopes: Vec<f64> = xs
            .windows(2)
            .zip(log_ys.windows(2))
            .map(|(x, l)| (l[1] - l[0]) / (x[1] - x[0]))
            .collect();

        let mut interp = Self {
            xs,
            ys,
            log_ys,
            log_slopes,
            primitive_at_node: Vec::new(),
            allow_extrapolation: false,
        };

        let mut acc = vec![0.0];
        for i in 1..interp.xs.len() {
            let area = interp.segment_integral(i - 1, interp.xs[i] - interp.xs[i - 1]);
            acc.push(acc[i - 1] + area);
        }
        interp.primitive_at_node = acc;

        Ok(interp)
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    fn value_in_segment(&self, i: usize, dx: f64) -> f64 {
        (self.log_ys[i] + self.log_slopes[i] * dx).exp()
    }

    /// Integral of the segment-`i` exponential from its left node over `dx`.
    fn segment_integral(&self, i: usize, dx: f64) -> f64 {
        let s = self.log_slopes[i];
        if s.abs() < 1e-12 {
            // Series expansion avoids cancellation for nearly flat segments
            self.ys[i] * dx * (1.0 + 0.5 * s * dx)
        } else {
            (self.value_in_segment(i, dx) - self.ys[i]) / s
        }
    }
}

impl Interpolator for LogLinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;
        let i = locate(&self.xs, x);
        Ok(self.value_in_segment(i, x - self.xs[i]))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;
        let i = locate(&self.xs, x);
        Ok(self.value_in_segment(i, x - self.xs[i]) * self.log_slopes[i])
    }

    fn primitive(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;
        let i = locate(&self.xs, x);
        Ok(self.primitive_at_node[i] + self.segment_integral(i, x - self.xs[i]))
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
