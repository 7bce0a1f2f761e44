//! Backward-flat interpolation.

use super::{check_range, locate, validate_points};
use crate::error::MathResult;
use crate::interpolation::Interpolator;

/// Piecewise-constant interpolation taking the value of the right-hand node.
///
/// On `(x[i], x[i+1]]` the value is `y[i+1]`; at and before `x[0]` it is
/// `y[0]`. Used for instantaneous forward curves where the forward quoted
/// at a pillar applies over the period ending there.
#[derive(Debug, Clone)]
pub struct BackwardFlatInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    primitive_at_node: Vec<f64>,
    allow_extrapolation: bool,
}

impl BackwardFlatInterpolator {
    /// Creates a new backward-flat interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points, lengths differ or
    /// x values are not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_points(&xs, &ys, 2)?;

        let mut primitive_at_node = vec![0.0];
        for i in 1..xs.len() {
            primitive_at_node.push(primitive_at_node[i - 1] + (xs[i] - xs[i - 1]) * ys[i]);
        }

        Ok(Self {
            xs,
            ys,
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

impl Interpolator for BackwardFlatInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;
        if x <= self.xs[0] {
            return Ok(self.ys[0]);
        }
        let i = locate(&self.xs, x);
        if x == self.xs[i] {
            Ok(self.ys[i])
        } else {
            Ok(self.ys[i + 1])
        }
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;
        Ok(0.0)
    }

    fn primitive(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;
        if x <= self.xs[0] {
            return Ok((x - self.xs[0]) * self.ys[0]);
        }
        let i = locate(&self.xs, x);
        Ok(self.primitive_at_node[i] + (x - self.xs[i]) * self.ys[i + 1])
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> BackwardFlatInterpolator {
        BackwardFlatInterpolator::new(vec![0.0, 1.0, 3.0], vec![0.01, 0.02, 0.04]).unwrap()
    }

    #[test]
    fn test_values_take_right_node() {
        let interp = sample();
        assert_relative_eq!(interp.interpolate(0.0).unwrap(), 0.01);
        assert_relative_eq!(interp.interpolate(0.5).unwrap(), 0.02);
        assert_relative_eq!(interp.interpolate(1.0).unwrap(), 0.02);
        assert_relative_eq!(interp.interpolate(1.0001).unwrap(), 0.04);
        assert_relative_eq!(interp.interpolate(3.0).unwrap(), 0.04);
        assert_relative_eq!(interp.derivative(2.0).unwrap(), 0.0);
    }

    #[test]
    fn test_primitive_is_step_area() {
        let interp = sample();
        assert_relative_eq!(interp.primitive(1.0).unwrap(), 0.02, epsilon = 1e-15);
        assert_relative_eq!(interp.primitive(2.0).unwrap(), 0.02 + 0.04, epsilon = 1e-15);
        assert_relative_eq!(interp.primitive(3.0).unwrap(), 0.02 + 0.08, epsilon = 1e-15);
    }

    #[test]
    fn test_extrapolation_stays_flat() {
        let interp = sample().with_extrapolation();
        assert_relative_eq!(interp.interpolate(10.0).unwrap(), 0.04);
        assert_relative_eq!(interp.primitive(4.0).unwrap(), 0.14, epsilon = 1e-15);
    }
}
