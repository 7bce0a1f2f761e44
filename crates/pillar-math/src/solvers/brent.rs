//! Brent's root-finding algorithm.

use crate::error::MathError;
use crate::solvers::{check_bracket, SolverConfig, SolverResult};

/// Brent's method on a bracket.
///
/// Combines bisection with secant and inverse quadratic steps. Stops when
/// the root is located within `config.tolerance` or the objective is
/// exactly zero.
///
/// The guess must lie in `[lower, upper]`; Brent itself starts from the
/// bracket ends.
///
/// Requires `f(lower) * f(upper) < 0`.
///
/// # Example
///
/// ```rust
/// use pillar_math::solvers::{brent, SolverConfig};
/// use pillar_math::MathError;
///
/// let f = |x: f64| Ok::<_, MathError>(x.sin());
/// let result = brent(f, 3.0, 3.0, 4.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::PI).abs() < 1e-12);
/// ```
pub fn brent<F, E>(
    mut f: F,
    guess: f64,
    lower: f64,
    upper: f64,
    config: &SolverConfig,
) -> Result<SolverResult, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<MathError>,
{
    let (mut f_min, mut f_max, found) = check_bracket(&mut f, lower, upper)?;
    if let Some(root) = found {
        return Ok(SolverResult {
            root,
            iterations: 2,
            residual: 0.0,
        });
    }
    if !(lower..=upper).contains(&guess) {
        return Err(MathError::invalid_input(format!(
            "guess ({guess}) outside range [{lower}, {upper}]"
        ))
        .into());
    }

    let accuracy = config.effective_tolerance();
    let mut x_min = lower;
    let mut x_max = upper;
    let mut root = x_max;
    let mut f_root = f_max;
    let mut d = 0.0;
    let mut e = 0.0;
    let mut evaluations = 2;

    while evaluations <= config.max_evaluations {
        if (f_root > 0.0 && f_max > 0.0) || (f_root < 0.0 && f_max < 0.0) {
            // root and x_max no longer bracket: take x_min as the other end
            x_max = x_min;
            f_max = f_min;
            d = root - x_min;
            e = d;
        }
        if f_max.abs() < f_root.abs() {
            x_min = root;
            root = x_max;
            x_max = x_min;
            f_min = f_root;
            f_root = f_max;
            f_max = f_min;
        }

        let tolerance = 2.0 * f64::EPSILON * root.abs() + 0.5 * accuracy;
        let x_mid = (x_max - root) / 2.0;
        if x_mid.abs() <= tolerance || f_root == 0.0 {
            return Ok(SolverResult {
                root,
                iterations: evaluations,
                residual: f_root,
            });
        }

        if e.abs() >= tolerance && f_min.abs() > f_root.abs() {
            let s = f_root / f_min;
            let mut p;
            let mut q;
            if x_min == x_max {
                p = 2.0 * x_mid * s;
                q = 1.0 - s;
            } else {
                let qq = f_min / f_max;
                let r = f_root / f_max;
                p = s * (2.0 * x_mid * qq * (qq - r) - (root - x_min) * (r - 1.0));
                q = (qq - 1.0) * (r - 1.0) * (s - 1.0);
            }
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * x_mid * q - (tolerance * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = x_mid;
                e = d;
            }
        } else {
            d = x_mid;
            e = d;
        }

        x_min = root;
        f_min = f_root;
        if d.abs() > tolerance {
            root += d;
        } else {
            root += tolerance.copysign(x_mid);
        }
        f_root = f(root)?;
        evaluations += 1;
    }

    log::debug!(
        "brent exhausted {} evaluations on [{lower}, {upper}], best {root} (f = {f_root:.3e})",
        config.max_evaluations
    );
    Err(MathError::convergence_failed(config.max_evaluations, f_root.abs()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ok(value: f64) -> Result<f64, MathError> {
        Ok(value)
    }

    #[test]
    fn test_sqrt_2() {
        let result = brent(|x| ok(x * x - 2.0), 1.5, 1.0, 2.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn test_cubic() {
        let f = |x: f64| x * x * x - x - 2.0;
        let result = brent(|x| ok(f(x)), 1.5, 1.0, 2.0, &SolverConfig::default()).unwrap();
        assert!(f(result.root).abs() < 1e-10);
        assert_relative_eq!(result.root, 1.521_379_706_804_568, epsilon = 1e-10);
    }

    #[test]
    fn test_discount_factor_like_objective() {
        // exp(-r t) = 0.9 at t = 2
        let target = 0.9_f64;
        let result = brent(
            |df| ok(df - target),
            0.95,
            (-2.0_f64).exp(),
            1.0,
            &SolverConfig::default(),
        )
        .unwrap();
        assert_relative_eq!(result.root, target, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_bracket() {
        let result = brent(|x| ok(x * x - 2.0), 2.5, 2.0, 3.0, &SolverConfig::default());
        assert!(matches!(result, Err(MathError::InvalidBracket { .. })));
    }

    #[test]
    fn test_guess_outside_range() {
        let result = brent(|x| ok(x * x - 2.0), 5.0, 1.0, 2.0, &SolverConfig::default());
        assert!(matches!(result, Err(MathError::InvalidInput { .. })));
    }

    #[test]
    fn test_root_at_bound() {
        let result = brent(|x| ok(x - 1.0), 1.5, 1.0, 2.0, &SolverConfig::default()).unwrap();
        assert_eq!(result.root, 1.0);
    }

    #[test]
    fn test_evaluation_cap() {
        let config = SolverConfig::new(1e-15, 4);
        let result = brent(|x| ok(x.powi(3) - 0.3), 0.5, 0.0, 1.0, &config);
        assert!(matches!(result, Err(MathError::ConvergenceFailed { iterations: 4, .. })));
    }

    #[test]
    fn test_few_evaluations() {
        let result = brent(|x| ok(x * x - 2.0), 1.5, 1.0, 2.0, &SolverConfig::default()).unwrap();
        assert!(result.iterations < 15);
    }
}
