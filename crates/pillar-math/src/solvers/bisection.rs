//! Bisection root-finding algorithm.

use crate::error::MathError;
use crate::solvers::{check_bracket, SolverConfig, SolverResult};

/// Bisection on `[lower, upper]`.
///
/// Slow but needs nothing beyond a sign change. Each step halves the
/// bracket; the search stops once the bracket is narrower than
/// `config.tolerance`.
pub fn bisection<F, E>(
    mut f: F,
    lower: f64,
    upper: f64,
    config: &SolverConfig,
) -> Result<SolverResult, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<MathError>,
{
    let (f_lower, _, found) = check_bracket(&mut f, lower, upper)?;
    if let Some(root) = found {
        return Ok(SolverResult {
            root,
            iterations: 2,
            residual: 0.0,
        });
    }

    let accuracy = config.effective_tolerance();
    let (mut root, mut dx) = if f_lower < 0.0 {
        (lower, upper - lower)
    } else {
        (upper, lower - upper)
    };
    let mut evaluations = 2;

    while evaluations <= config.max_evaluations {
        dx /= 2.0;
        let mid = root + dx;
        let f_mid = f(mid)?;
        evaluations += 1;
        if f_mid <= 0.0 {
            root = mid;
        }
        if dx.abs() < accuracy || f_mid == 0.0 {
            return Ok(SolverResult {
                root,
                iterations: evaluations,
                residual: f_mid,
            });
        }
    }

    Err(MathError::convergence_failed(config.max_evaluations, dx.abs()).into())
}
