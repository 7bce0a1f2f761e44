//! Safeguarded Newton iteration.

use crate::error::MathError;
use crate::solvers::{check_bracket, SolverConfig, SolverResult};

/// Relative bump for the finite-difference slope.
const BUMP: f64 = 1e-7;

/// Newton's method kept inside a bracket.
///
/// The slope is a forward finite difference, so each Newton step costs two
/// evaluations. Whenever the Newton step would leave the current bracket,
/// or would not shrink it fast enough, a bisection step is taken instead.
/// The bracket is tightened after every evaluation, so the iteration always
/// converges on continuous functions.
///
/// Requires `f(lower) * f(upper) < 0`; `guess` is clamped into the bracket.
///
/// # Example
///
/// ```rust
/// use pillar_math::solvers::{newton_safe, SolverConfig};
/// use pillar_math::MathError;
///
/// let f = |x: f64| Ok::<_, MathError>(x.exp() - 2.0);
/// let result = newton_safe(f, 0.5, 0.0, 1.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - 2.0_f64.ln()).abs() < 1e-12);
/// ```
pub fn newton_safe<F, E>(
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
    let (f_lower, _, found) = check_bracket(&mut f, lower, upper)?;
    if let Some(root) = found {
        return Ok(SolverResult {
            root,
            iterations: 2,
            residual: 0.0,
        });
    }

    let accuracy = config.effective_tolerance();

    // orient the bracket so that f(x_low) < 0
    let (mut x_low, mut x_high) = if f_lower < 0.0 { (lower, upper) } else { (upper, lower) };

    let mut root = guess.clamp(lower, upper);
    let mut dx_old = upper - lower;
    let mut dx = dx_old;
    let mut evaluations = 2;

    let (mut f_root, mut slope) = value_and_slope(&mut f, root)?;
    evaluations += 2;

    while evaluations <= config.max_evaluations {
        if f_root == 0.0 {
            return Ok(SolverResult {
                root,
                iterations: evaluations,
                residual: 0.0,
            });
        }

        let out_of_range = ((root - x_high) * slope - f_root) * ((root - x_low) * slope - f_root) > 0.0;
        let too_slow = (2.0 * f_root).abs() > (dx_old * slope).abs();
        dx_old = dx;
        if out_of_range || too_slow || slope == 0.0 {
            dx = (x_high - x_low) / 2.0;
            root = x_low + dx;
        } else {
            dx = f_root / slope;
            root -= dx;
        }

        if dx.abs() < accuracy {
            let residual = f(root)?;
            return Ok(SolverResult {
                root,
                iterations: evaluations + 1,
                residual,
            });
        }

        (f_root, slope) = value_and_slope(&mut f, root)?;
        evaluations += 2;

        if f_root < 0.0 {
            x_low = root;
        } else {
            x_high = root;
        }
    }

    log::debug!(
        "newton_safe exhausted {} evaluations on [{lower}, {upper}], best {root} (f = {f_root:.3e})",
        config.max_evaluations
    );
    Err(MathError::convergence_failed(config.max_evaluations, f_root.abs()).into())
}

fn value_and_slope<F, E>(f: &mut F, x: f64) -> Result<(f64, f64), E>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    let h = BUMP * x.abs().max(1e-4);
    let value = f(x)?;
    let bumped = f(x + h)?;
    Ok((value, (bumped - value) / h))
}
