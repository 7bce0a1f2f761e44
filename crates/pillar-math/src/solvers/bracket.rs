//! Outward search for a sign change.

use crate::error::MathError;
use crate::solvers::SolverConfig;

const GROWTH: f64 = 1.6;

/// Expands `[guess - step, guess + step]` until `f` changes sign.
///
/// At each step the end with the smaller absolute value is pushed out by
/// 1.6 times the bracket width. Returns the bracket as `(lower, upper)`.
///
/// ```rust
/// use pillar_math::solvers::{bracket, SolverConfig};
/// use pillar_math::MathError;
///
/// let f = |x: f64| Ok::<_, MathError>(x - 10.0);
/// let (lo, hi) = bracket(f, 0.0, 0.5, &SolverConfig::default()).unwrap();
/// assert!(lo < 10.0 && hi > 10.0);
/// ```
pub fn bracket<F, E>(mut f: F, guess: f64, step: f64, config: &SolverConfig) -> Result<(f64, f64), E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<MathError>,
{
    if step <= 0.0 || !step.is_finite() {
        return Err(MathError::invalid_input(format!("bracket step must be positive, got {step}")).into());
    }

    let mut lower = guess - step;
    let mut upper = guess + step;
    let mut f_lower = f(lower)?;
    let mut f_upper = f(upper)?;
    let mut evaluations = 2;

    while evaluations < config.max_evaluations {
        if f_lower * f_upper <= 0.0 {
            log::trace!("bracketed root in [{lower}, {upper}] after {evaluations} evaluations");
            return Ok((lower, upper));
        }
        if f_lower.abs() < f_upper.abs() {
            lower += GROWTH * (lower - upper);
            f_lower = f(lower)?;
        } else {
            upper += GROWTH * (upper - lower);
            f_upper = f(upper)?;
        }
        evaluations += 1;
    }

    if f_lower * f_upper <= 0.0 {
        return Ok((lower, upper));
    }
    Err(MathError::not_bracketed(lower, upper, f_lower, f_upper).into())
}
