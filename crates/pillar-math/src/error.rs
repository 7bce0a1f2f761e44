//! Errors raised by interpolators and root finders.

use thiserror::Error;

/// Result alias for numerical routines.
pub type MathResult<T> = Result<T, MathError>;

/// Failure of a numerical routine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// The solver ran out of evaluations.
    #[error("no root within {iterations} evaluations, last residual {residual:.2e}")]
    ConvergenceFailed {
        /// Evaluations spent.
        iterations: u32,
        /// Objective value at the last iterate.
        residual: f64,
    },

    /// The objective has the same sign at both ends of the search range.
    #[error("root not bracketed on [{lower}, {upper}]: f = {f_lower:.2e} and {f_upper:.2e}")]
    InvalidBracket {
        /// Lower end of the range.
        lower: f64,
        /// Upper end of the range.
        upper: f64,
        /// Objective at `lower`.
        f_lower: f64,
        /// Objective at `upper`.
        f_upper: f64,
    },

    /// A tridiagonal solve met a vanishing pivot.
    #[error("singular system: pivot {pivot:.2e} in row {row}")]
    SingularSystem {
        /// Row of the pivot.
        row: usize,
        /// Pivot value.
        pivot: f64,
    },

    /// Query outside the nodes of an interpolator built without extrapolation.
    #[error("{x} is outside [{min}, {max}] and extrapolation is off")]
    ExtrapolationNotAllowed {
        /// Query point.
        x: f64,
        /// First node.
        min: f64,
        /// Last node.
        max: f64,
    },

    /// Too few nodes for the scheme.
    #[error("{actual} node(s) given, at least {required} needed")]
    InsufficientData {
        /// Nodes the scheme needs.
        required: usize,
        /// Nodes supplied.
        actual: usize,
    },

    /// Anything else wrong with the inputs.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong.
        reason: String,
    },
}

impl MathError {
    /// Evaluation budget exhausted.
    #[must_use]
    pub fn convergence_failed(iterations: u32, residual: f64) -> Self {
        Self::ConvergenceFailed {
            iterations,
            residual,
        }
    }

    /// No sign change between `lower` and `upper`.
    #[must_use]
    pub fn not_bracketed(lower: f64, upper: f64, f_lower: f64, f_upper: f64) -> Self {
        Self::InvalidBracket {
            lower,
            upper,
            f_lower,
            f_upper,
        }
    }

    /// Bad input, described by `reason`.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Fewer than `required` nodes.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }
}
