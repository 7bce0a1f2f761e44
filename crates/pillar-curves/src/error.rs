//! Error types for curve construction and queries.
//!
//! Three families, matching when they surface:
//!
//! - configuration errors, raised while validating helpers and settings
//! - convergence errors, raised by the bootstrap
//! - query errors, raised per call on a built curve

use pillar_core::types::Date;
use pillar_core::CoreError;
use pillar_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// No helpers were supplied.
    #[error("Cannot bootstrap a curve without rate helpers")]
    EmptyHelperSet,

    /// Two helpers share a pillar date.
    #[error("Duplicate pillar {date}: {first} and {second}")]
    DuplicatePillar {
        /// The shared pillar date.
        date: Date,
        /// First helper.
        first: String,
        /// Second helper.
        second: String,
    },

    /// A pillar is on or before the curve reference date.
    #[error("Pillar {pillar} is not after reference date {reference}")]
    ReferenceAfterPillar {
        /// Curve reference date.
        reference: Date,
        /// Offending pillar.
        pillar: Date,
    },

    /// A helper is inconsistent.
    #[error("Invalid helper {helper}: {reason}")]
    InvalidHelper {
        /// Helper description.
        helper: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A helper's quote has no usable value.
    #[error("Invalid quote for {helper} (pillar {pillar})")]
    InvalidQuote {
        /// Helper description.
        helper: String,
        /// Helper pillar.
        pillar: Date,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// The root finder could not solve for one node.
    #[error(
        "Pass {pass}: could not solve node {index} for {helper} (pillar {pillar}, quote {quote}, accuracy {accuracy:.1e}): {reason}"
    )]
    NodeSolveFailed {
        /// Pass number, starting at 1.
        pass: usize,
        /// Node index, starting at 1.
        index: usize,
        /// Helper description.
        helper: String,
        /// Helper pillar.
        pillar: Date,
        /// Quote the helper could not match.
        quote: f64,
        /// Requested accuracy.
        accuracy: f64,
        /// Underlying failure.
        reason: String,
    },

    /// Global re-iteration did not converge.
    #[error(
        "Global bootstrap did not converge after {passes} passes (node change {max_change:.2e}, reprice error {max_error:.2e}, accuracy {accuracy:.1e})"
    )]
    GlobalConvergenceFailed {
        /// Passes performed.
        passes: usize,
        /// Largest node change in the last pass.
        max_change: f64,
        /// Largest reprice error after the last pass.
        max_error: f64,
        /// Requested accuracy.
        accuracy: f64,
    },

    /// A helper does not reprice on the finished curve.
    #[error(
        "{helper} (pillar {pillar}) reprices to {implied} against quote {quote} (tolerance {tolerance:.1e})"
    )]
    RepricingFailed {
        /// Helper description.
        helper: String,
        /// Helper pillar.
        pillar: Date,
        /// Market quote.
        quote: f64,
        /// Implied quote on the finished curve.
        implied: f64,
        /// Allowed error.
        tolerance: f64,
    },

    /// Time beyond the curve range with extrapolation disabled.
    #[error("Time {t:.6} is beyond the curve's max time {max_time:.6}")]
    OutOfRange {
        /// Requested time.
        t: f64,
        /// Largest time the curve covers.
        max_time: f64,
    },

    /// Date beyond the curve range with extrapolation disabled.
    #[error("Date {date} is after the curve's max date {max_date}")]
    DateOutOfRange {
        /// Requested date.
        date: Date,
        /// Largest date the curve covers.
        max_date: Date,
    },

    /// Time before the reference date.
    #[error("Negative time {t:.6} is before the reference date")]
    NegativeTime {
        /// Requested time.
        t: f64,
    },

    /// Mathematical error.
    #[error(transparent)]
    Math(#[from] MathError),

    /// Date or calendar error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CurveError {
    /// Creates an invalid configuration error.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Creates an invalid helper error.
    #[must_use]
    pub fn invalid_helper(helper: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidHelper {
            helper: helper.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid quote error.
    #[must_use]
    pub fn invalid_quote(helper: impl Into<String>, pillar: Date) -> Self {
        Self::InvalidQuote {
            helper: helper.into(),
            pillar,
        }
    }

    /// True for errors that stem from inputs rather than from the numerics.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::EmptyHelperSet
                | Self::DuplicatePillar { .. }
                | Self::ReferenceAfterPillar { .. }
                | Self::InvalidHelper { .. }
                | Self::InvalidQuote { .. }
                | Self::InvalidConfig { .. }
        )
    }
}
