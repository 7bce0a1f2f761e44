//! Curve implementations.
//!
//! - [`FlatForward`]: one rate for every horizon, read from a quote
//! - [`InterpolatedCurve`]: fixed nodes under an interpolation scheme and a
//!   bootstrap trait; the frozen form of a piecewise curve

mod flat_forward;
mod interpolated;

pub use flat_forward::FlatForward;
pub use interpolated::InterpolatedCurve;
