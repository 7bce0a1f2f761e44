//! Bootstrap traits: which quantity a node stores and how it is seeded.
//!
//! The bootstrapper is generic over the stored quantity. A trait decides the
//! node-0 value, the starting guess for each root search, the bracket handed
//! to the solver and how an interpolated node quantity turns into a
//! discount factor, including beyond the last node.

use std::fmt;

use pillar_math::interpolation::Interpolator;
use pillar_math::MathResult;
use serde::{Deserialize, Serialize};

/// Rate used to seed nodes before anything is known about the curve.
const AVERAGE_RATE: f64 = 0.05;

/// Largest rate magnitude the first-pass bounds allow.
const MAX_RATE: f64 = 1.0;

/// The quantity stored at each curve node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurveTrait {
    /// Discount factors.
    #[default]
    Discount,
    /// Continuously compounded zero rates.
    ZeroYield,
    /// Instantaneous continuously compounded forward rates.
    ForwardRate,
}

impl CurveTrait {
    /// Value of node 0, at the reference date.
    #[must_use]
    pub fn initial_value(&self) -> f64 {
        match self {
            CurveTrait::Discount => 1.0,
            CurveTrait::ZeroYield | CurveTrait::ForwardRate => AVERAGE_RATE,
        }
    }

    /// Starting point for the root search at node `i` (`i >= 1`).
    ///
    /// With `valid_data` the node array holds a complete previous solution
    /// and the node's own value is reused. Otherwise the guess extends the
    /// previous node, or takes `discount_guess` when the helper supplies one.
    #[must_use]
    pub fn guess(
        &self,
        i: usize,
        data: &[f64],
        times: &[f64],
        valid_data: bool,
        discount_guess: Option<f64>,
    ) -> f64 {
        if valid_data {
            return data[i];
        }
        if let Some(df) = discount_guess.filter(|df| df.is_finite() && *df > 0.0) {
            return match self {
                CurveTrait::Discount => df,
                CurveTrait::ZeroYield | CurveTrait::ForwardRate => -df.ln() / times[i],
            };
        }
        match self {
            CurveTrait::Discount => {
                if i == 1 {
                    1.0 / (1.0 + AVERAGE_RATE * times[1])
                } else {
                    let r = -data[i - 1].ln() / times[i - 1];
                    (-r * times[i]).exp()
                }
            }
            CurveTrait::ZeroYield | CurveTrait::ForwardRate => {
                if i == 1 {
                    AVERAGE_RATE
                } else {
                    data[i - 1]
                }
            }
        }
    }

    /// Lower end of the solver bracket for node `i`.
    #[must_use]
    pub fn min_value_after(
        &self,
        i: usize,
        data: &[f64],
        times: &[f64],
        valid_data: bool,
        allow_negative_rates: bool,
    ) -> f64 {
        match self {
            CurveTrait::Discount => {
                if valid_data {
                    min_of(data) / 2.0
                } else {
                    let dt = times[i] - times[i - 1];
                    data[i - 1] * (-MAX_RATE * dt).exp()
                }
            }
            CurveTrait::ZeroYield | CurveTrait::ForwardRate => {
                if valid_data {
                    let r = min_of(&data[1..]);
                    if r < 0.0 {
                        2.0 * r
                    } else {
                        r / 2.0
                    }
                } else if allow_negative_rates {
                    -MAX_RATE
                } else {
                    0.0
                }
            }
        }
    }

    /// Upper end of the solver bracket for node `i`.
    #[must_use]
    pub fn max_value_after(
        &self,
        i: usize,
        data: &[f64],
        times: &[f64],
        valid_data: bool,
        allow_negative_rates: bool,
    ) -> f64 {
        match self {
            CurveTrait::Discount => {
                if allow_negative_rates {
                    let dt = times[i] - times[i - 1];
                    data[i - 1] * (MAX_RATE * dt).exp()
                } else {
                    data[i - 1]
                }
            }
            CurveTrait::ZeroYield | CurveTrait::ForwardRate => {
                if valid_data {
                    let r = max_of(&data[1..]);
                    if r < 0.0 {
                        r / 2.0
                    } else {
                        2.0 * r
                    }
                } else {
                    MAX_RATE
                }
            }
        }
    }

    /// Writes a trial value into node `i`.
    ///
    /// Rate traits keep node 0 equal to node 1 so the short end is flat.
    pub fn update_guess(&self, data: &mut [f64], value: f64, i: usize) {
        data[i] = value;
        if i == 1 && *self != CurveTrait::Discount {
            data[0] = value;
        }
    }

    /// Discount factor at `t` from the interpolated node quantity.
    ///
    /// Past the last node the curve continues with a flat instantaneous
    /// forward equal to the one at the last node.
    pub fn discount(
        &self,
        interpolator: &dyn Interpolator,
        times: &[f64],
        values: &[f64],
        t: f64,
    ) -> MathResult<f64> {
        let (t_n, v_n) = last_node(times, values);
        if t <= t_n {
            return match self {
                CurveTrait::Discount => interpolator.interpolate(t),
                CurveTrait::ZeroYield => Ok((-interpolator.interpolate(t)? * t).exp()),
                CurveTrait::ForwardRate => Ok((-interpolator.primitive(t)?).exp()),
            };
        }
        let f_n = self.forward_at_last_node(interpolator, t_n, v_n)?;
        match self {
            CurveTrait::Discount => Ok(v_n * (-f_n * (t - t_n)).exp()),
            CurveTrait::ZeroYield => {
                let z = (v_n * t_n + f_n * (t - t_n)) / t;
                Ok((-z * t).exp())
            }
            CurveTrait::ForwardRate => {
                Ok((-(interpolator.primitive(t_n)? + f_n * (t - t_n))).exp())
            }
        }
    }

    /// Instantaneous forward at `t` from the interpolated node quantity.
    pub fn instantaneous_forward(
        &self,
        interpolator: &dyn Interpolator,
        times: &[f64],
        values: &[f64],
        t: f64,
    ) -> MathResult<f64> {
        let (t_n, v_n) = last_node(times, values);
        if t > t_n {
            return self.forward_at_last_node(interpolator, t_n, v_n);
        }
        match self {
            CurveTrait::Discount => Ok(-interpolator.derivative(t)? / interpolator.interpolate(t)?),
            CurveTrait::ZeroYield => {
                Ok(interpolator.interpolate(t)? + t * interpolator.derivative(t)?)
            }
            CurveTrait::ForwardRate => interpolator.interpolate(t),
        }
    }

    fn forward_at_last_node(
        &self,
        interpolator: &dyn Interpolator,
        t_n: f64,
        v_n: f64,
    ) -> MathResult<f64> {
        match self {
            CurveTrait::Discount => Ok(-interpolator.derivative(t_n)? / v_n),
            CurveTrait::ZeroYield => Ok(v_n + t_n * interpolator.derivative(t_n)?),
            CurveTrait::ForwardRate => Ok(v_n),
        }
    }
}

impl fmt::Display for CurveTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CurveTrait::Discount => "Discount",
            CurveTrait::ZeroYield => "ZeroYield",
            CurveTrait::ForwardRate => "ForwardRate",
        };
        write!(f, "{name}")
    }
}

fn last_node(times: &[f64], values: &[f64]) -> (f64, f64) {
    let n = times.len() - 1;
    (times[n], values[n])
}

fn min_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
