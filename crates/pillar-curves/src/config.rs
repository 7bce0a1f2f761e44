//! Bootstrap and curve configuration.
//!
//! Both structs deserialize with per-field defaults, so a TOML or JSON
//! document only needs the values that differ from them.
//!
//! ```rust
//! use pillar_curves::config::CurveConfig;
//!
//! let config = CurveConfig::from_toml_str(
//!     r#"
//!     reference_date = "2001-11-06"
//!     day_count = "ActActIsda"
//!     interpolation = "LogLinear"
//!
//!     [bootstrap]
//!     accuracy = 1e-10
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.bootstrap.max_iterations, 100);
//! ```

use pillar_core::daycounts::DayCountConvention;
use pillar_core::types::Date;
use pillar_math::interpolation::InterpolationMethod;
use pillar_math::solvers::{SolverConfig, SolverKind};
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};
use crate::traits::CurveTrait;

fn default_accuracy() -> f64 {
    1.0e-12
}

fn default_max_iterations() -> usize {
    100
}

fn default_max_evaluations() -> u32 {
    100
}

#[allow(clippy::unnecessary_wraps)]
fn default_repricing_tolerance() -> Option<f64> {
    Some(1.0e-8)
}

fn default_true() -> bool {
    true
}

fn default_refinement_solver() -> SolverKind {
    SolverKind::NewtonSafe
}

/// Settings of the iterative bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Solver accuracy on node values and global stop tolerance.
    #[serde(default = "default_accuracy")]
    pub accuracy: f64,
    /// Cap on refinement passes run after the sequential first pass.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Cap on objective evaluations per node solve.
    #[serde(default = "default_max_evaluations")]
    pub max_evaluations: u32,
    /// Largest reprice error accepted on the finished curve; `None` skips
    /// the check.
    #[serde(default = "default_repricing_tolerance")]
    pub repricing_tolerance: Option<f64>,
    /// Always run refinement passes.
    #[serde(default)]
    pub force_global_iteration: bool,
    /// Lets discount nodes rise above the previous node.
    #[serde(default = "default_true")]
    pub allow_negative_rates: bool,
    /// Solver of the first pass.
    #[serde(default)]
    pub first_pass_solver: SolverKind,
    /// Solver of refinement passes.
    #[serde(default = "default_refinement_solver")]
    pub refinement_solver: SolverKind,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            accuracy: default_accuracy(),
            max_iterations: default_max_iterations(),
            max_evaluations: default_max_evaluations(),
            repricing_tolerance: default_repricing_tolerance(),
            force_global_iteration: false,
            allow_negative_rates: true,
            first_pass_solver: SolverKind::Brent,
            refinement_solver: default_refinement_solver(),
        }
    }
}

impl BootstrapConfig {
    /// Sets the accuracy.
    #[must_use]
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Sets the global pass cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the per-solve evaluation cap.
    #[must_use]
    pub fn with_max_evaluations(mut self, max_evaluations: u32) -> Self {
        self.max_evaluations = max_evaluations;
        self
    }

    /// Sets or disables the post-build repricing check.
    #[must_use]
    pub fn with_repricing_tolerance(mut self, tolerance: Option<f64>) -> Self {
        self.repricing_tolerance = tolerance;
        self
    }

    /// Forces refinement passes.
    #[must_use]
    pub fn with_forced_global_iteration(mut self, force: bool) -> Self {
        self.force_global_iteration = force;
        self
    }

    /// Allows or forbids increasing discount factors.
    #[must_use]
    pub fn with_negative_rates(mut self, allow: bool) -> Self {
        self.allow_negative_rates = allow;
        self
    }

    /// Sets the solvers of the first and refinement passes.
    #[must_use]
    pub fn with_solvers(mut self, first_pass: SolverKind, refinement: SolverKind) -> Self {
        self.first_pass_solver = first_pass;
        self.refinement_solver = refinement;
        self
    }

    /// Solver settings derived from this configuration.
    #[must_use]
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.accuracy, self.max_evaluations)
    }

    /// Checks the values are usable.
    pub fn validate(&self) -> CurveResult<()> {
        if !(self.accuracy.is_finite() && self.accuracy > 0.0) {
            return Err(CurveError::configuration(format!(
                "accuracy must be positive, got {}",
                self.accuracy
            )));
        }
        if self.max_iterations == 0 {
            return Err(CurveError::configuration("max_iterations must be at least 1"));
        }
        if self.max_evaluations < 3 {
            return Err(CurveError::configuration(format!(
                "max_evaluations must be at least 3, got {}",
                self.max_evaluations
            )));
        }
        if let Some(tolerance) = self.repricing_tolerance {
            if !(tolerance.is_finite() && tolerance > 0.0) {
                return Err(CurveError::configuration(format!(
                    "repricing_tolerance must be positive, got {tolerance}"
                )));
            }
        }
        Ok(())
    }
}

/// Everything a piecewise curve needs besides its helpers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveConfig {
    /// Curve reference date.
    pub reference_date: Date,
    /// Day count measuring curve time.
    #[serde(default = "default_day_count")]
    pub day_count: DayCountConvention,
    /// Interpolation of node values.
    #[serde(default)]
    pub interpolation: InterpolationMethod,
    /// Quantity stored at the nodes.
    #[serde(default)]
    pub curve_trait: CurveTrait,
    /// Allows queries beyond the last pillar.
    #[serde(default)]
    pub extrapolate: bool,
    /// Bootstrap settings.
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

fn default_day_count() -> DayCountConvention {
    DayCountConvention::Act365Fixed
}

impl CurveConfig {
    /// Configuration with defaults for everything but the reference date.
    #[must_use]
    pub fn new(reference_date: Date) -> Self {
        Self {
            reference_date,
            day_count: default_day_count(),
            interpolation: InterpolationMethod::default(),
            curve_trait: CurveTrait::default(),
            extrapolate: false,
            bootstrap: BootstrapConfig::default(),
        }
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> CurveResult<Self> {
        let config: Self = toml::from_str(s)
            .map_err(|e| CurveError::configuration(format!("invalid TOML: {e}")))?;
        config.bootstrap.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(s: &str) -> CurveResult<Self> {
        let config: Self = serde_json::from_str(s)
            .map_err(|e| CurveError::configuration(format!("invalid JSON: {e}")))?;
        config.bootstrap.validate()?;
        Ok(config)
    }

    /// Serializes to TOML.
    pub fn to_toml_string(&self) -> CurveResult<String> {
        toml::to_string(self).map_err(|e| CurveError::configuration(format!("TOML output: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BootstrapConfig::default();
        assert_eq!(config.accuracy, 1.0e-12);
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.repricing_tolerance, Some(1.0e-8));
        assert!(!config.force_global_iteration);
        assert!(config.allow_negative_rates);
        assert_eq!(config.first_pass_solver, SolverKind::Brent);
        assert_eq!(config.refinement_solver, SolverKind::NewtonSafe);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert!(BootstrapConfig::default().with_accuracy(0.0).validate().is_err());
        assert!(BootstrapConfig::default().with_accuracy(f64::NAN).validate().is_err());
        assert!(BootstrapConfig::default().with_max_iterations(0).validate().is_err());
        assert!(BootstrapConfig::default().with_max_evaluations(1).validate().is_err());
        assert!(BootstrapConfig::default()
            .with_repricing_tolerance(Some(-1.0))
            .validate()
            .is_err());
        assert!(BootstrapConfig::default()
            .with_repricing_tolerance(None)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_json_with_partial_bootstrap() {
        let config = CurveConfig::from_json_str(
            r#"{
                "reference_date": "2012-12-11",
                "day_count": "Act365Fixed",
                "curve_trait": "ZeroYield",
                "extrapolate": true,
                "bootstrap": { "force_global_iteration": true, "max_iterations": 20 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.curve_trait, CurveTrait::ZeroYield);
        assert!(config.extrapolate);
        assert!(config.bootstrap.force_global_iteration);
        assert_eq!(config.bootstrap.max_iterations, 20);
        assert_eq!(config.bootstrap.accuracy, 1.0e-12);
        assert_eq!(config.interpolation, InterpolationMethod::LogLinear);
    }

    #[test]
    fn test_invalid_values_are_configuration_errors() {
        let err = CurveConfig::from_json_str(
            r#"{ "reference_date": "2012-12-11", "bootstrap": { "accuracy": -1.0 } }"#,
        )
        .unwrap_err();
        assert!(err.is_configuration());

        let err = CurveConfig::from_toml_str("reference_date = 3").unwrap_err();
        assert!(matches!(err, CurveError::InvalidConfig { .. }));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = CurveConfig::new(Date::from_ymd(2001, 11, 6).unwrap());
        let text = config.to_toml_string().unwrap();
        assert_eq!(CurveConfig::from_toml_str(&text).unwrap(), config);
    }
}
