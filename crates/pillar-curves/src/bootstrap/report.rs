//! Audit trail of a bootstrap.

use std::fmt;
use std::time::Duration;

use pillar_core::types::Date;
use serde::{Deserialize, Serialize};

use crate::error::CurveResult;
use crate::helpers::{HelperKind, RateHelper};
use crate::term_structure::YieldCurve;

/// Why a bootstrap ran refinement passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlobalIterationReason {
    /// Requested by configuration.
    Forced,
    /// The interpolation couples every node to every other.
    GlobalInterpolation,
    /// Some helper reads the curve past its own pillar.
    LatestRelevantDateAfterPillar,
}

impl fmt::Display for GlobalIterationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GlobalIterationReason::Forced => "forced by configuration",
            GlobalIterationReason::GlobalInterpolation => "global interpolation",
            GlobalIterationReason::LatestRelevantDateAfterPillar => {
                "cash flows beyond a pillar"
            }
        };
        write!(f, "{text}")
    }
}

/// One helper repriced on the finished curve.
#[derive(Debug, Clone, PartialEq)]
pub struct RepricingCheck {
    /// Helper description.
    pub helper: String,
    /// Helper kind.
    pub kind: HelperKind,
    /// Pillar date.
    pub pillar: Date,
    /// Market quote.
    pub quote: f64,
    /// Quote implied by the curve.
    pub implied: f64,
    /// Absolute difference.
    pub error: f64,
}

impl RepricingCheck {
    /// Reprices `helper` on `curve`.
    pub fn run(helper: &dyn RateHelper, curve: &dyn YieldCurve) -> CurveResult<Self> {
        let quote = helper.quote_value()?;
        let implied = helper.implied_quote(curve)?;
        Ok(Self {
            helper: helper.description(),
            kind: helper.kind(),
            pillar: helper.pillar_date(),
            quote,
            implied,
            error: (implied - quote).abs(),
        })
    }
}

impl fmt::Display for RepricingCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<24} {} | quote {:.8} | implied {:.8} | error {:.2e}",
            self.helper, self.pillar, self.quote, self.implied, self.error
        )
    }
}

/// Summary of a finished bootstrap.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapReport {
    /// Passes over the node set.
    pub passes: usize,
    /// Why refinement passes ran, if they did.
    pub global_iteration: Option<GlobalIterationReason>,
    /// Largest node change in the last refinement pass.
    pub max_node_change: Option<f64>,
    /// Per-helper repricing on the finished curve.
    pub checks: Vec<RepricingCheck>,
    /// Wall time of the build.
    pub elapsed: Duration,
}

impl BootstrapReport {
    /// Largest reprice error.
    #[must_use]
    pub fn max_error(&self) -> f64 {
        self.checks.iter().map(|c| c.error).fold(0.0, f64::max)
    }

    /// The check with the largest error.
    #[must_use]
    pub fn worst(&self) -> Option<&RepricingCheck> {
        self.checks
            .iter()
            .max_by(|a, b| a.error.total_cmp(&b.error))
    }

    /// True when every helper reprices within `tolerance`.
    #[must_use]
    pub fn all_within(&self, tolerance: f64) -> bool {
        self.checks.iter().all(|c| c.error <= tolerance)
    }
}

impl fmt::Display for BootstrapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bootstrap Report")?;
        writeln!(f, "================")?;
        write!(f, "Passes: {}", self.passes)?;
        if let Some(reason) = self.global_iteration {
            write!(f, " ({reason})")?;
        }
        writeln!(f)?;
        if let Some(change) = self.max_node_change {
            writeln!(f, "Last node change: {change:.2e}")?;
        }
        writeln!(f, "Max reprice error: {:.2e}", self.max_error())?;
        writeln!(f, "Elapsed: {:?}", self.elapsed)?;
        writeln!(f)?;
        for check in &self.checks {
            writeln!(f, "  {check}")?;
        }
        Ok(())
    }
}
