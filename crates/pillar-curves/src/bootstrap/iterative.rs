//! Iterative bootstrap over pillar-ordered helpers.
//!
//! The first pass walks the nodes in pillar order. Node `i` is solved on a
//! curve restricted to nodes `0..=i`, extrapolated flat-forward beyond, so
//! only helpers whose cash flows stop at their pillar reprice exactly after
//! it. When that does not hold for every helper, or when the interpolation
//! is global, refinement passes re-solve every node on the full node set
//! until nothing moves.
//!
//! A global scheme fitted to a prefix of the nodes reshapes every earlier
//! segment whenever a node is added, and on rate traits the extrapolated
//! tail can swing far enough that later nodes cannot be bracketed. The first
//! pass therefore solves on a local stand-in and the
//! refinement passes switch to the requested scheme.

use std::time::Instant;

use pillar_core::daycounts::{DayCount, DayCountConvention};
use pillar_core::types::Date;
use pillar_math::interpolation::InterpolationMethod;
use pillar_math::solvers::{SolverConfig, SolverKind};
use pillar_math::MathError;

use super::report::{BootstrapReport, GlobalIterationReason, RepricingCheck};
use crate::config::BootstrapConfig;
use crate::curves::InterpolatedCurve;
use crate::error::{CurveError, CurveResult};
use crate::helpers::{RateHelper, RateHelperRef};
use crate::term_structure::YieldCurve;
use crate::traits::CurveTrait;

/// A solved curve and how it was obtained.
///
/// The curve is frozen: it holds node values, not quotes, and does not
/// change when the helpers' quotes move.
#[derive(Debug)]
pub struct BootstrappedCurve {
    curve: InterpolatedCurve,
    report: BootstrapReport,
}

impl BootstrappedCurve {
    /// The solved curve, without extrapolation.
    #[must_use]
    pub fn curve(&self) -> &InterpolatedCurve {
        &self.curve
    }

    /// The build report.
    #[must_use]
    pub fn report(&self) -> &BootstrapReport {
        &self.report
    }

    /// Splits into curve and report.
    #[must_use]
    pub fn into_parts(self) -> (InterpolatedCurve, BootstrapReport) {
        (self.curve, self.report)
    }
}

/// Sorts helpers by pillar and checks they define a curve.
///
/// Pillars must be distinct and after `reference_date`; latest relevant
/// dates must increase along with the pillars. The input order does not
/// matter and the input slice is left untouched.
///
/// # Errors
///
/// Returns an error if:
/// - `helpers` is empty (`EmptyHelperSet`)
/// - the earliest pillar is on or before `reference_date` (`ReferenceAfterPillar`)
/// - two helpers share a pillar (`DuplicatePillar`)
/// - a later pillar does not extend the latest relevant date (`InvalidHelper`)
pub fn sort_helpers(reference_date: Date, helpers: &[RateHelperRef]) -> CurveResult<Vec<RateHelperRef>> {
    if helpers.is_empty() {
        return Err(CurveError::EmptyHelperSet);
    }
    let mut sorted = helpers.to_vec();
    sorted.sort_by_key(|h| h.pillar_date());

    let first = sorted[0].pillar_date();
    if first <= reference_date {
        return Err(CurveError::ReferenceAfterPillar {
            reference: reference_date,
            pillar: first,
        });
    }
    for pair in sorted.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if prev.pillar_date() == next.pillar_date() {
            return Err(CurveError::DuplicatePillar {
                date: next.pillar_date(),
                first: prev.description(),
                second: next.description(),
            });
        }
        if next.latest_relevant_date() <= prev.latest_relevant_date() {
            return Err(CurveError::invalid_helper(
                next.description(),
                format!(
                    "latest relevant date {} does not extend past {} of {}",
                    next.latest_relevant_date(),
                    prev.latest_relevant_date(),
                    prev.description()
                ),
            ));
        }
    }
    Ok(sorted)
}

/// The node grid shared by every trial curve of one build.
///
/// Node 0 sits at the reference date and node `i` at the pillar of helper
/// `i - 1`. Times are measured with the curve's own day count.
struct NodeGrid {
    reference_date: Date,
    day_count: DayCountConvention,
    method: InterpolationMethod,
    first_pass_method: InterpolationMethod,
    curve_trait: CurveTrait,
    dates: Vec<Date>,
    times: Vec<f64>,
    max_date: Date,
}

impl NodeGrid {
    fn new(
        reference_date: Date,
        day_count: DayCountConvention,
        method: InterpolationMethod,
        curve_trait: CurveTrait,
        helpers: &[RateHelperRef],
    ) -> CurveResult<Self> {
        let dates: Vec<Date> = std::iter::once(reference_date)
            .chain(helpers.iter().map(|h| h.pillar_date()))
            .collect();
        let times: Vec<f64> = dates
            .iter()
            .map(|&d| day_count.year_fraction(reference_date, d))
            .collect();
        if let Some(i) = (1..times.len()).find(|&i| times[i] <= times[i - 1]) {
            return Err(CurveError::invalid_helper(
                helpers[i - 1].description(),
                format!(
                    "pillar {} maps to time {} under {day_count:?}, not after the previous node",
                    dates[i], times[i]
                ),
            ));
        }
        let max_date = helpers
            .iter()
            .map(|h| h.latest_date())
            .max()
            .unwrap_or(reference_date);
        Ok(Self {
            reference_date,
            day_count,
            method,
            first_pass_method: first_pass_method(method, curve_trait),
            curve_trait,
            dates,
            times,
            max_date,
        })
    }

    /// Curve over nodes `0..=last` under `method`, extrapolating past them.
    fn trial(
        &self,
        method: InterpolationMethod,
        data: &[f64],
        last: usize,
    ) -> CurveResult<InterpolatedCurve> {
        Ok(self.curve(method, data, last)?.with_extrapolation(true))
    }

    fn curve(
        &self,
        method: InterpolationMethod,
        data: &[f64],
        last: usize,
    ) -> CurveResult<InterpolatedCurve> {
        InterpolatedCurve::from_nodes(
            self.reference_date,
            self.dates[..=last].to_vec(),
            self.times[..=last].to_vec(),
            data[..=last].to_vec(),
            self.day_count,
            method,
            self.curve_trait,
            self.max_date,
        )
    }

    /// Scheme used by trial curves of pass `pass`.
    fn method_for(&self, pass: usize) -> InterpolationMethod {
        if pass > 1 {
            self.method
        } else {
            self.first_pass_method
        }
    }

    fn last(&self) -> usize {
        self.dates.len() - 1
    }
}

/// Solves curve nodes so every helper reprices to its quote.
///
/// The bootstrapper holds settings only. Each call to
/// [`bootstrap`](Self::bootstrap) starts from scratch, so one instance can
/// serve any number of curves.
///
/// ```rust
/// use std::sync::Arc;
///
/// use pillar_core::prelude::*;
/// use pillar_curves::prelude::*;
/// use pillar_math::prelude::*;
///
/// let today = Date::from_ymd(2001, 11, 6).unwrap();
/// let helpers: Vec<RateHelperRef> = [(3, 0.0363), (6, 0.0353)]
///     .into_iter()
///     .map(|(months, rate)| {
///         let index = IborIndex::euribor(Period::months(months));
///         let deposit =
///             DepositRateHelper::from_index(SimpleQuote::shared(rate), &index, today).unwrap();
///         Arc::new(deposit) as RateHelperRef
///     })
///     .collect();
///
/// let built = IterativeBootstrap::default()
///     .bootstrap(
///         today,
///         DayCountConvention::Act365Fixed,
///         &helpers,
///         InterpolationMethod::LogLinear,
///         CurveTrait::Discount,
///     )
///     .unwrap();
/// assert_eq!(built.report().passes, 1);
/// assert!(built.report().all_within(1e-10));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IterativeBootstrap {
    config: BootstrapConfig,
}

impl IterativeBootstrap {
    /// Creates a bootstrapper.
    #[must_use]
    pub fn new(config: BootstrapConfig) -> Self {
        Self { config }
    }

    /// The settings in use.
    #[must_use]
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Builds a curve from `helpers`.
    ///
    /// Starts from the trait's seed values every time, so identical quotes
    /// give identical nodes.
    ///
    /// Refinement passes run when the settings force them, when `method`
    /// is global, or when a helper's cash flows extend past its pillar.
    /// [`BootstrapConfig::max_iterations`] caps the refinement passes; the
    /// sequential first pass is not counted.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the settings or the helper set are invalid (see [`sort_helpers`])
    /// - a helper's quote is unset or not finite (`InvalidQuote`)
    /// - a node cannot be solved in its bracket (`NodeSolveFailed`)
    /// - refinement passes hit the cap before converging (`GlobalConvergenceFailed`)
    /// - a helper misses its quote by more than the repricing tolerance
    ///   (`RepricingFailed`)
    pub fn bootstrap(
        &self,
        reference_date: Date,
        day_count: DayCountConvention,
        helpers: &[RateHelperRef],
        method: InterpolationMethod,
        curve_trait: CurveTrait,
    ) -> CurveResult<BootstrappedCurve> {
        let started = Instant::now();
        self.config.validate()?;
        let helpers = sort_helpers(reference_date, helpers)?;
        for helper in &helpers {
            helper.quote_value()?;
        }
        let grid = NodeGrid::new(reference_date, day_count, method, curve_trait, &helpers)?;
        let reason = self.global_iteration_reason(method, &helpers);

        tracing::info!(
            helpers = helpers.len(),
            interpolation = %method,
            curve_trait = %curve_trait,
            "bootstrapping curve"
        );
        if let Some(reason) = reason {
            tracing::debug!(%reason, "global iteration required");
        }

        let mut data = vec![curve_trait.initial_value(); grid.dates.len()];
        self.pass(1, &grid, &helpers, &mut data)?;

        let mut passes = 1;
        let mut max_node_change = None;
        if reason.is_some() {
            loop {
                let previous = data.clone();
                passes += 1;
                self.pass(passes, &grid, &helpers, &mut data)?;

                let change = data
                    .iter()
                    .zip(&previous)
                    .skip(1)
                    .map(|(a, b)| (a - b).abs())
                    .fold(0.0, f64::max);
                let error =
                    max_reprice_error(&grid.trial(method, &data, grid.last())?, &helpers)?;
                max_node_change = Some(change);
                tracing::debug!(pass = passes, max_change = change, max_error = error, "refinement pass");

                if change <= self.config.accuracy || error <= self.config.accuracy {
                    break;
                }
                // the sequential first pass does not count against the cap
                if passes - 1 >= self.config.max_iterations {
                    return Err(CurveError::GlobalConvergenceFailed {
                        passes,
                        max_change: change,
                        max_error: error,
                        accuracy: self.config.accuracy,
                    });
                }
            }
        }

        let curve = grid.curve(method, &data, grid.last())?;
        let checks = helpers
            .iter()
            .map(|h| RepricingCheck::run(h.as_ref(), &curve))
            .collect::<CurveResult<Vec<_>>>()?;
        let report = BootstrapReport {
            passes,
            global_iteration: reason,
            max_node_change,
            checks,
            elapsed: started.elapsed(),
        };

        if let Some(tolerance) = self.config.repricing_tolerance {
            if let Some(worst) = report.worst().filter(|c| c.error > tolerance) {
                tracing::warn!(helper = %worst.helper, error = worst.error, tolerance, "repricing check failed");
                return Err(CurveError::RepricingFailed {
                    helper: worst.helper.clone(),
                    pillar: worst.pillar,
                    quote: worst.quote,
                    implied: worst.implied,
                    tolerance,
                });
            }
        }

        tracing::info!(
            passes,
            max_error = report.max_error(),
            elapsed_us = report.elapsed.as_micros() as u64,
            "curve bootstrapped"
        );
        Ok(BootstrappedCurve { curve, report })
    }

    fn global_iteration_reason(
        &self,
        method: InterpolationMethod,
        helpers: &[RateHelperRef],
    ) -> Option<GlobalIterationReason> {
        if self.config.force_global_iteration {
            Some(GlobalIterationReason::Forced)
        } else if method.is_global() {
            Some(GlobalIterationReason::GlobalInterpolation)
        } else if helpers
            .iter()
            .any(|h| h.latest_relevant_date() != h.pillar_date())
        {
            Some(GlobalIterationReason::LatestRelevantDateAfterPillar)
        } else {
            None
        }
    }

    /// Solves every node once, in pillar order.
    ///
    /// Pass 1 starts from seeds and sees only earlier nodes; later passes
    /// start from the previous solution and see the whole grid.
    fn pass(
        &self,
        pass: usize,
        grid: &NodeGrid,
        helpers: &[RateHelperRef],
        data: &mut [f64],
    ) -> CurveResult<()> {
        let valid_data = pass > 1;
        let solver = if valid_data {
            self.config.refinement_solver
        } else {
            self.config.first_pass_solver
        };
        let solver_config = self.config.solver_config();
        for i in 1..=grid.last() {
            let helper = &helpers[i - 1];
            self.solve_node(i, grid, helper.as_ref(), data, pass, solver, &solver_config)
                .map_err(|e| node_failure(e, pass, i, helper.as_ref(), self.config.accuracy))?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn solve_node(
        &self,
        i: usize,
        grid: &NodeGrid,
        helper: &dyn RateHelper,
        data: &mut [f64],
        pass: usize,
        solver: SolverKind,
        solver_config: &SolverConfig,
    ) -> CurveResult<()> {
        let valid_data = pass > 1;
        let method = grid.method_for(pass);
        let curve_trait = grid.curve_trait;
        let allow_negative = self.config.allow_negative_rates;
        // in the first pass node i only sees the nodes before it
        let last = if valid_data { grid.last() } else { i };

        let discount_guess = if !valid_data && i >= 2 {
            let prefix = grid.trial(method, data, i - 1)?;
            helper.discount_guess(Some(&prefix))
        } else if !valid_data {
            helper.discount_guess(None)
        } else {
            None
        };
        let mut guess = curve_trait.guess(i, data, &grid.times, valid_data, discount_guess);
        let min = curve_trait.min_value_after(i, data, &grid.times, valid_data, allow_negative);
        let max = curve_trait.max_value_after(i, data, &grid.times, valid_data, allow_negative);
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(MathError::invalid_input(format!("empty search range [{min}, {max}]")).into());
        }
        if !guess.is_finite() || guess >= max {
            guess = max - (max - min) / 5.0;
        } else if guess <= min {
            guess = min + (max - min) / 5.0;
        }

        let result = solver.solve(
            |x| -> CurveResult<f64> {
                curve_trait.update_guess(data, x, i);
                let trial = grid.trial(method, data, last)?;
                helper.quote_error(&trial)
            },
            guess,
            min,
            max,
            solver_config,
        )?;
        curve_trait.update_guess(data, result.root, i);
        Ok(())
    }
}

/// Local scheme standing in for a global one during the first pass.
///
/// Discount nodes fall back to log-linear, rate nodes to linear. Local
/// schemes are returned unchanged.
fn first_pass_method(method: InterpolationMethod, curve_trait: CurveTrait) -> InterpolationMethod {
    if !method.is_global() {
        return method;
    }
    match curve_trait {
        CurveTrait::Discount => InterpolationMethod::LogLinear,
        CurveTrait::ZeroYield | CurveTrait::ForwardRate => InterpolationMethod::Linear,
    }
}

fn node_failure(
    error: CurveError,
    pass: usize,
    index: usize,
    helper: &dyn RateHelper,
    accuracy: f64,
) -> CurveError {
    if error.is_configuration() {
        return error;
    }
    CurveError::NodeSolveFailed {
        pass,
        index,
        helper: helper.description(),
        pillar: helper.pillar_date(),
        quote: helper.quote_value().unwrap_or(f64::NAN),
        accuracy,
        reason: error.to_string(),
    }
}

fn max_reprice_error(curve: &dyn YieldCurve, helpers: &[RateHelperRef]) -> CurveResult<f64> {
    helpers.iter().try_fold(0.0_f64, |worst, h| {
        Ok(worst.max(h.quote_error(curve)?.abs()))
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::helpers::{DepositRateHelper, FraRateHelper};
    use crate::indexes::IborIndex;
    use approx::assert_relative_eq;
    use pillar_core::calendars::{BusinessDayConvention, CalendarId};
    use pillar_core::quote::SimpleQuote;
    use pillar_core::types::Period;

    fn ymd(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn today() -> Date {
        ymd(2001, 11, 6)
    }

    fn deposit(months: i32, rate: f64) -> RateHelperRef {
        Arc::new(
            DepositRateHelper::new(
                SimpleQuote::shared(rate),
                Period::months(months),
                2,
                CalendarId::Target,
                BusinessDayConvention::ModifiedFollowing,
                true,
                DayCountConvention::Act360,
                today(),
            )
            .unwrap(),
        )
    }

    fn deposits() -> Vec<RateHelperRef> {
        vec![
            deposit(6, 0.0353),
            deposit(1, 0.0372),
            deposit(3, 0.0363),
            deposit(12, 0.0345),
        ]
    }

    #[test]
    fn test_deposits_reprice() {
        let built = IterativeBootstrap::default()
            .bootstrap(
                today(),
                DayCountConvention::Act365Fixed,
                &deposits(),
                InterpolationMethod::LogLinear,
                CurveTrait::Discount,
            )
            .unwrap();
        let report = built.report();
        assert_eq!(report.passes, 1);
        assert_eq!(report.global_iteration, None);
        assert!(report.all_within(1e-10));
        // nodes come out in pillar order
        assert_eq!(built.curve().dates()[1], ymd(2001, 12, 10));
        assert_eq!(built.curve().data()[0], 1.0);
    }

    #[test]
    fn test_each_trait_reprices() {
        for curve_trait in [CurveTrait::Discount, CurveTrait::ZeroYield, CurveTrait::ForwardRate] {
            let built = IterativeBootstrap::default()
                .bootstrap(
                    today(),
                    DayCountConvention::Act365Fixed,
                    &deposits(),
                    InterpolationMethod::Linear,
                    curve_trait,
                )
                .unwrap();
            for check in &built.report().checks {
                assert!(check.error < 1e-10, "{curve_trait}: {check}");
            }
        }
    }

    #[test]
    fn test_cubic_runs_refinement_passes() {
        let built = IterativeBootstrap::default()
            .bootstrap(
                today(),
                DayCountConvention::Act365Fixed,
                &deposits(),
                InterpolationMethod::MonotonicCubic,
                CurveTrait::Discount,
            )
            .unwrap();
        assert_eq!(
            built.report().global_iteration,
            Some(GlobalIterationReason::GlobalInterpolation)
        );
        assert!(built.report().passes >= 2);
        assert!(built.report().all_within(1e-10));
    }

    #[test]
    fn test_first_pass_uses_local_scheme() {
        use InterpolationMethod::*;
        assert_eq!(first_pass_method(LogLinear, CurveTrait::Discount), LogLinear);
        assert_eq!(first_pass_method(BackwardFlat, CurveTrait::ForwardRate), BackwardFlat);
        assert_eq!(first_pass_method(KrugerCubic, CurveTrait::Discount), LogLinear);
        assert_eq!(first_pass_method(MonotonicCubic, CurveTrait::ForwardRate), Linear);
        assert_eq!(first_pass_method(NaturalCubic, CurveTrait::ZeroYield), Linear);
    }

    #[test]
    fn test_cubic_forward_curve_keeps_requested_scheme() {
        let built = IterativeBootstrap::default()
            .bootstrap(
                today(),
                DayCountConvention::Act365Fixed,
                &deposits(),
                InterpolationMethod::NaturalCubic,
                CurveTrait::ForwardRate,
            )
            .unwrap();
        assert_eq!(built.curve().interpolation(), InterpolationMethod::NaturalCubic);
        assert!(built.report().passes >= 2);
        assert!(built.report().all_within(1e-10), "{}", built.report());
    }

    #[test]
    fn test_refinement_cap_excludes_first_pass() {
        let capped = IterativeBootstrap::new(BootstrapConfig::default().with_max_iterations(1))
            .bootstrap(
                today(),
                DayCountConvention::Act365Fixed,
                &deposits(),
                InterpolationMethod::MonotonicCubic,
                CurveTrait::Discount,
            );
        match capped {
            Err(CurveError::GlobalConvergenceFailed { passes, .. }) => assert_eq!(passes, 2),
            other => panic!("expected the cap to stop after one refinement, got {other:?}"),
        }
    }

    #[test]
    fn test_fra_after_deposit() {
        let index = IborIndex::euribor(Period::months(3));
        let helpers: Vec<RateHelperRef> = vec![
            deposit(3, 0.0363),
            Arc::new(
                FraRateHelper::new(SimpleQuote::shared(0.037), Period::months(3), index, today())
                    .unwrap(),
            ),
        ];
        let built = IterativeBootstrap::default()
            .bootstrap(
                today(),
                DayCountConvention::Act360,
                &helpers,
                InterpolationMethod::LogLinear,
                CurveTrait::Discount,
            )
            .unwrap();
        let fra = &built.report().checks[1];
        assert_relative_eq!(fra.implied, 0.037, epsilon = 1e-10);
    }

    #[test]
    fn test_rejects_bad_helper_sets() {
        let bootstrap = IterativeBootstrap::default();
        let run = |helpers: &[RateHelperRef]| {
            bootstrap.bootstrap(
                today(),
                DayCountConvention::Act365Fixed,
                helpers,
                InterpolationMethod::LogLinear,
                CurveTrait::Discount,
            )
        };
        assert!(matches!(run(&[]), Err(CurveError::EmptyHelperSet)));
        assert!(matches!(
            run(&[deposit(3, 0.0363), deposit(3, 0.0364)]),
            Err(CurveError::DuplicatePillar { .. })
        ));

        let late = bootstrap.bootstrap(
            ymd(2003, 1, 1),
            DayCountConvention::Act365Fixed,
            &deposits(),
            InterpolationMethod::LogLinear,
            CurveTrait::Discount,
        );
        assert!(matches!(late, Err(CurveError::ReferenceAfterPillar { .. })));
    }

    #[test]
    fn test_invalid_quote_is_reported() {
        let helpers = deposits();
        helpers[2].quote().reset();
        let result = IterativeBootstrap::default().bootstrap(
            today(),
            DayCountConvention::Act365Fixed,
            &helpers,
            InterpolationMethod::LogLinear,
            CurveTrait::Discount,
        );
        assert!(matches!(result, Err(CurveError::InvalidQuote { .. })));
    }

    #[test]
    fn test_unreachable_quote_names_the_helper() {
        // a 500% deposit is beyond the discount bounds of the first pass
        let helpers = vec![deposit(3, 0.0363), deposit(6, 5.0)];
        let err = IterativeBootstrap::new(BootstrapConfig::default().with_negative_rates(false))
            .bootstrap(
                today(),
                DayCountConvention::Act365Fixed,
                &helpers,
                InterpolationMethod::LogLinear,
                CurveTrait::Discount,
            )
            .unwrap_err();
        match err {
            CurveError::NodeSolveFailed { pass, index, helper, pillar, .. } => {
                assert_eq!(pass, 1);
                assert_eq!(index, 2);
                assert_eq!(helper, "6M deposit");
                assert_eq!(pillar, ymd(2002, 5, 8));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_idempotent_nodes() {
        let helpers = deposits();
        let bootstrap = IterativeBootstrap::default();
        let build = || {
            bootstrap
                .bootstrap(
                    today(),
                    DayCountConvention::Act365Fixed,
                    &helpers,
                    InterpolationMethod::LogLinear,
                    CurveTrait::Discount,
                )
                .unwrap()
        };
        assert_eq!(build().curve().data(), build().curve().data());
    }
}
