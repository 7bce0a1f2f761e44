//! Piecewise yield curve rebuilt lazily from live quotes.
//!
//! The curve registers with every helper. A quote change only raises a
//! dirty flag; the next query re-runs the bootstrap. A failed rebuild
//! returns its error and leaves the flag raised, while the previous
//! successful build stays available through
//! [`last_good`](PiecewiseYieldCurve::last_good).

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use pillar_core::daycounts::DayCountConvention;
use pillar_core::observer::{Observer, ObserverList};
use pillar_core::types::Date;
use pillar_math::interpolation::InterpolationMethod;

use crate::bootstrap::{sort_helpers, BootstrapReport, BootstrappedCurve, IterativeBootstrap};
use crate::config::{BootstrapConfig, CurveConfig};
use crate::curves::InterpolatedCurve;
use crate::error::CurveResult;
use crate::helpers::RateHelperRef;
use crate::term_structure::YieldCurve;
use crate::traits::CurveTrait;

/// Dirty flag shared with the helpers' quotes.
struct Invalidation {
    dirty: AtomicBool,
    observers: ObserverList,
}

impl Observer for Invalidation {
    fn update(&self) {
        if !self.dirty.swap(true, Ordering::AcqRel) {
            tracing::debug!("curve invalidated by a quote change");
        }
        self.observers.notify();
    }
}

/// A yield curve bootstrapped from rate helpers.
///
/// ```rust
/// use std::sync::Arc;
///
/// use pillar_core::prelude::*;
/// use pillar_curves::prelude::*;
///
/// let today = Date::from_ymd(2001, 11, 6).unwrap();
/// let quote = SimpleQuote::shared(0.0363);
/// let index = IborIndex::euribor(Period::months(3));
/// let deposit = DepositRateHelper::from_index(Arc::clone(&quote), &index, today).unwrap();
///
/// let curve = PiecewiseYieldCurve::builder(today)
///     .helper(Arc::new(deposit))
///     .build()
///     .unwrap();
/// let before = curve.discount(Date::from_ymd(2002, 2, 8).unwrap()).unwrap();
///
/// quote.set_value(0.04);
/// assert!(curve.is_dirty());
/// let after = curve.discount(Date::from_ymd(2002, 2, 8).unwrap()).unwrap();
/// assert!(after < before);
/// ```
pub struct PiecewiseYieldCurve {
    reference_date: Date,
    day_count: DayCountConvention,
    method: InterpolationMethod,
    curve_trait: CurveTrait,
    helpers: Vec<RateHelperRef>,
    bootstrap: IterativeBootstrap,
    max_date: Date,
    extrapolate: AtomicBool,
    invalidation: Arc<Invalidation>,
    handle: Weak<dyn Observer>,
    built: RwLock<Option<Arc<BootstrappedCurve>>>,
    building: Mutex<()>,
}

impl PiecewiseYieldCurve {
    /// Creates a curve; nothing is solved until the first query.
    ///
    /// Helpers are sorted by pillar and the curve registers with each of
    /// them, so any quote change marks it dirty. The curve covers dates up
    /// to the latest date of any helper.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `config` fails validation (`InvalidConfig`)
    /// - the helper set cannot define a curve (see
    ///   [`sort_helpers`](crate::bootstrap::sort_helpers))
    ///
    /// Numerical failures surface later, from the first query.
    pub fn new(
        reference_date: Date,
        helpers: Vec<RateHelperRef>,
        day_count: DayCountConvention,
        method: InterpolationMethod,
        curve_trait: CurveTrait,
        config: BootstrapConfig,
    ) -> CurveResult<Self> {
        config.validate()?;
        let helpers = sort_helpers(reference_date, &helpers)?;
        let max_date = helpers
            .iter()
            .map(|h| h.latest_date())
            .max()
            .unwrap_or(reference_date);

        let invalidation = Arc::new(Invalidation {
            dirty: AtomicBool::new(true),
            observers: ObserverList::new(),
        });
        let handle: Weak<dyn Observer> = Arc::downgrade(&invalidation) as Weak<dyn Observer>;
        for helper in &helpers {
            helper.register_observer(handle.clone());
        }

        Ok(Self {
            reference_date,
            day_count,
            method,
            curve_trait,
            helpers,
            bootstrap: IterativeBootstrap::new(config),
            max_date,
            extrapolate: AtomicBool::new(false),
            invalidation,
            handle,
            built: RwLock::new(None),
            building: Mutex::new(()),
        })
    }

    /// Starts a builder with default settings.
    #[must_use]
    pub fn builder(reference_date: Date) -> PiecewiseYieldCurveBuilder {
        PiecewiseYieldCurveBuilder::new(CurveConfig::new(reference_date))
    }

    /// Creates a curve from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn from_config(config: &CurveConfig, helpers: Vec<RateHelperRef>) -> CurveResult<Self> {
        PiecewiseYieldCurveBuilder::new(*config).helpers(helpers).build()
    }

    /// The current build, bootstrapping first if needed.
    ///
    /// Concurrent callers on a dirty curve wait for a single rebuild. A
    /// quote change during the build leaves the curve dirty again.
    ///
    /// # Errors
    ///
    /// Returns any error of
    /// [`IterativeBootstrap::bootstrap`](crate::bootstrap::IterativeBootstrap::bootstrap).
    /// The curve then stays dirty and [`last_good`](Self::last_good) keeps
    /// the previous build.
    pub fn bootstrapped(&self) -> CurveResult<Arc<BootstrappedCurve>> {
        if !self.is_dirty() {
            if let Some(built) = self.built.read().as_ref() {
                return Ok(Arc::clone(built));
            }
        }

        let _building = self.building.lock();
        if !self.is_dirty() {
            if let Some(built) = self.built.read().as_ref() {
                return Ok(Arc::clone(built));
            }
        }

        // cleared first so that a quote change during the build re-raises it
        self.invalidation.dirty.store(false, Ordering::Release);
        match self.bootstrap.bootstrap(
            self.reference_date,
            self.day_count,
            &self.helpers,
            self.method,
            self.curve_trait,
        ) {
            Ok(built) => {
                let built = Arc::new(built);
                *self.built.write() = Some(Arc::clone(&built));
                Ok(built)
            }
            Err(e) => {
                self.invalidation.dirty.store(true, Ordering::Release);
                tracing::warn!(error = %e, "curve bootstrap failed");
                Err(e)
            }
        }
    }

    /// Forces a rebuild now.
    ///
    /// # Errors
    ///
    /// Returns the bootstrap error if the rebuild fails.
    pub fn recalculate(&self) -> CurveResult<()> {
        self.invalidation.dirty.store(true, Ordering::Release);
        self.bootstrapped().map(|_| ())
    }

    /// True when a quote changed since the last successful build.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.invalidation.dirty.load(Ordering::Acquire)
    }

    /// The most recent successful build, even if stale.
    #[must_use]
    pub fn last_good(&self) -> Option<Arc<BootstrappedCurve>> {
        self.built.read().clone()
    }

    /// A frozen copy of the current build, independent of later quote
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns the bootstrap error if the curve is dirty and cannot be
    /// rebuilt.
    pub fn snapshot(&self) -> CurveResult<InterpolatedCurve> {
        Ok(self
            .bootstrapped()?
            .curve()
            .rebuilt()?
            .with_extrapolation(self.allows_extrapolation()))
    }

    /// `(date, value)` pairs of the current build.
    pub fn nodes(&self) -> CurveResult<Vec<(Date, f64)>> {
        Ok(self.bootstrapped()?.curve().nodes())
    }

    /// Node dates of the current build.
    pub fn dates(&self) -> CurveResult<Vec<Date>> {
        Ok(self.bootstrapped()?.curve().dates().to_vec())
    }

    /// Node times of the current build.
    pub fn times(&self) -> CurveResult<Vec<f64>> {
        Ok(self.bootstrapped()?.curve().times().to_vec())
    }

    /// Node values of the current build.
    pub fn data(&self) -> CurveResult<Vec<f64>> {
        Ok(self.bootstrapped()?.curve().data().to_vec())
    }

    /// Report of the current build.
    pub fn report(&self) -> CurveResult<BootstrapReport> {
        Ok(self.bootstrapped()?.report().clone())
    }

    /// Helpers in pillar order.
    #[must_use]
    pub fn helpers(&self) -> &[RateHelperRef] {
        &self.helpers
    }

    /// Allows or forbids queries past the max date.
    pub fn enable_extrapolation(&self, enable: bool) {
        self.extrapolate.store(enable, Ordering::Release);
    }

    /// Interpolation scheme.
    #[must_use]
    pub fn interpolation(&self) -> InterpolationMethod {
        self.method
    }

    /// Quantity stored at the nodes.
    #[must_use]
    pub fn curve_trait(&self) -> CurveTrait {
        self.curve_trait
    }
}

impl YieldCurve for PiecewiseYieldCurve {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    fn max_date(&self) -> Date {
        self.max_date
    }

    fn allows_extrapolation(&self) -> bool {
        self.extrapolate.load(Ordering::Acquire)
    }

    fn discount_impl(&self, t: f64) -> CurveResult<f64> {
        self.bootstrapped()?.curve().discount_impl(t)
    }

    fn instantaneous_forward(&self, t: f64) -> CurveResult<f64> {
        self.check_range(t)?;
        self.bootstrapped()?.curve().forward_impl(t)
    }

    fn register_observer(&self, observer: Weak<dyn Observer>) {
        self.invalidation.observers.register(observer);
    }

    fn unregister_observer(&self, observer: &Weak<dyn Observer>) {
        self.invalidation.observers.unregister(observer);
    }
}

impl Drop for PiecewiseYieldCurve {
    fn drop(&mut self) {
        for helper in &self.helpers {
            helper.unregister_observer(&self.handle);
        }
    }
}

impl fmt::Debug for PiecewiseYieldCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PiecewiseYieldCurve")
            .field("reference_date", &self.reference_date)
            .field("helpers", &self.helpers.len())
            .field("interpolation", &self.method)
            .field("curve_trait", &self.curve_trait)
            .field("max_date", &self.max_date)
            .field("dirty", &self.is_dirty())
            .finish_non_exhaustive()
    }
}

/// Builder for [`PiecewiseYieldCurve`].
#[derive(Debug, Clone)]
pub struct PiecewiseYieldCurveBuilder {
    config: CurveConfig,
    helpers: Vec<RateHelperRef>,
}

impl PiecewiseYieldCurveBuilder {
    /// Starts from `config` with no helpers.
    #[must_use]
    pub fn new(config: CurveConfig) -> Self {
        Self {
            config,
            helpers: Vec::new(),
        }
    }

    /// Adds one helper.
    #[must_use]
    pub fn helper(mut self, helper: RateHelperRef) -> Self {
        self.helpers.push(helper);
        self
    }

    /// Adds helpers.
    #[must_use]
    pub fn helpers(mut self, helpers: impl IntoIterator<Item = RateHelperRef>) -> Self {
        self.helpers.extend(helpers);
        self
    }

    /// Sets the day count of curve time.
    #[must_use]
    pub fn day_count(mut self, day_count: DayCountConvention) -> Self {
        self.config.day_count = day_count;
        self
    }

    /// Sets the interpolation.
    #[must_use]
    pub fn interpolation(mut self, method: InterpolationMethod) -> Self {
        self.config.interpolation = method;
        self
    }

    /// Sets the node quantity.
    #[must_use]
    pub fn curve_trait(mut self, curve_trait: CurveTrait) -> Self {
        self.config.curve_trait = curve_trait;
        self
    }

    /// Sets the bootstrap settings.
    #[must_use]
    pub fn bootstrap_config(mut self, config: BootstrapConfig) -> Self {
        self.config.bootstrap = config;
        self
    }

    /// Allows queries past the max date.
    #[must_use]
    pub fn extrapolate(mut self, extrapolate: bool) -> Self {
        self.config.extrapolate = extrapolate;
        self
    }

    /// Validates and creates the curve.
    ///
    /// # Errors
    ///
    /// Same as [`PiecewiseYieldCurve::new`].
    pub fn build(self) -> CurveResult<PiecewiseYieldCurve> {
        let curve = PiecewiseYieldCurve::new(
            self.config.reference_date,
            self.helpers,
            self.config.day_count,
            self.config.interpolation,
            self.config.curve_trait,
            self.config.bootstrap,
        )?;
        curve.enable_extrapolation(self.config.extrapolate);
        Ok(curve)
    }
}
