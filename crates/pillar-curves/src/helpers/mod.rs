//! Rate helpers: calibration instruments for the bootstrap.
//!
//! A helper wraps a live market quote and reprices its instrument off a
//! trial curve. The bootstrap moves one curve node until the implied quote
//! matches the market quote, so each helper also says where its node goes
//! (its pillar) and how far its cash flows reach.
//!
//! # Available Helpers
//!
//! ## Money Market
//! - [`DepositRateHelper`]: deposits from overnight to one year
//! - [`FraRateHelper`]: forward rate agreements
//! - [`FuturesRateHelper`]: IMM-dated three-month futures
//!
//! ## Swaps
//! - [`OisRateHelper`]: overnight indexed swaps by tenor
//! - [`DatedOisRateHelper`]: overnight indexed swaps with explicit dates
//! - [`SwapRateHelper`]: fixed-for-Ibor swaps, optionally discounted off
//!   another curve
//!
//! Every helper guarantees `earliest <= pillar <= latest` once built.

mod deposit;
mod fra;
mod futures;
mod ois;
mod swap;

pub use deposit::DepositRateHelper;
pub use fra::FraRateHelper;
pub use futures::{is_imm_date, next_imm_date, FuturesRateHelper};
pub use ois::{DatedOisRateHelper, OisConventions, OisRateHelper};
pub use swap::SwapRateHelper;

use std::fmt;
use std::sync::{Arc, Weak};

use pillar_core::observer::Observer;
use pillar_core::quote::SimpleQuote;
use pillar_core::types::Date;
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};
use crate::term_structure::YieldCurve;

/// Helper type for categorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HelperKind {
    /// Money market deposit.
    Deposit,
    /// Forward rate agreement.
    Fra,
    /// Short-term interest rate future.
    Futures,
    /// Overnight indexed swap quoted by tenor.
    Ois,
    /// Overnight indexed swap with explicit dates.
    DatedOis,
    /// Fixed-for-floating swap.
    Swap,
}

impl fmt::Display for HelperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HelperKind::Deposit => "Deposit",
            HelperKind::Fra => "FRA",
            HelperKind::Futures => "Futures",
            HelperKind::Ois => "OIS",
            HelperKind::DatedOis => "DatedOIS",
            HelperKind::Swap => "Swap",
        };
        write!(f, "{name}")
    }
}

/// Where a helper's node is placed on the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Pillar {
    /// The instrument's maturity.
    MaturityDate,
    /// The last date the instrument's valuation reads off the curve.
    #[default]
    LastRelevantDate,
    /// A date chosen by the caller.
    CustomDate(Date),
}

/// Resolved dates shared by every helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelperDates {
    /// First date the instrument depends on.
    pub earliest: Date,
    /// Instrument maturity.
    pub maturity: Date,
    /// Last date read off the curve by the valuation.
    pub latest_relevant: Date,
    /// Node attachment date.
    pub pillar: Date,
    /// How the pillar was chosen.
    pub choice: Pillar,
}

impl HelperDates {
    /// Resolves the pillar and checks `earliest <= pillar <= latest`.
    pub fn resolve(
        description: &str,
        earliest: Date,
        maturity: Date,
        latest_relevant: Date,
        choice: Pillar,
    ) -> CurveResult<Self> {
        if maturity <= earliest {
            return Err(CurveError::invalid_helper(
                description,
                format!("maturity {maturity} is not after start {earliest}"),
            ));
        }
        let pillar = match choice {
            Pillar::MaturityDate => maturity,
            Pillar::LastRelevantDate => latest_relevant,
            Pillar::CustomDate(date) => date,
        };
        let dates = Self {
            earliest,
            maturity,
            latest_relevant,
            pillar,
            choice,
        };
        if pillar < earliest || pillar > dates.latest() {
            return Err(CurveError::invalid_helper(
                description,
                format!(
                    "pillar {pillar} outside [{earliest}, {}]",
                    dates.latest()
                ),
            ));
        }
        Ok(dates)
    }

    /// Same dates with another pillar choice.
    pub fn with_pillar(self, description: &str, choice: Pillar) -> CurveResult<Self> {
        Self::resolve(
            description,
            self.earliest,
            self.maturity,
            self.latest_relevant,
            choice,
        )
    }

    /// Later of maturity and last relevant date.
    #[must_use]
    pub fn latest(&self) -> Date {
        self.maturity.max(self.latest_relevant)
    }
}

/// A calibration instrument.
///
/// Implementors supply their dates and pricing; quote access, errors and
/// observer registration have defaults.
pub trait RateHelper: Send + Sync + fmt::Debug {
    /// Instrument category.
    fn kind(&self) -> HelperKind;

    /// The market quote.
    fn quote(&self) -> &Arc<SimpleQuote>;

    /// Resolved dates.
    fn dates(&self) -> &HelperDates;

    /// Human-readable label, e.g. `"6M deposit"`.
    fn description(&self) -> String;

    /// Quote implied by `curve`.
    fn implied_quote(&self, curve: &dyn YieldCurve) -> CurveResult<f64>;

    /// Current quote value.
    fn quote_value(&self) -> CurveResult<f64> {
        self.quote()
            .value()
            .filter(|v| v.is_finite())
            .ok_or_else(|| CurveError::invalid_quote(self.description(), self.pillar_date()))
    }

    /// Market quote minus implied quote.
    fn quote_error(&self, curve: &dyn YieldCurve) -> CurveResult<f64> {
        Ok(self.quote_value()? - self.implied_quote(curve)?)
    }

    /// First date the instrument depends on.
    fn earliest_date(&self) -> Date {
        self.dates().earliest
    }

    /// Instrument maturity.
    fn maturity_date(&self) -> Date {
        self.dates().maturity
    }

    /// Last date read off the curve by the valuation.
    fn latest_relevant_date(&self) -> Date {
        self.dates().latest_relevant
    }

    /// Node attachment date.
    fn pillar_date(&self) -> Date {
        self.dates().pillar
    }

    /// Later of maturity and last relevant date.
    fn latest_date(&self) -> Date {
        self.dates().latest()
    }

    /// Discount factor at the pillar implied by the quote alone, if the
    /// instrument has a closed form. `curve` holds the nodes solved so far.
    fn discount_guess(&self, _curve: Option<&dyn YieldCurve>) -> Option<f64> {
        None
    }

    /// Subscribes `observer` to everything the helper reads.
    fn register_observer(&self, observer: Weak<dyn Observer>) {
        self.quote().register_observer(observer);
    }

    /// Removes a subscription made with [`register_observer`](Self::register_observer).
    fn unregister_observer(&self, observer: &Weak<dyn Observer>) {
        self.quote().unregister_observer(observer);
    }
}

/// Shared handle to a rate helper.
pub type RateHelperRef = Arc<dyn RateHelper>;
