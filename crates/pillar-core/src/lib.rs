//! # Pillar Core
//!
//! Date and market-data building blocks for the Pillar curve library.
//!
//! - **Types**: [`Date`](types::Date), [`Period`](types::Period), [`Frequency`](types::Frequency)
//! - **Calendars**: business day rules and tenor rolling
//! - **Day Counts**: accrual fractions
//! - **Schedules**: coupon date generation for swap legs
//! - **Quotes**: observable market values with change notification
//! - **Observers**: weak-reference registries used for invalidation
//!
//! ## Example
//!
//! ```rust
//! use pillar_core::prelude::*;
//!
//! let today = Date::from_ymd(2001, 11, 6).unwrap();
//! let spot = CalendarId::Target.advance_business_days(today, 2);
//! assert_eq!(spot, Date::from_ymd(2001, 11, 8).unwrap());
//!
//! let maturity = CalendarId::Target
//!     .advance(spot, "6M".parse().unwrap(), BusinessDayConvention::ModifiedFollowing, false)
//!     .unwrap();
//! let tau = DayCountConvention::Act360.year_fraction(spot, maturity);
//! assert!(tau > 0.49 && tau < 0.52);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::trivially_copy_pass_by_ref)]

pub mod calendars;
pub mod daycounts;
pub mod error;
pub mod observer;
pub mod quote;
pub mod schedule;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{BusinessDayConvention, Calendar, CalendarId};
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::observer::{Observer, ObserverList};
    pub use crate::quote::SimpleQuote;
    pub use crate::schedule::{DateGeneration, Schedule, ScheduleConfig};
    pub use crate::types::{Date, Frequency, Period, TimeUnit};
}

pub use error::{CoreError, CoreResult};
pub use types::Date;
