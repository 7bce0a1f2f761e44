//! Schedule generation for swap legs.
//!
//! A schedule is a strictly increasing list of adjusted dates from an
//! effective date to a termination date, spaced by a tenor.
//!
//! # Example
//!
//! ```rust
//! use pillar_core::calendars::CalendarId;
//! use pillar_core::schedule::{Schedule, ScheduleConfig};
//! use pillar_core::types::{Date, Period};
//!
//! let config = ScheduleConfig::new(
//!     Date::from_ymd(2001, 11, 8).unwrap(),
//!     Date::from_ymd(2003, 11, 8).unwrap(),
//!     Period::months(6),
//! )
//! .with_calendar(CalendarId::Target);
//!
//! let schedule = Schedule::generate(config).unwrap();
//! assert_eq!(schedule.len(), 5);
//! ```

use serde::{Deserialize, Serialize};

use crate::calendars::{BusinessDayConvention, Calendar, CalendarId};
use crate::error::{CoreError, CoreResult};
use crate::types::{Date, Period};

/// Direction in which regular dates are rolled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DateGeneration {
    /// Roll back from the termination date; any stub lands at the front.
    #[default]
    Backward,
    /// Roll forward from the effective date; any stub lands at the back.
    Forward,
}

/// Configuration for schedule generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// First accrual start, unadjusted.
    pub effective: Date,
    /// Last accrual end, unadjusted.
    pub termination: Date,
    /// Spacing of regular dates. A zero tenor yields a single period.
    pub tenor: Period,
    /// Calendar for business day adjustments.
    pub calendar: CalendarId,
    /// Adjustment of all dates but the last.
    pub convention: BusinessDayConvention,
    /// Adjustment of the termination date.
    pub termination_convention: BusinessDayConvention,
    /// Generation direction.
    pub rule: DateGeneration,
    /// Keep month-end anchors on month ends.
    pub end_of_month: bool,
}

impl ScheduleConfig {
    /// Creates a configuration with TARGET and modified-following defaults.
    #[must_use]
    pub fn new(effective: Date, termination: Date, tenor: Period) -> Self {
        Self {
            effective,
            termination,
            tenor,
            calendar: CalendarId::default(),
            convention: BusinessDayConvention::ModifiedFollowing,
            termination_convention: BusinessDayConvention::ModifiedFollowing,
            rule: DateGeneration::Backward,
            end_of_month: false,
        }
    }

    /// Sets the calendar for business day adjustments.
    #[must_use]
    pub fn with_calendar(mut self, calendar: CalendarId) -> Self {
        self.calendar = calendar;
        self
    }

    /// Sets the convention for every date, termination included.
    #[must_use]
    pub fn with_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.convention = convention;
        self.termination_convention = convention;
        self
    }

    /// Sets the convention for the termination date only.
    #[must_use]
    pub fn with_termination_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.termination_convention = convention;
        self
    }

    /// Sets the generation direction.
    #[must_use]
    pub fn with_rule(mut self, rule: DateGeneration) -> Self {
        self.rule = rule;
        self
    }

    /// Sets the end-of-month rule.
    #[must_use]
    pub fn with_end_of_month(mut self, eom: bool) -> Self {
        self.end_of_month = eom;
        self
    }
}

/// A generated date schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    unadjusted: Vec<Date>,
    dates: Vec<Date>,
    tenor: Period,
    calendar: CalendarId,
}

impl Schedule {
    /// Generates a schedule.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ScheduleError` if the termination is not after the
    /// effective date or the tenor is negative.
    pub fn generate(config: ScheduleConfig) -> CoreResult<Self> {
        if config.termination <= config.effective {
            return Err(CoreError::schedule(format!(
                "termination {} must be after effective date {}",
                config.termination, config.effective
            )));
        }
        if config.tenor.length() < 0 {
            return Err(CoreError::schedule(format!(
                "negative tenor {}",
                config.tenor
            )));
        }

        let unadjusted = if config.tenor.is_zero() {
            vec![config.effective, config.termination]
        } else {
            match config.rule {
                DateGeneration::Backward => roll_backward(&config)?,
                DateGeneration::Forward => roll_forward(&config)?,
            }
        };

        let dates = adjust_all(&unadjusted, &config);

        Ok(Self {
            unadjusted,
            dates,
            tenor: config.tenor,
            calendar: config.calendar,
        })
    }

    /// Adjusted dates.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Unadjusted dates, before business day rolling.
    #[must_use]
    pub fn unadjusted_dates(&self) -> &[Date] {
        &self.unadjusted
    }

    /// Number of dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True if the schedule holds no dates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// First adjusted date.
    #[must_use]
    pub fn start_date(&self) -> Option<Date> {
        self.dates.first().copied()
    }

    /// Last adjusted date.
    #[must_use]
    pub fn end_date(&self) -> Option<Date> {
        self.dates.last().copied()
    }

    /// Tenor used to generate the schedule.
    #[must_use]
    pub fn tenor(&self) -> Period {
        self.tenor
    }

    /// Calendar used for adjustments.
    #[must_use]
    pub fn calendar(&self) -> CalendarId {
        self.calendar
    }

    /// Accrual periods as (start, end) pairs of adjusted dates.
    pub fn periods(&self) -> impl Iterator<Item = (Date, Date)> + '_ {
        self.dates.windows(2).map(|w| (w[0], w[1]))
    }
}

fn scaled(tenor: Period, i: i32) -> Period {
    Period::new(tenor.length() * i, tenor.unit())
}

fn roll_backward(config: &ScheduleConfig) -> CoreResult<Vec<Date>> {
    let anchor_eom = config.end_of_month && config.termination.is_end_of_month();
    let mut dates = vec![config.termination];

    let mut i = 1;
    loop {
        let mut candidate = config.termination.add_period(-scaled(config.tenor, i))?;
        if anchor_eom {
            candidate = candidate.end_of_month();
        }
        if candidate <= config.effective {
            break;
        }
        dates.push(candidate);
        i += 1;
    }

    dates.push(config.effective);
    dates.reverse();
    Ok(dates)
}

fn roll_forward(config: &ScheduleConfig) -> CoreResult<Vec<Date>> {
    let anchor_eom = config.end_of_month && config.effective.is_end_of_month();
    let mut dates = vec![config.effective];

    let mut i = 1;
    loop {
        let mut candidate = config.effective.add_period(scaled(config.tenor, i))?;
        if anchor_eom {
            candidate = candidate.end_of_month();
        }
        if candidate >= config.termination {
            break;
        }
        dates.push(candidate);
        i += 1;
    }

    dates.push(config.termination);
    Ok(dates)
}

fn adjust_all(unadjusted: &[Date], config: &ScheduleConfig) -> Vec<Date> {
    let calendar = config.calendar;
    let last = unadjusted.len() - 1;
    let anchor = match config.rule {
        DateGeneration::Backward => config.termination,
        DateGeneration::Forward => config.effective,
    };
    let keep_month_end = config.end_of_month
        && anchor.is_end_of_month()
        && config.convention != BusinessDayConvention::Unadjusted;

    let mut adjusted: Vec<Date> = Vec::with_capacity(unadjusted.len());
    for (i, &date) in unadjusted.iter().enumerate() {
        let rolled = if i == last {
            calendar.adjust(date, config.termination_convention)
        } else if i > 0 && keep_month_end {
            calendar.end_of_month(date)
        } else {
            calendar.adjust(date, config.convention)
        };

        match adjusted.last() {
            Some(&prev) if rolled <= prev => {
                // Rolling collapsed two dates; the later one wins.
                if i == last {
                    if let Some(slot) = adjusted.last_mut() {
                        *slot = rolled;
                    }
                }
            }
            _ => adjusted.push(rolled),
        }
    }

    adjusted
}
