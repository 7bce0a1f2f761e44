//! Error types for the date and market-data layer.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by dates, periods, calendars, day counts and schedules.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A tenor string or period could not be interpreted.
    #[error("Invalid period '{input}': {reason}")]
    InvalidPeriod {
        /// The offending input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Day count calculation error.
    #[error("Day count error: {reason}")]
    DayCountError {
        /// Description of the error.
        reason: String,
    },

    /// Calendar or business day error.
    #[error("Calendar error: {reason}")]
    CalendarError {
        /// Description of the error.
        reason: String,
    },

    /// Schedule generation error.
    #[error("Schedule error: {reason}")]
    ScheduleError {
        /// Description of the error.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid period error.
    #[must_use]
    pub fn invalid_period(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPeriod {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates a day count error.
    #[must_use]
    pub fn day_count(reason: impl Into<String>) -> Self {
        Self::DayCountError {
            reason: reason.into(),
        }
    }

    /// Creates a calendar error.
    #[must_use]
    pub fn calendar(reason: impl Into<String>) -> Self {
        Self::CalendarError {
            reason: reason.into(),
        }
    }

    /// Creates a schedule error.
    #[must_use]
    pub fn schedule(reason: impl Into<String>) -> Self {
        Self::ScheduleError {
            reason: reason.into(),
        }
    }
}
