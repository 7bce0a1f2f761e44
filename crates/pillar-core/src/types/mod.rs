//! Domain value types: dates, periods and frequencies.

mod date;
mod frequency;
mod period;

pub use date::Date;
pub use frequency::Frequency;
pub use period::{Period, TimeUnit};
