//! Calendar-day arithmetic shared by every series transform.
//!
//! All series are keyed by `NaiveDate` interpreted as a UTC calendar day.
//! Nothing in here reads the system clock: callers pass "now" explicitly.

pub mod calendar;

pub use calendar::*;
