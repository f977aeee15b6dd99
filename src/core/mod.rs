//! Core cleaning algorithms.
//!
//! This module contains:
//! - Calendar-date to epoch-range conversion
//! - The presence-smoothing (false-positive removal) pass
//! - Weekend and working-hours filters

pub mod presence;
pub mod schedule;
pub mod timerange;

// Re-export commonly used items
pub use presence::smooth_presence;
pub use schedule::{drop_after_hours, drop_weekends};
pub use timerange::{day_range, FormatError, DATE_FORMAT};
