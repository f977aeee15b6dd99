//! Calendar-date to epoch-second range conversion.
//!
//! User-facing date input is a pair of `YYYY-MM-DD` strings. Both bounds are
//! inclusive and resolve to local midnight of the given date in the
//! process's time zone. Anything that does not parse as that exact shape is
//! a [`FormatError`], reported before any query is issued.

use chrono::{Local, LocalResult, NaiveDate, NaiveTime, TimeZone};

/// Required date input format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date input errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The string does not match `YYYY-MM-DD` (or names an impossible date).
    Unparseable { input: String },
    /// The date exists but has no valid local midnight (time zone
    /// transition skipping 00:00).
    NoLocalMidnight { input: String },
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatError::Unparseable { input } => {
                write!(f, "date '{input}' does not match format YYYY-MM-DD")
            }
            FormatError::NoLocalMidnight { input } => {
                write!(f, "date '{input}' has no local midnight in this time zone")
            }
        }
    }
}

impl std::error::Error for FormatError {}

/// Convert two `YYYY-MM-DD` strings to inclusive epoch-second bounds.
///
/// Both bounds are local midnight of the given date, so for any valid pair
/// with `start <= end` the returned epochs satisfy `lo <= hi`. The pair is
/// not otherwise validated; a reversed range simply scans nothing.
pub fn day_range(start: &str, end: &str) -> Result<(i64, i64), FormatError> {
    Ok((local_midnight(start)?, local_midnight(end)?))
}

/// Epoch seconds of local midnight on the given date.
fn local_midnight(input: &str) -> Result<i64, FormatError> {
    if !is_well_formed(input) {
        return Err(FormatError::Unparseable {
            input: input.to_string(),
        });
    }

    let date = NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| {
        FormatError::Unparseable {
            input: input.to_string(),
        }
    })?;

    match Local.from_local_datetime(&date.and_time(NaiveTime::MIN)) {
        LocalResult::Single(dt) => Ok(dt.timestamp()),
        // A DST transition can duplicate midnight; take the earlier instant.
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.timestamp()),
        LocalResult::None => Err(FormatError::NoLocalMidnight {
            input: input.to_string(),
        }),
    }
}

/// Exact-shape check: 4-digit year, 2-digit month and day, `-` separators.
///
/// `parse_from_str` alone is too permissive here (it accepts two-digit
/// years and unpadded fields), so the shape is pinned down first.
fn is_well_formed(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| matches!(i, 4 | 7) || c.is_ascii_digit())
}
