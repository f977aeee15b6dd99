//! Reading and series types for occupancy sensor data.
//!
//! Records come back from the table store as heterogeneous key-value maps.
//! Only the timestamp and location fields are interpreted here; every other
//! sensor field is carried through unmodified.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single sensor observation.
///
/// The wire schema is not fixed beyond `Timestamp` and `Location`; whatever
/// else the table carries (distance, motion counts, device ids) lands in
/// `extra` and survives every cleaning pass untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Seconds since the Unix epoch.
    #[serde(rename = "Timestamp")]
    pub timestamp: i64,

    /// Physical location label, when the table carries one.
    #[serde(rename = "Location", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Remaining sensor fields, passed through unmodified.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Reading {
    /// Create a reading with no location or extra fields.
    pub fn new(timestamp: i64) -> Self {
        Self {
            timestamp,
            location: None,
            extra: Map::new(),
        }
    }

    /// Create a reading tagged with a location label.
    pub fn at_location(timestamp: i64, location: impl Into<String>) -> Self {
        Self {
            timestamp,
            location: Some(location.into()),
            extra: Map::new(),
        }
    }
}

/// An ordered sequence of readings, ascending by timestamp.
///
/// Each cleaning pass produces a new `Series` that is a contiguous
/// re-indexed subsequence of its input, order preserved. Duplicate
/// timestamps are allowed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub readings: Vec<Reading>,
}

impl Series {
    /// Create a series from a vector of readings.
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Sort readings ascending by timestamp (stable, so equal timestamps
    /// keep their scan order).
    pub fn sort_by_timestamp(&mut self) {
        self.readings.sort_by_key(|r| r.timestamp);
    }

    /// The timestamps of all readings, in series order.
    pub fn timestamps(&self) -> Vec<i64> {
        self.readings.iter().map(|r| r.timestamp).collect()
    }

    /// Keep only readings whose location equals `label` exactly.
    ///
    /// Case-sensitive, no normalization. Readings without a location never
    /// match. No matches yields an empty series, not an error.
    pub fn filter_location(&self, label: &str) -> Series {
        Series::new(
            self.readings
                .iter()
                .filter(|r| r.location.as_deref() == Some(label))
                .cloned()
                .collect(),
        )
    }

    /// Keep only readings at indices for which `keep` returns true.
    pub(crate) fn filter_indexed(&self, mut keep: impl FnMut(usize, &Reading) -> bool) -> Series {
        Series::new(
            self.readings
                .iter()
                .enumerate()
                .filter(|(i, r)| keep(*i, r))
                .map(|(_, r)| r.clone())
                .collect(),
        )
    }
}

impl From<Vec<Reading>> for Series {
    fn from(readings: Vec<Reading>) -> Self {
        Series::new(readings)
    }
}
