//! Series extraction and cleaning pipeline.
//!
//! [`SensorSeriesExtractor`] ties the pieces together: convert the requested
//! calendar dates to inclusive epoch bounds, scan the table, sort ascending,
//! optionally restrict to one location, then run the three cleaning passes
//! in fixed order (presence smoothing, weekend removal, after-hours
//! removal).

use tracing::{debug, info};

use crate::config::CleaningConfig;
use crate::core::presence::smooth_presence;
use crate::core::schedule::{drop_after_hours, drop_weekends};
use crate::core::timerange::{day_range, FormatError};
use crate::series::Series;
use crate::store::{ScanStore, StoreError};

/// Extraction error types.
///
/// A format error aborts before any query is issued. Store errors
/// (connectivity included) are surfaced, never swallowed. An empty range is
/// NOT an error; [`SensorSeriesExtractor::extract`] signals it as
/// `Ok(None)`.
#[derive(Debug)]
pub enum ExtractError {
    /// A date string did not match the required format
    Format(FormatError),
    /// The table store could not be queried
    Store(StoreError),
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::Format(e) => write!(f, "Date format error: {e}"),
            ExtractError::Store(e) => write!(f, "Store error: {e}"),
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractError::Format(e) => Some(e),
            ExtractError::Store(e) => Some(e),
        }
    }
}

impl From<FormatError> for ExtractError {
    fn from(e: FormatError) -> Self {
        ExtractError::Format(e)
    }
}

impl From<StoreError> for ExtractError {
    fn from(e: StoreError) -> Self {
        ExtractError::Store(e)
    }
}

/// Extracts a date-bounded, location-filtered, cleaned series of sensor
/// readings from a table store.
///
/// Fully synchronous and reentrant; each call is independent and holds no
/// state beyond the store handle and the cleaning configuration.
pub struct SensorSeriesExtractor<S> {
    store: S,
    config: CleaningConfig,
}

impl<S: ScanStore> SensorSeriesExtractor<S> {
    /// Create an extractor with the default cleaning configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, CleaningConfig::default())
    }

    /// Create an extractor with an explicit cleaning configuration.
    pub fn with_config(store: S, config: CleaningConfig) -> Self {
        Self { store, config }
    }

    /// The active cleaning configuration.
    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Extract and clean the readings for `[start_date, end_date]`.
    ///
    /// Dates are `YYYY-MM-DD`; both bounds resolve to local midnight,
    /// inclusive. `location`, when given, restricts the series to readings
    /// whose location label matches exactly before any cleaning runs.
    ///
    /// Returns `Ok(None)` when the scan finds no records in range — a
    /// normal outcome the caller is expected to stop on. A location filter
    /// that matches nothing still yields `Ok(Some(empty))`.
    pub fn extract(
        &self,
        table: &str,
        start_date: &str,
        end_date: &str,
        location: Option<&str>,
    ) -> Result<Option<Series>, ExtractError> {
        let (lo, hi) = day_range(start_date, end_date)?;
        debug!(table, lo, hi, "scanning table");

        let records = self.store.scan_range(table, lo, hi)?;
        if records.is_empty() {
            info!(table, lo, hi, "no records in range");
            return Ok(None);
        }

        let mut series = Series::new(records);
        series.sort_by_timestamp();
        debug!(records = series.len(), "scan materialized");

        let series = match location {
            Some(label) => {
                let filtered = series.filter_location(label);
                debug!(location = label, records = filtered.len(), "location filter");
                filtered
            }
            None => series,
        };

        let series = smooth_presence(&series, &self.config);
        debug!(records = series.len(), "presence smoothing");

        let series = drop_weekends(&series, &self.config);
        let series = drop_after_hours(&series, &self.config);

        info!(records = series.len(), "extraction complete");
        Ok(Some(series))
    }
}
