//! Occupancy sensor series extraction and cleaning.
//!
//! This library retrieves time-stamped distance/motion readings from a
//! remote table store, restricts them to a date range and an optional
//! physical location, and applies a fixed sequence of heuristic cleaning
//! passes to produce an analysis-ready series.
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     SensorSeriesExtractor                        │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌────────┐   ┌──────────┐   ┌──────────────┐   │
//! │  │ Table scan│──▶│  Sort  │──▶│ Location │──▶│   Presence   │   │
//! │  │ (paged)   │   │ (asc)  │   │  filter  │   │  smoothing   │   │
//! │  └───────────┘   └────────┘   └──────────┘   └──────┬───────┘   │
//! │                                                     ▼           │
//! │                              ┌──────────┐   ┌──────────────┐    │
//! │                              │  After-  │◀──│   Weekend    │    │
//! │                              │  hours   │   │   removal    │    │
//! │                              └──────────┘   └──────────────┘    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Dates are `YYYY-MM-DD` and resolve to inclusive local-midnight bounds.
//! An empty scan is a normal outcome (`Ok(None)`), never an error; date
//! format problems and store connectivity problems are explicit errors.
//!
//! # Example
//!
//! ```
//! use sensor_series_extractor::{MemoryStore, Reading, SensorSeriesExtractor};
//!
//! let mut store = MemoryStore::new();
//! store.insert_table(
//!     "DistanceData",
//!     vec![
//!         // Monday 2021-10-04 10:00:00 +08 and 30 seconds later
//!         Reading::at_location(1_633_312_800, "Desk-A"),
//!         Reading::at_location(1_633_312_830, "Desk-A"),
//!     ],
//! );
//!
//! let extractor = SensorSeriesExtractor::new(store);
//! let series = extractor
//!     .extract("DistanceData", "2021-10-01", "2021-10-12", Some("Desk-A"))
//!     .expect("memory store cannot fail")
//!     .expect("range is not empty");
//! assert_eq!(series.len(), 2);
//! ```

pub mod config;
pub mod core;
pub mod extractor;
pub mod series;
pub mod store;

// Re-export key types at crate root for convenience
pub use config::{CleaningConfig, Config, ConfigError};
pub use core::{day_range, drop_after_hours, drop_weekends, smooth_presence, FormatError};
pub use extractor::{ExtractError, SensorSeriesExtractor};
pub use series::{Reading, Series};
pub use store::{MemoryStore, ScanStore, StoreConfig, StoreError};

// HTTP store re-exports (when enabled)
#[cfg(feature = "http-store")]
pub use store::{BlockingStoreClient, HttpStoreClient};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
