//! Weekend and working-hours filters.
//!
//! Both filters convert each reading's epoch timestamp to the configured
//! analysis time zone (Singapore by default) and judge the reading on its
//! local calendar position. Stateless, one decision per row.

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use chrono_tz::Tz;
use tracing::debug;

use crate::config::CleaningConfig;
use crate::series::Series;

/// First weekday index counted as weekend (Monday = 0, Saturday = 5).
const WEEKEND_START_INDEX: u32 = 5;

/// Drop readings that fall on Saturday or Sunday in the analysis time zone.
///
/// The decision is made on the local calendar date, so a reading that is
/// still Friday in UTC but already Saturday in Singapore is dropped.
pub fn drop_weekends(series: &Series, config: &CleaningConfig) -> Series {
    let tz = config.analysis_timezone;
    let out = series.filter_indexed(|_, r| {
        local_time(r.timestamp, tz)
            .map(|dt| dt.weekday().num_days_from_monday() < WEEKEND_START_INDEX)
            .unwrap_or(false)
    });
    debug!(kept = out.len(), total = series.len(), "weekend removal");
    out
}

/// Keep only readings whose local hour is within the working-hours window
/// `[work_start_hour, work_end_hour)`.
pub fn drop_after_hours(series: &Series, config: &CleaningConfig) -> Series {
    let tz = config.analysis_timezone;
    let out = series.filter_indexed(|_, r| {
        local_time(r.timestamp, tz)
            .map(|dt| (config.work_start_hour..config.work_end_hour).contains(&dt.hour()))
            .unwrap_or(false)
    });
    debug!(kept = out.len(), total = series.len(), "after-hours removal");
    out
}

/// Epoch seconds to a zoned datetime. `None` only for timestamps outside
/// chrono's representable range; such readings are dropped.
fn local_time(timestamp: i64, tz: Tz) -> Option<DateTime<Tz>> {
    tz.timestamp_opt(timestamp, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Reading;
    use chrono_tz::Asia::Singapore;

    fn sgt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> i64 {
        Singapore
            .with_ymd_and_hms(y, m, d, h, min, s)
            .unwrap()
            .timestamp()
    }

    fn series(timestamps: &[i64]) -> Series {
        Series::new(timestamps.iter().map(|&t| Reading::new(t)).collect())
    }

    #[test]
    fn test_weekday_readings_kept() {
        // Monday through Friday, 2021-10-04 .. 2021-10-08
        let ts: Vec<i64> = (4..9).map(|d| sgt(2021, 10, d, 10, 0, 0)).collect();
        let out = drop_weekends(&series(&ts), &CleaningConfig::default());
        assert_eq!(out.timestamps(), ts);
    }

    #[test]
    fn test_saturday_and_sunday_dropped() {
        let ts = [
            sgt(2021, 10, 8, 10, 0, 0),  // Friday
            sgt(2021, 10, 9, 10, 0, 0),  // Saturday
            sgt(2021, 10, 10, 10, 0, 0), // Sunday
            sgt(2021, 10, 11, 10, 0, 0), // Monday
        ];
        let out = drop_weekends(&series(&ts), &CleaningConfig::default());
        assert_eq!(out.timestamps(), vec![ts[0], ts[3]]);
    }

    // A reading at Saturday 00:30 Singapore time is still Friday 16:30 in
    // UTC; the weekend decision must follow the analysis time zone.
    #[test]
    fn test_utc_friday_singapore_saturday_dropped() {
        let ts = sgt(2021, 10, 9, 0, 30, 0);
        let utc = chrono::Utc.timestamp_opt(ts, 0).unwrap();
        assert_eq!(utc.weekday(), chrono::Weekday::Fri);

        let out = drop_weekends(&series(&[ts]), &CleaningConfig::default());
        assert!(out.is_empty());
    }

    #[test]
    fn test_working_hours_window_boundaries() {
        let monday = |h| sgt(2021, 10, 4, h, 0, 0);
        let ts = [monday(6), monday(7), monday(13), monday(19), monday(20)];
        let out = drop_after_hours(&series(&ts), &CleaningConfig::default());
        // Hour 6 and hour 20 are outside [7, 20); 7, 13 and 19 are inside.
        assert_eq!(out.timestamps(), vec![ts[1], ts[2], ts[3]]);
    }

    #[test]
    fn test_late_minute_of_final_hour_kept() {
        let ts = sgt(2021, 10, 4, 19, 59, 59);
        let out = drop_after_hours(&series(&[ts]), &CleaningConfig::default());
        assert_eq!(out.timestamps(), vec![ts]);
    }

    #[test]
    fn test_custom_window() {
        let config = CleaningConfig {
            work_start_hour: 9,
            work_end_hour: 17,
            ..CleaningConfig::default()
        };
        let ts = [sgt(2021, 10, 4, 8, 0, 0), sgt(2021, 10, 4, 9, 0, 0)];
        let out = drop_after_hours(&series(&ts), &config);
        assert_eq!(out.timestamps(), vec![ts[1]]);
    }

    #[test]
    fn test_custom_timezone() {
        let config = CleaningConfig {
            analysis_timezone: chrono_tz::UTC,
            ..CleaningConfig::default()
        };
        // Saturday in Singapore, still Friday in UTC: kept under UTC rules.
        let ts = sgt(2021, 10, 9, 0, 30, 0);
        let out = drop_weekends(&series(&[ts]), &config);
        assert_eq!(out.timestamps(), vec![ts]);
    }
}
