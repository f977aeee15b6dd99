//! Configuration for series extraction and cleaning.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Thresholds and calendar settings for the cleaning passes.
///
/// These are business constants, not derived tunables: the defaults mirror
/// the deployment this extractor was built for (Singapore office hours,
/// 60-second presence gap, three-error confirmation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Maximum gap between readings still counted as sustained presence,
    /// in seconds.
    pub presence_gap_secs: i64,

    /// Consecutive long gaps required to confirm the subject is away.
    pub confirmation_errors: u32,

    /// First local hour of the working day (inclusive).
    pub work_start_hour: u32,

    /// First local hour after the working day (exclusive).
    pub work_end_hour: u32,

    /// Time zone used for weekend and working-hours decisions.
    pub analysis_timezone: Tz,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            presence_gap_secs: 60,
            confirmation_errors: 3,
            work_start_hour: 7,
            work_end_hour: 20,
            analysis_timezone: chrono_tz::Asia::Singapore,
        }
    }
}

/// Persisted configuration for the extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Cleaning thresholds and calendar settings
    pub cleaning: CleaningConfig,

    /// Table scanned when the caller does not name one
    pub default_table: String,

    /// Path for storing exported series and scratch data
    pub data_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sensor-series-extractor");

        Self {
            cleaning: CleaningConfig::default(),
            default_table: "DistanceData".to_string(),
            data_path: data_dir,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(&config_path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sensor-series-extractor")
            .join("config.json")
    }

    /// Ensure the data directory exists.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.data_path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cleaning_config() {
        let config = CleaningConfig::default();
        assert_eq!(config.presence_gap_secs, 60);
        assert_eq!(config.confirmation_errors, 3);
        assert_eq!(config.work_start_hour, 7);
        assert_eq!(config.work_end_hour, 20);
        assert_eq!(config.analysis_timezone, chrono_tz::Asia::Singapore);
    }

    #[test]
    fn test_cleaning_config_roundtrip() {
        let config = CleaningConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("Asia/Singapore"));

        let back: CleaningConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_table, "DistanceData");
        assert_eq!(config.cleaning, CleaningConfig::default());
    }
}
