//! Engine configuration file support.
//!
//! Settings are read from a TOML file (`biorhythm.toml`). Every section is
//! optional; missing values fall back to the defaults below.
//!
//! ```toml
//! [repository]
//! type = "local"
//!
//! [calculation]
//! default_days = 365
//! max_days = 3650
//!
//! [statistics]
//! recent_activity_days = 7
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::algorithms::statistics::RECENT_ACTIVITY_DAYS;
use crate::algorithms::timeseries::MAX_RANGE_DAYS;
use crate::db::factory::RepositoryType;
use crate::db::repository::RepositoryError;

/// Full engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub calculation: CalculationSettings,
    #[serde(default)]
    pub statistics: StatisticsSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
        }
    }
}

/// Bounds for day-count calculation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationSettings {
    #[serde(default = "default_days")]
    pub default_days: u32,
    #[serde(default = "default_max_days")]
    pub max_days: u32,
}

impl Default for CalculationSettings {
    fn default() -> Self {
        Self {
            default_days: default_days(),
            max_days: default_max_days(),
        }
    }
}

/// Statistics settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsSettings {
    #[serde(default = "default_recent_activity_days")]
    pub recent_activity_days: i64,
}

impl Default for StatisticsSettings {
    fn default() -> Self {
        Self {
            recent_activity_days: default_recent_activity_days(),
        }
    }
}

fn default_repo_type() -> String {
    "local".to_string()
}

fn default_days() -> u32 {
    365
}

fn default_max_days() -> u32 {
    MAX_RANGE_DAYS as u32
}

fn default_recent_activity_days() -> i64 {
    RECENT_ACTIVITY_DAYS
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(EngineConfig)` if the file parses and passes [`EngineConfig::validate`]
    /// * `Err(RepositoryError)` if the file cannot be read, parsed or validated
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;
        content.parse()
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `biorhythm.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from("biorhythm.toml"),
            PathBuf::from("backend/biorhythm.toml"),
            PathBuf::from("../biorhythm.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::configuration(
            "No biorhythm.toml found in standard locations".to_string(),
        ))
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), RepositoryError> {
        let calc = &self.calculation;
        if calc.max_days == 0 || i64::from(calc.max_days) > MAX_RANGE_DAYS {
            return Err(RepositoryError::configuration(format!(
                "calculation.max_days must be between 1 and {}, got {}",
                MAX_RANGE_DAYS, calc.max_days
            )));
        }
        if calc.default_days == 0 || calc.default_days > calc.max_days {
            return Err(RepositoryError::configuration(format!(
                "calculation.default_days must be between 1 and {}, got {}",
                calc.max_days, calc.default_days
            )));
        }
        if self.statistics.recent_activity_days < 1 {
            return Err(RepositoryError::configuration(format!(
                "statistics.recent_activity_days must be positive, got {}",
                self.statistics.recent_activity_days
            )));
        }
        self.repository_type()
            .map_err(|e| RepositoryError::configuration(format!("Invalid repository type: {}", e)))?;
        Ok(())
    }
}

impl FromStr for EngineConfig {
    type Err = RepositoryError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let config: EngineConfig = toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }
}
