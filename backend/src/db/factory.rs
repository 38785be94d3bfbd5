//! Repository factory for dependency injection.
//!
//! This module provides utilities for creating and configuring repository instances
//! based on runtime configuration.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::repositories::LocalRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::config::EngineConfig;

/// Environment variable selecting the repository backend.
pub const REPOSITORY_TYPE_ENV: &str = "REPOSITORY_TYPE";

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string.
    ///
    /// # Arguments
    /// * `s` - String representation ("local", "memory")
    ///
    /// # Returns
    /// * `Ok(RepositoryType)` if valid
    /// * `Err` if invalid
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "memory" | "in-memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variable.
    ///
    /// Reads `REPOSITORY_TYPE`. Unset or unrecognised values fall back to Local.
    pub fn from_env() -> Self {
        std::env::var(REPOSITORY_TYPE_ENV)
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(Self::Local)
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```
/// use biorhythm_engine::db::{RepositoryFactory, RepositoryType};
///
/// let repo = RepositoryFactory::create(RepositoryType::Local);
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    pub fn create(repo_type: RepositoryType) -> Arc<dyn FullRepository> {
        match repo_type {
            RepositoryType::Local => Self::create_local(),
        }
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create repository from environment configuration.
    ///
    /// Reads `REPOSITORY_TYPE` to determine which repository to create.
    /// A set but unrecognised value is reported rather than ignored.
    pub fn from_env() -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo_type = match std::env::var(REPOSITORY_TYPE_ENV) {
            Ok(val) => val.parse().map_err(|e: String| {
                RepositoryError::configuration(format!("Invalid {}: {}", REPOSITORY_TYPE_ENV, e))
            })?,
            Err(_) => RepositoryType::Local,
        };
        Ok(Self::create(repo_type))
    }

    /// Create repository from a TOML configuration file.
    ///
    /// # Arguments
    /// * `config_path` - Path to the biorhythm.toml configuration file
    ///
    /// # Returns
    /// * `Ok(Arc<dyn FullRepository>)` - Repository instance
    /// * `Err(RepositoryError)` - If the file cannot be loaded or names an unknown backend
    pub fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        let config = EngineConfig::from_file(config_path)?;
        Self::from_config(&config)
    }

    /// Create repository from the default configuration file location.
    pub fn from_default_config() -> RepositoryResult<Arc<dyn FullRepository>> {
        let config = EngineConfig::from_default_location()?;
        Self::from_config(&config)
    }

    /// Create repository from an [`EngineConfig`], letting `REPOSITORY_TYPE`
    /// override `[repository] type` when it is set.
    pub fn from_config_with_env(config: &EngineConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        match std::env::var(REPOSITORY_TYPE_ENV) {
            Ok(_) => Self::from_env(),
            Err(_) => Self::from_config(config),
        }
    }

    /// Create repository from an [`EngineConfig`] instance.
    pub fn from_config(config: &EngineConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        Ok(Self::create(repo_type))
    }
}
