//! Environment-driven runtime configuration.
//!
//! # Invariants
//! - Resolution never panics; malformed values are reported as `ConfigError`.
//! - Blank variables are treated as unset.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DB_PATH_ENV: &str = "NOREPLY_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "NOREPLY_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "NOREPLY_LOG_DIR";
pub const DEFAULT_DB_FILE_NAME: &str = "noreply_store.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    RelativeLogDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RelativeLogDir(value) => {
                write!(f, "{LOG_DIR_ENV} must be an absolute path, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Resolved store/logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl StoreConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);
        let log_level = read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string());
        let log_dir = match read(LOG_DIR_ENV) {
            Some(value) if Path::new(&value).is_absolute() => Some(PathBuf::from(value)),
            Some(value) => return Err(ConfigError::RelativeLogDir(value)),
            None => None,
        };

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }
}

pub fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}
