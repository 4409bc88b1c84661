//! Location and logging configuration for drivers.
//!
//! # Responsibility
//! - Resolve the data file and log directory from explicit values,
//!   environment variables, then per-build defaults.
//!
//! # Invariants
//! - Resolution is pure apart from reading the environment.
//! - `~` is expanded from `HOME`; a missing `HOME` is an error rather than
//!   a silent fallback to the working directory.

use crate::logging::{default_log_level, LoggingConfig, LoggingError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DATA_FILE_ENV: &str = "STICKYNOTES_DATA_FILE";
pub const LOG_DIR_ENV: &str = "STICKYNOTES_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "STICKYNOTES_LOG";

/// Release-build data file.
pub const SETTINGS_FILE: &str = "~/.config/indicator-stickynotes";
/// Debug-build data file, kept apart from real data.
pub const DEBUG_SETTINGS_FILE: &str = "~/.stickynotes";
pub const DEFAULT_LOG_DIR: &str = "~/.cache/stickynotes/logs";

#[derive(Debug)]
pub enum ConfigError {
    /// A `~` path was requested but `HOME` is not set.
    HomeNotSet(String),
    Logging(LoggingError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HomeNotSet(path) => write!(f, "cannot expand `{path}`: HOME is not set"),
            Self::Logging(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            Self::HomeNotSet(_) => None,
        }
    }
}

impl From<LoggingError> for ConfigError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

/// Effective driver configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Resolves configuration; `data_file` overrides the environment.
    pub fn resolve(data_file: Option<&str>) -> Result<Self, ConfigError> {
        let home = std::env::var("HOME").ok();
        let data_file = resolve_data_file(
            data_file,
            std::env::var(DATA_FILE_ENV).ok().as_deref(),
            home.as_deref(),
        )?;
        let log_dir = expand_home(
            std::env::var(LOG_DIR_ENV)
                .ok()
                .as_deref()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(DEFAULT_LOG_DIR),
            home.as_deref(),
        )?;
        let level = std::env::var(LOG_LEVEL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| default_log_level().to_string());

        Ok(Self {
            data_file,
            logging: LoggingConfig::new(&level, log_dir)?,
        })
    }
}

/// Data file for this build: explicit, then environment, then default.
pub fn resolve_data_file(
    explicit: Option<&str>,
    from_env: Option<&str>,
    home: Option<&str>,
) -> Result<PathBuf, ConfigError> {
    let chosen = explicit
        .or(from_env)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(default_data_file());
    expand_home(chosen, home)
}

fn default_data_file() -> &'static str {
    if cfg!(debug_assertions) {
        DEBUG_SETTINGS_FILE
    } else {
        SETTINGS_FILE
    }
}

fn expand_home(path: &str, home: Option<&str>) -> Result<PathBuf, ConfigError> {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return Ok(PathBuf::from(path)),
    };
    let home = home
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::HomeNotSet(path.to_string()))?;
    Ok(PathBuf::from(format!("{home}{rest}")))
}
