//! Configuration management.
//!
//! Settings come from an optional TOML file overlaid with
//! `HOLDINGS_QUERY_*` environment variables, nested keys separated by a
//! double underscore (`HOLDINGS_QUERY_PAGING__MAX_PAGE_SIZE=50`).

mod file_config;

pub use file_config::{ConfigFile, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::query::{DEFAULT_MAX_LIMIT, VENDOR_MAX_PAGE_SIZE};

/// Name of the configuration file looked up by [`find_config_file`]
pub const CONFIG_FILE_NAME: &str = "holdings-query.toml";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "HOLDINGS_QUERY";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Vendor paging settings
    #[serde(default)]
    pub paging: PagingConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Check value bounds
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.paging.max_page_size == 0 || self.paging.max_page_size > VENDOR_MAX_PAGE_SIZE {
            return Err(config::ConfigError::Message(format!(
                "paging.max_page_size must be between 1 and {}, got {}",
                VENDOR_MAX_PAGE_SIZE, self.paging.max_page_size
            )));
        }
        if self.paging.max_limit == 0 {
            return Err(config::ConfigError::Message(
                "paging.max_limit must be at least 1".to_string(),
            ));
        }
        if self.paging.default_limit == 0 || self.paging.default_limit > self.paging.max_limit {
            return Err(config::ConfigError::Message(format!(
                "paging.default_limit must be between 1 and paging.max_limit ({}), got {}",
                self.paging.max_limit, self.paging.default_limit
            )));
        }
        Ok(())
    }
}

/// Paging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Largest page requested from the vendor
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    /// Window size used when the caller gives no limit
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Largest window a caller may request
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            max_page_size: default_max_page_size(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_max_page_size() -> usize {
    VENDOR_MAX_PAGE_SIZE
}

fn default_limit() -> usize {
    25
}

fn default_max_limit() -> usize {
    DEFAULT_MAX_LIMIT
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path).format(config::FileFormat::Toml))
        .add_source(env_source())
        .build()?;

    let config: Config = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from defaults and environment overrides only
pub fn load_env_config() -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(env_source())
        .build()?;

    let config: Config = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Look for a configuration file in the working directory, then in the
/// user configuration directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("holdings-query").join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}

/// Resolve the effective configuration.
///
/// An explicit path wins over [`find_config_file`]; without any file the
/// defaults apply, still overlaid with the environment.
pub fn get_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    match path.map(Path::to_path_buf).or_else(find_config_file) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading configuration file");
            load_config(&path)
        }
        None => load_env_config(),
    }
}
