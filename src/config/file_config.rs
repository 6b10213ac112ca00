//! Configuration file support for holdings-query.
//!
//! # Configuration File Format
//!
//! ```toml
//! [paging]
//! max_page_size = 100
//! default_limit = 25
//! max_limit = 1000
//!
//! [logging]
//! level = "warn"
//! format = "pretty"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{Config, LoggingConfig, PagingConfig};

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Paging section
    #[serde(default)]
    pub paging: PagingConfig,

    /// Logging section
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }

    /// Write the default configuration, refusing to clobber an existing
    /// file unless `force` is set
    pub fn write_default(path: &Path, force: bool) -> Result<(), ConfigFileError> {
        if path.exists() && !force {
            return Err(ConfigFileError::Exists(path.display().to_string()));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
        }
        Self::default().save(path)
    }

    /// The settings as loaded, without environment overrides
    pub fn into_config(self) -> Config {
        Config {
            paging: self.paging,
            logging: self.logging,
        }
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("Configuration file already exists: {0}")]
    Exists(String),
}
