//! Configuration file support.
//!
//! The editor configuration is a JSON document listing the label classes
//! and the log verbosity:
//!
//! ```json
//! {
//!   "version": 1,
//!   "log_level": "debug",
//!   "label_classes": [
//!     {"attributes": {"class": "rect", "color": ["red", "green"], "label": {"type": "text"}}}
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{LabelClassCatalog, LabelClassConfig};
use crate::error::ConfigError;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Editor configuration loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Version of the configuration file format
    #[serde(default = "default_version")]
    pub version: u32,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Label class descriptors, validated when the catalog is built
    #[serde(default)]
    pub label_classes: Vec<serde_json::Value>,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            log_level: LogLevel::default(),
            label_classes: Vec::new(),
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                expected: CONFIG_VERSION,
                found: config.version,
            });
        }
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::info!("Loading editor configuration from {}", path.display());
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Validate the label class descriptors.
    pub fn label_class_configs(&self) -> Result<Vec<LabelClassConfig>, ConfigError> {
        self.label_classes
            .iter()
            .map(LabelClassConfig::from_json)
            .collect()
    }

    /// Build the label class catalog.
    pub fn build_catalog(&self) -> Result<LabelClassCatalog, ConfigError> {
        LabelClassCatalog::from_configs(self.label_class_configs()?)
    }
}
