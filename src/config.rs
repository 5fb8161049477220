//! Configuration file support.
//!
//! This module provides serialization and deserialization of editor settings,
//! allowing the host page or CLI to supply block-size bounds, history size and
//! export preferences. The editing core never reads this itself; values are
//! handed to it as plain parameters.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BLOCK_SIZE, DEFAULT_EXPORT_QUALITY, DEFAULT_HISTORY_CAPACITY, MAX_BLOCK_SIZE,
    MIN_BLOCK_SIZE,
};
use crate::error::{EditorError, Result};
use crate::format::ExportFormat;
use crate::history::HistoryConfig;
use crate::selection::SelectionMode;

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
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

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

    /// Convert to log crate's Level (for loggers that take a single level).
    pub fn to_level(&self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Editor configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Mosaic block size slider bounds and default
    #[serde(default)]
    pub block_size: BlockSizeConfig,

    /// Number of snapshots kept for undo/redo
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Selection mode active when the editor starts
    #[serde(default)]
    pub initial_mode: SelectionMode,

    /// Download preferences
    #[serde(default)]
    pub export: ExportPreferences,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            block_size: BlockSizeConfig::default(),
            history_capacity: default_history_capacity(),
            initial_mode: SelectionMode::default(),
            export: ExportPreferences::default(),
            log_level: LogLevel::default(),
        }
    }
}

/// Block size bounds section of the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSizeConfig {
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl Default for BlockSizeConfig {
    fn default() -> Self {
        Self {
            min: MIN_BLOCK_SIZE,
            max: MAX_BLOCK_SIZE,
            default: DEFAULT_BLOCK_SIZE,
        }
    }
}

/// Export preferences section of the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPreferences {
    #[serde(default)]
    pub format: ExportFormat,
    /// JPEG quality, 1-100
    #[serde(default = "default_export_quality")]
    pub quality: u8,
}

fn default_export_quality() -> u8 {
    DEFAULT_EXPORT_QUALITY
}

impl Default for ExportPreferences {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            quality: default_export_quality(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EditorConfig = serde_json::from_str(json)?;
        if config.version > CONFIG_VERSION {
            log::warn!(
                "Config version {} is newer than supported version {}",
                config.version,
                CONFIG_VERSION
            );
        }
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a JSON config file (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check that the values are consistent.
    pub fn validate(&self) -> Result<()> {
        let bs = &self.block_size;
        if bs.min == 0 {
            return Err(EditorError::invalid_config("block_size.min must be at least 1"));
        }
        if bs.min > bs.max {
            return Err(EditorError::invalid_config(format!(
                "block_size.min ({}) exceeds block_size.max ({})",
                bs.min, bs.max
            )));
        }
        if !(bs.min..=bs.max).contains(&bs.default) {
            return Err(EditorError::invalid_config(format!(
                "block_size.default ({}) is outside {}..={}",
                bs.default, bs.min, bs.max
            )));
        }
        if self.history_capacity == 0 {
            return Err(EditorError::invalid_config(
                "history_capacity must be at least 1",
            ));
        }
        if !(1..=100).contains(&self.export.quality) {
            return Err(EditorError::invalid_config(format!(
                "export.quality ({}) is outside 1..=100",
                self.export.quality
            )));
        }
        Ok(())
    }

    /// Clamp a user-chosen block size into the configured bounds.
    pub fn clamp_block_size(&self, block_size: u32) -> u32 {
        block_size.max(self.block_size.min).min(self.block_size.max)
    }

    /// History settings for a new session.
    pub fn history_config(&self) -> HistoryConfig {
        HistoryConfig {
            max_size: self.history_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.block_size.min, 5);
        assert_eq!(config.block_size.max, 50);
        assert_eq!(config.block_size.default, 10);
        assert_eq!(config.history_capacity, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = EditorConfig {
            initial_mode: SelectionMode::Freehand,
            export: ExportPreferences {
                format: ExportFormat::Jpeg,
                quality: 75,
            },
            log_level: LogLevel::Debug,
            ..Default::default()
        };

        let json = config.to_json().unwrap();
        assert!(json.contains("\"freehand\""));
        assert!(json.contains("\"jpeg\""));
        assert_eq!(EditorConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_newer_version_still_loads() {
        let json = format!(
            r#"{{ "version": {}, "log_level": "warn" }}"#,
            CONFIG_VERSION + 1
        );
        let config = EditorConfig::from_json(&json).unwrap();
        assert_eq!(config.version, CONFIG_VERSION + 1);
        assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Warn);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = EditorConfig::from_json(r#"{ "version": 1 }"#).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let json = r#"{ "version": 1, "block_size": { "min": 20, "max": 10, "default": 15 } }"#;
        assert!(matches!(
            EditorConfig::from_json(json),
            Err(EditorError::InvalidConfig { .. })
        ));

        let json = r#"{ "version": 1, "history_capacity": 0 }"#;
        assert!(EditorConfig::from_json(json).is_err());

        assert!(matches!(
            EditorConfig::from_json("{ not json"),
            Err(EditorError::Config(_))
        ));
    }

    #[test]
    fn test_clamp_block_size() {
        let config = EditorConfig::default();
        assert_eq!(config.clamp_block_size(1), 5);
        assert_eq!(config.clamp_block_size(25), 25);
        assert_eq!(config.clamp_block_size(500), 50);
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::Trace.to_level(), log::Level::Trace);
        assert_eq!(LogLevel::default().name(), "Info");
    }
}
