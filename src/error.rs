//! Error types for editing, decoding, export and configuration.

use thiserror::Error;

/// Errors that can occur while editing an image.
#[derive(Error, Debug)]
pub enum EditorError {
    /// Operation requested while its preconditions do not hold
    /// (no image loaded, no confirmed selection, ...)
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Description of the violated precondition
        message: String,
    },

    /// Pixel buffer length does not match the declared dimensions
    #[error("Invalid raster: {len} bytes do not form a {width}x{height} RGBA buffer")]
    InvalidRaster {
        /// Declared width
        width: u32,
        /// Declared height
        height: u32,
        /// Actual buffer length
        len: usize,
    },

    /// Selection mode name not recognised
    #[error("Unknown selection mode '{0}'")]
    UnknownSelectionMode(String),

    /// Export format name not recognised
    #[error("Unknown export format '{0}'")]
    UnknownExportFormat(String),

    /// Source bytes could not be decoded into an image
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// Raster could not be encoded for export
    #[error("Failed to encode {format} image: {source}")]
    Encoding {
        /// Target format name
        format: &'static str,
        /// Underlying encoder error
        #[source]
        source: image::ImageError,
    },

    /// Configuration could not be parsed or serialized
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Configuration parsed but holds inconsistent values
    #[error("Invalid config: {message}")]
    InvalidConfig {
        /// Description of the inconsistency
        message: String,
    },

    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EditorError {
    /// Create an invalid operation error with a message.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Create an invalid config error with a message.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether this error means the caller asked for something it should
    /// have checked first.
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, Self::InvalidOperation { .. })
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EditorError>;
