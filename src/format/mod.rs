//! Export of the edited raster.
//!
//! Encoding is pure: the caller decides how the bytes reach the user
//! (browser download, file on disk).
//!
//! ## Supported Formats
//!
//! - **PNG**: lossless, keeps alpha
//! - **JPEG**: lossy with a quality setting, alpha dropped
//! - **WebP**: lossless, keeps alpha

mod export;

pub use export::{ExportFormat, encode, suggested_file_name};
