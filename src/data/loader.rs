//! Loader for standard image formats (PNG, JPEG, BMP, GIF, WebP).
//!
//! Decodes to an RGBA [`Raster`]. File size and type policy belong to the
//! caller; this only answers "can I decode this" and "decode it".

use crate::error::{EditorError, Result};
use crate::model::Raster;

/// Supported image extensions
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp"];

/// Check if a filename (string) has a supported image extension.
/// Works with both full paths and just filenames.
pub fn is_image_filename(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}

/// Decoder for standard image formats.
pub struct ImageLoader;

impl ImageLoader {
    /// Human-readable name for UI display.
    pub fn display_name(&self) -> &'static str {
        "Standard Image (RGBA)"
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        IMAGE_EXTENSIONS
    }

    /// Check common image magic bytes.
    pub fn can_load(&self, data: &[u8]) -> bool {
        if data.len() < 8 {
            return false;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return true;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return true;
        }

        // BMP: 42 4D (BM)
        if data.starts_with(b"BM") {
            return true;
        }

        // GIF: GIF87a / GIF89a
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return true;
        }

        // WebP: RIFF....WEBP
        data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP"
    }

    /// Decode encoded bytes into a raster.
    pub fn load(&self, data: &[u8]) -> Result<Raster> {
        let img = image::load_from_memory(data)
            .map_err(EditorError::Decode)?
            .to_rgba8();

        log::trace!(
            "ImageLoader: decoded {}x{} image",
            img.width(),
            img.height()
        );

        Ok(Raster::from(img))
    }

    /// Read and decode an image file (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(&self, path: &std::path::Path) -> Result<Raster> {
        let bytes = std::fs::read(path)?;
        self.load(&bytes)
    }
}
