//! Raster encoding for download.

use std::fmt;
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};
use crate::model::Raster;

/// Output formats offered for download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Lossless, keeps alpha
    #[default]
    Png,
    /// Lossy, alpha dropped
    Jpeg,
    /// Lossless WebP, keeps alpha
    WebP,
}

impl ExportFormat {
    /// Format identifier (e.g., "png")
    pub fn id(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::WebP => "webp",
        }
    }

    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::WebP => "webp",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::WebP => "image/webp",
        }
    }

    /// Whether the quality setting has any effect
    pub fn is_lossy(&self) -> bool {
        matches!(self, ExportFormat::Jpeg)
    }

    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Png, ExportFormat::Jpeg, ExportFormat::WebP]
    }

    /// Guess the format from a file name's extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        ext.parse().ok()
    }
}

impl FromStr for ExportFormat {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self> {
        match s
            .trim()
            .trim_start_matches("image/")
            .to_ascii_lowercase()
            .as_str()
        {
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpeg),
            "webp" => Ok(ExportFormat::WebP),
            _ => Err(EditorError::UnknownExportFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Encode a raster. `quality` (clamped to 1..=100) only affects JPEG.
pub fn encode(raster: &Raster, format: ExportFormat, quality: u8) -> Result<Vec<u8>> {
    let (width, height) = raster.dimensions();
    let mut out = Vec::new();

    let result = match format {
        ExportFormat::Png => PngEncoder::new(&mut out).write_image(
            raster.pixels(),
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
        ExportFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(raster.to_rgba_image()?).to_rgb8();
            JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100)).write_image(
                rgb.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )
        }
        ExportFormat::WebP => WebPEncoder::new_lossless(&mut out).write_image(
            raster.pixels(),
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
    };

    result.map_err(|source| EditorError::Encoding {
        format: format.id(),
        source,
    })?;

    log::info!(
        "Encoded {}x{} raster as {} ({} bytes)",
        width,
        height,
        format,
        out.len()
    );
    Ok(out)
}

/// Download name of the form `mosaic_<unix seconds>.<ext>`.
pub fn suggested_file_name(format: ExportFormat) -> String {
    let secs = web_time::SystemTime::now()
        .duration_since(web_time::SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("mosaic_{}.{}", secs, format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_metadata() {
        assert_eq!(ExportFormat::Png.mime_type(), "image/png");
        assert_eq!(ExportFormat::Jpeg.extension(), "jpg");
        assert!(ExportFormat::Jpeg.is_lossy());
        assert!(!ExportFormat::WebP.is_lossy());
        assert_eq!(ExportFormat::all().len(), 3);
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("PNG".parse::<ExportFormat>().unwrap(), ExportFormat::Png);
        assert_eq!("image/jpeg".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
        assert_eq!("jpg".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
        assert!(matches!(
            "tiff".parse::<ExportFormat>(),
            Err(EditorError::UnknownExportFormat(_))
        ));
        assert_eq!(ExportFormat::from_file_name("out/a.webp"), Some(ExportFormat::WebP));
        assert_eq!(ExportFormat::from_file_name("noext"), None);
    }

    #[test]
    fn test_encode_png_magic() {
        let raster = Raster::filled(4, 4, [1, 2, 3, 255]);
        let bytes = encode(&raster, ExportFormat::Png, 90).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_encode_jpeg_drops_alpha() {
        let raster = Raster::filled(8, 8, [120, 60, 30, 40]);
        let bytes = encode(&raster, ExportFormat::Jpeg, 80).unwrap();
        assert!(bytes.starts_with(&[0xFF, 0xD8, 0xFF]));

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn test_encode_webp_lossless() {
        let raster = Raster::filled(3, 3, [9, 8, 7, 200]);
        let bytes = encode(&raster, ExportFormat::WebP, 0).unwrap();
        assert!(bytes.starts_with(b"RIFF"));
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(Raster::from(decoded), raster);
    }

    #[test]
    fn test_suggested_file_name() {
        let name = suggested_file_name(ExportFormat::Jpeg);
        assert!(name.starts_with("mosaic_"));
        assert!(name.ends_with(".jpg"));
    }
}
