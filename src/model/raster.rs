//! CPU-side RGBA raster.

use image::RgbaImage;

use crate::error::{EditorError, Result};

/// Number of interleaved byte channels per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Decoded bitmap: `width * height` pixels, four bytes each, row-major.
///
/// `Clone` is a deep copy. The session relies on it to keep the live raster
/// and every history snapshot independent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Wrap an RGBA buffer, rejecting it if its length is not `width * height * 4`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if pixels.len() != Self::buffer_len(width, height) {
            return Err(EditorError::InvalidRaster {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a raster where every pixel has the same color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(Self::buffer_len(width, height))
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    fn buffer_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * CHANNELS
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw interleaved RGBA bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Consume the raster and return its buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Byte offset of pixel `(x, y)`. Caller guarantees the coordinates are in bounds.
    #[inline]
    pub(crate) fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Read one pixel, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.pixels[i..i + CHANNELS]);
        Some(out)
    }

    /// Write one pixel. Returns `false` (and does nothing) outside the raster.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let i = self.offset(x, y);
        self.pixels[i..i + CHANNELS].copy_from_slice(&rgba);
        true
    }

    /// Copy into an `image` buffer for encoding.
    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.pixels.clone()).ok_or(
            EditorError::InvalidRaster {
                width: self.width,
                height: self.height,
                len: self.pixels.len(),
            },
        )
    }
}

impl From<RgbaImage> for Raster {
    fn from(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }
}
