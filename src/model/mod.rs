//! Data models for the mosaic editor.

mod geometry;
mod mask;
mod raster;

pub use geometry::{Path, Point, RectangleRegion};
pub use mask::Mask;
pub use raster::{CHANNELS, Raster};
