//! Pixel processing: selection masks and the mosaic filter.

mod mask;
mod mosaic;

pub use mask::rasterize;
pub use mosaic::apply_mosaic;
