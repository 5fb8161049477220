//! Image acquisition: turning encoded files into rasters.

mod loader;

pub use loader::{IMAGE_EXTENSIONS, ImageLoader, is_image_filename};
