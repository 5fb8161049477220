//! Global constants for the mosaic editor

/// Smallest mosaic block size offered to the user
pub const MIN_BLOCK_SIZE: u32 = 5;

/// Largest mosaic block size offered to the user
pub const MAX_BLOCK_SIZE: u32 = 50;

/// Block size used until the user picks another one
pub const DEFAULT_BLOCK_SIZE: u32 = 10;

/// Number of raster snapshots kept for undo/redo
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Minimum width and height (image pixels) of a rectangle selection
pub const MIN_RECT_SELECTION_SIZE: f32 = 5.0;

/// Minimum number of recorded points for a freehand selection
pub const MIN_FREEHAND_POINTS: usize = 10;

/// Mask value written for selected pixels
pub const MASK_SELECTED: u8 = 255;

/// Mask value written for unselected pixels
pub const MASK_UNSELECTED: u8 = 0;

/// Mask values strictly above this count as selected (half of max intensity)
pub const MASK_THRESHOLD: u8 = 127;

/// Default JPEG quality for exports
pub const DEFAULT_EXPORT_QUALITY: u8 = 92;
