//! Block-average pixelation.
//!
//! The raster is cut into `block_size × block_size` tiles anchored at the
//! origin; tiles on the right and bottom edges are clipped, never padded.
//! Each tile's R, G and B means (rounded to nearest) replace the tile's
//! colors. Alpha is never touched.
//!
//! With a mask, tiles without any selected pixel are skipped. A tile with at
//! least one selected pixel is still averaged over *all* of its pixels, and
//! only its selected pixels receive the mean.

use crate::model::{CHANNELS, Mask, Raster};

/// Pixelate `source` and return the result. `source` is never modified.
///
/// A block size of 0 is treated as 1.
pub fn apply_mosaic(source: &Raster, block_size: u32, mask: Option<&Mask>) -> Raster {
    let bs = block_size.max(1);
    let (width, height) = source.dimensions();
    let mut output = source.clone();
    if source.is_empty() {
        return output;
    }

    let mut tiles_written = 0usize;
    for ty in (0..height).step_by(bs as usize) {
        let y_end = ty.saturating_add(bs).min(height);
        for tx in (0..width).step_by(bs as usize) {
            let x_end = tx.saturating_add(bs).min(width);

            if let Some(mask) = mask
                && !mask.any_selected_in(tx, ty, x_end, y_end)
            {
                continue;
            }

            let mean = tile_mean(source, tx, ty, x_end, y_end);
            fill_tile(&mut output, mask, mean, tx, ty, x_end, y_end);
            tiles_written += 1;
        }
    }

    log::debug!(
        "Mosaic {}x{} with block size {}: {} tiles written{}",
        width,
        height,
        bs,
        tiles_written,
        if mask.is_some() { " (masked)" } else { "" }
    );
    output
}

/// Rounded R, G, B means over every pixel of the tile `[x0, x1) × [y0, y1)`.
fn tile_mean(source: &Raster, x0: u32, y0: u32, x1: u32, y1: u32) -> [u8; 3] {
    let pixels = source.pixels();
    let mut sums = [0u64; 3];
    for y in y0..y1 {
        let row_start = source.offset(x0, y);
        let row_end = source.offset(x1 - 1, y) + CHANNELS;
        for px in pixels[row_start..row_end].chunks_exact(CHANNELS) {
            sums[0] += u64::from(px[0]);
            sums[1] += u64::from(px[1]);
            sums[2] += u64::from(px[2]);
        }
    }
    let count = u64::from(x1 - x0) * u64::from(y1 - y0);
    // Round half up: (sum + count / 2) / count
    sums.map(|sum| ((sum + count / 2) / count) as u8)
}

fn fill_tile(
    output: &mut Raster,
    mask: Option<&Mask>,
    mean: [u8; 3],
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
) {
    for y in y0..y1 {
        for x in x0..x1 {
            if let Some(mask) = mask
                && !mask.is_selected(x, y)
            {
                continue;
            }
            let i = output.offset(x, y);
            output.pixels_mut()[i..i + 3].copy_from_slice(&mean);
        }
    }
}
