//! Selection to pixel mask conversion.
//!
//! A pixel belongs to the selection when its centre `(px + 0.5, py + 0.5)`
//! lies inside the geometry.

use crate::error::{EditorError, Result};
use crate::model::{Mask, Path, RectangleRegion};
use crate::selection::{Selection, SelectionGeometry, SelectionMode};

/// Build a `width × height` mask for a confirmed selection.
///
/// Full mode selects everything. Fails with `InvalidOperation` if the
/// selection is not usable.
pub fn rasterize(selection: &Selection, width: u32, height: u32) -> Result<Mask> {
    if !selection.has_selection() {
        return Err(EditorError::invalid_operation(
            "cannot build a mask without a confirmed selection",
        ));
    }

    if selection.mode == SelectionMode::Full {
        return Ok(Mask::full(width, height));
    }

    let mut mask = Mask::empty(width, height);
    match &selection.geometry {
        Some(SelectionGeometry::Rectangle(region)) => fill_rectangle(&mut mask, region),
        Some(SelectionGeometry::Freehand(path)) => fill_polygon(&mut mask, path),
        None => {}
    }
    log::trace!(
        "Rasterized {} selection: {} of {} pixels",
        selection.mode.name(),
        mask.selected_count(),
        width as usize * height as usize
    );
    Ok(mask)
}

/// First pixel index whose centre is at or right of `edge`, clamped to `[0, limit]`.
fn first_pixel_at_or_after(edge: f32, limit: u32) -> u32 {
    (edge - 0.5).ceil().clamp(0.0, limit as f32) as u32
}

fn fill_rectangle(mask: &mut Mask, region: &RectangleRegion) {
    let x0 = first_pixel_at_or_after(region.x, mask.width());
    let x1 = first_pixel_at_or_after(region.right(), mask.width());
    let y0 = first_pixel_at_or_after(region.y, mask.height());
    let y1 = first_pixel_at_or_after(region.bottom(), mask.height());
    for y in y0..y1 {
        mask.fill_span(y, x0, x1);
    }
}

/// Even-odd scanline fill. Agrees with [`Path::contains`] at pixel centres.
fn fill_polygon(mask: &mut Mask, path: &Path) {
    let vertices = path.points();
    if vertices.len() < 3 {
        return;
    }
    let Some(bounds) = path.bounds() else {
        return;
    };
    let y0 = first_pixel_at_or_after(bounds.y, mask.height());
    let y1 = first_pixel_at_or_after(bounds.bottom(), mask.height());

    let mut crossings: Vec<f32> = Vec::with_capacity(vertices.len());
    for py in y0..y1 {
        let cy = py as f32 + 0.5;
        crossings.clear();

        let mut j = vertices.len() - 1;
        for i in 0..vertices.len() {
            let (a, b) = (vertices[i], vertices[j]);
            if (a.y > cy) != (b.y > cy) {
                crossings.push(a.x + (cy - a.y) * (b.x - a.x) / (b.y - a.y));
            }
            j = i;
        }
        crossings.sort_by(f32::total_cmp);

        for pair in crossings.chunks_exact(2) {
            let x0 = first_pixel_at_or_after(pair[0], mask.width());
            let x1 = first_pixel_at_or_after(pair[1], mask.width());
            mask.fill_span(py, x0, x1);
        }
    }
}
