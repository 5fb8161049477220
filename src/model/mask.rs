//! Single-channel selection mask.

use crate::constants::{MASK_SELECTED, MASK_THRESHOLD, MASK_UNSELECTED};

/// Per-pixel selection membership, one byte per pixel, row-major.
///
/// Values above [`MASK_THRESHOLD`] count as selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Mask {
    /// A mask with nothing selected.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![MASK_UNSELECTED; width as usize * height as usize],
        }
    }

    /// A mask with every pixel selected.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![MASK_SELECTED; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Whether `(x, y)` is selected. Pixels outside the mask are unselected.
    #[inline]
    pub fn is_selected(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.data[self.index(x, y)] > MASK_THRESHOLD
    }

    /// Mark `(x, y)` selected or unselected. Out-of-range writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, selected: bool) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.data[i] = if selected {
                MASK_SELECTED
            } else {
                MASK_UNSELECTED
            };
        }
    }

    /// Mark the half-open span `[x0, x1)` of row `y` as selected.
    pub(crate) fn fill_span(&mut self, y: u32, x0: u32, x1: u32) {
        if y >= self.height {
            return;
        }
        let x1 = x1.min(self.width);
        if x0 >= x1 {
            return;
        }
        let start = self.index(x0, y);
        let end = self.index(x1 - 1, y) + 1;
        self.data[start..end].fill(MASK_SELECTED);
    }

    /// Whether any pixel in the half-open box `[x0, x1) × [y0, y1)` is selected.
    pub fn any_selected_in(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> bool {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        (y0..y1).any(|y| (x0..x1).any(|x| self.is_selected(x, y)))
    }

    /// Number of selected pixels.
    pub fn selected_count(&self) -> usize {
        self.data.iter().filter(|&&v| v > MASK_THRESHOLD).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_full() {
        assert_eq!(Mask::empty(4, 3).selected_count(), 0);
        assert_eq!(Mask::full(4, 3).selected_count(), 12);
    }

    #[test]
    fn test_threshold_and_bounds() {
        let mut mask = Mask::empty(2, 2);
        mask.set(1, 0, true);
        assert!(mask.is_selected(1, 0));
        assert!(!mask.is_selected(0, 0));
        assert!(!mask.is_selected(5, 5));

        mask.data[0] = MASK_THRESHOLD;
        assert!(!mask.is_selected(0, 0));
        mask.data[0] = MASK_THRESHOLD + 1;
        assert!(mask.is_selected(0, 0));
    }

    #[test]
    fn test_fill_span_clips() {
        let mut mask = Mask::empty(5, 2);
        mask.fill_span(1, 3, 10);
        assert_eq!(mask.selected_count(), 2);
        assert!(mask.is_selected(3, 1));
        assert!(mask.is_selected(4, 1));
        mask.fill_span(7, 0, 5);
        assert_eq!(mask.selected_count(), 2);
    }

    #[test]
    fn test_any_selected_in() {
        let mut mask = Mask::empty(10, 10);
        mask.set(7, 7, true);
        assert!(mask.any_selected_in(5, 5, 10, 10));
        assert!(!mask.any_selected_in(0, 0, 5, 5));
        assert!(mask.any_selected_in(7, 7, 8, 8));
    }
}
