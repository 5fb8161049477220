//! Pointer-to-image coordinate mapping.
//!
//! The displayed image is usually scaled by the page (CSS size vs. natural
//! size), so pointer positions have to be rescaled before they can be used as
//! image pixels.

use crate::model::Point;

/// On-screen bounding box of the element showing the image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementBounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ElementBounds {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Pointer position in client (viewport) coordinates.
///
/// Mouse and touch input are both reduced to this shape so they map identically.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub client_x: f32,
    pub client_y: f32,
}

impl PointerEvent {
    pub fn new(client_x: f32, client_y: f32) -> Self {
        Self { client_x, client_y }
    }

    /// From a mouse event's client position.
    pub fn from_mouse(client_x: f32, client_y: f32) -> Self {
        Self::new(client_x, client_y)
    }

    /// From the first active touch of a touch event.
    pub fn from_touch(touches: &[(f32, f32)]) -> Option<Self> {
        touches.first().map(|&(x, y)| Self::new(x, y))
    }
}

/// Map a pointer position to image pixels, clamped to `[0, width] × [0, height]`.
///
/// A zero-sized element, or any non-finite bound or pointer coordinate,
/// maps to the origin.
pub fn map_event_to_image_point(
    event: PointerEvent,
    bounds: ElementBounds,
    raster_width: u32,
    raster_height: u32,
) -> Point {
    let max_x = raster_width as f32;
    let max_y = raster_height as f32;

    let finite = [
        bounds.left,
        bounds.top,
        bounds.width,
        bounds.height,
        event.client_x,
        event.client_y,
    ]
    .iter()
    .all(|v| v.is_finite());
    if !finite || !(bounds.width > 0.0 && bounds.height > 0.0) {
        return Point::default();
    }

    let scale_x = max_x / bounds.width;
    let scale_y = max_y / bounds.height;

    let x = (event.client_x - bounds.left) * scale_x;
    let y = (event.client_y - bounds.top) * scale_y;

    Point::new(x.clamp(0.0, max_x), y.clamp(0.0, max_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.001
    }

    #[test]
    fn test_identity_mapping() {
        let bounds = ElementBounds::new(0.0, 0.0, 100.0, 50.0);
        let p = map_event_to_image_point(PointerEvent::new(40.0, 20.0), bounds, 100, 50);
        assert!(approx_eq(p.x, 40.0));
        assert!(approx_eq(p.y, 20.0));
    }

    #[test]
    fn test_scaled_and_offset_element() {
        // 800x600 image shown at 400x300, element placed at (10, 20)
        let bounds = ElementBounds::new(10.0, 20.0, 400.0, 300.0);
        let p = map_event_to_image_point(PointerEvent::new(110.0, 170.0), bounds, 800, 600);
        assert!(approx_eq(p.x, 200.0));
        assert!(approx_eq(p.y, 300.0));
    }

    #[test]
    fn test_clamps_to_image_bounds() {
        let bounds = ElementBounds::new(10.0, 10.0, 100.0, 100.0);
        let before = map_event_to_image_point(PointerEvent::new(0.0, -50.0), bounds, 200, 200);
        assert_eq!(before, Point::new(0.0, 0.0));

        let after = map_event_to_image_point(PointerEvent::new(500.0, 500.0), bounds, 200, 200);
        assert_eq!(after, Point::new(200.0, 200.0));
    }

    #[test]
    fn test_touch_matches_mouse() {
        let bounds = ElementBounds::new(5.0, 5.0, 50.0, 50.0);
        let mouse = PointerEvent::from_mouse(30.0, 40.0);
        let touch = PointerEvent::from_touch(&[(30.0, 40.0), (1.0, 1.0)]).unwrap();
        assert_eq!(
            map_event_to_image_point(mouse, bounds, 100, 100),
            map_event_to_image_point(touch, bounds, 100, 100)
        );
        assert!(PointerEvent::from_touch(&[]).is_none());
    }

    #[test]
    fn test_zero_sized_element() {
        let bounds = ElementBounds::new(0.0, 0.0, 0.0, 10.0);
        let p = map_event_to_image_point(PointerEvent::new(5.0, 5.0), bounds, 10, 10);
        assert_eq!(p, Point::default());
    }

    #[test]
    fn test_non_finite_input_maps_to_origin() {
        let bounds = ElementBounds::new(0.0, 0.0, 20.0, 20.0);
        let p = map_event_to_image_point(PointerEvent::new(f32::NAN, 5.0), bounds, 20, 20);
        assert_eq!(p, Point::default());
        let p = map_event_to_image_point(PointerEvent::new(5.0, f32::INFINITY), bounds, 20, 20);
        assert_eq!(p, Point::default());

        let nan_width = ElementBounds::new(0.0, 0.0, f32::NAN, 20.0);
        let p = map_event_to_image_point(PointerEvent::new(5.0, 5.0), nan_width, 20, 20);
        assert_eq!(p, Point::default());

        let nan_left = ElementBounds::new(f32::NAN, 0.0, 20.0, 20.0);
        let p = map_event_to_image_point(PointerEvent::new(5.0, 5.0), nan_left, 20, 20);
        assert!(p.is_finite());
    }
}
