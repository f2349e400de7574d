//! Clipping of a textured rectangle against a bounding rectangle.
//!
//! Each side is handled independently in the order left, right, top,
//! bottom. Clipping a leading edge (left/top) moves the position and the
//! UV origin; clipping a trailing edge (right/bottom) only shrinks the
//! size and the UV extent. The UV rectangle shrinks by the same
//! proportion as the geometry on that axis.

use crate::geometry::{Rect, Vec2};

/// Clip `position`/`size`/`uv` so the object fits inside `bounds`.
///
/// Returns `true` if any of the three were changed.
///
/// Objects with a zero extent on a clipped axis are a caller error: the
/// overflow ratio divides by the size on that axis.
pub fn clip(bounds: &Rect, position: &mut Vec2, size: &mut Vec2, uv: &mut Rect) -> bool {
    let mut changed = false;

    // Left.
    if position.x < bounds.x {
        debug_assert!(size.x != 0.0, "clip: zero-width object");
        let delta = bounds.x - position.x;
        let ratio = delta / size.x;

        uv.x += uv.width * ratio;
        uv.width -= uv.width * ratio;

        position.x = bounds.x;
        size.x -= delta;
        changed = true;
    }

    // Right.
    if position.x + size.x > bounds.right() {
        debug_assert!(size.x != 0.0, "clip: zero-width object");
        let delta = position.x + size.x - bounds.right();
        let ratio = delta / size.x;

        uv.width -= uv.width * ratio;

        size.x -= delta;
        changed = true;
    }

    // Top.
    if position.y < bounds.y {
        debug_assert!(size.y != 0.0, "clip: zero-height object");
        let delta = bounds.y - position.y;
        let ratio = delta / size.y;

        uv.y += uv.height * ratio;
        uv.height -= uv.height * ratio;

        position.y = bounds.y;
        size.y -= delta;
        changed = true;
    }

    // Bottom.
    if position.y + size.y > bounds.bottom() {
        debug_assert!(size.y != 0.0, "clip: zero-height object");
        let delta = position.y + size.y - bounds.bottom();
        let ratio = delta / size.y;

        uv.height -= uv.height * ratio;

        size.y -= delta;
        changed = true;
    }

    changed
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_inside_is_untouched() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut pos = Vec2::new(10.0, 10.0);
        let mut size = Vec2::new(50.0, 50.0);
        let mut uv = Rect::new(0.25, 0.25, 0.5, 0.5);

        assert!(!clip(&bounds, &mut pos, &mut size, &mut uv));
        assert_eq!(pos, Vec2::new(10.0, 10.0));
        assert_eq!(size, Vec2::new(50.0, 50.0));
        assert_eq!(uv, Rect::new(0.25, 0.25, 0.5, 0.5));
    }

    #[test]
    fn test_touching_edges_is_untouched() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut pos = Vec2::ZERO;
        let mut size = Vec2::new(100.0, 100.0);
        let mut uv = Rect::UNIT;
        assert!(!clip(&bounds, &mut pos, &mut size, &mut uv));
    }

    #[test]
    fn test_clip_left() {
        let bounds = Rect::new(10.0, 0.0, 100.0, 100.0);
        let mut pos = Vec2::new(0.0, 0.0);
        let mut size = Vec2::new(40.0, 20.0);
        let mut uv = Rect::UNIT;

        assert!(clip(&bounds, &mut pos, &mut size, &mut uv));
        assert!(approx(pos.x, 10.0));
        assert!(approx(size.x, 30.0));
        assert!(approx(uv.x, 0.25));
        assert!(approx(uv.width, 0.75));
        // Other axis untouched.
        assert!(approx(size.y, 20.0));
        assert!(approx(uv.height, 1.0));
    }

    #[test]
    fn test_clip_right() {
        let bounds = Rect::new(0.0, 0.0, 30.0, 100.0);
        let mut pos = Vec2::new(10.0, 0.0);
        let mut size = Vec2::new(40.0, 20.0);
        let mut uv = Rect::new(0.0, 0.0, 0.5, 1.0);

        assert!(clip(&bounds, &mut pos, &mut size, &mut uv));
        assert!(approx(pos.x, 10.0), "trailing clip must not move position");
        assert!(approx(size.x, 20.0));
        assert!(approx(uv.x, 0.0));
        assert!(approx(uv.width, 0.25));
    }

    #[test]
    fn test_clip_top() {
        let bounds = Rect::new(0.0, 5.0, 100.0, 100.0);
        let mut pos = Vec2::new(0.0, 0.0);
        let mut size = Vec2::new(10.0, 20.0);
        let mut uv = Rect::UNIT;

        assert!(clip(&bounds, &mut pos, &mut size, &mut uv));
        assert!(approx(pos.y, 5.0));
        assert!(approx(size.y, 15.0));
        assert!(approx(uv.y, 0.25));
        assert!(approx(uv.height, 0.75));
    }

    #[test]
    fn test_clip_bottom() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 15.0);
        let mut pos = Vec2::new(0.0, 5.0);
        let mut size = Vec2::new(10.0, 20.0);
        let mut uv = Rect::UNIT;

        assert!(clip(&bounds, &mut pos, &mut size, &mut uv));
        assert!(approx(pos.y, 5.0));
        assert!(approx(size.y, 10.0));
        assert!(approx(uv.y, 0.0));
        assert!(approx(uv.height, 0.5));
    }

    #[test]
    fn test_clip_all_sides_shrinks_to_bounds() {
        let bounds = Rect::new(10.0, 20.0, 50.0, 40.0);
        let mut pos = Vec2::new(0.0, 0.0);
        let mut size = Vec2::new(100.0, 100.0);
        let mut uv = Rect::UNIT;

        assert!(clip(&bounds, &mut pos, &mut size, &mut uv));
        assert!(approx(pos.x, 10.0));
        assert!(approx(pos.y, 20.0));
        assert!(approx(size.x, 50.0));
        assert!(approx(size.y, 40.0));
        // UV covers the same fraction of the source as the geometry did.
        assert!(approx(uv.x, 0.1));
        assert!(approx(uv.y, 0.2));
        assert!(approx(uv.width, 0.5));
        assert!(approx(uv.height, 0.4));
    }
}
