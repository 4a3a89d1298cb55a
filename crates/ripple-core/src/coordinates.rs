//! Document/device pixels to the centered render space
//!
//! Pixel space has its origin at the top-left corner with y pointing down.
//! Centered space has its origin at the viewport center with y pointing up,
//! which is what the shared orthographic projection expects.

use crate::constants::{DEPTH_FAR, DEPTH_NEAR};
use glam::{Mat4, Vec2};

/// Map a pixel coordinate to centered space
pub fn to_centered(px: f32, py: f32, viewport_w: f32, viewport_h: f32) -> Vec2 {
    Vec2::new(px - viewport_w / 2.0, viewport_h / 2.0 - py)
}

/// Inverse of [`to_centered`]
pub fn from_centered(x: f32, y: f32, viewport_w: f32, viewport_h: f32) -> Vec2 {
    Vec2::new(x + viewport_w / 2.0, viewport_h / 2.0 - y)
}

/// Visible surface size in device pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size as floats, clamped to at least one pixel per axis
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width.max(1) as f32, self.height.max(1) as f32)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Map a pixel coordinate into this viewport's centered space
    pub fn to_centered(&self, px: f32, py: f32) -> Vec2 {
        let size = self.size();
        to_centered(px, py, size.x, size.y)
    }

    pub fn from_centered(&self, point: Vec2) -> Vec2 {
        let size = self.size();
        from_centered(point.x, point.y, size.x, size.y)
    }

    /// Projection bounds as `(left, right, bottom, top)`
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        let half = self.size() / 2.0;
        (-half.x, half.x, -half.y, half.y)
    }

    /// Orthographic projection shared by every pass
    pub fn projection(&self) -> Mat4 {
        let (left, right, bottom, top) = self.bounds();
        Mat4::orthographic_rh(left, right, bottom, top, DEPTH_NEAR, DEPTH_FAR)
    }
}

/// Layout rectangle of an element, in document pixels relative to the viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DocumentRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl DocumentRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    /// Center in pixel space
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Centered-space position (of the center) and size
    pub fn to_centered(&self, viewport: Viewport) -> (Vec2, Vec2) {
        let center = self.center();
        (viewport.to_centered(center.x, center.y), self.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_centered_corners() {
        assert_eq!(to_centered(0.0, 0.0, 800.0, 600.0), Vec2::new(-400.0, 300.0));
        assert_eq!(to_centered(800.0, 600.0, 800.0, 600.0), Vec2::new(400.0, -300.0));
        assert_eq!(to_centered(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
    }

    #[test]
    fn test_roundtrip() {
        let points = [(0.0, 0.0), (13.5, 977.25), (1919.0, 1079.0), (-20.0, 5000.0)];
        for (px, py) in points {
            let c = to_centered(px, py, 1920.0, 1080.0);
            let back = from_centered(c.x, c.y, 1920.0, 1080.0);
            assert!((back.x - px).abs() < 1e-3, "x mismatch for {px}");
            assert!((back.y - py).abs() < 1e-3, "y mismatch for {py}");
        }
    }

    #[test]
    fn test_rect_center_mapping() {
        let viewport = Viewport::new(800, 600);
        let rect = DocumentRect::new(100.0, 50.0, 200.0, 100.0);
        let (pos, size) = rect.to_centered(viewport);
        // center (200, 100) -> (-200, 200)
        assert_eq!(pos, Vec2::new(-200.0, 200.0));
        assert_eq!(size, Vec2::new(200.0, 100.0));
    }

    #[test]
    fn test_projection_maps_bounds_to_clip_edges() {
        let viewport = Viewport::new(800, 600);
        let proj = viewport.projection();
        let top_right = proj.project_point3(glam::Vec3::new(400.0, 300.0, 0.0));
        let bottom_left = proj.project_point3(glam::Vec3::new(-400.0, -300.0, 0.0));
        assert!((top_right.x - 1.0).abs() < 1e-6 && (top_right.y - 1.0).abs() < 1e-6);
        assert!((bottom_left.x + 1.0).abs() < 1e-6 && (bottom_left.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_viewport_is_clamped() {
        let viewport = Viewport::new(0, 0);
        assert!(viewport.is_empty());
        assert_eq!(viewport.size(), Vec2::ONE);
        assert!(viewport.projection().is_finite());
    }
}
