//! Axis-aligned rectangle geometry for walls, blocks, paddle and ball bounds
//!
//! Screen convention: `x`/`y` is the top-left corner, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Bounding box of a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Degenerate rectangles never collide
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// True if the interiors overlap (touching edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Overlapping region, if any
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::new(x, y, right - x, bottom - y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn test_intersection_region() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(6.0, 8.0, 10.0, 10.0);
        let i = a.intersection(&b).unwrap();
        assert_eq!(i, Rect::new(6.0, 8.0, 4.0, 2.0));
    }

    #[test]
    fn test_empty_rect_never_intersects() {
        let a = Rect::new(0.0, 0.0, 0.0, 10.0);
        let b = Rect::new(-5.0, -5.0, 20.0, 20.0);
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
    }

    #[test]
    fn test_around_circle() {
        let r = Rect::around_circle(Vec2::new(50.0, 40.0), 5.0);
        assert_eq!(r, Rect::new(45.0, 35.0, 10.0, 10.0));
    }

    proptest! {
        #[test]
        fn intersection_is_symmetric_and_contained(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0, aw in 0.5f32..80.0, ah in 0.5f32..80.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0, bw in 0.5f32..80.0, bh in 0.5f32..80.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
            if let Some(i) = a.intersection(&b) {
                prop_assert!(i.w > 0.0 && i.h > 0.0);
                prop_assert!(i.w <= aw + 1e-3 && i.w <= bw + 1e-3);
                prop_assert!(i.h <= ah + 1e-3 && i.h <= bh + 1e-3);
            }
        }
    }
}
