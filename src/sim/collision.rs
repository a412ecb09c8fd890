//! Axis-aligned box collision
//!
//! Everything in the game is an upright square, so a strict AABB overlap is
//! the whole story: touching edges do not count, any positive overlap does.

use glam::Vec2;

/// An axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Square with the given top-left corner and side length
    #[inline]
    pub fn square(min: Vec2, side: f32) -> Self {
        Self {
            min,
            size: Vec2::splat(side),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }
}

/// True iff the two rectangles share interior area
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.min.cmplt(b.max()).all() && a.max().cmpgt(b.min).all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(overlaps(&a, &Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(overlaps(&a, &Rect::new(2.0, 2.0, 2.0, 2.0)));
        assert!(!overlaps(&a, &Rect::new(20.0, 0.0, 5.0, 5.0)));
        assert!(!overlaps(&a, &Rect::new(0.0, 20.0, 5.0, 5.0)));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!overlaps(&a, &Rect::new(0.0, 10.0, 10.0, 10.0)));
        assert!(!overlaps(&a, &Rect::new(-10.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_overlap_needs_both_axes() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        // x overlaps, y does not
        assert!(!overlaps(&a, &Rect::new(5.0, 11.0, 10.0, 10.0)));
        // y overlaps, x does not
        assert!(!overlaps(&a, &Rect::new(11.0, 5.0, 10.0, 10.0)));
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0, aw in 0.0f32..100.0, ah in 0.0f32..100.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0, bw in 0.0f32..100.0, bh in 0.0f32..100.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }
    }
}
