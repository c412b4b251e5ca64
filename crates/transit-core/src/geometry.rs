//! Integer screen geometry and pivot math for scale transforms.

use serde::{Deserialize, Serialize};

/// Scale factors closer to 1.0 than this are treated as "no scaling".
const PIVOT_EPSILON: f32 = 0.0001;

/// A point in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner of the rectangle.
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Compute the pivot for a scale transform along one axis.
///
/// `start_offset` is the distance from the leading edge of the outer
/// rectangle to the leading edge of the inner one, and `final_scale` the
/// ratio between the inner and outer sizes. Scaling about the returned
/// coordinate maps the outer rectangle's edge onto the inner one's.
pub fn compute_pivot(start_offset: f32, final_scale: f32) -> f32 {
    let denom = final_scale - 1.0;
    if denom.abs() < PIVOT_EPSILON {
        return start_offset;
    }
    -start_offset / denom
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pivot_examples() {
        assert_eq!(compute_pivot(100.0, 2.0), -100.0);
        assert_eq!(compute_pivot(0.0, 0.5), 0.0);
        assert_eq!(compute_pivot(50.0, 0.5), 100.0);
    }

    #[test]
    fn test_pivot_near_unity_returns_offset() {
        assert_eq!(compute_pivot(42.0, 1.0), 42.0);
        assert_eq!(compute_pivot(42.0, 1.00005), 42.0);
        assert_eq!(compute_pivot(-7.0, 0.99995), -7.0);
    }

    #[test]
    fn test_pivot_is_fixed_point() {
        // Scaling the outer edge (0) about the pivot lands on the inner edge.
        let offset = 120.0;
        let scale = 0.25;
        let pivot = compute_pivot(offset, scale);
        let mapped = pivot + (0.0 - pivot) * scale;
        assert!((mapped - offset).abs() < 1e-3);
    }

    #[test]
    fn test_rect_origin() {
        let rect = Rect::new(10, 20, 30, 40);
        assert_eq!(rect.origin(), Point::new(10, 20));
    }
}
