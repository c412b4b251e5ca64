//! 2D affine transforms for sampling transition animations.
//!
//! ```
//! use transit_core::transform::Transform2D;
//!
//! // Half-size scale anchored at (100, 100).
//! let t = Transform2D::scale_about(0.5, 0.5, 100.0, 100.0);
//! assert_eq!(t.apply_point(100.0, 100.0), (100.0, 100.0));
//! ```

use serde::{Deserialize, Serialize};

/// A 2D affine transformation matrix.
///
/// Stored as a 3x2 matrix (the bottom row [0, 0, 1] is implicit):
/// ```text
/// | a  c  tx |
/// | b  d  ty |
/// | 0  0  1  |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    /// Create an identity transform (no change).
    pub const fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Create a translation transform.
    pub const fn translate(tx: f32, ty: f32) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx,
            ty,
        }
    }

    /// Create a non-uniform scale transform.
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Scale about a pivot point: translate to the pivot, scale, translate back.
    pub fn scale_about(sx: f32, sy: f32, px: f32, py: f32) -> Self {
        Self::translate(px, py)
            .then(&Self::scale(sx, sy))
            .then(&Self::translate(-px, -py))
    }

    /// Compose this transform with another (this * other).
    ///
    /// The resulting transform applies `other` first, then `self`.
    pub fn then(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            tx: self.a * other.tx + self.c * other.ty + self.tx,
            ty: self.b * other.tx + self.d * other.ty + self.ty,
        }
    }

    /// Apply this transform to a point.
    pub fn apply_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }

    /// Check if this is approximately an identity transform.
    pub fn is_identity(&self, epsilon: f32) -> bool {
        (self.a - 1.0).abs() < epsilon
            && self.b.abs() < epsilon
            && self.c.abs() < epsilon
            && (self.d - 1.0).abs() < epsilon
            && self.tx.abs() < epsilon
            && self.ty.abs() < epsilon
    }
}

/// The combined effect of an animation at one instant: a matrix and an alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    pub matrix: Transform2D,
    pub alpha: f32,
}

impl Default for Transformation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transformation {
    pub const fn identity() -> Self {
        Self {
            matrix: Transform2D::identity(),
            alpha: 1.0,
        }
    }

    /// Fold `other` into this transformation.
    ///
    /// Matrices are post-multiplied so later children apply closer to the
    /// content; alphas multiply.
    pub fn compose(&mut self, other: &Self) {
        self.matrix = self.matrix.then(&other.matrix);
        self.alpha *= other.alpha;
    }
}
