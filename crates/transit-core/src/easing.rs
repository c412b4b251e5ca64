//! Interpolators for animation timing.
//!
//! An interpolator maps linear progress (0.0 to 1.0) to eased progress:
//! - `Linear`
//! - `Decelerate` (fast start, slowing down; factor 1.5 is a cubic ease-out)
//! - `FadeOut` (linear over a leading fraction, then held at 1.0)
//! - `CubicBezier` (custom bezier curves, mostly for loaded resources)
//!
//! # Usage
//!
//! ```
//! use transit_core::easing::Interpolator;
//!
//! let decelerate = Interpolator::Decelerate { factor: 1.5 };
//! assert!(decelerate.evaluate(0.5) > 0.5);
//!
//! let fade = Interpolator::FadeOut { fraction: 0.25 };
//! assert_eq!(fade.evaluate(0.5), 1.0);
//! ```

use serde::{Deserialize, Serialize};

/// Timing curve applied to an animation's progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Interpolator {
    /// Linear interpolation (no easing).
    Linear,

    /// Decelerating curve: `1 - (1 - t)^(2 * factor)`.
    Decelerate { factor: f32 },

    /// Linear ramp over `[0, fraction)`, complete after that.
    FadeOut { fraction: f32 },

    /// Custom cubic bezier curve.
    /// Parameters: (x1, y1, x2, y2) - control points.
    /// x values must be in [0, 1], y values can be any float.
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Default for Interpolator {
    fn default() -> Self {
        Self::Linear
    }
}

impl Interpolator {
    /// Evaluate the interpolator at the given progress.
    ///
    /// Input is clamped to `[0, 1]`.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match *self {
            Self::Linear => t,
            Self::Decelerate { factor } => {
                if factor == 1.0 {
                    1.0 - (1.0 - t) * (1.0 - t)
                } else {
                    1.0 - (1.0 - t).powf(2.0 * factor)
                }
            }
            Self::FadeOut { fraction } => {
                if t < fraction {
                    t / fraction
                } else {
                    1.0
                }
            }
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(x1, y1, x2, y2, t),
        }
    }

    /// Create a custom cubic bezier interpolator.
    ///
    /// Returns `None` if x1 or x2 are outside [0, 1].
    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Option<Self> {
        let valid = (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2);
        valid.then_some(Self::CubicBezier { x1, y1, x2, y2 })
    }
}

/// Evaluate a cubic bezier curve at time t.
///
/// Uses Newton-Raphson iteration to find the curve parameter for the input
/// progress, then evaluates the y coordinate at that parameter.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, progress: f32) -> f32 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    let t = solve_bezier_x(x1, x2, progress);
    bezier_coord(y1, y2, t)
}

fn solve_bezier_x(x1: f32, x2: f32, target_x: f32) -> f32 {
    let mut t = target_x;

    for _ in 0..8 {
        let x = bezier_coord(x1, x2, t) - target_x;
        if x.abs() < 1e-6 {
            break;
        }

        let dx = bezier_x_derivative(x1, x2, t);
        if dx.abs() < 1e-6 {
            break;
        }

        t -= x / dx;
        t = t.clamp(0.0, 1.0);
    }

    t
}

/// One coordinate of the curve at parameter t:
/// `3(1-t)²t·p1 + 3(1-t)t²·p2 + t³`
#[inline]
fn bezier_coord(p1: f32, p2: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;

    3.0 * mt2 * t * p1 + 3.0 * mt * t2 * p2 + t3
}

/// dx/dt = 3(1-t)²·x1 + 6(1-t)t·(x2-x1) + 3t²·(1-x2)
#[inline]
fn bezier_x_derivative(x1: f32, x2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * x1 + 6.0 * mt * t * (x2 - x1) + 3.0 * t * t * (1.0 - x2)
}
