//! Animation descriptors produced for a transition.
//!
//! An [`Animation`] is a passive description: a tree of scale and alpha
//! effects plus the timing attributes the playback engine needs (duration,
//! root interpolator, fill-after, wallpaper detachment, z-order and the frame
//! size it was initialized against). Playback lives elsewhere; [`Animation::sample`]
//! evaluates a single instant for inspection and snapshots.

use serde::{Deserialize, Serialize};

use crate::easing::Interpolator;
use crate::transform::{Transform2D, Transformation};

/// Z-ordering adjustment applied while the animation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZOrder {
    /// Keep the window's normal stacking position.
    #[default]
    Normal,
    /// Draw above sibling windows for the duration.
    Top,
}

/// Size the animation was initialized against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub parent_width: u32,
    pub parent_height: u32,
}

/// Non-uniform scale about an absolute pivot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleEffect {
    pub from_x: f32,
    pub to_x: f32,
    pub from_y: f32,
    pub to_y: f32,
    pub pivot_x: f32,
    pub pivot_y: f32,
    /// Own timing curve; ignored when an enclosing set shares its interpolator.
    pub interpolator: Option<Interpolator>,
}

impl ScaleEffect {
    pub fn new(from: (f32, f32), to: (f32, f32), pivot: (f32, f32)) -> Self {
        Self {
            from_x: from.0,
            to_x: to.0,
            from_y: from.1,
            to_y: to.1,
            pivot_x: pivot.0,
            pivot_y: pivot.1,
            interpolator: None,
        }
    }

    pub fn with_interpolator(mut self, interpolator: Interpolator) -> Self {
        self.interpolator = Some(interpolator);
        self
    }

    fn transformation(&self, eased: f32) -> Transformation {
        let sx = self.from_x + (self.to_x - self.from_x) * eased;
        let sy = self.from_y + (self.to_y - self.from_y) * eased;
        Transformation {
            matrix: Transform2D::scale_about(sx, sy, self.pivot_x, self.pivot_y),
            alpha: 1.0,
        }
    }
}

/// Opacity ramp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlphaEffect {
    pub from: f32,
    pub to: f32,
    pub interpolator: Option<Interpolator>,
}

impl AlphaEffect {
    pub fn new(from: f32, to: f32) -> Self {
        Self {
            from,
            to,
            interpolator: None,
        }
    }

    pub fn with_interpolator(mut self, interpolator: Interpolator) -> Self {
        self.interpolator = Some(interpolator);
        self
    }

    /// An alpha ramp that starts and ends fully opaque.
    pub fn is_hold(&self) -> bool {
        self.from == 1.0 && self.to == 1.0
    }

    fn transformation(&self, eased: f32) -> Transformation {
        Transformation {
            matrix: Transform2D::identity(),
            alpha: self.from + (self.to - self.from) * eased,
        }
    }
}

/// Effects played together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSet {
    /// When true, every child uses the enclosing interpolator instead of its own.
    pub share_interpolator: bool,
    pub children: Vec<Effect>,
}

impl EffectSet {
    pub fn new(share_interpolator: bool) -> Self {
        Self {
            share_interpolator,
            children: Vec::new(),
        }
    }

    pub fn with(mut self, effect: impl Into<Effect>) -> Self {
        self.children.push(effect.into());
        self
    }
}

/// A node in the effect tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    Scale(ScaleEffect),
    Alpha(AlphaEffect),
    Set(EffectSet),
}

impl From<ScaleEffect> for Effect {
    fn from(effect: ScaleEffect) -> Self {
        Self::Scale(effect)
    }
}

impl From<AlphaEffect> for Effect {
    fn from(effect: AlphaEffect) -> Self {
        Self::Alpha(effect)
    }
}

impl From<EffectSet> for Effect {
    fn from(effect: EffectSet) -> Self {
        Self::Set(effect)
    }
}

impl Effect {
    /// First scale effect in depth-first order.
    pub fn find_scale(&self) -> Option<&ScaleEffect> {
        match self {
            Self::Scale(scale) => Some(scale),
            Self::Alpha(_) => None,
            Self::Set(set) => set.children.iter().find_map(Self::find_scale),
        }
    }

    /// First alpha effect in depth-first order.
    pub fn find_alpha(&self) -> Option<&AlphaEffect> {
        match self {
            Self::Scale(_) => None,
            Self::Alpha(alpha) => Some(alpha),
            Self::Set(set) => set.children.iter().find_map(Self::find_alpha),
        }
    }

    fn sample(
        &self,
        progress: f32,
        shared: Option<Interpolator>,
        fallback: Interpolator,
    ) -> Transformation {
        let resolve = |own: Option<Interpolator>| shared.or(own).unwrap_or(fallback);
        match self {
            Self::Scale(scale) => scale.transformation(resolve(scale.interpolator).evaluate(progress)),
            Self::Alpha(alpha) => alpha.transformation(resolve(alpha.interpolator).evaluate(progress)),
            Self::Set(set) => {
                let (shared, fallback) = if set.share_interpolator {
                    (Some(shared.unwrap_or(fallback)), fallback)
                } else {
                    (None, Interpolator::Linear)
                };
                let mut acc = Transformation::identity();
                for child in &set.children {
                    acc.compose(&child.sample(progress, shared, fallback));
                }
                acc
            }
        }
    }
}

/// A complete, ready-to-play animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub effect: Effect,
    pub duration_ms: u64,
    /// Root timing curve. Applies to a leaf effect, or to every child of a
    /// set that shares its interpolator.
    pub interpolator: Interpolator,
    /// Hold the final state after the animation completes.
    pub fill_after: bool,
    /// Keep the wallpaper static behind the animated window.
    pub detach_wallpaper: bool,
    pub z_order: ZOrder,
    pub frame: Option<Frame>,
}

impl Animation {
    pub fn new(effect: impl Into<Effect>) -> Self {
        Self {
            effect: effect.into(),
            duration_ms: 0,
            interpolator: Interpolator::Linear,
            fill_after: false,
            detach_wallpaper: false,
            z_order: ZOrder::Normal,
            frame: None,
        }
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_interpolator(mut self, interpolator: Interpolator) -> Self {
        self.interpolator = interpolator;
        self
    }

    pub fn with_fill_after(mut self, fill_after: bool) -> Self {
        self.fill_after = fill_after;
        self
    }

    pub fn with_detach_wallpaper(mut self, detach: bool) -> Self {
        self.detach_wallpaper = detach;
        self
    }

    pub fn with_z_order(mut self, z_order: ZOrder) -> Self {
        self.z_order = z_order;
        self
    }

    /// Record the window and parent sizes the animation runs against.
    pub fn initialize(&mut self, width: u32, height: u32, parent_width: u32, parent_height: u32) {
        self.frame = Some(Frame {
            width,
            height,
            parent_width,
            parent_height,
        });
    }

    pub fn is_initialized(&self) -> bool {
        self.frame.is_some()
    }

    /// The animation's scale effect, searching inside sets.
    pub fn scale_range(&self) -> Option<&ScaleEffect> {
        self.effect.find_scale()
    }

    /// The animation's alpha effect, searching inside sets.
    pub fn alpha_range(&self) -> Option<&AlphaEffect> {
        self.effect.find_alpha()
    }

    /// Evaluate the animation at normalized `progress` in `[0, 1]`.
    pub fn sample(&self, progress: f32) -> Transformation {
        let progress = progress.clamp(0.0, 1.0);
        self.effect.sample(progress, None, self.interpolator)
    }
}
