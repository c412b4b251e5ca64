//! Pending window-transition state and transition animation synthesis.
//!
//! This crate sits between the window stack (which decides that a transition
//! happens and supplies geometry) and the animation player (which drives the
//! resulting [`Animation`] frame by frame). It provides:
//! - **State**: the single pending transition record with its override and
//!   readiness flags
//! - **Synthesis**: scale-up and thumbnail zoom animations built from pivots,
//!   durations and interpolators
//! - **Resources**: the bridge from transition kinds to themed animations
//! - **Callbacks**: at-most-one outstanding "transition started" notification
//!
//! # Architecture
//!
//! ```text
//! AppTransition
//!   ├── TransitionState (kind, override, flags, CallbackDispatcher)
//!   └── Synthesizer
//!         ├── geometry::compute_pivot
//!         └── ResourceBridge ──► AttributeResolver / AnimationLoader
//! ```

pub mod animation;
pub mod callback;
pub mod controller;
pub mod dump;
pub mod easing;
pub mod geometry;
pub mod kind;
pub mod resources;
pub mod state;
pub mod synth;
pub mod transform;

pub use animation::{AlphaEffect, Animation, Effect, EffectSet, Frame, ScaleEffect, ZOrder};
pub use callback::{CallbackDispatcher, CallbackPoster, InlinePoster, StartedCallback};
pub use controller::AppTransition;
pub use easing::Interpolator;
pub use geometry::{Point, Rect, compute_pivot};
pub use kind::{ParseKindError, TransitionKind};
pub use resources::{
    AnimationAttr, AnimationLoader, AttributeEntry, AttributeResolver, ResourceBridge,
    ResourceContext, ResourceError, ResourceId, ThemeTable, WindowParams, animation_attr,
};
pub use state::{OverrideStyle, TransitionOverride, TransitionState};
pub use synth::{Synthesizer, TransitionTiming};
pub use transform::{Transform2D, Transformation};
