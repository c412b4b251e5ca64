//! The pending transition record.
//!
//! A single long-lived [`TransitionState`] describes the next transition:
//! its kind, an optional caller override and three readiness flags. Each new
//! transition overwrites the previous one's fields.
//!
//! Lifecycle:
//! 1. `set_kind` queues a transition (`is_pending` becomes true).
//! 2. Callers may attach one override; a later override replaces it.
//! 3. `prepare` clears `ready`/`timed_out` at the start of each readiness pass.
//! 4. `commit` hands the transition to playback: kind becomes `Unset`,
//!    `running` becomes true.
//! 5. `clear_override` drops the override once the synthesizer has used it.

use std::sync::Arc;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::callback::{CallbackDispatcher, CallbackPoster, StartedCallback};
use crate::geometry::{Point, Rect};
use crate::kind::TransitionKind;
use crate::resources::ResourceId;

/// Which override, if any, replaces the themed animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideStyle {
    #[default]
    None,
    Custom,
    ScaleUp,
    ThumbnailScaleUp,
    ThumbnailScaleDown,
}

/// A caller-supplied replacement for the themed animation, with its parameters.
#[derive(Debug, Clone, Default)]
pub enum TransitionOverride {
    #[default]
    None,
    /// Explicit enter/exit animation resources from a named package.
    Custom {
        package: Option<String>,
        enter: ResourceId,
        exit: ResourceId,
    },
    /// Zoom the window from (or back into) a source rectangle.
    ScaleUp { start: Rect },
    /// Zoom using a bitmap snapshot as a stand-in layer.
    Thumbnail {
        image: Arc<RgbaImage>,
        start: Point,
        scale_up: bool,
    },
}

impl TransitionOverride {
    pub fn style(&self) -> OverrideStyle {
        match self {
            Self::None => OverrideStyle::None,
            Self::Custom { .. } => OverrideStyle::Custom,
            Self::ScaleUp { .. } => OverrideStyle::ScaleUp,
            Self::Thumbnail { scale_up: true, .. } => OverrideStyle::ThumbnailScaleUp,
            Self::Thumbnail { scale_up: false, .. } => OverrideStyle::ThumbnailScaleDown,
        }
    }
}

/// Mutable record of the pending transition.
///
/// Not internally synchronized; callers serialize access.
#[derive(Debug)]
pub struct TransitionState {
    kind: TransitionKind,
    pending_override: TransitionOverride,
    callbacks: CallbackDispatcher,
    ready: bool,
    running: bool,
    timed_out: bool,
}

impl TransitionState {
    pub fn new(poster: impl CallbackPoster + 'static) -> Self {
        Self {
            kind: TransitionKind::Unset,
            pending_override: TransitionOverride::None,
            callbacks: CallbackDispatcher::new(poster),
            ready: false,
            running: false,
            timed_out: false,
        }
    }

    /// True when a transition has been requested and not yet committed.
    pub fn is_pending(&self) -> bool {
        self.kind != TransitionKind::Unset
    }

    /// True when the requested transition intentionally has no animation.
    pub fn is_none(&self) -> bool {
        self.kind == TransitionKind::None
    }

    pub fn is_kind(&self, kind: TransitionKind) -> bool {
        self.kind == kind
    }

    /// The pending kind. Reads `Unset` when nothing is pending.
    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: TransitionKind) {
        self.kind = kind;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn set_ready(&mut self) {
        self.ready = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn is_timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn set_timed_out(&mut self, timed_out: bool) {
        self.timed_out = timed_out;
    }

    /// Begin a readiness pass: clears `ready` and `timed_out`.
    pub fn prepare(&mut self) {
        self.ready = false;
        self.timed_out = false;
    }

    /// Hand the pending transition to playback.
    pub fn commit(&mut self) {
        self.kind = TransitionKind::Unset;
        self.ready = false;
        self.running = true;
        self.timed_out = false;
    }

    /// Drop the override and its parameters. Kind and flags are untouched.
    pub fn clear_override(&mut self) {
        self.pending_override = TransitionOverride::None;
    }

    pub fn pending_override(&self) -> &TransitionOverride {
        &self.pending_override
    }

    pub fn override_style(&self) -> OverrideStyle {
        self.pending_override.style()
    }

    /// Thumbnail bitmap of the active thumbnail override.
    pub fn thumbnail(&self) -> Option<&Arc<RgbaImage>> {
        match &self.pending_override {
            TransitionOverride::Thumbnail { image, .. } => Some(image),
            _ => None,
        }
    }

    /// Origin of the source rectangle for scale-up and thumbnail overrides.
    pub fn starting_point(&self) -> Option<Point> {
        match &self.pending_override {
            TransitionOverride::ScaleUp { start } => Some(start.origin()),
            TransitionOverride::Thumbnail { start, .. } => Some(*start),
            _ => None,
        }
    }

    pub fn pending_callback(&self) -> Option<&StartedCallback> {
        self.callbacks.pending()
    }

    /// Post the outstanding started callback, if any.
    pub fn post_pending_callback(&mut self) {
        self.callbacks.flush();
    }

    /// Replace the themed animation with explicit enter/exit resources.
    pub fn set_override_custom(
        &mut self,
        package: Option<String>,
        enter: ResourceId,
        exit: ResourceId,
        callback: Option<StartedCallback>,
    ) {
        self.apply_override(TransitionOverride::Custom { package, enter, exit }, callback);
    }

    /// Zoom the entering window up from `start`.
    pub fn set_override_scale_up(&mut self, start: Rect) {
        self.apply_override(TransitionOverride::ScaleUp { start }, None);
    }

    /// Zoom using `image` as a stand-in layer anchored at `start`.
    pub fn set_override_thumbnail(
        &mut self,
        image: Arc<RgbaImage>,
        start: Point,
        scale_up: bool,
        callback: Option<StartedCallback>,
    ) {
        self.apply_override(
            TransitionOverride::Thumbnail {
                image,
                start,
                scale_up,
            },
            callback,
        );
    }

    fn apply_override(&mut self, next: TransitionOverride, callback: Option<StartedCallback>) {
        if !self.is_pending() {
            tracing::debug!(style = ?next.style(), "no pending transition, dropping override");
            self.callbacks.flush();
            return;
        }
        tracing::debug!(kind = %self.kind, style = ?next.style(), "overriding pending transition");
        self.pending_override = next;
        self.callbacks.replace(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::InlinePoster;

    fn state() -> TransitionState {
        TransitionState::new(InlinePoster)
    }

    #[test]
    fn test_initial_state() {
        let state = state();
        assert!(!state.is_pending());
        assert!(!state.is_none());
        assert_eq!(state.override_style(), OverrideStyle::None);
        assert!(!state.is_ready() && !state.is_running() && !state.is_timed_out());
    }

    #[test]
    fn test_none_is_pending_but_distinct() {
        let mut state = state();
        state.set_kind(TransitionKind::None);
        assert!(state.is_pending());
        assert!(state.is_none());
        assert!(state.is_kind(TransitionKind::None));
    }

    #[test]
    fn test_prepare_leaves_running_and_kind() {
        let mut state = state();
        state.set_kind(TransitionKind::TaskOpen);
        state.set_ready();
        state.set_timed_out(true);
        state.set_running(true);

        state.prepare();
        assert!(!state.is_ready());
        assert!(!state.is_timed_out());
        assert!(state.is_running());
        assert_eq!(state.kind(), TransitionKind::TaskOpen);
    }

    #[test]
    fn test_commit() {
        let mut state = state();
        state.set_kind(TransitionKind::ActivityOpen);
        state.set_ready();
        state.set_timed_out(true);

        state.commit();
        assert!(!state.is_pending());
        assert!(state.is_running());
        assert!(!state.is_ready());
        assert!(!state.is_timed_out());
    }

    #[test]
    fn test_override_requires_pending() {
        let mut state = state();
        state.set_override_scale_up(Rect::new(1, 2, 3, 4));
        assert_eq!(state.override_style(), OverrideStyle::None);
        assert_eq!(state.starting_point(), None);
    }

    #[test]
    fn test_override_replaces_atomically() {
        let mut state = state();
        state.set_kind(TransitionKind::TaskOpen);
        state.set_override_custom(Some("com.example".into()), ResourceId(1), ResourceId(2), None);
        assert_eq!(state.override_style(), OverrideStyle::Custom);

        let image = Arc::new(RgbaImage::new(16, 16));
        state.set_override_thumbnail(image, Point::new(5, 6), false, None);
        assert_eq!(state.override_style(), OverrideStyle::ThumbnailScaleDown);
        assert_eq!(state.starting_point(), Some(Point::new(5, 6)));
        assert!(state.thumbnail().is_some());
        assert!(!matches!(state.pending_override(), TransitionOverride::Custom { .. }));
    }

    #[test]
    fn test_clear_override_keeps_kind_and_flags() {
        let mut state = state();
        state.set_kind(TransitionKind::WallpaperOpen);
        state.set_ready();
        state.set_running(true);
        state.set_override_scale_up(Rect::new(0, 0, 10, 10));

        state.clear_override();
        assert_eq!(state.override_style(), OverrideStyle::None);
        assert_eq!(state.kind(), TransitionKind::WallpaperOpen);
        assert!(state.is_ready());
        assert!(state.is_running());
        assert!(state.thumbnail().is_none());
    }
}
