//! The transition controller used by the window manager.
//!
//! [`AppTransition`] owns the pending [`TransitionState`] and a
//! [`Synthesizer`]. The caller holds its own lock around every call; nothing
//! here blocks or spawns.
//!
//! ```
//! use std::sync::{Arc, mpsc};
//! use transit_config::TransitConfig;
//! use transit_core::{
//!     AppTransition, Rect, ResourceBridge, StartedCallback, ThemeTable, TransitionKind, WindowParams,
//! };
//!
//! let theme = Arc::new(ThemeTable::new());
//! let bridge = ResourceBridge::new(theme.clone(), theme, "android");
//! let (tx, _rx) = mpsc::channel::<StartedCallback>();
//! let mut transition = AppTransition::new(&TransitConfig::default(), bridge, tx);
//!
//! transition.state_mut().set_kind(TransitionKind::TaskOpen);
//! transition.state_mut().set_override_scale_up(Rect::new(0, 0, 200, 300));
//! let enter = transition.load_animation(&WindowParams::default(), TransitionKind::TaskOpen, true, 1080, 1920);
//! assert!(enter.is_some());
//! ```

use std::fmt::{self, Write};

use transit_config::TransitConfig;

use crate::animation::Animation;
use crate::callback::CallbackPoster;
use crate::kind::TransitionKind;
use crate::resources::{ResourceBridge, WindowParams};
use crate::state::TransitionState;
use crate::synth::Synthesizer;

#[derive(Debug)]
pub struct AppTransition {
    state: TransitionState,
    synthesizer: Synthesizer,
}

impl AppTransition {
    pub fn new(
        config: &TransitConfig,
        bridge: ResourceBridge,
        poster: impl CallbackPoster + 'static,
    ) -> Self {
        Self::with_parts(TransitionState::new(poster), Synthesizer::from_config(bridge, config))
    }

    pub fn with_parts(state: TransitionState, synthesizer: Synthesizer) -> Self {
        Self { state, synthesizer }
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut TransitionState {
        &mut self.state
    }

    pub fn synthesizer(&self) -> &Synthesizer {
        &self.synthesizer
    }

    /// Animation for a host window entering or exiting `transit`.
    pub fn load_animation(
        &self,
        params: &WindowParams,
        transit: TransitionKind,
        enter: bool,
        width: u32,
        height: u32,
    ) -> Option<Animation> {
        self.synthesizer
            .synthesize(&self.state, params, transit, enter, width, height)
    }

    /// Animation for one participant of a thumbnail transition.
    pub fn thumbnail_animation(
        &self,
        transit: TransitionKind,
        enter: bool,
        thumb: bool,
        width: u32,
        height: u32,
    ) -> Option<Animation> {
        self.synthesizer
            .thumbnail_animation(&self.state, transit, enter, thumb, width, height)
    }

    /// Write the diagnostic snapshot, including timing configuration.
    pub fn dump(&self, out: &mut dyn Write) -> fmt::Result {
        self.state.dump(out)?;
        let timing = self.synthesizer.timing();
        writeln!(
            out,
            "  short_duration_ms={} default_duration_ms={}",
            timing.short_duration_ms, timing.default_duration_ms
        )
    }
}

impl fmt::Display for AppTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.state, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::InlinePoster;
    use crate::resources::ThemeTable;
    use std::sync::Arc;

    fn controller() -> AppTransition {
        let theme = Arc::new(ThemeTable::new());
        AppTransition::new(
            &TransitConfig::default(),
            ResourceBridge::new(theme.clone(), theme, "android"),
            InlinePoster,
        )
    }

    #[test]
    fn test_display_delegates_to_state() {
        let mut transition = controller();
        transition.state_mut().set_kind(TransitionKind::WallpaperOpen);
        assert_eq!(transition.to_string(), "next_transition=wallpaper-open");
    }

    #[test]
    fn test_dump_includes_timing() {
        let transition = controller();
        let mut out = String::new();
        transition.dump(&mut out).unwrap();
        assert!(out.contains("short_duration_ms=200 default_duration_ms=250"));
    }
}
