//! Transition kinds requested by the window stack.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of a pending transition.
///
/// `Unset` and `None` are distinct sentinels: `Unset` means nothing is
/// pending, `None` means a transition was requested that intentionally
/// plays no animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionKind {
    #[default]
    Unset,
    None,
    ActivityOpen,
    ActivityClose,
    TaskOpen,
    TaskClose,
    TaskToFront,
    TaskToBack,
    WallpaperOpen,
    WallpaperClose,
    WallpaperIntraOpen,
    WallpaperIntraClose,
}

impl TransitionKind {
    pub const ALL: [Self; 12] = [
        Self::Unset,
        Self::None,
        Self::ActivityOpen,
        Self::ActivityClose,
        Self::TaskOpen,
        Self::TaskClose,
        Self::TaskToFront,
        Self::TaskToBack,
        Self::WallpaperOpen,
        Self::WallpaperClose,
        Self::WallpaperIntraOpen,
        Self::WallpaperIntraClose,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::None => "none",
            Self::ActivityOpen => "activity-open",
            Self::ActivityClose => "activity-close",
            Self::TaskOpen => "task-open",
            Self::TaskClose => "task-close",
            Self::TaskToFront => "task-to-front",
            Self::TaskToBack => "task-to-back",
            Self::WallpaperOpen => "wallpaper-open",
            Self::WallpaperClose => "wallpaper-close",
            Self::WallpaperIntraOpen => "wallpaper-intra-open",
            Self::WallpaperIntraClose => "wallpaper-intra-close",
        }
    }

    /// Plain activity open/close, which use the platform's short duration.
    pub fn is_activity(self) -> bool {
        matches!(self, Self::ActivityOpen | Self::ActivityClose)
    }

    /// Transitions between activities that both sit on top of the wallpaper.
    pub fn is_wallpaper_intra(self) -> bool {
        matches!(self, Self::WallpaperIntraOpen | Self::WallpaperIntraClose)
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown transition kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transition kind: {0}")]
pub struct ParseKindError(pub String);

impl FromStr for TransitionKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}
