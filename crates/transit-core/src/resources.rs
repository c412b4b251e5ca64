//! Attribute-resolution bridge to the theme/resource system.
//!
//! Themed (non-override) transitions are looked up in two steps:
//!
//! ```text
//! (TransitionKind, enter) ──► AnimationAttr            (static table)
//! (package, style id)     ──► AttributeEntry           (AttributeResolver)
//! entry[AnimationAttr]    ──► ResourceId ──► Animation (AnimationLoader)
//! ```
//!
//! Style ids in the platform-reserved range always resolve against the
//! platform package, whatever package the window declares, so applications
//! cannot shadow system animation styles.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::Animation;
use crate::kind::TransitionKind;

const PACKAGE_ID_MASK: u32 = 0xFF00_0000;
const PLATFORM_PACKAGE_ID: u32 = 0x0100_0000;

/// Opaque resource identifier. Zero means "no resource".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ResourceId(pub u32);

impl ResourceId {
    pub const NONE: Self = Self(0);

    pub fn is_set(self) -> bool {
        self.0 != 0
    }

    /// True for ids owned by the platform package.
    pub fn is_platform(self) -> bool {
        self.0 & PACKAGE_ID_MASK == PLATFORM_PACKAGE_ID
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// Theme attribute naming the animation for one side of one transition kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationAttr {
    ActivityOpenEnter,
    ActivityOpenExit,
    ActivityCloseEnter,
    ActivityCloseExit,
    TaskOpenEnter,
    TaskOpenExit,
    TaskCloseEnter,
    TaskCloseExit,
    TaskToFrontEnter,
    TaskToFrontExit,
    TaskToBackEnter,
    TaskToBackExit,
    WallpaperOpenEnter,
    WallpaperOpenExit,
    WallpaperCloseEnter,
    WallpaperCloseExit,
    WallpaperIntraOpenEnter,
    WallpaperIntraOpenExit,
    WallpaperIntraCloseEnter,
    WallpaperIntraCloseExit,
}

/// `(kind, enter attribute, exit attribute)`
const ATTRIBUTE_TABLE: [(TransitionKind, AnimationAttr, AnimationAttr); 10] = [
    (
        TransitionKind::ActivityOpen,
        AnimationAttr::ActivityOpenEnter,
        AnimationAttr::ActivityOpenExit,
    ),
    (
        TransitionKind::ActivityClose,
        AnimationAttr::ActivityCloseEnter,
        AnimationAttr::ActivityCloseExit,
    ),
    (
        TransitionKind::TaskOpen,
        AnimationAttr::TaskOpenEnter,
        AnimationAttr::TaskOpenExit,
    ),
    (
        TransitionKind::TaskClose,
        AnimationAttr::TaskCloseEnter,
        AnimationAttr::TaskCloseExit,
    ),
    (
        TransitionKind::TaskToFront,
        AnimationAttr::TaskToFrontEnter,
        AnimationAttr::TaskToFrontExit,
    ),
    (
        TransitionKind::TaskToBack,
        AnimationAttr::TaskToBackEnter,
        AnimationAttr::TaskToBackExit,
    ),
    (
        TransitionKind::WallpaperOpen,
        AnimationAttr::WallpaperOpenEnter,
        AnimationAttr::WallpaperOpenExit,
    ),
    (
        TransitionKind::WallpaperClose,
        AnimationAttr::WallpaperCloseEnter,
        AnimationAttr::WallpaperCloseExit,
    ),
    (
        TransitionKind::WallpaperIntraOpen,
        AnimationAttr::WallpaperIntraOpenEnter,
        AnimationAttr::WallpaperIntraOpenExit,
    ),
    (
        TransitionKind::WallpaperIntraClose,
        AnimationAttr::WallpaperIntraCloseEnter,
        AnimationAttr::WallpaperIntraCloseExit,
    ),
];

/// Theme attribute for a transition kind and side, or `None` for kinds
/// without a themed animation (`Unset`, `None`).
pub fn animation_attr(kind: TransitionKind, enter: bool) -> Option<AnimationAttr> {
    ATTRIBUTE_TABLE
        .iter()
        .find(|(k, _, _)| *k == kind)
        .map(|&(_, enter_attr, exit_attr)| if enter { enter_attr } else { exit_attr })
}

/// Window attributes relevant to animation lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowParams {
    /// Package the window belongs to. Missing means the platform package.
    pub package: Option<String>,
    /// Animation style declared by the window; zero means none.
    pub window_animations: ResourceId,
}

impl WindowParams {
    pub fn new(package: impl Into<String>, window_animations: ResourceId) -> Self {
        Self {
            package: Some(package.into()),
            window_animations,
        }
    }
}

/// Package context in which a resolved resource is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceContext {
    pub package: String,
}

/// A resolved style: its context and attribute values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeEntry {
    pub context: ResourceContext,
    pub attributes: HashMap<AnimationAttr, ResourceId>,
}

impl AttributeEntry {
    /// Resource id stored under `attr`, or `ResourceId::NONE`.
    pub fn resource_id(&self, attr: AnimationAttr) -> ResourceId {
        self.attributes.get(&attr).copied().unwrap_or_default()
    }
}

/// Errors reported by an attribute resolver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// The package is not installed or has no resources.
    #[error("package not found: {0}")]
    PackageNotFound(String),

    /// The resource system could not answer in time.
    #[error("resource system unavailable: {0}")]
    Unavailable(String),
}

/// Resolves `(package, style)` pairs to attribute entries.
///
/// Must be fast and non-blocking; slow lookups should report `Unavailable`.
pub trait AttributeResolver {
    fn resolve(&self, package: &str, style: ResourceId)
    -> Result<Option<AttributeEntry>, ResourceError>;
}

/// Loads an animation resource in a resolved context.
pub trait AnimationLoader {
    fn load(&self, context: &ResourceContext, id: ResourceId) -> Option<Animation>;
}

pub type SharedResolver = Arc<dyn AttributeResolver + Send + Sync>;
pub type SharedLoader = Arc<dyn AnimationLoader + Send + Sync>;

/// Maps transitions to themed animations through the external collaborators.
#[derive(Clone)]
pub struct ResourceBridge {
    resolver: SharedResolver,
    loader: SharedLoader,
    platform_package: String,
}

impl ResourceBridge {
    pub fn new(
        resolver: SharedResolver,
        loader: SharedLoader,
        platform_package: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            loader,
            platform_package: platform_package.into(),
        }
    }

    pub fn platform_package(&self) -> &str {
        &self.platform_package
    }

    /// Package to resolve `id` in: platform ids always use the platform package.
    pub fn lookup_package<'a>(&'a self, declared: Option<&'a str>, id: ResourceId) -> &'a str {
        if id.is_platform() {
            return &self.platform_package;
        }
        declared.unwrap_or(&self.platform_package)
    }

    fn resolve(&self, package: &str, style: ResourceId) -> Option<AttributeEntry> {
        tracing::trace!(package, style = %style, "resolving animation style");
        match self.resolver.resolve(package, style) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(package, style = %style, error = %err, "animation style lookup failed");
                None
            }
        }
    }

    /// Themed animation for `attr` from the window's declared style.
    pub fn load_attr(&self, params: &WindowParams, attr: AnimationAttr) -> Option<Animation> {
        if !params.window_animations.is_set() {
            return None;
        }
        let package = self.lookup_package(params.package.as_deref(), params.window_animations);
        let entry = self.resolve(package, params.window_animations)?;
        let id = entry.resource_id(attr);
        if !id.is_set() {
            tracing::trace!(?attr, package, "style defines no animation for attribute");
            return None;
        }
        self.loader.load(&entry.context, id)
    }

    /// Animation resource `id` from an explicitly named package.
    pub fn load_resource(&self, package: Option<&str>, id: ResourceId) -> Option<Animation> {
        let declared = package?;
        if !id.is_set() {
            return None;
        }
        let package = self.lookup_package(Some(declared), id);
        let entry = self.resolve(package, id)?;
        self.loader.load(&entry.context, id)
    }
}

impl fmt::Debug for ResourceBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceBridge")
            .field("platform_package", &self.platform_package)
            .finish_non_exhaustive()
    }
}

/// In-memory theme: styles and animation resources keyed by package.
#[derive(Debug, Clone, Default)]
pub struct ThemeTable {
    styles: HashMap<(String, ResourceId), HashMap<AnimationAttr, ResourceId>>,
    animations: HashMap<(String, ResourceId), Animation>,
}

impl ThemeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a style whose attributes point at animation resources.
    pub fn with_style(
        mut self,
        package: impl Into<String>,
        style: ResourceId,
        attributes: impl IntoIterator<Item = (AnimationAttr, ResourceId)>,
    ) -> Self {
        self.styles
            .insert((package.into(), style), attributes.into_iter().collect());
        self
    }

    /// Register an animation resource.
    pub fn with_animation(
        mut self,
        package: impl Into<String>,
        id: ResourceId,
        animation: Animation,
    ) -> Self {
        self.animations.insert((package.into(), id), animation);
        self
    }

    fn has_package(&self, package: &str) -> bool {
        self.styles.keys().any(|(p, _)| p == package)
            || self.animations.keys().any(|(p, _)| p == package)
    }
}

impl AttributeResolver for ThemeTable {
    fn resolve(
        &self,
        package: &str,
        style: ResourceId,
    ) -> Result<Option<AttributeEntry>, ResourceError> {
        if !self.has_package(package) {
            return Err(ResourceError::PackageNotFound(package.to_string()));
        }
        let attributes = self
            .styles
            .get(&(package.to_string(), style))
            .cloned()
            .unwrap_or_default();
        Ok(Some(AttributeEntry {
            context: ResourceContext {
                package: package.to_string(),
            },
            attributes,
        }))
    }
}

impl AnimationLoader for ThemeTable {
    fn load(&self, context: &ResourceContext, id: ResourceId) -> Option<Animation> {
        self.animations.get(&(context.package.clone(), id)).cloned()
    }
}
