//! Animation synthesis for the pending transition.
//!
//! [`Synthesizer::synthesize`] dispatches on the active override:
//!
//! | override              | result                                           |
//! |-----------------------|--------------------------------------------------|
//! | custom                | caller's enter/exit resource via the bridge      |
//! | scale-up              | zoom from the source rectangle                   |
//! | thumbnail up / down   | host-window part of a thumbnail zoom             |
//! | none                  | themed animation for the transition kind         |
//!
//! Synthesized animations share their timing: the platform short duration
//! for activity open/close, the default duration otherwise, a decelerating
//! curve, fill-after, and a frame equal to the container size.

use image::RgbaImage;
use transit_config::{AnimationConfig, TransitConfig};

use crate::animation::{AlphaEffect, Animation, Effect, EffectSet, ScaleEffect, ZOrder};
use crate::easing::Interpolator;
use crate::geometry::{Point, Rect, compute_pivot};
use crate::kind::TransitionKind;
use crate::resources::{ResourceBridge, WindowParams, animation_attr};
use crate::state::{TransitionOverride, TransitionState};

/// Durations and curves shared by every synthesized animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionTiming {
    pub short_duration_ms: u64,
    pub default_duration_ms: u64,
    pub decelerate: Interpolator,
    pub thumbnail_fade: Interpolator,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self::from_config(&AnimationConfig::default())
    }
}

impl TransitionTiming {
    pub fn from_config(config: &AnimationConfig) -> Self {
        Self {
            short_duration_ms: config.short_duration_ms,
            default_duration_ms: config.default_duration_ms,
            decelerate: Interpolator::Decelerate {
                factor: config.decelerate_factor,
            },
            thumbnail_fade: Interpolator::FadeOut {
                fraction: config.thumbnail_fade_fraction,
            },
        }
    }

    /// Activity transitions use the short duration; task, wallpaper and
    /// everything else use the longer default.
    pub fn duration_for(&self, transit: TransitionKind) -> u64 {
        if transit.is_activity() {
            self.short_duration_ms
        } else {
            self.default_duration_ms
        }
    }
}

/// Which participant of a thumbnail transition is being animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ThumbnailTarget {
    /// The thumbnail layer itself.
    Thumbnail,
    Entering,
    Exiting,
}

/// Builds animations from the transition state and window geometry.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    bridge: ResourceBridge,
    timing: TransitionTiming,
    log_animations: bool,
}

impl Synthesizer {
    pub fn new(bridge: ResourceBridge, timing: TransitionTiming) -> Self {
        Self {
            bridge,
            timing,
            log_animations: false,
        }
    }

    pub fn from_config(bridge: ResourceBridge, config: &TransitConfig) -> Self {
        Self {
            bridge,
            timing: TransitionTiming::from_config(&config.animation),
            log_animations: config.diagnostics.log_animations,
        }
    }

    pub fn timing(&self) -> &TransitionTiming {
        &self.timing
    }

    pub fn bridge(&self) -> &ResourceBridge {
        &self.bridge
    }

    /// Animation for a window taking part in `transit`, or `None` when the
    /// window should simply hold in place.
    pub fn synthesize(
        &self,
        state: &TransitionState,
        params: &WindowParams,
        transit: TransitionKind,
        enter: bool,
        width: u32,
        height: u32,
    ) -> Option<Animation> {
        let animation = match state.pending_override() {
            TransitionOverride::Custom { package, enter: enter_id, exit: exit_id } => {
                let id = if enter { *enter_id } else { *exit_id };
                self.bridge.load_resource(package.as_deref(), id)
            }
            TransitionOverride::ScaleUp { start } => {
                Some(self.scale_up_animation(*start, transit, enter, width, height))
            }
            TransitionOverride::Thumbnail {
                image,
                start,
                scale_up,
            } => {
                let target = if enter {
                    ThumbnailTarget::Entering
                } else {
                    ThumbnailTarget::Exiting
                };
                Some(self.thumbnail_animation_for(
                    image, *start, *scale_up, transit, target, width, height,
                ))
            }
            TransitionOverride::None => animation_attr(transit, enter)
                .and_then(|attr| self.bridge.load_attr(params, attr)),
        };

        self.log_choice(state, transit, enter, animation.as_ref());
        animation
    }

    /// Thumbnail-transition animation for one participant.
    ///
    /// `thumb = true` animates the thumbnail layer; otherwise the entering or
    /// exiting host window as selected by `enter`. Returns `None` unless a
    /// thumbnail override is active.
    pub fn thumbnail_animation(
        &self,
        state: &TransitionState,
        transit: TransitionKind,
        enter: bool,
        thumb: bool,
        width: u32,
        height: u32,
    ) -> Option<Animation> {
        let TransitionOverride::Thumbnail {
            image,
            start,
            scale_up,
        } = state.pending_override()
        else {
            return None;
        };
        let target = match (thumb, enter) {
            (true, _) => ThumbnailTarget::Thumbnail,
            (false, true) => ThumbnailTarget::Entering,
            (false, false) => ThumbnailTarget::Exiting,
        };
        Some(self.thumbnail_animation_for(image, *start, *scale_up, transit, target, width, height))
    }

    fn scale_up_animation(
        &self,
        start: Rect,
        transit: TransitionKind,
        enter: bool,
        width: u32,
        height: u32,
    ) -> Animation {
        let animation = if enter {
            // Entering window zooms out of the source rectangle.
            let scale_w = start.width as f32 / width as f32;
            let scale_h = start.height as f32 / height as f32;
            let scale = ScaleEffect::new(
                (scale_w, scale_h),
                (1.0, 1.0),
                (
                    compute_pivot(start.x as f32, scale_w),
                    compute_pivot(start.y as f32, scale_h),
                ),
            )
            .with_interpolator(self.timing.decelerate);
            let alpha = AlphaEffect::new(0.0, 1.0).with_interpolator(self.timing.thumbnail_fade);

            Animation::new(EffectSet::new(false).with(scale).with(alpha)).with_detach_wallpaper(true)
        } else if transit.is_wallpaper_intra() {
            // Over a static wallpaper the old window fades instead of holding.
            Animation::new(AlphaEffect::new(1.0, 0.0)).with_detach_wallpaper(true)
        } else {
            hold()
        };

        self.finish(animation, transit, width, height)
    }

    #[allow(clippy::too_many_arguments)]
    fn thumbnail_animation_for(
        &self,
        image: &RgbaImage,
        start: Point,
        scale_up: bool,
        transit: TransitionKind,
        target: ThumbnailTarget,
        width: u32,
        height: u32,
    ) -> Animation {
        let thumb_width = image.width().max(1) as f32;
        let thumb_height = image.height().max(1) as f32;
        let (app_width, app_height) = (width as f32, height as f32);
        let (start_x, start_y) = (start.x as f32, start.y as f32);

        let animation = match target {
            ThumbnailTarget::Thumbnail => {
                // The pivot is defined for "1 -> scale", so the layer growing
                // from native size uses reciprocal factors.
                let scale_w = app_width / thumb_width;
                let scale_h = app_height / thumb_height;
                let pivot = (
                    compute_pivot(start_x, 1.0 / scale_w),
                    compute_pivot(start_y, 1.0 / scale_h),
                );
                if scale_up {
                    let scale = ScaleEffect::new((1.0, 1.0), (scale_w, scale_h), pivot)
                        .with_interpolator(self.timing.decelerate);
                    let alpha =
                        AlphaEffect::new(1.0, 0.0).with_interpolator(self.timing.thumbnail_fade);
                    Animation::new(EffectSet::new(false).with(scale).with(alpha))
                } else {
                    Animation::new(ScaleEffect::new((scale_w, scale_h), (1.0, 1.0), pivot))
                }
            }
            ThumbnailTarget::Entering => {
                if scale_up {
                    let scale_w = thumb_width / app_width;
                    let scale_h = thumb_height / app_height;
                    Animation::new(ScaleEffect::new(
                        (scale_w, scale_h),
                        (1.0, 1.0),
                        (
                            compute_pivot(start_x, scale_w),
                            compute_pivot(start_y, scale_h),
                        ),
                    ))
                } else {
                    hold()
                }
            }
            ThumbnailTarget::Exiting => {
                if scale_up {
                    if transit == TransitionKind::WallpaperIntraOpen {
                        // Keep the old window from showing through the wallpaper.
                        Animation::new(AlphaEffect::new(1.0, 0.0))
                    } else {
                        hold()
                    }
                } else {
                    let scale_w = thumb_width / app_width;
                    let scale_h = thumb_height / app_height;
                    let scale = ScaleEffect::new(
                        (1.0, 1.0),
                        (scale_w, scale_h),
                        (
                            compute_pivot(start_x, scale_w),
                            compute_pivot(start_y, scale_h),
                        ),
                    );
                    Animation::new(
                        EffectSet::new(true)
                            .with(scale)
                            .with(AlphaEffect::new(1.0, 0.0)),
                    )
                    .with_z_order(ZOrder::Top)
                }
            }
        };

        self.finish(animation, transit, width, height)
    }

    fn finish(
        &self,
        animation: Animation,
        transit: TransitionKind,
        width: u32,
        height: u32,
    ) -> Animation {
        let mut animation = animation
            .with_duration_ms(self.timing.duration_for(transit))
            .with_fill_after(true)
            .with_interpolator(self.timing.decelerate);
        animation.initialize(width, height, width, height);
        animation
    }

    fn log_choice(
        &self,
        state: &TransitionState,
        transit: TransitionKind,
        enter: bool,
        animation: Option<&Animation>,
    ) {
        if self.log_animations {
            tracing::debug!(
                %transit,
                enter,
                style = ?state.override_style(),
                animation = ?animation,
                "applying transition animation"
            );
        } else {
            tracing::trace!(
                %transit,
                enter,
                style = ?state.override_style(),
                found = animation.is_some(),
                "applying transition animation"
            );
        }
    }
}

/// The window stays fully visible and stationary.
fn hold() -> Animation {
    Animation::new(Effect::Alpha(AlphaEffect::new(1.0, 1.0)))
}
