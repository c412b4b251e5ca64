use anyhow::Result;
use image::RgbaImage;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use transit_config::TransitConfig;
use transit_core::{
    AlphaEffect, Animation, AnimationAttr, AppTransition, Interpolator, OverrideStyle, Point, Rect,
    ResourceBridge, ResourceId, StartedCallback, ThemeTable, TransitionKind, WindowParams, ZOrder,
    compute_pivot,
};

const APP_STYLE: ResourceId = ResourceId(0x7f0b_0001);
const APP_OPEN_ENTER: ResourceId = ResourceId(0x7f04_0010);
const APP_CUSTOM_ENTER: ResourceId = ResourceId(0x7f04_0020);
const APP_CUSTOM_EXIT: ResourceId = ResourceId(0x7f04_0021);
const PLATFORM_STYLE: ResourceId = ResourceId(0x0103_0000);
const PLATFORM_OPEN_ENTER: ResourceId = ResourceId(0x0104_0000);

const EPSILON: f32 = 1e-3;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn fade(from: f32, duration_ms: u64) -> Animation {
    Animation::new(AlphaEffect::new(from, 1.0)).with_duration_ms(duration_ms)
}

fn theme() -> ThemeTable {
    ThemeTable::new()
        .with_style(
            "com.example.app",
            APP_STYLE,
            [(AnimationAttr::ActivityOpenEnter, APP_OPEN_ENTER)],
        )
        .with_animation("com.example.app", APP_OPEN_ENTER, fade(0.1, 300))
        .with_animation("com.example.app", APP_CUSTOM_ENTER, fade(0.2, 400))
        .with_animation("com.example.app", APP_CUSTOM_EXIT, fade(0.3, 500))
        .with_style(
            "android",
            PLATFORM_STYLE,
            [(AnimationAttr::ActivityOpenEnter, PLATFORM_OPEN_ENTER)],
        )
        .with_animation("android", PLATFORM_OPEN_ENTER, fade(0.9, 200))
}

fn controller() -> (AppTransition, Receiver<StartedCallback>) {
    let theme = Arc::new(theme());
    let bridge = ResourceBridge::new(theme.clone(), theme, "android");
    let (tx, rx) = mpsc::channel();
    (AppTransition::new(&TransitConfig::default(), bridge, tx), rx)
}

fn drain_ids(rx: &Receiver<StartedCallback>) -> Vec<u64> {
    rx.try_iter().map(|cb| cb.id()).collect()
}

#[test]
fn pending_then_commit() {
    let (mut transition, _rx) = controller();
    let state = transition.state_mut();
    assert!(!state.is_pending());

    state.set_kind(TransitionKind::TaskOpen);
    assert!(state.is_pending());
    assert!(!state.is_none());

    state.commit();
    assert!(!state.is_pending());
    assert!(state.is_running());
    assert_eq!(state.kind(), TransitionKind::Unset);
}

#[test]
fn override_without_pending_transition_only_flushes_callback() {
    let (mut transition, rx) = controller();
    let first = StartedCallback::new(|| {});
    let first_id = first.id();

    let state = transition.state_mut();
    state.set_kind(TransitionKind::ActivityOpen);
    state.set_override_custom(
        Some("com.example.app".into()),
        APP_CUSTOM_ENTER,
        APP_CUSTOM_EXIT,
        Some(first),
    );
    state.commit();
    assert!(drain_ids(&rx).is_empty());

    state.set_override_scale_up(Rect::new(0, 0, 10, 10));
    assert_eq!(state.override_style(), OverrideStyle::Custom);
    assert_eq!(drain_ids(&rx), vec![first_id]);

    let ignored = StartedCallback::new(|| {});
    let ignored_id = ignored.id();
    state.set_override_thumbnail(Arc::new(RgbaImage::new(4, 4)), Point::new(0, 0), true, Some(ignored));
    assert_eq!(state.override_style(), OverrideStyle::Custom);
    assert!(state.pending_callback().is_none());
    // Dropped overrides do not record their callback, and the first never fires twice.
    assert!(drain_ids(&rx).is_empty());
    assert_ne!(ignored_id, first_id);
}

#[test]
fn superseding_override_fires_earlier_callback_once() {
    let (mut transition, rx) = controller();
    let first = StartedCallback::new(|| {});
    let second = StartedCallback::new(|| {});
    let (first_id, second_id) = (first.id(), second.id());

    let state = transition.state_mut();
    state.set_kind(TransitionKind::TaskOpen);
    state.set_override_thumbnail(Arc::new(RgbaImage::new(8, 8)), Point::new(1, 1), true, Some(first));
    state.set_override_thumbnail(Arc::new(RgbaImage::new(8, 8)), Point::new(2, 2), false, Some(second));

    assert_eq!(drain_ids(&rx), vec![first_id]);
    assert_eq!(state.pending_callback().map(StartedCallback::id), Some(second_id));

    state.set_override_scale_up(Rect::new(0, 0, 5, 5));
    assert_eq!(drain_ids(&rx), vec![second_id]);
    assert!(state.pending_callback().is_none());

    state.post_pending_callback();
    assert!(drain_ids(&rx).is_empty());
}

#[test]
fn scale_up_enter_starts_on_source_rect() {
    let (mut transition, _rx) = controller();
    let start = Rect::new(120, 340, 270, 480);
    transition.state_mut().set_kind(TransitionKind::TaskOpen);
    transition.state_mut().set_override_scale_up(start);

    let anim = transition
        .load_animation(&WindowParams::default(), TransitionKind::TaskOpen, true, 1080, 1920)
        .expect("scale-up animation");

    let scale = anim.scale_range().expect("scale effect");
    assert!(approx_eq(scale.from_x, 270.0 / 1080.0));
    assert!(approx_eq(scale.from_y, 480.0 / 1920.0));
    assert!(approx_eq(scale.to_x, 1.0) && approx_eq(scale.to_y, 1.0));
    let alpha = anim.alpha_range().expect("alpha effect");
    assert_eq!((alpha.from, alpha.to), (0.0, 1.0));

    // At the first frame the full window is squeezed onto the source rectangle.
    let first = anim.sample(0.0);
    let (x0, y0) = first.matrix.apply_point(0.0, 0.0);
    let (x1, y1) = first.matrix.apply_point(1080.0, 1920.0);
    assert!(approx_eq(x0, 120.0) && approx_eq(y0, 340.0));
    assert!(approx_eq(x1, 390.0) && approx_eq(y1, 820.0));
    assert!(approx_eq(first.alpha, 0.0));

    let last = anim.sample(1.0);
    assert!(last.matrix.is_identity(EPSILON));
    assert!(approx_eq(last.alpha, 1.0));

    // Fully opaque once the leading fade fraction has passed.
    assert!(approx_eq(anim.sample(0.3).alpha, 1.0));
    assert_eq!(
        anim.frame.map(|f| (f.width, f.height, f.parent_width, f.parent_height)),
        Some((1080, 1920, 1080, 1920))
    );
}

#[test]
fn synthesized_durations_follow_kind() {
    let (mut transition, _rx) = controller();
    let params = WindowParams::default();
    let overrides: [fn(&mut AppTransition); 3] = [
        |t| t.state_mut().set_override_scale_up(Rect::new(10, 10, 100, 100)),
        |t| {
            t.state_mut()
                .set_override_thumbnail(Arc::new(RgbaImage::new(50, 50)), Point::new(3, 4), true, None)
        },
        |t| {
            t.state_mut()
                .set_override_thumbnail(Arc::new(RgbaImage::new(50, 50)), Point::new(3, 4), false, None)
        },
    ];

    for kind in TransitionKind::ALL {
        if kind == TransitionKind::Unset {
            continue;
        }
        let expected = if kind.is_activity() { 200 } else { 250 };
        for apply in overrides {
            transition.state_mut().set_kind(kind);
            apply(&mut transition);
            for enter in [true, false] {
                let anim = transition
                    .load_animation(&params, kind, enter, 800, 600)
                    .expect("synthesized animation");
                assert_eq!(anim.duration_ms, expected, "{kind} enter={enter}");
                assert!(anim.fill_after);
                assert_eq!(anim.interpolator, Interpolator::Decelerate { factor: 1.5 });
            }
            let thumb = transition.thumbnail_animation(kind, true, true, 800, 600);
            if let Some(thumb) = thumb {
                assert_eq!(thumb.duration_ms, expected);
            }
            transition.state_mut().clear_override();
        }
    }
}

#[test]
fn thumbnail_scale_up_participants() {
    let (mut transition, _rx) = controller();
    let state = transition.state_mut();
    state.set_kind(TransitionKind::WallpaperIntraOpen);
    state.set_override_thumbnail(Arc::new(RgbaImage::new(100, 100)), Point::new(50, 60), true, None);
    assert_eq!(state.override_style(), OverrideStyle::ThumbnailScaleUp);

    let kind = TransitionKind::WallpaperIntraOpen;
    let thumb = transition.thumbnail_animation(kind, true, true, 1000, 1000).unwrap();
    let scale = thumb.scale_range().unwrap();
    assert!(approx_eq(scale.from_x, 1.0) && approx_eq(scale.to_x, 10.0));
    assert!(approx_eq(scale.from_y, 1.0) && approx_eq(scale.to_y, 10.0));
    assert_eq!(thumb.alpha_range().map(|a| (a.from, a.to)), Some((1.0, 0.0)));

    let enter = transition
        .load_animation(&WindowParams::default(), kind, true, 1000, 1000)
        .unwrap();
    let scale = enter.scale_range().unwrap();
    assert!(approx_eq(scale.from_x, 0.1) && approx_eq(scale.to_x, 1.0));
    assert!(enter.alpha_range().is_none());

    let exit = transition
        .load_animation(&WindowParams::default(), kind, false, 1000, 1000)
        .unwrap();
    assert_eq!(exit.alpha_range().map(|a| (a.from, a.to)), Some((1.0, 0.0)));

    let other_exit = transition
        .load_animation(&WindowParams::default(), TransitionKind::WallpaperIntraClose, false, 1000, 1000)
        .unwrap();
    assert!(other_exit.alpha_range().unwrap().is_hold());
}

#[test]
fn thumbnail_scale_down_participants() {
    let (mut transition, _rx) = controller();
    let kind = TransitionKind::TaskToBack;
    transition.state_mut().set_kind(kind);
    transition
        .state_mut()
        .set_override_thumbnail(Arc::new(RgbaImage::new(200, 100)), Point::new(0, 0), false, None);

    let thumb = transition.thumbnail_animation(kind, false, true, 1000, 1000).unwrap();
    let scale = thumb.scale_range().unwrap();
    assert!(approx_eq(scale.from_x, 5.0) && approx_eq(scale.to_x, 1.0));
    assert!(approx_eq(scale.from_y, 10.0) && approx_eq(scale.to_y, 1.0));
    assert!(thumb.alpha_range().is_none());

    let enter = transition
        .load_animation(&WindowParams::default(), kind, true, 1000, 1000)
        .unwrap();
    assert!(enter.alpha_range().unwrap().is_hold());
    assert!(enter.scale_range().is_none());

    let exit = transition
        .load_animation(&WindowParams::default(), kind, false, 1000, 1000)
        .unwrap();
    let scale = exit.scale_range().unwrap();
    assert!(approx_eq(scale.to_x, 0.2) && approx_eq(scale.to_y, 0.1));
    let alpha = exit.alpha_range().unwrap();
    assert_eq!((alpha.from, alpha.to), (1.0, 0.0));
    assert_eq!(exit.z_order, ZOrder::Top);

    // The set shares the root decelerate curve: 1 - (1 - 0.5)^3 = 0.875 complete.
    assert!(approx_eq(exit.sample(0.5).alpha, 0.125));
}

/// 100x200 thumbnail anchored at (40, 80) inside a 1000x1000 container.
fn thumbnail_transition(scale_up: bool) -> (AppTransition, Receiver<StartedCallback>) {
    let (mut transition, rx) = controller();
    transition.state_mut().set_kind(TransitionKind::TaskOpen);
    transition.state_mut().set_override_thumbnail(
        Arc::new(RgbaImage::new(100, 200)),
        Point::new(40, 80),
        scale_up,
        None,
    );
    (transition, rx)
}

fn approx_point(actual: (f32, f32), expected: (f32, f32)) -> bool {
    (actual.0 - expected.0).abs() < 1e-2 && (actual.1 - expected.1).abs() < 1e-2
}

#[test]
fn thumbnail_layer_grows_from_its_anchor() {
    let (transition, _rx) = thumbnail_transition(true);
    let thumb = transition
        .thumbnail_animation(TransitionKind::TaskOpen, true, true, 1000, 1000)
        .unwrap();

    // Pivot uses the reciprocal of the layer's growth factors (10, 5).
    let scale = thumb.scale_range().unwrap();
    assert!(approx_eq(scale.pivot_x, compute_pivot(40.0, 0.1)));
    assert!(approx_eq(scale.pivot_y, compute_pivot(80.0, 0.2)));
    assert!(approx_eq(scale.pivot_x, 400.0 / 9.0) && approx_eq(scale.pivot_y, 100.0));

    // At the last frame the thumbnail's bounds cover the container.
    let last = thumb.sample(1.0).matrix;
    assert!(approx_point(last.apply_point(40.0, 80.0), (0.0, 0.0)));
    assert!(approx_point(last.apply_point(140.0, 280.0), (1000.0, 1000.0)));
}

#[test]
fn entering_window_starts_on_thumbnail_bounds() {
    let (transition, _rx) = thumbnail_transition(true);
    let enter = transition
        .load_animation(&WindowParams::default(), TransitionKind::TaskOpen, true, 1000, 1000)
        .unwrap();

    let first = enter.sample(0.0).matrix;
    assert!(approx_point(first.apply_point(0.0, 0.0), (40.0, 80.0)));
    assert!(approx_point(first.apply_point(1000.0, 1000.0), (140.0, 280.0)));
    assert!(enter.sample(1.0).matrix.is_identity(EPSILON));
}

#[test]
fn exiting_window_shrinks_onto_thumbnail_bounds() {
    let (transition, _rx) = thumbnail_transition(false);
    let exit = transition
        .load_animation(&WindowParams::default(), TransitionKind::TaskOpen, false, 1000, 1000)
        .unwrap();

    assert!(exit.sample(0.0).matrix.is_identity(EPSILON));
    let last = exit.sample(1.0);
    assert!(approx_point(last.matrix.apply_point(0.0, 0.0), (40.0, 80.0)));
    assert!(approx_point(last.matrix.apply_point(1000.0, 1000.0), (140.0, 280.0)));
    assert!(approx_eq(last.alpha, 0.0));
}

#[test]
fn zero_sized_thumbnail_is_treated_as_one_pixel() {
    let (mut transition, _rx) = controller();
    let kind = TransitionKind::TaskOpen;
    transition.state_mut().set_kind(kind);
    transition
        .state_mut()
        .set_override_thumbnail(Arc::new(RgbaImage::new(0, 0)), Point::new(10, 10), true, None);

    let thumb = transition.thumbnail_animation(kind, true, true, 640, 480).unwrap();
    let scale = thumb.scale_range().unwrap();
    assert!(scale.to_x.is_finite() && scale.to_y.is_finite());
    assert!(approx_eq(scale.to_x, 640.0) && approx_eq(scale.to_y, 480.0));
    assert!(scale.pivot_x.is_finite() && scale.pivot_y.is_finite());
}

#[test]
fn clear_override_leaves_kind_and_flags() {
    let (mut transition, _rx) = controller();
    let state = transition.state_mut();
    state.set_kind(TransitionKind::TaskClose);
    state.set_ready();
    state.set_timed_out(true);
    state.set_override_thumbnail(Arc::new(RgbaImage::new(2, 2)), Point::new(0, 0), true, None);

    state.clear_override();
    assert_eq!(state.override_style(), OverrideStyle::None);
    assert!(state.thumbnail().is_none());
    assert_eq!(state.kind(), TransitionKind::TaskClose);
    assert!(state.is_ready());
    assert!(state.is_timed_out());
}

#[test]
fn themed_animation_from_window_style() -> Result<()> {
    let (mut transition, _rx) = controller();
    transition.state_mut().set_kind(TransitionKind::ActivityOpen);

    let app = WindowParams::new("com.example.app", APP_STYLE);
    let anim = transition
        .load_animation(&app, TransitionKind::ActivityOpen, true, 100, 100)
        .ok_or_else(|| anyhow::anyhow!("expected themed animation"))?;
    assert_eq!(anim.duration_ms, 300);
    assert_eq!(anim.alpha_range().map(|a| a.from), Some(0.1));

    // The app style defines no exit animation.
    assert!(transition
        .load_animation(&app, TransitionKind::ActivityOpen, false, 100, 100)
        .is_none());

    // Platform styles resolve in the platform package regardless of the declared one.
    let platform = WindowParams::new("com.example.app", PLATFORM_STYLE);
    let anim = transition
        .load_animation(&platform, TransitionKind::ActivityOpen, true, 100, 100)
        .ok_or_else(|| anyhow::anyhow!("expected platform animation"))?;
    assert_eq!(anim.alpha_range().map(|a| a.from), Some(0.9));

    // Sentinel kinds have no themed animation.
    assert!(transition
        .load_animation(&app, TransitionKind::None, true, 100, 100)
        .is_none());
    Ok(())
}

#[test]
fn custom_override_loads_caller_resources() {
    let (mut transition, _rx) = controller();
    let state = transition.state_mut();
    state.set_kind(TransitionKind::TaskOpen);
    state.set_override_custom(
        Some("com.example.app".into()),
        APP_CUSTOM_ENTER,
        APP_CUSTOM_EXIT,
        None,
    );

    let params = WindowParams::default();
    let enter = transition
        .load_animation(&params, TransitionKind::TaskOpen, true, 10, 10)
        .unwrap();
    let exit = transition
        .load_animation(&params, TransitionKind::TaskOpen, false, 10, 10)
        .unwrap();
    assert_eq!(enter.duration_ms, 400);
    assert_eq!(exit.duration_ms, 500);

    transition.state_mut().set_override_custom(None, APP_CUSTOM_ENTER, APP_CUSTOM_EXIT, None);
    assert!(transition
        .load_animation(&params, TransitionKind::TaskOpen, true, 10, 10)
        .is_none());
}

#[test]
fn animations_serialize_for_playback() -> Result<()> {
    let (mut transition, _rx) = controller();
    transition.state_mut().set_kind(TransitionKind::ActivityClose);
    transition
        .state_mut()
        .set_override_scale_up(Rect::new(0, 0, 540, 960));
    let anim = transition
        .load_animation(&WindowParams::default(), TransitionKind::ActivityClose, true, 1080, 1920)
        .ok_or_else(|| anyhow::anyhow!("expected animation"))?;

    let json = serde_json::to_value(&anim)?;
    assert_eq!(json["duration_ms"], 200);
    assert_eq!(json["detach_wallpaper"], true);
    assert_eq!(json["effect"]["type"], "set");
    let back: Animation = serde_json::from_value(json)?;
    assert_eq!(back, anim);
    Ok(())
}
