//! Command-line driver for the transition engine.
//!
//! Queues one transition, optionally attaches an override, and prints the
//! resulting enter/exit (and thumbnail) animations as JSON.
//!
//! ```text
//! transit --kind task-open --override scale-up --rect 100,200,300,400
//! transit --kind wallpaper-intra-open --override thumbnail-up --thumbnail 120x80
//! ```

use std::path::PathBuf;
use std::sync::{Arc, mpsc};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use image::RgbaImage;
use serde_json::json;
use tracing_subscriber::EnvFilter;
use transit_config::TransitConfig;
use transit_core::{
    AlphaEffect, Animation, AppTransition, Point, Rect, ResourceBridge, ResourceId,
    StartedCallback, ThemeTable, TransitionKind, WindowParams, animation_attr,
};

/// Style id of the built-in demo theme, in the platform range.
const DEMO_STYLE: ResourceId = ResourceId(0x0103_0001);
const DEMO_ANIMATION_BASE: u32 = 0x0104_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OverrideMode {
    None,
    Custom,
    ScaleUp,
    ThumbnailUp,
    ThumbnailDown,
}

#[derive(Debug, Parser)]
#[command(name = "transit", version, about = "Preview window transition animations")]
struct Cli {
    /// Configuration file. Defaults to transit.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Transition kind, e.g. activity-open or wallpaper-intra-close.
    #[arg(long, default_value = "activity-open")]
    kind: TransitionKind,

    #[arg(long = "override", value_enum, default_value_t = OverrideMode::None)]
    mode: OverrideMode,

    /// Source rectangle `x,y,width,height` for scale-up and thumbnail overrides.
    #[arg(long, value_parser = parse_rect, default_value = "0,0,1,1")]
    rect: Rect,

    /// Thumbnail size `WIDTHxHEIGHT` when no image is given.
    #[arg(long, default_value = "1x1")]
    thumbnail: String,

    /// PNG to use as the thumbnail bitmap.
    #[arg(long)]
    thumbnail_image: Option<PathBuf>,

    /// Package for a custom override.
    #[arg(long)]
    package: Option<String>,

    /// Enter animation resource for a custom override (hex or decimal).
    #[arg(long, value_parser = parse_resource_id, default_value = "0")]
    enter_res: ResourceId,

    /// Exit animation resource for a custom override (hex or decimal).
    #[arg(long, value_parser = parse_resource_id, default_value = "0")]
    exit_res: ResourceId,

    /// Container width.
    #[arg(long, default_value_t = 1080)]
    width: u32,

    /// Container height.
    #[arg(long, default_value_t = 1920)]
    height: u32,

    /// Also print the transition state snapshot.
    #[arg(long)]
    dump: bool,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let config = match &cli.config {
        Some(path) => TransitConfig::load_with_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => TransitConfig::load(),
    };
    tracing::debug!(?config, "configuration loaded");

    let theme = Arc::new(demo_theme(&config.resources.platform_package));
    let bridge = ResourceBridge::new(theme.clone(), theme, config.resources.platform_package.clone());
    let (tx, rx) = mpsc::channel::<StartedCallback>();
    let mut transition = AppTransition::new(&config, bridge, tx);

    transition.state_mut().set_kind(cli.kind);
    apply_override(&mut transition, &cli)?;

    let params = WindowParams::new(config.resources.platform_package.clone(), DEMO_STYLE);
    let (width, height) = (cli.width, cli.height);
    let enter = transition.load_animation(&params, cli.kind, true, width, height);
    let exit = transition.load_animation(&params, cli.kind, false, width, height);
    let thumbnail = transition.thumbnail_animation(cli.kind, true, true, width, height);

    let report = json!({
        "kind": cli.kind,
        "override": transition.state().override_style(),
        "enter": enter,
        "exit": exit,
        "thumbnail": thumbnail,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if cli.dump {
        let mut out = String::new();
        transition.dump(&mut out)?;
        print!("{out}");
    }

    // Playback starts: the override is consumed and any caller is notified.
    transition.state_mut().commit();
    transition.state_mut().clear_override();
    transition.state_mut().post_pending_callback();
    for callback in rx.try_iter() {
        callback.notify();
    }
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn apply_override(transition: &mut AppTransition, cli: &Cli) -> Result<()> {
    let kind = cli.kind;
    let started = move || tracing::info!(%kind, "transition started");
    let state = transition.state_mut();
    match cli.mode {
        OverrideMode::None => {}
        OverrideMode::Custom => state.set_override_custom(
            cli.package.clone(),
            cli.enter_res,
            cli.exit_res,
            Some(StartedCallback::new(started)),
        ),
        OverrideMode::ScaleUp => state.set_override_scale_up(cli.rect),
        OverrideMode::ThumbnailUp | OverrideMode::ThumbnailDown => {
            let image = load_thumbnail(cli)?;
            state.set_override_thumbnail(
                Arc::new(image),
                Point::new(cli.rect.x, cli.rect.y),
                cli.mode == OverrideMode::ThumbnailUp,
                Some(StartedCallback::new(started)),
            );
        }
    }
    Ok(())
}

fn load_thumbnail(cli: &Cli) -> Result<RgbaImage> {
    if let Some(path) = &cli.thumbnail_image {
        let image = image::open(path)
            .with_context(|| format!("failed to open thumbnail {}", path.display()))?;
        return Ok(image.to_rgba8());
    }
    let Some((w, h)) = cli.thumbnail.split_once('x') else {
        bail!("thumbnail size must be WIDTHxHEIGHT, got {:?}", cli.thumbnail);
    };
    let width = w.trim().parse().context("invalid thumbnail width")?;
    let height = h.trim().parse().context("invalid thumbnail height")?;
    Ok(RgbaImage::new(width, height))
}

/// Platform theme with a plain fade for every themed attribute.
fn demo_theme(platform_package: &str) -> ThemeTable {
    let mut attributes = Vec::new();
    let mut theme = ThemeTable::new();
    let mut next = DEMO_ANIMATION_BASE;
    for kind in TransitionKind::ALL {
        for enter in [true, false] {
            let Some(attr) = animation_attr(kind, enter) else {
                continue;
            };
            let id = ResourceId(next);
            next += 1;
            let fade = if enter {
                AlphaEffect::new(0.0, 1.0)
            } else {
                AlphaEffect::new(1.0, 0.0)
            };
            attributes.push((attr, id));
            theme = theme.with_animation(
                platform_package,
                id,
                Animation::new(fade).with_duration_ms(300).with_fill_after(true),
            );
        }
    }
    theme.with_style(platform_package, DEMO_STYLE, attributes)
}

fn parse_rect(s: &str) -> Result<Rect, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid rectangle {s:?}: {e}"))?;
    match parts.as_slice() {
        &[x, y, width, height] => Ok(Rect::new(x, y, width, height)),
        _ => Err(format!("rectangle must be x,y,width,height, got {s:?}")),
    }
}

fn parse_resource_id(s: &str) -> Result<ResourceId, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => s.parse::<u32>(),
    };
    parsed
        .map(ResourceId)
        .map_err(|e| format!("invalid resource id {s:?}: {e}"))
}
