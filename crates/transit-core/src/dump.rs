//! Human-readable snapshots of the transition state.

use std::fmt::{self, Write};

use crate::state::{TransitionOverride, TransitionState};

impl fmt::Display for TransitionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "next_transition={}", self.kind())
    }
}

impl TransitionState {
    /// Write a multi-line snapshot of every field.
    pub fn dump(&self, out: &mut dyn Write) -> fmt::Result {
        writeln!(out, " {} ready={}", self, self.is_ready())?;
        writeln!(
            out,
            "  running={} timed_out={}",
            self.is_running(),
            self.is_timed_out()
        )?;
        match self.pending_override() {
            TransitionOverride::None => {}
            TransitionOverride::Custom {
                package,
                enter,
                exit,
            } => {
                writeln!(out, "  override=custom")?;
                writeln!(out, "  package={}", package.as_deref().unwrap_or("<none>"))?;
                writeln!(out, "  enter={enter} exit={exit}")?;
            }
            TransitionOverride::ScaleUp { start } => {
                writeln!(out, "  override=scale_up")?;
                writeln!(out, "  start_x={} start_y={}", start.x, start.y)?;
                writeln!(out, "  start_width={} start_height={}", start.width, start.height)?;
            }
            TransitionOverride::Thumbnail {
                image,
                start,
                scale_up,
            } => {
                writeln!(out, "  override={:?}", self.override_style())?;
                writeln!(
                    out,
                    "  thumbnail={}x{} start_x={} start_y={}",
                    image.width(),
                    image.height(),
                    start.x,
                    start.y
                )?;
                writeln!(out, "  scale_up={scale_up}")?;
            }
        }
        if let Some(callback) = self.pending_callback() {
            writeln!(out, "  callback=#{}", callback.id())?;
        }
        Ok(())
    }
}
