use std::time::Duration;

use crate::{
    clock::AnimationClock,
    foundation::core::{Canvas, Rgba8Premul},
    render::Backdrop,
    surface::Surface,
};

/// Drives a backdrop one frame at a time, the way a display-refresh callback
/// would.
///
/// Each tick overwrites the surface, advances the clock and renders. Ticks are
/// strictly sequential. After `stop` the loop never renders again.
pub struct FrameLoop {
    backdrop: Box<dyn Backdrop>,
    surface: Surface,
    clock: AnimationClock,
    clear: Rgba8Premul,
    frames: u64,
    stopped: bool,
}

impl FrameLoop {
    pub fn new(backdrop: Box<dyn Backdrop>, canvas: Canvas, clock: AnimationClock) -> Self {
        Self {
            backdrop,
            surface: Surface::with_canvas(canvas),
            clock,
            clear: Rgba8Premul::transparent(),
            frames: 0,
            stopped: false,
        }
    }

    /// Color the surface is reset to before each frame.
    pub fn with_clear(mut self, clear: Rgba8Premul) -> Self {
        self.clear = clear;
        self
    }

    /// Apply new viewport dimensions. Takes effect on the next tick.
    pub fn resize(&mut self, canvas: Canvas) {
        if canvas != self.surface.canvas() {
            tracing::debug!(width = canvas.width, height = canvas.height, "resize");
        }
        self.surface.resize(canvas);
    }

    /// Advance by the clock's fixed step and render.
    pub fn tick(&mut self) -> Option<&Surface> {
        if self.stopped {
            return None;
        }
        let t = self.clock.advance();
        Some(self.render_at(t))
    }

    /// Advance by a measured delta and render.
    pub fn tick_by(&mut self, delta: Duration) -> Option<&Surface> {
        if self.stopped {
            return None;
        }
        let t = self.clock.advance_by(delta);
        Some(self.render_at(t))
    }

    pub fn stop(&mut self) {
        if !self.stopped {
            tracing::debug!(frames = self.frames, "frame loop stopped");
        }
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn elapsed_s(&self) -> f64 {
        self.clock.elapsed_s()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn backdrop(&self) -> &dyn Backdrop {
        self.backdrop.as_ref()
    }

    fn render_at(&mut self, t: f64) -> &Surface {
        self.surface.clear(self.clear);
        self.backdrop.render(&mut self.surface, t);
        self.surface.flush();
        self.frames += 1;
        tracing::trace!(frame = self.frames, elapsed_s = t, "tick");
        &self.surface
    }
}
