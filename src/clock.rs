use std::time::Duration;

use crate::foundation::core::Fps;

/// Default per-tick advance: roughly one 60 Hz display refresh.
pub const DEFAULT_STEP_S: f64 = 0.016;

/// Monotonic animation time in seconds.
///
/// Time only moves forward: negative or non-finite deltas advance by zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationClock {
    elapsed_s: f64,
    step_s: f64,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::fixed(DEFAULT_STEP_S)
    }
}

impl AnimationClock {
    pub fn fixed(step_s: f64) -> Self {
        Self {
            elapsed_s: 0.0,
            step_s: sanitize(step_s),
        }
    }

    pub fn from_fps(fps: Fps) -> Self {
        Self::fixed(fps.frame_duration_secs())
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    pub fn step_s(&self) -> f64 {
        self.step_s
    }

    /// Advance by the fixed step and return the new elapsed time.
    pub fn advance(&mut self) -> f64 {
        self.advance_by_secs(self.step_s)
    }

    /// Advance by a measured delta.
    pub fn advance_by(&mut self, delta: Duration) -> f64 {
        self.advance_by_secs(delta.as_secs_f64())
    }

    pub fn advance_by_secs(&mut self, delta_s: f64) -> f64 {
        self.elapsed_s += sanitize(delta_s);
        self.elapsed_s
    }
}

fn sanitize(delta_s: f64) -> f64 {
    if delta_s.is_finite() && delta_s > 0.0 {
        delta_s
    } else {
        0.0
    }
}
