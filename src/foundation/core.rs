use crate::foundation::error::{StardriftError, StardriftResult};

pub use kurbo::{Point, Rect, Vec2};

/// Absolute 0-based frame index on the animation timeline.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> StardriftResult<Self> {
        let fps = Self { num, den };
        fps.validate()?;
        Ok(fps)
    }

    pub fn validate(self) -> StardriftResult<()> {
        if self.den == 0 {
            return Err(StardriftError::validation("Fps den must be > 0"));
        }
        if self.num == 0 {
            return Err(StardriftError::validation("Fps num must be > 0"));
        }
        Ok(())
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Convert seconds to frame count using ceil semantics, so a partial
    /// trailing frame is still rendered.
    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        (secs * self.as_f64()).ceil().max(0.0) as u64
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 60, den: 1 }
    }
}

/// Output canvas dimensions in pixels. Zero-sized canvases are legal and
/// render as no-ops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Build a canvas from signed host dimensions, clamping negatives to zero.
    pub fn from_signed(width: i64, height: i64) -> Self {
        let clamp = |v: i64| v.clamp(0, i64::from(u32::MAX)) as u32;
        Self {
            width: clamp(width),
            height: clamp(height),
        }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn byte_len(self) -> usize {
        (self.area() as usize) * 4
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self::default()
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_rejects_zero_parts() {
        assert!(Fps::new(0, 1).is_err());
        assert!(Fps::new(30, 0).is_err());
        assert!(Fps::new(30, 1).is_ok());
    }

    #[test]
    fn fps_time_conversions() {
        let fps = Fps::new(50, 1).unwrap();
        assert!((fps.frame_duration_secs() - 0.02).abs() < 1e-12);
        assert_eq!(fps.secs_to_frames_ceil(1.0), 50);
        assert_eq!(fps.secs_to_frames_ceil(1.01), 51);
        assert_eq!(fps.secs_to_frames_ceil(-3.0), 0);
    }

    #[test]
    fn canvas_from_signed_clamps_negative_dimensions() {
        assert_eq!(Canvas::from_signed(-5, 10), Canvas::new(0, 10));
        assert!(Canvas::from_signed(-5, 10).is_empty());
        assert_eq!(Canvas::new(3, 2).byte_len(), 24);
    }

    #[test]
    fn premul_scales_color_by_alpha() {
        let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
        assert_eq!(c.to_array(), [128, 64, 0, 128]);
    }
}
