use crate::{
    color::{Color, modulo},
    composite::CompositeOp,
    error::{StardriftError, StardriftResult},
    foundation::core::{Canvas, Point, Rect, Vec2},
    paint::{LinearGradient, Paint},
    render::Backdrop,
    rng::{PseudoRandomStream, SEED_LIMIT, random_seed},
    surface::Surface,
};

/// Padding around the visible surface inside which stars keep drifting, so a
/// wrapping star never pops in at the edge.
pub const EXTRA_SPACE: f64 = 50.0;

const FAST_STAR_THRESHOLD: f64 = 0.95;
const BASE_STAR_COUNT: usize = 100;
const PIXELS_PER_EXTRA_STAR: u64 = 1500;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkyPalette {
    /// Gradient color at the top edge.
    pub sky: Color,
    /// Gradient color at the bottom edge.
    pub horizon: Color,
}

impl Default for SkyPalette {
    fn default() -> Self {
        Self {
            sky: Color::rgb(0.0, 0.0, 0.3),
            horizon: Color::rgb(0.2, 0.0, 0.0),
        }
    }
}

/// One star as it appears in a single frame. Never stored across frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub index: usize,
    /// Edge length of the square blob, in pixels.
    pub size: f64,
    /// Drift speed in pixels per second.
    pub speed: f64,
    pub color: Color,
    /// Top-left corner in surface coordinates.
    pub x: f64,
    pub y: f64,
}

/// `100 + floor(W*H / 1500)`: star density follows surface area.
pub fn star_count(canvas: Canvas) -> usize {
    BASE_STAR_COUNT + (canvas.area() / PIXELS_PER_EXTRA_STAR) as usize
}

/// Per-frame star sequence, derived from a freshly seeded stream.
///
/// Each star consumes exactly nine draws in a fixed order, so star `i` is the
/// same star on every frame and only its position moves with time.
pub struct Stars {
    rng: PseudoRandomStream,
    next: usize,
    count: usize,
    wrap: Vec2,
    elapsed_s: f64,
    camera: Vec2,
}

impl Iterator for Stars {
    type Item = Star;

    fn next(&mut self) -> Option<Star> {
        if self.next >= self.count {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let rng = &mut self.rng;
        let size = rng.float_range(0.5, 2.0).powi(2);
        let speed = if rng.float() < FAST_STAR_THRESHOLD {
            rng.float_range(-3.0, 3.0)
        } else {
            rng.float_range(-99.0, 99.0)
        };
        let hue = rng.float_range(-0.3, 0.2);
        let saturation = rng.float();
        let lightness = rng.float();
        let color = Color::hsl(hue, saturation, lightness);

        let (w, h) = (self.wrap.x, self.wrap.y);
        let cam_mult = size * 3.0;
        let base_x = rng.float_range(0.0, w);
        let base_y = rng.float_range(0.0, h);
        let y_jitter = rng.float();

        let t = self.elapsed_s;
        let x = modulo(base_x + t * speed - self.camera.x * cam_mult, w) - EXTRA_SPACE;
        let y = modulo(base_y + t * speed * y_jitter + self.camera.y * cam_mult, h) - EXTRA_SPACE;

        Some(Star {
            index,
            size,
            speed,
            color,
            x,
            y,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Stars {}

/// Starfield over a vertical sky-to-horizon gradient.
///
/// The renderer stores only its seed and palette. Every frame re-seeds the
/// random stream and re-derives every star, which keeps motion smooth and the
/// output a pure function of `(seed, W, H, t)`.
#[derive(Clone, Debug)]
pub struct SkyRenderer {
    seed: u32,
    palette: SkyPalette,
    redraws: u64,
}

impl SkyRenderer {
    pub fn new(seed: u32, palette: SkyPalette) -> StardriftResult<Self> {
        if seed >= SEED_LIMIT {
            return Err(StardriftError::validation(format!(
                "sky seed {seed} is out of range (must be < {SEED_LIMIT})"
            )));
        }
        Ok(Self {
            seed,
            palette,
            redraws: 0,
        })
    }

    pub fn with_random_seed(palette: SkyPalette) -> Self {
        Self {
            seed: random_seed(),
            palette,
            redraws: 0,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn palette(&self) -> SkyPalette {
        self.palette
    }

    /// The stars of one frame, in draw order.
    pub fn stars(&self, canvas: Canvas, elapsed_s: f64, camera: Vec2) -> Stars {
        Stars {
            rng: PseudoRandomStream::new(self.seed),
            next: 0,
            count: star_count(canvas),
            wrap: Vec2::new(
                f64::from(canvas.width) + 2.0 * EXTRA_SPACE,
                f64::from(canvas.height) + 2.0 * EXTRA_SPACE,
            ),
            elapsed_s,
            camera,
        }
    }

    /// Render with a camera offset. Each star is displaced by
    /// `size * 3 * camera`, negated on x, so larger stars parallax more.
    pub fn render_with_camera(&mut self, surface: &mut Surface, elapsed_s: f64, camera: Vec2) {
        self.redraws += 1;
        let canvas = surface.canvas();
        if canvas.is_empty() {
            tracing::trace!(redraw = self.redraws, "sky: empty surface, nothing to draw");
            return;
        }

        let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
        let gradient = LinearGradient::new(Point::ZERO, Point::new(0.0, h))
            .with_stop(0.0, self.palette.sky)
            .with_stop(1.0, self.palette.horizon);
        surface.fill_rect(Rect::new(0.0, 0.0, w, h), &Paint::Linear(gradient));

        surface.set_composite(CompositeOp::Lighter);
        let stars = self.stars(canvas, elapsed_s, camera);
        let count = stars.len();
        for star in stars {
            surface.fill_rect(
                Rect::new(star.x, star.y, star.x + star.size, star.y + star.size),
                &Paint::Solid(star.color),
            );
        }
        surface.set_composite(CompositeOp::SourceOver);
        surface.flush();

        tracing::trace!(redraw = self.redraws, stars = count, elapsed_s, "sky frame");
    }
}

impl Backdrop for SkyRenderer {
    fn name(&self) -> &'static str {
        "sky"
    }

    fn render(&mut self, surface: &mut Surface, elapsed_s: f64) {
        self.render_with_camera(surface, elapsed_s, Vec2::ZERO);
    }

    fn redraws(&self) -> u64 {
        self.redraws
    }
}
