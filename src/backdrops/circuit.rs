use crate::{
    color::{Color, modulo},
    composite::CompositeOp,
    error::{StardriftError, StardriftResult},
    foundation::core::{Canvas, Point, Rect},
    paint::{LinearGradient, Paint, RadialGradient},
    render::Backdrop,
    rng::{PseudoRandomStream, SEED_LIMIT},
    surface::Surface,
};

const GRID_SPACING: f64 = 40.0;
const TRACE_WIDTH: f64 = 1.0;
const PULSE_LENGTH: f64 = 60.0;
const PULSE_SPEED: f64 = 120.0;
const PARTICLE_COUNT: usize = 20;
/// Particles move in percent-of-surface per tick of this many seconds.
const PARTICLE_TICK_S: f64 = 0.05;
const RING_COUNT: usize = 3;
const RING_PERIOD_S: f64 = 4.0;
const RING_WIDTH: f64 = 2.0;

const BACKGROUND: Color = Color::rgb(0.02, 0.03, 0.05);
const TRACE: Color = Color::rgba(0.1, 0.6, 0.3, 0.15);
const PULSE: Color = Color::rgba(0.2, 0.9, 0.5, 0.5);
const PARTICLE: Color = Color::rgb(0.4, 1.0, 0.7);
const RING: Color = Color::rgb(0.2, 0.8, 0.6);
const GLOW: Color = Color::rgba(0.2, 0.9, 0.6, 0.25);
const GLOW_RADIUS: f64 = 150.0;

/// A floating particle, positioned in percent of the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x_pct: f64,
    pub y_pct: f64,
    pub size: f64,
    pub opacity: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PulseRing {
    pub radius: f64,
    pub alpha: f64,
}

/// Dark trace grid with sweeping pulses, rising particles and expanding
/// rings. Like the sky, the particle field is rebuilt from the seed on every
/// frame.
#[derive(Clone, Debug)]
pub struct CircuitRenderer {
    seed: u32,
    redraws: u64,
}

impl CircuitRenderer {
    pub fn new(seed: u32) -> StardriftResult<Self> {
        if seed >= SEED_LIMIT {
            return Err(StardriftError::validation(format!(
                "circuit seed {seed} is out of range (must be < {SEED_LIMIT})"
            )));
        }
        Ok(Self { seed, redraws: 0 })
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn particles(&self, elapsed_s: f64) -> Vec<Particle> {
        let mut rng = PseudoRandomStream::new(self.seed);
        let ticks = elapsed_s / PARTICLE_TICK_S;
        (0..PARTICLE_COUNT)
            .map(|i| {
                let x0 = rng.float() * 100.0;
                let y0 = rng.float() * 100.0;
                let size = rng.float() * 3.0 + 1.0;
                let speed = rng.float() * 0.5 + 0.1;
                let opacity = rng.float() * 0.5 + 0.2;

                let y_pct = modulo(y0 - speed * ticks, 100.0);
                let sway = 2.0 * (0.5 * elapsed_s + i as f64).sin();
                Particle {
                    x_pct: modulo(x0 + sway, 100.0),
                    y_pct,
                    size,
                    opacity,
                }
            })
            .collect()
    }

    pub fn rings(canvas: Canvas, elapsed_s: f64) -> Vec<PulseRing> {
        let max_radius = 0.5 * f64::from(canvas.width.max(canvas.height));
        (0..RING_COUNT)
            .map(|k| {
                let phase = modulo(elapsed_s / RING_PERIOD_S + k as f64 / RING_COUNT as f64, 1.0);
                PulseRing {
                    radius: phase * max_radius,
                    alpha: 0.4 * (1.0 - phase),
                }
            })
            .collect()
    }

    /// Render with an optional pointer glow. `glow` is in percent of the
    /// surface, like particle positions.
    pub fn render_with_glow(&mut self, surface: &mut Surface, elapsed_s: f64, glow: Option<Point>) {
        self.redraws += 1;
        let canvas = surface.canvas();
        if canvas.is_empty() {
            return;
        }
        let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));

        surface.fill_rect(Rect::new(0.0, 0.0, w, h), &Paint::Solid(BACKGROUND));
        surface.set_composite(CompositeOp::Lighter);

        Self::draw_grid(surface, elapsed_s);

        let particles = self.particles(elapsed_s);
        for p in &particles {
            let center = Point::new(p.x_pct / 100.0 * w, p.y_pct / 100.0 * h);
            surface.fill_circle(
                center,
                p.size / 2.0,
                &Paint::Solid(PARTICLE.with_alpha(p.opacity)),
            );
        }

        let center = Point::new(w / 2.0, h / 2.0);
        for ring in Self::rings(canvas, elapsed_s) {
            surface.stroke_circle(
                center,
                ring.radius,
                RING_WIDTH,
                &Paint::Solid(RING.with_alpha(ring.alpha)),
            );
        }

        if let Some(pct) = glow {
            let at = Point::new(pct.x / 100.0 * w, pct.y / 100.0 * h);
            let gradient = RadialGradient::new(at, GLOW_RADIUS)
                .with_stop(0.0, GLOW)
                .with_stop(1.0, GLOW.with_alpha(0.0));
            surface.fill_rect(
                Rect::new(
                    at.x - GLOW_RADIUS,
                    at.y - GLOW_RADIUS,
                    at.x + GLOW_RADIUS,
                    at.y + GLOW_RADIUS,
                ),
                &Paint::Radial(gradient),
            );
        }

        surface.set_composite(CompositeOp::SourceOver);
        surface.flush();
        tracing::trace!(
            redraw = self.redraws,
            particles = particles.len(),
            elapsed_s,
            glow = glow.is_some(),
            "circuit frame"
        );
    }

    fn draw_grid(surface: &mut Surface, elapsed_s: f64) {
        let canvas = surface.canvas();
        let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
        let trace = Paint::Solid(TRACE);

        let mut x = GRID_SPACING;
        while x < w {
            surface.fill_rect(Rect::new(x, 0.0, x + TRACE_WIDTH, h), &trace);
            x += GRID_SPACING;
        }

        let mut row = 0usize;
        let mut y = GRID_SPACING;
        while y < h {
            surface.fill_rect(Rect::new(0.0, y, w, y + TRACE_WIDTH), &trace);

            // Each row's pulse is offset so they do not sweep in lockstep.
            let span = w + PULSE_LENGTH;
            let head = modulo(elapsed_s * PULSE_SPEED + row as f64 * 97.0, span);
            let tail = head - PULSE_LENGTH;
            let gradient = LinearGradient::new(Point::new(tail, y), Point::new(head, y))
                .with_stop(0.0, PULSE.with_alpha(0.0))
                .with_stop(1.0, PULSE);
            surface.fill_rect(
                Rect::new(tail, y - 0.5, head, y + TRACE_WIDTH + 0.5),
                &Paint::Linear(gradient),
            );

            row += 1;
            y += GRID_SPACING;
        }
    }
}

impl Backdrop for CircuitRenderer {
    fn name(&self) -> &'static str {
        "circuit"
    }

    fn render(&mut self, surface: &mut Surface, elapsed_s: f64) {
        self.render_with_glow(surface, elapsed_s, None);
    }

    fn redraws(&self) -> u64 {
        self.redraws
    }
}
