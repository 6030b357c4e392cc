use std::f64::consts::{PI, TAU};

use crate::{
    color::Color,
    foundation::core::{Canvas, Point, Rect, Rgba8Premul},
    paint::{LinearGradient, Paint},
    render::Backdrop,
    surface::Surface,
};

const GRID_DIVISIONS: f64 = 32.0;
const LINE_COUNT: usize = 31;
const LINE_WIDTH: f64 = 6.0;
/// Phase advance per millisecond of animation time.
const PHASE_PER_MS: f64 = 0.0002;

/// One horizontal stroke: it starts at `x` on the sine curve and runs to the
/// right edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SineLine {
    pub x: f64,
    pub y: f64,
}

/// Horizontal gradient strokes whose left ends trace a slowly drifting sine.
#[derive(Clone, Debug, Default)]
pub struct SineCurveRenderer {
    redraws: u64,
}

impl SineCurveRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalized `0..1` start of the stroke at normalized height `y`.
    pub fn curve_x(normalized_y: f64, elapsed_s: f64) -> f64 {
        let phase = elapsed_s * 1000.0 * PHASE_PER_MS;
        0.5 * (TAU * normalized_y + PI + phase).sin() + 0.5
    }

    pub fn row_centers(canvas: Canvas) -> impl Iterator<Item = f64> {
        let h = f64::from(canvas.height);
        let grid = h / GRID_DIVISIONS;
        (0..LINE_COUNT).map(move |i| grid - LINE_WIDTH / 2.0 + (i as f64) * grid)
    }

    pub fn layout(canvas: Canvas, elapsed_s: f64) -> Vec<SineLine> {
        if canvas.is_empty() {
            return Vec::new();
        }
        let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
        Self::row_centers(canvas)
            .map(|y| SineLine {
                x: Self::curve_x(y / h, elapsed_s) * w,
                y,
            })
            .collect()
    }
}

fn stroke_gradient(from_x: f64, to_x: f64, y: f64) -> LinearGradient {
    LinearGradient::new(Point::new(from_x, y), Point::new(to_x, y))
        .with_stop(0.0, Color::rgba8(18, 120, 50, 0.2))
        .with_stop(0.3, Color::rgba8(18, 160, 50, 0.6))
        .with_stop(1.0, Color::rgba8(25, 65, 120, 1.0))
}

impl Backdrop for SineCurveRenderer {
    fn name(&self) -> &'static str {
        "sine"
    }

    fn render(&mut self, surface: &mut Surface, elapsed_s: f64) {
        self.redraws += 1;
        surface.clear(Rgba8Premul::transparent());

        let canvas = surface.canvas();
        let w = f64::from(canvas.width);
        let half = LINE_WIDTH / 2.0;
        for line in Self::layout(canvas, elapsed_s) {
            let paint = Paint::Linear(stroke_gradient(line.x, w, line.y));
            surface.fill_rect(Rect::new(line.x, line.y - half, w, line.y + half), &paint);
        }
        surface.flush();

        tracing::trace!(redraw = self.redraws, elapsed_s, "sine frame");
    }

    fn redraws(&self) -> u64 {
        self.redraws
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_starts_at_centre_and_stays_normalized() {
        assert!((SineCurveRenderer::curve_x(0.0, 0.0) - 0.5).abs() < 1e-12);
        assert!((SineCurveRenderer::curve_x(0.25, 0.0) - 0.0).abs() < 1e-12);
        for i in 0..100 {
            let x = SineCurveRenderer::curve_x(i as f64 / 100.0, i as f64 * 0.37);
            assert!((0.0..=1.0).contains(&x));
        }
    }

    #[test]
    fn layout_has_31_evenly_spaced_rows() {
        let rows = SineCurveRenderer::layout(Canvas::new(100, 320), 0.0);
        assert_eq!(rows.len(), 31);
        assert!((rows[0].y - 7.0).abs() < 1e-9);
        assert!((rows[30].y - 307.0).abs() < 1e-9);
    }

    #[test]
    fn layout_of_empty_canvas_is_empty() {
        assert!(SineCurveRenderer::layout(Canvas::new(0, 100), 1.0).is_empty());
    }

    #[test]
    fn phase_drifts_with_time() {
        let a = SineCurveRenderer::layout(Canvas::new(400, 320), 0.0);
        let b = SineCurveRenderer::layout(Canvas::new(400, 320), 5.0);
        assert!(a.iter().zip(&b).any(|(a, b)| (a.x - b.x).abs() > 1.0));
    }

    #[test]
    fn strokes_end_opaque_at_the_right_edge() {
        let mut r = SineCurveRenderer::new();
        let mut s = Surface::new(64, 64);
        r.render(&mut s, 0.0);
        // Row 0 sits at y = 2 - 3 + 0 = -1, so the band covers rows 0..=1.
        let px = s.pixel(63, 1).unwrap();
        assert!(px[3] > 200, "alpha {}", px[3]);
        assert_eq!(r.redraws(), 1);
    }
}
