use vello_cpu::{kurbo, peniko};

use crate::{color::Color, foundation::core::Point};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Color,
}

/// Linear gradient between two points.
///
/// Colors are clamped to the first and last stop outside `[0, 1]`. A gradient
/// whose endpoints coincide paints nothing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            stops: Vec::new(),
        }
    }

    /// Add a stop, keeping stops ordered by offset. Stops with equal offsets
    /// keep insertion order so hard edges work.
    pub fn with_stop(mut self, offset: f64, color: Color) -> Self {
        let offset = offset.clamp(0.0, 1.0);
        let at = self.stops.partition_point(|s| s.offset <= offset);
        self.stops.insert(at, ColorStop { offset, color });
        self
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn is_degenerate(&self) -> bool {
        let len2 = (self.end - self.start).hypot2();
        len2.is_nan() || len2 <= 0.0 || self.stops.is_empty()
    }

    /// Rasterizer paint for this gradient; `None` when it would paint nothing.
    pub fn to_peniko(&self) -> Option<peniko::Gradient> {
        if self.is_degenerate() {
            return None;
        }
        let stops = peniko_stops(&self.stops);
        Some(
            peniko::Gradient::new_linear(
                kurbo::Point::new(self.start.x, self.start.y),
                kurbo::Point::new(self.end.x, self.end.y),
            )
            .with_stops(stops.as_slice()),
        )
    }
}

/// Radial gradient from `center` (offset 0) out to `radius` (offset 1).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RadialGradient {
    pub center: Point,
    pub radius: f64,
    stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius,
            stops: Vec::new(),
        }
    }

    pub fn with_stop(mut self, offset: f64, color: Color) -> Self {
        let offset = offset.clamp(0.0, 1.0);
        let at = self.stops.partition_point(|s| s.offset <= offset);
        self.stops.insert(at, ColorStop { offset, color });
        self
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn is_degenerate(&self) -> bool {
        self.radius.is_nan() || self.radius <= 0.0 || self.stops.is_empty()
    }

    pub fn to_peniko(&self) -> Option<peniko::Gradient> {
        if self.is_degenerate() {
            return None;
        }
        let stops = peniko_stops(&self.stops);
        Some(
            peniko::Gradient::new_radial(
                kurbo::Point::new(self.center.x, self.center.y),
                self.radius as f32,
            )
            .with_stops(stops.as_slice()),
        )
    }
}

fn peniko_stops(stops: &[ColorStop]) -> Vec<(f32, peniko::Color)> {
    stops
        .iter()
        .map(|s| (s.offset as f32, s.color.to_peniko()))
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Self::Solid(c)
    }
}

impl From<LinearGradient> for Paint {
    fn from(g: LinearGradient) -> Self {
        Self::Linear(g)
    }
}

impl From<RadialGradient> for Paint {
    fn from(g: RadialGradient) -> Self {
        Self::Radial(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_stop() -> LinearGradient {
        LinearGradient::new(Point::new(0.0, 0.0), Point::new(0.0, 100.0))
            .with_stop(1.0, Color::rgb(1.0, 0.0, 0.0))
            .with_stop(0.0, Color::rgb(0.0, 0.0, 1.0))
    }

    #[test]
    fn stops_are_sorted_by_offset() {
        let g = two_stop();
        assert_eq!(g.stops()[0].offset, 0.0);
        assert_eq!(g.stops()[1].offset, 1.0);
    }

    #[test]
    fn offsets_are_clamped() {
        let g = LinearGradient::new(Point::ZERO, Point::new(1.0, 0.0))
            .with_stop(-0.5, Color::BLACK)
            .with_stop(3.0, Color::BLACK);
        assert_eq!(g.stops()[0].offset, 0.0);
        assert_eq!(g.stops()[1].offset, 1.0);
    }

    #[test]
    fn equal_offsets_keep_insertion_order() {
        let g = LinearGradient::new(Point::ZERO, Point::new(1.0, 0.0))
            .with_stop(0.5, Color::BLACK)
            .with_stop(0.5, Color::rgb(1.0, 1.0, 1.0));
        assert_eq!(g.stops()[0].color, Color::BLACK);
        assert_eq!(g.stops()[1].color, Color::rgb(1.0, 1.0, 1.0));
    }

    #[test]
    fn degenerate_gradients_have_no_paint() {
        let collapsed = LinearGradient::new(Point::new(4.0, 4.0), Point::new(4.0, 4.0))
            .with_stop(0.0, Color::BLACK);
        assert!(collapsed.is_degenerate());
        assert!(collapsed.to_peniko().is_none());

        let stopless = LinearGradient::new(Point::ZERO, Point::new(0.0, 9.0));
        assert!(stopless.to_peniko().is_none());

        assert!(two_stop().to_peniko().is_some());
    }

    #[test]
    fn radial_needs_a_positive_radius() {
        let glow =
            |r: f64| RadialGradient::new(Point::new(5.0, 5.0), r).with_stop(0.0, Color::BLACK);
        assert!(glow(0.0).to_peniko().is_none());
        assert!(glow(f64::NAN).to_peniko().is_none());
        assert!(glow(3.0).to_peniko().is_some());
    }
}
