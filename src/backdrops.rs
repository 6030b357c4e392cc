mod circuit;
mod sine;
mod sky;

pub use circuit::{CircuitRenderer, Particle, PulseRing};
pub use sine::{SineCurveRenderer, SineLine};
pub use sky::{EXTRA_SPACE, SkyPalette, SkyRenderer, Star, Stars, star_count};
