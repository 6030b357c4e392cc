use crate::{
    backdrops::{CircuitRenderer, SineCurveRenderer, SkyRenderer},
    config::SceneConfig,
    error::StardriftResult,
    rng::random_seed,
    surface::Surface,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy of the pixels, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            let a = u32::from(px[3]);
            if a == 0 {
                out.extend_from_slice(&[0, 0, 0, 0]);
                continue;
            }
            for &c in &px[..3] {
                out.push(((u32::from(c) * 255 + a / 2) / a).min(255) as u8);
            }
            out.push(px[3]);
        }
        out
    }
}

/// A procedural animation that repaints a whole surface for a point in time.
///
/// Implementations are driven strictly sequentially by a host loop and hold no
/// resources that need releasing; stopping the animation means no longer
/// calling `render`.
pub trait Backdrop {
    fn name(&self) -> &'static str;

    /// Repaint `surface` for `elapsed_s` seconds since the animation started.
    fn render(&mut self, surface: &mut Surface, elapsed_s: f64);

    /// Number of frames rendered so far.
    fn redraws(&self) -> u64;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackdropKind {
    #[default]
    Sky,
    Sine,
    Circuit,
}

/// Build the backdrop a scene asks for. A scene without a seed draws one here,
/// once.
pub fn create_backdrop(scene: &SceneConfig) -> StardriftResult<Box<dyn Backdrop>> {
    scene.validate()?;
    let seed = scene.seed.unwrap_or_else(random_seed);
    tracing::debug!(kind = ?scene.backdrop, seed, "creating backdrop");
    match scene.backdrop {
        BackdropKind::Sky => Ok(Box::new(SkyRenderer::new(seed, scene.palette)?)),
        BackdropKind::Sine => Ok(Box::new(SineCurveRenderer::new())),
        BackdropKind::Circuit => Ok(Box::new(CircuitRenderer::new(seed)?)),
    }
}
