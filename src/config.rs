use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;

use crate::{
    backdrops::SkyPalette,
    error::{StardriftError, StardriftResult},
    foundation::core::{Canvas, Fps},
    render::BackdropKind,
    rng::SEED_LIMIT,
    surface::MAX_DIMENSION,
};

/// Everything needed to render a backdrop animation.
///
/// Every field has a default, so `{}` is a valid scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    pub backdrop: BackdropKind,
    /// Seed in `[0, 1e9)`. When absent a random seed is drawn once when the
    /// backdrop is created.
    pub seed: Option<u32>,
    pub palette: SkyPalette,
    pub canvas: Canvas,
    pub fps: Fps,
    pub duration_s: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            backdrop: BackdropKind::Sky,
            seed: None,
            palette: SkyPalette::default(),
            canvas: Canvas::new(1280, 720),
            fps: Fps::default(),
            duration_s: 5.0,
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> StardriftResult<()> {
        self.fps.validate()?;
        if let Some(seed) = self.seed
            && seed >= SEED_LIMIT
        {
            return Err(StardriftError::validation(format!(
                "seed {seed} is out of range (must be < {SEED_LIMIT})"
            )));
        }
        if self.canvas.width > MAX_DIMENSION || self.canvas.height > MAX_DIMENSION {
            return Err(StardriftError::validation(format!(
                "canvas {}x{} exceeds the {MAX_DIMENSION}px edge limit",
                self.canvas.width, self.canvas.height
            )));
        }
        if !self.duration_s.is_finite() || self.duration_s < 0.0 {
            return Err(StardriftError::validation(
                "duration_s must be finite and >= 0",
            ));
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> StardriftResult<Self> {
        let scene: Self = serde_json::from_str(s)?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn load(path: &Path) -> StardriftResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open scene config '{}'", path.display()))?;
        let scene: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse scene config '{}'", path.display()))?;
        scene.validate()?;
        Ok(scene)
    }

    /// Number of frames covering `duration_s` at `fps`.
    pub fn frame_count(&self) -> u64 {
        self.fps.secs_to_frames_ceil(self.duration_s)
    }
}
