#![forbid(unsafe_code)]

pub mod foundation {
    pub mod core;
    pub mod error;
}

pub mod backdrops;
pub mod clock;
pub mod color;
pub mod composite;
pub mod config;
pub mod encode_ffmpeg;
pub mod fingerprint;
pub mod host;
pub mod paint;
pub mod pipeline;
pub mod render;
pub mod rng;
pub mod surface;

pub use foundation::error;

pub use backdrops::{
    CircuitRenderer, SineCurveRenderer, SkyPalette, SkyRenderer, Star, star_count,
};
pub use clock::AnimationClock;
pub use color::{Color, modulo};
pub use composite::CompositeOp;
pub use config::SceneConfig;
pub use encode_ffmpeg::{EncodeConfig, FfmpegEncoder, is_ffmpeg_on_path};
pub use error::{StardriftError, StardriftResult};
pub use fingerprint::{FrameFingerprint, fingerprint_frame};
pub use foundation::core::{Canvas, Fps, FrameIndex, Point, Rect, Rgba8Premul, Vec2};
pub use host::FrameLoop;
pub use paint::{LinearGradient, Paint, RadialGradient};
pub use pipeline::{
    RenderToMp4Opts, render_frame, render_frames, render_png_sequence, render_to_mp4, save_png,
};
pub use render::{Backdrop, BackdropKind, FrameRGBA, create_backdrop};
pub use rng::{PseudoRandomStream, SEED_LIMIT, random_seed};
pub use surface::Surface;
