use std::{
    io::Write as _,
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use anyhow::Context as _;

use crate::{
    error::{StardriftError, StardriftResult},
    foundation::core::{Canvas, Fps, Rgba8Premul},
    surface::Surface,
};

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub canvas: Canvas,
    pub fps: Fps,
    pub out_path: PathBuf,
    pub overwrite: bool,
}

impl EncodeConfig {
    pub fn new(out_path: impl Into<PathBuf>, canvas: Canvas, fps: Fps) -> Self {
        Self {
            canvas,
            fps,
            out_path: out_path.into(),
            overwrite: true,
        }
    }

    pub fn validate(&self) -> StardriftResult<()> {
        if self.canvas.is_empty() {
            return Err(StardriftError::validation(
                "encode width/height must be non-zero",
            ));
        }
        self.fps.validate()?;
        if !self.canvas.width.is_multiple_of(2) || !self.canvas.height.is_multiple_of(2) {
            // yuv420p subsamples chroma 2x2.
            return Err(StardriftError::validation(
                "encode width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        Ok(())
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> StardriftResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Streams raw RGBA frames into a system `ffmpeg` process producing H.264 MP4.
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    background: Rgba8Premul,
    child: Child,
    stdin: Option<ChildStdin>,
    scratch: Vec<u8>,
    frames: u64,
}

impl FfmpegEncoder {
    pub fn new(cfg: EncodeConfig, background: Rgba8Premul) -> StardriftResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(StardriftError::validation(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(StardriftError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .arg(if cfg.overwrite { "-y" } else { "-n" })
            .args(["-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgba"])
            .arg("-s")
            .arg(format!("{}x{}", cfg.canvas.width, cfg.canvas.height))
            .arg("-framerate")
            .arg(format!("{}/{}", cfg.fps.num, cfg.fps.den))
            .args([
                "-i",
                "pipe:0",
                "-an",
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-movflags",
                "+faststart",
            ])
            .arg(&cfg.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            StardriftError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| StardriftError::encode("failed to open ffmpeg stdin"))?;

        tracing::debug!(out = %cfg.out_path.display(), "spawned ffmpeg");

        Ok(Self {
            scratch: vec![0u8; cfg.canvas.byte_len()],
            cfg,
            background,
            child,
            stdin: Some(stdin),
            frames: 0,
        })
    }

    pub fn encode_surface(&mut self, surface: &Surface) -> StardriftResult<()> {
        if surface.canvas() != self.cfg.canvas {
            return Err(StardriftError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                surface.width(),
                surface.height(),
                self.cfg.canvas.width,
                self.cfg.canvas.height
            )));
        }

        flatten_to_opaque_rgba8(&mut self.scratch, surface.data(), self.background)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(StardriftError::encode("ffmpeg encoder is already finalized"));
        };
        stdin.write_all(&self.scratch).map_err(|e| {
            StardriftError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        self.frames += 1;
        Ok(())
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn finish(mut self) -> StardriftResult<()> {
        drop(self.stdin.take());

        let output = self.child.wait_with_output().map_err(|e| {
            StardriftError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StardriftError::encode(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

/// Composite premultiplied pixels over an opaque background.
fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    background: Rgba8Premul,
) -> StardriftResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(StardriftError::validation(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg = [
        u16::from(background.r),
        u16::from(background.g),
        u16::from(background.b),
    ];

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let inv = 255u16 - u16::from(s[3]);
        for i in 0..3 {
            d[i] = (u16::from(s[i]) + mul_div255(bg[i], inv)).min(255) as u8;
        }
        d[3] = 255;
    }

    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(width: u32, height: u32, fps: u32) -> EncodeConfig {
        EncodeConfig {
            canvas: Canvas::new(width, height),
            fps: Fps { num: fps, den: 1 },
            out_path: PathBuf::from("target/out.mp4"),
            overwrite: true,
        }
    }

    #[test]
    fn config_validation_catches_bad_values() {
        assert!(cfg(0, 10, 30).validate().is_err());
        assert!(cfg(11, 10, 30).validate().is_err());
        assert!(cfg(10, 10, 0).validate().is_err());
        assert!(cfg(10, 10, 30).validate().is_ok());
    }

    #[test]
    fn flatten_premul_over_black_keeps_rgb() {
        // Premultiplied red at 50% alpha is already 128,0,0 over black.
        let src = vec![128u8, 0, 0, 128];
        let mut dst = vec![0u8; 4];
        flatten_to_opaque_rgba8(&mut dst, &src, Rgba8Premul::from_straight_rgba(0, 0, 0, 255))
            .unwrap();
        assert_eq!(dst, vec![128, 0, 0, 255]);
    }

    #[test]
    fn flatten_transparent_shows_background() {
        let src = vec![0u8; 4];
        let mut dst = vec![0u8; 4];
        let bg = Rgba8Premul::from_straight_rgba(18, 20, 28, 255);
        flatten_to_opaque_rgba8(&mut dst, &src, bg).unwrap();
        assert_eq!(dst, vec![18, 20, 28, 255]);
    }

    #[test]
    fn flatten_rejects_mismatched_buffers() {
        let mut dst = vec![0u8; 8];
        assert!(flatten_to_opaque_rgba8(&mut dst, &[0u8; 4], Rgba8Premul::transparent()).is_err());
    }
}
