use vello_cpu::peniko::{BlendMode, Compose, Mix};

pub type PremulRgba8 = [u8; 4];

/// How a drawn shape combines with the pixels already on the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeOp {
    /// Porter-Duff source-over.
    #[default]
    SourceOver,
    /// Additive blend: overlaps brighten toward white.
    Lighter,
}

impl CompositeOp {
    pub fn blend_mode(self) -> BlendMode {
        match self {
            Self::SourceOver => BlendMode::new(Mix::Normal, Compose::SrcOver),
            Self::Lighter => BlendMode::new(Mix::Normal, Compose::Plus),
        }
    }
}

/// Source-over of one fully covered premultiplied pixel.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let inv = 255u16 - u16::from(sa);
            let mut out = [0u8; 4];
            for i in 0..4 {
                out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
            }
            out
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_src_alpha_0_is_noop() {
        let dst = [10, 20, 30, 40];
        assert_eq!(over(dst, [0, 0, 0, 0]), dst);
    }

    #[test]
    fn over_src_opaque_replaces_dst() {
        let dst = [0, 0, 0, 255];
        let src = [255, 0, 0, 255];
        assert_eq!(over(dst, src), src);
    }

    #[test]
    fn over_dst_transparent_returns_src() {
        let src = [100, 110, 120, 200];
        assert_eq!(over([0, 0, 0, 0], src), src);
    }

    #[test]
    fn over_half_alpha_mixes_with_dst() {
        let dst = [0, 0, 200, 255];
        let src = [128, 0, 0, 128];
        assert_eq!(over(dst, src), [128, 0, 100, 255]);
    }

    #[test]
    fn modes_map_to_porter_duff_compose() {
        assert_eq!(CompositeOp::SourceOver.blend_mode().compose, Compose::SrcOver);
        assert_eq!(CompositeOp::Lighter.blend_mode().compose, Compose::Plus);
        assert_eq!(CompositeOp::Lighter.blend_mode().mix, Mix::Normal);
    }
}
