use std::fmt;

use vello_cpu::{
    Pixmap, RenderContext,
    kurbo::{self, Shape as _},
};

use crate::{
    composite::{CompositeOp, PremulRgba8, over},
    foundation::core::{Canvas, Point, Rect, Rgba8Premul},
    paint::Paint,
    render::FrameRGBA,
};

/// Largest edge the rasterizer can address.
pub const MAX_DIMENSION: u32 = u16::MAX as u32;

const CIRCLE_TOLERANCE: f64 = 0.1;

/// Premultiplied RGBA8 pixmap with a canvas-style drawing API.
///
/// Draw calls are recorded into a `vello_cpu` render context and land in the
/// pixels on [`Surface::flush`], composited source-over onto what is already
/// there. `clear` writes the pixels directly and drops anything unflushed.
///
/// Dimensions belong to the surface, not to whoever draws on it: renderers
/// read `width()`/`height()` on every frame and never cache them.
pub struct Surface {
    canvas: Canvas,
    pixmap: Pixmap,
    scratch: Pixmap,
    ctx: Option<RenderContext>,
    composite: CompositeOp,
    blend_layer: bool,
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("canvas", &self.canvas)
            .field("composite", &self.composite)
            .field("pending", &self.ctx.is_some())
            .finish()
    }
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_canvas(Canvas::new(width, height))
    }

    /// Edges beyond [`MAX_DIMENSION`] are clamped.
    pub fn with_canvas(canvas: Canvas) -> Self {
        let canvas = clamp_canvas(canvas);
        let (w, h) = dims(canvas);
        Self {
            canvas,
            pixmap: Pixmap::new(w, h),
            scratch: Pixmap::new(w, h),
            ctx: None,
            composite: CompositeOp::SourceOver,
            blend_layer: false,
        }
    }

    pub fn width(&self) -> u32 {
        self.canvas.width
    }

    pub fn height(&self) -> u32 {
        self.canvas.height
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Pixels as of the last flush.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Resize to a new canvas. Contents are discarded.
    pub fn resize(&mut self, canvas: Canvas) {
        let canvas = clamp_canvas(canvas);
        if canvas == self.canvas {
            return;
        }
        let (w, h) = dims(canvas);
        self.canvas = canvas;
        self.pixmap = Pixmap::new(w, h);
        self.scratch = Pixmap::new(w, h);
        self.drop_pending();
    }

    pub fn composite(&self) -> CompositeOp {
        self.composite
    }

    /// Switch the mode for subsequent draws. `Lighter` opens a `Compose::Plus`
    /// layer that is closed again when the mode goes back to `SourceOver`.
    pub fn set_composite(&mut self, op: CompositeOp) {
        if op == self.composite {
            return;
        }
        self.composite = op;
        if let Some(ctx) = self.ctx.as_mut() {
            if self.blend_layer {
                ctx.pop_layer();
                self.blend_layer = false;
            }
            if op != CompositeOp::SourceOver {
                ctx.push_blend_layer(op.blend_mode());
                self.blend_layer = true;
            }
        }
    }

    /// Overwrite every pixel, ignoring the composite mode.
    pub fn clear(&mut self, rgba: Rgba8Premul) {
        self.drop_pending();
        fill_pixmap(&mut self.pixmap, rgba.to_array());
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<PremulRgba8> {
        if x >= self.canvas.width || y >= self.canvas.height {
            return None;
        }
        let i = ((y as usize) * (self.canvas.width as usize) + (x as usize)) * 4;
        let d = self.data();
        Some([d[i], d[i + 1], d[i + 2], d[i + 3]])
    }

    pub fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        let r = rect.abs();
        if !(r.x0.is_finite() && r.y0.is_finite() && r.x1.is_finite() && r.y1.is_finite())
            || r.area() <= 0.0
        {
            return;
        }
        let Some(ctx) = self.begin() else {
            return;
        };
        if set_paint(ctx, paint) {
            ctx.fill_rect(&kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1));
        }
    }

    pub fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint) {
        if !(radius > 0.0 && center.x.is_finite() && center.y.is_finite()) {
            return;
        }
        let Some(ctx) = self.begin() else {
            return;
        };
        if set_paint(ctx, paint) {
            ctx.fill_path(&circle_path(center, radius));
        }
    }

    /// Stroke a circle outline of `line_width` centred on `radius`.
    pub fn stroke_circle(&mut self, center: Point, radius: f64, line_width: f64, paint: &Paint) {
        if !(radius > 0.0 && line_width > 0.0 && center.x.is_finite() && center.y.is_finite()) {
            return;
        }
        let Some(ctx) = self.begin() else {
            return;
        };
        if set_paint(ctx, paint) {
            ctx.set_stroke(kurbo::Stroke::new(line_width));
            ctx.stroke_path(&circle_path(center, radius));
        }
    }

    /// Rasterize everything drawn since the last flush or clear.
    pub fn flush(&mut self) {
        let Some(mut ctx) = self.ctx.take() else {
            return;
        };
        if std::mem::take(&mut self.blend_layer) {
            ctx.pop_layer();
        }
        ctx.flush();
        fill_pixmap(&mut self.scratch, [0, 0, 0, 0]);
        ctx.render_to_pixmap(&mut self.scratch);

        let src = self.scratch.data_as_u8_slice();
        let dst = self.pixmap.data_as_u8_slice_mut();
        for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }

    pub fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.data().to_vec(),
            premultiplied: true,
        }
    }

    fn begin(&mut self) -> Option<&mut RenderContext> {
        if self.canvas.is_empty() {
            return None;
        }
        if self.ctx.is_none() {
            let (w, h) = dims(self.canvas);
            let mut ctx = RenderContext::new(w, h);
            if self.composite != CompositeOp::SourceOver {
                ctx.push_blend_layer(self.composite.blend_mode());
                self.blend_layer = true;
            }
            self.ctx = Some(ctx);
        }
        self.ctx.as_mut()
    }

    fn drop_pending(&mut self) {
        self.ctx = None;
        self.blend_layer = false;
    }
}

/// Returns false when the paint would draw nothing.
fn set_paint(ctx: &mut RenderContext, paint: &Paint) -> bool {
    ctx.set_paint_transform(kurbo::Affine::IDENTITY);
    match paint {
        Paint::Solid(color) => {
            ctx.set_paint(color.to_peniko());
            true
        }
        Paint::Linear(gradient) => set_gradient(ctx, gradient.to_peniko()),
        Paint::Radial(gradient) => set_gradient(ctx, gradient.to_peniko()),
    }
}

fn set_gradient(ctx: &mut RenderContext, gradient: Option<vello_cpu::peniko::Gradient>) -> bool {
    match gradient {
        Some(g) => {
            ctx.set_paint(g);
            true
        }
        None => false,
    }
}

fn circle_path(center: Point, radius: f64) -> kurbo::BezPath {
    kurbo::Circle::new(kurbo::Point::new(center.x, center.y), radius).to_path(CIRCLE_TOLERANCE)
}

fn fill_pixmap(pixmap: &mut Pixmap, rgba: [u8; 4]) {
    for px in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn clamp_canvas(canvas: Canvas) -> Canvas {
    Canvas::new(
        canvas.width.min(MAX_DIMENSION),
        canvas.height.min(MAX_DIMENSION),
    )
}

fn dims(canvas: Canvas) -> (u16, u16) {
    (
        u16::try_from(canvas.width).unwrap_or(u16::MAX),
        u16::try_from(canvas.height).unwrap_or(u16::MAX),
    )
}
