use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{DirscapeError, DirscapeResult};
use crate::foundation::math::premul_rgba8;
use crate::matrix::model::MatrixSet;
use crate::render::backend::{FrameRGBA, SurfaceRenderer};
use crate::render::colormap::viridis;
use crate::render::projection::{Camera, Projector, Quad, floor_path, surface_quads};
use crate::timing::window::FrameWindow;

/// Options for [`CpuSurfaceRenderer`].
#[derive(Clone, Copy, Debug)]
pub struct CpuRendererOpts {
    /// Output size.
    pub canvas: Canvas,
    /// Background color (RGBA8, straight alpha).
    pub clear_rgba: [u8; 4],
    /// Camera elevation above the floor plane.
    pub elevation_deg: f64,
    /// Camera orbit per frame.
    pub degrees_per_frame: f64,
    /// Height of the value axis relative to the unit floor.
    pub z_scale: f64,
    /// Grid samples per matrix axis; larger matrices are strided down.
    pub max_grid_samples: usize,
}

impl Default for CpuRendererOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            clear_rgba: [18, 20, 28, 255],
            elevation_deg: 30.0,
            degrees_per_frame: 2.0,
            z_scale: 0.7,
            max_grid_samples: 48,
        }
    }
}

impl CpuRendererOpts {
    /// Return options with a different canvas.
    pub fn with_canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = canvas;
        self
    }
}

/// CPU rendering surface powered by `vello_cpu`.
///
/// Draws every matrix in the window as a colormapped 3D surface, oldest first, using axis limits
/// shared by the whole set. The `vello_cpu` context and target pixmap persist across frames.
pub struct CpuSurfaceRenderer {
    opts: CpuRendererOpts,
    ctx: Option<vello_cpu::RenderContext>,
    pixmap: vello_cpu::Pixmap,
}

impl CpuSurfaceRenderer {
    /// Create a renderer for `opts.canvas`.
    pub fn new(opts: CpuRendererOpts) -> DirscapeResult<Self> {
        let (w, h) = canvas_u16(opts.canvas)?;
        Ok(Self {
            opts,
            ctx: None,
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// Renderer options.
    pub fn opts(&self) -> &CpuRendererOpts {
        &self.opts
    }

    fn with_ctx_mut<R>(
        &mut self,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> DirscapeResult<R>,
    ) -> DirscapeResult<R> {
        let width = self.pixmap.width();
        let height = self.pixmap.height();
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }
}

impl SurfaceRenderer for CpuSurfaceRenderer {
    fn render_frame(
        &mut self,
        frame: FrameIndex,
        window: &FrameWindow,
        matrices: &MatrixSet,
    ) -> DirscapeResult<FrameRGBA> {
        clear_pixmap(&mut self.pixmap, premul_rgba8(self.opts.clear_rgba));

        if let Some(bounds) = matrices.bounds() {
            let camera = Camera::for_frame(
                frame,
                self.opts.degrees_per_frame,
                self.opts.elevation_deg,
            );
            let projector = Projector::new(self.opts.canvas, bounds, camera, self.opts.z_scale);

            let mut quads: Vec<Quad> = Vec::new();
            for (idx, alpha) in window.entries() {
                let matrix = matrices.get(idx).ok_or_else(|| {
                    DirscapeError::render(format!(
                        "window index {idx} out of range for {} matrices",
                        matrices.len()
                    ))
                })?;
                quads.extend(surface_quads(
                    &projector,
                    matrix,
                    alpha,
                    self.opts.max_grid_samples,
                ));
            }
            // Painter's order: farthest first.
            quads.sort_by(|a, b| b.depth.total_cmp(&a.depth));

            let floor = bezpath_to_cpu(&floor_path(&projector));
            self.with_ctx_mut(|this, ctx| {
                let [br, bg, bb, ba] = this.opts.clear_rgba;
                let (w, h) = (f64::from(this.pixmap.width()), f64::from(this.pixmap.height()));
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(br, bg, bb, ba));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));

                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(90, 96, 120, 60));
                ctx.fill_path(&floor);

                for quad in &quads {
                    let [r, g, b] = viridis(quad.level);
                    let a = (quad.alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
                    ctx.fill_path(&bezpath_to_cpu(&quad.path));
                }

                ctx.flush();
                ctx.render_to_pixmap(&mut this.pixmap);
                Ok(())
            })?;
        }

        Ok(FrameRGBA {
            width: self.opts.canvas.width,
            height: self.opts.canvas.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn canvas_u16(canvas: Canvas) -> DirscapeResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| DirscapeError::render("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| DirscapeError::render("canvas height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(DirscapeError::render("canvas width/height must be non-zero"));
    }
    Ok((w, h))
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    for px in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let p = |pt: kurbo::Point| vello_cpu::kurbo::Point::new(pt.x, pt.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(a) => out.move_to(p(a)),
            PathEl::LineTo(a) => out.line_to(p(a)),
            PathEl::QuadTo(a, b) => out.quad_to(p(a), p(b)),
            PathEl::CurveTo(a, b, c) => out.curve_to(p(a), p(b), p(c)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
