use crate::foundation::core::Canvas;
use crate::foundation::error::StageResult;

/// Backing pixmap of one layer plus a reusable raster context.
pub struct Surface {
    pixmap: vello_cpu::Pixmap,
    ctx: Option<vello_cpu::RenderContext>,
}

impl Surface {
    pub fn new(canvas: Canvas) -> StageResult<Self> {
        let (w, h) = canvas.surface_dims()?;
        Ok(Self {
            pixmap: vello_cpu::Pixmap::new(w, h),
            ctx: None,
        })
    }

    pub fn width(&self) -> u32 {
        u32::from(self.pixmap.width())
    }

    pub fn height(&self) -> u32 {
        u32::from(self.pixmap.height())
    }

    /// Reallocate for `canvas`; contents are dropped. No-op if the size is unchanged.
    pub fn resize(&mut self, canvas: Canvas) -> StageResult<()> {
        let (w, h) = canvas.surface_dims()?;
        if self.pixmap.width() == w && self.pixmap.height() == h {
            return Ok(());
        }
        self.pixmap = vello_cpu::Pixmap::new(w, h);
        self.ctx = None;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.pixmap.data_as_u8_slice_mut().fill(0);
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let i = ((y as usize) * (self.width() as usize) + (x as usize)) * 4;
        let d = self.data();
        Some([d[i], d[i + 1], d[i + 2], d[i + 3]])
    }

    /// Record draw calls with `f` and rasterize them into the pixmap.
    pub fn draw<R>(
        &mut self,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> StageResult<R>,
    ) -> StageResult<R> {
        let (w, h) = (self.pixmap.width(), self.pixmap.height());
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();
        let out = f(&mut ctx);
        if out.is_ok() {
            ctx.flush();
            ctx.render_to_pixmap(&mut self.pixmap);
        }
        self.ctx = Some(ctx);
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/surface.rs"]
mod tests;
