use crate::assets::color::ColorDef;
use crate::assets::decode::pixmap_from_premul_bytes;
use crate::foundation::core::Viewport;
use crate::foundation::error::StageResult;
use crate::foundation::math::{mul_div255, smoothstep};

/// Full-viewport radial darkening.
///
/// The gradient bitmap is built on first draw and reused until `resize()` invalidates it.
pub struct VignetteEntity {
    color: ColorDef,
    /// Normalized distance (0 at center, 1 at the corners) where the fade starts.
    pub inner: f64,
    pub outer: f64,
    gradient: Option<vello_cpu::Image>,
    builds: u64,
}

impl Default for VignetteEntity {
    fn default() -> Self {
        Self::new(ColorDef::BLACK)
    }
}

impl VignetteEntity {
    pub fn new(color: ColorDef) -> Self {
        Self {
            color,
            inner: 0.4,
            outer: 1.0,
            gradient: None,
            builds: 0,
        }
    }

    pub fn with_radii(mut self, inner: f64, outer: f64) -> Self {
        self.inner = inner;
        self.outer = outer;
        self
    }

    pub fn color(&self) -> ColorDef {
        self.color
    }

    /// How many times the gradient bitmap has been built.
    pub fn gradient_builds(&self) -> u64 {
        self.builds
    }

    pub fn is_cached(&self) -> bool {
        self.gradient.is_some()
    }

    pub(crate) fn set_color(&mut self, color: ColorDef) {
        self.color = color;
        self.invalidate();
    }

    pub(crate) fn invalidate(&mut self) {
        self.gradient = None;
    }

    fn build(&mut self, vp: &Viewport) -> StageResult<vello_cpu::Image> {
        let canvas = vp.canvas();
        let (w, h) = (canvas.width, canvas.height);
        let (cx, cy) = (f64::from(w) / 2.0, f64::from(h) / 2.0);
        let half_diag = (cx * cx + cy * cy).sqrt().max(1.0);
        let c = self.color.to_rgba8_premul();

        let mut bytes = vec![0u8; (w as usize) * (h as usize) * 4];
        for (i, px) in bytes.chunks_exact_mut(4).enumerate() {
            let x = (i % w as usize) as f64 + 0.5;
            let y = (i / w as usize) as f64 + 0.5;
            let d = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt() / half_diag;
            let k = (smoothstep(self.inner, self.outer, d) * 255.0).round() as u16;
            px[0] = mul_div255(u16::from(c.r), k) as u8;
            px[1] = mul_div255(u16::from(c.g), k) as u8;
            px[2] = mul_div255(u16::from(c.b), k) as u8;
            px[3] = mul_div255(u16::from(c.a), k) as u8;
        }

        let pixmap = pixmap_from_premul_bytes(&bytes, w, h)?;
        self.builds += 1;
        tracing::debug!(width = w, height = h, builds = self.builds, "vignette gradient built");
        Ok(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        })
    }

    pub(crate) fn render(
        &mut self,
        vp: &Viewport,
        rc: &mut vello_cpu::RenderContext,
    ) -> StageResult<()> {
        let paint = match &self.gradient {
            Some(p) => p.clone(),
            None => {
                let p = self.build(vp)?;
                self.gradient = Some(p.clone());
                p
            }
        };
        let canvas = vp.canvas();
        rc.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        rc.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        rc.set_paint(paint);
        rc.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(canvas.width),
            f64::from(canvas.height),
        ));
        Ok(())
    }
}

impl std::fmt::Debug for VignetteEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VignetteEntity")
            .field("color", &self.color)
            .field("inner", &self.inner)
            .field("outer", &self.outer)
            .field("cached", &self.gradient.is_some())
            .field("builds", &self.builds)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/entity/vignette.rs"]
mod tests;
