use crate::animation::phase::PhaseSample;
use crate::animation::props::Props;
use crate::assets::sprite_cache::SpriteRegion;
use crate::foundation::core::{Affine, Rect, Vec2, Viewport, affine_to_cpu, rect_to_cpu};
use crate::foundation::error::{StageError, StageResult};
use crate::foundation::math::oscillate;

/// Frames cut from one sprite sheet, drawn by `props.sprite_index`.
pub struct SpriteEntity {
    sheet_id: String,
    regions: Vec<SpriteRegion>,
    bitmaps: Vec<vello_cpu::Image>,
    /// Display size in baseline pixels; defaults to the first region's size.
    size: Option<(f64, f64)>,
    pub flip_x: bool,
    pub flip_y: bool,
    /// Radians, clockwise.
    pub rotation: f64,
}

impl SpriteEntity {
    pub fn new(sheet_id: impl Into<String>, regions: Vec<SpriteRegion>) -> Self {
        Self {
            sheet_id: sheet_id.into(),
            regions,
            bitmaps: Vec::new(),
            size: None,
            flip_x: false,
            flip_y: false,
            rotation: 0.0,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some((width, height));
        self
    }

    pub fn sheet_id(&self) -> &str {
        &self.sheet_id
    }

    pub fn regions(&self) -> &[SpriteRegion] {
        &self.regions
    }

    pub fn frame_count(&self) -> usize {
        self.regions.len()
    }

    pub fn has_bitmaps(&self) -> bool {
        !self.bitmaps.is_empty()
    }

    /// Attach bitmaps from the sprite cache, one per region, in region order.
    pub fn set_bitmaps(&mut self, bitmaps: Vec<vello_cpu::Image>) -> StageResult<()> {
        if bitmaps.len() != self.regions.len() {
            return Err(StageError::config(format!(
                "sprite \"{}\" has {} regions but {} bitmaps",
                self.sheet_id,
                self.regions.len(),
                bitmaps.len()
            )));
        }
        self.bitmaps = bitmaps;
        Ok(())
    }

    pub(crate) fn size(&self, vp: &Viewport) -> (f64, f64) {
        let (w, h) = self.size.unwrap_or_else(|| {
            self.regions
                .first()
                .map_or((0.0, 0.0), |r| (f64::from(r.width), f64::from(r.height)))
        });
        let s = vp.scale_factor();
        (w * s, h * s)
    }

    pub(crate) fn interpolate(
        &self,
        name: &str,
        sample: &PhaseSample,
        props: &Props,
    ) -> Option<Props> {
        let n = self.frame_count();
        let t = sample.eased;
        let mut out = *props;
        match name {
            "flip-over" => {
                out.sprite_index = t.clamp(0.0, 1.0) * n.saturating_sub(1) as f64;
            }
            "animated-float-y" => {
                out.offset_y = oscillate(t, sample.magnitude);
                out.sprite_index = if n == 0 {
                    0.0
                } else {
                    ((t.clamp(0.0, 1.0) * n as f64).floor() as usize % n) as f64
                };
            }
            _ => return None,
        }
        Some(out)
    }

    pub(crate) fn render(
        &self,
        bounds: Rect,
        props: &Props,
        rc: &mut vello_cpu::RenderContext,
    ) -> StageResult<()> {
        if self.bitmaps.is_empty() {
            return Ok(());
        }
        let idx = props.sprite_index;
        if !idx.is_finite() || idx < 0.0 || idx.floor() as usize >= self.bitmaps.len() {
            return Err(StageError::config(format!(
                "sprite index {idx} out of bounds for {} frames of \"{}\"",
                self.bitmaps.len(),
                self.sheet_id
            )));
        }
        let i = idx.floor() as usize;
        let region = self.regions[i];
        let (bw, bh) = (f64::from(region.width), f64::from(region.height));
        if bw <= 0.0 || bh <= 0.0 {
            return Ok(());
        }

        let center = bounds.center() + Vec2::new(props.offset_x, props.offset_y);
        let sx = bounds.width() / bw * props.scale * if self.flip_x { -1.0 } else { 1.0 };
        let sy = bounds.height() / bh * props.scale * if self.flip_y { -1.0 } else { 1.0 };
        let transform = Affine::translate(center.to_vec2())
            * Affine::rotate(self.rotation + props.angle)
            * Affine::scale_non_uniform(sx, sy)
            * Affine::translate((-bw / 2.0, -bh / 2.0));

        rc.set_transform(affine_to_cpu(transform));
        rc.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        rc.set_paint(self.bitmaps[i].clone());
        rc.fill_rect(&rect_to_cpu(Rect::new(0.0, 0.0, bw, bh)));
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.bitmaps.clear();
        self.regions.clear();
    }
}

impl std::fmt::Debug for SpriteEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpriteEntity")
            .field("sheet_id", &self.sheet_id)
            .field("regions", &self.regions)
            .field("bitmaps", &self.bitmaps.len())
            .field("flip_x", &self.flip_x)
            .field("flip_y", &self.flip_y)
            .field("rotation", &self.rotation)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/entity/sprite.rs"]
mod tests;
