use serde::{Deserialize, Serialize};

use crate::animation::interpolate::Axis;
use crate::animation::props::Props;
use crate::assets::color::ColorDef;
use crate::assets::text::TextBlock;
use crate::entity::{Anchor, EntityCtx};
use crate::foundation::core::{Affine, Point, Rect, Vec2, affine_to_cpu};
use crate::foundation::error::StageResult;

pub const DEFAULT_FONT_SIZE_PX: f64 = 48.0;

/// Horizontal alignment relative to the anchor x.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    Start,
    Left,
    Center,
    End,
    Right,
}

impl TextAlign {
    /// Shift applied to x for a block of `width`.
    pub fn shift(self, width: f64) -> f64 {
        match self {
            Self::Start | Self::Left => 0.0,
            Self::Center => -width / 2.0,
            Self::End | Self::Right => -width,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrokeStyle {
    pub color: ColorDef,
    /// Baseline pixels.
    pub width_px: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShadowStyle {
    pub color: ColorDef,
    /// Baseline pixels.
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Shadow displacement in viewport pixels. The axis being floated gets none, so the
/// shadow does not trail the oscillation.
pub fn shadow_offset(shadow: ShadowStyle, scale: f64, float_axis: Option<Axis>) -> Vec2 {
    let mut d = Vec2::new(shadow.offset_x * scale, shadow.offset_y * scale);
    match float_axis {
        Some(Axis::X) => d.x = 0.0,
        Some(Axis::Y) => d.y = 0.0,
        None => {}
    }
    d
}

#[derive(Clone, Copy)]
enum GlyphPaint {
    Fill,
    Stroke,
}

/// Measured text block with optional outline and drop shadow.
#[derive(Debug)]
pub struct TextEntity {
    text: String,
    pub(crate) color: ColorDef,
    font_size_px: f64,
    align: Option<TextAlign>,
    stroke: Option<StrokeStyle>,
    shadow: Option<ShadowStyle>,

    resolved_size_px: f64,
    measured_kerning: f64,
    block: Option<TextBlock>,
    stale: bool,
    relayout: bool,
}

impl TextEntity {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: ColorDef::WHITE,
            font_size_px: DEFAULT_FONT_SIZE_PX,
            align: None,
            stroke: None,
            shadow: None,
            resolved_size_px: 0.0,
            measured_kerning: 0.0,
            block: None,
            stale: true,
            relayout: false,
        }
    }

    pub fn with_color(mut self, color: ColorDef) -> Self {
        self.color = color;
        self
    }

    pub fn with_font_size(mut self, px: f64) -> Self {
        self.font_size_px = px;
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = Some(align);
        self
    }

    pub fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn with_shadow(mut self, shadow: ShadowStyle) -> Self {
        self.shadow = Some(shadow);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> ColorDef {
        self.color
    }

    /// Font size after viewport scaling and overflow shrinking.
    pub fn resolved_font_size(&self) -> f64 {
        self.resolved_size_px
    }

    pub(crate) fn set_text(&mut self, text: String) {
        if text != self.text {
            self.text = text;
            self.stale = true;
        }
    }

    pub(crate) fn is_stale(&self, kerning: f64) -> bool {
        self.stale || self.block.is_none() || kerning != self.measured_kerning
    }

    /// Report (once) that the block size changed and layout must run again.
    pub(crate) fn take_relayout(&mut self) -> bool {
        std::mem::take(&mut self.relayout)
    }

    fn effective_align(&self, anchor: Anchor) -> TextAlign {
        self.align.unwrap_or(if anchor.is_left() {
            TextAlign::Left
        } else if anchor.is_right() {
            TextAlign::Right
        } else if anchor == Anchor::Free {
            TextAlign::Start
        } else {
            TextAlign::Center
        })
    }

    /// Measure, shrink to fit the padded viewport width, and place horizontally.
    ///
    /// The vertical position is owned by layout unless the anchor is `Free`; `current_y` is
    /// kept otherwise.
    pub(crate) fn resize(
        &mut self,
        ctx: &mut EntityCtx<'_>,
        anchor: Anchor,
        position: Option<Point>,
        current_y: f64,
        kerning: f64,
    ) -> StageResult<Rect> {
        let vp = ctx.viewport;
        let scale = vp.scale_factor();
        let spacing = kerning * scale;
        let mut size = self.font_size_px * scale;
        let mut block = ctx.text.measure(&self.text, size, spacing)?;

        let avail = (vp.width - 2.0 * ctx.padding.x).max(0.0);
        if block.width > avail && avail > 0.0 {
            size *= avail / block.width;
            block = ctx.text.measure(&self.text, size, spacing)?;
        }

        let anchor_x = match anchor {
            Anchor::Free => position.map_or(0.0, |p| p.x) * vp.horizontal_scale(),
            a if a.is_left() => ctx.padding.x,
            a if a.is_right() => vp.width - ctx.padding.x,
            _ => vp.width / 2.0,
        };
        let x = anchor_x + self.effective_align(anchor).shift(block.width);
        let y = match (anchor, position) {
            (Anchor::Free, Some(p)) => p.y * vp.vertical_scale(),
            _ => current_y,
        };

        let size_changed = self
            .block
            .as_ref()
            .is_none_or(|b| b.width != block.width || b.height != block.height);
        self.relayout |= size_changed;
        let out = Rect::new(x, y, x + block.width, y + block.height);
        self.resolved_size_px = size;
        self.measured_kerning = kerning;
        self.block = Some(block);
        self.stale = false;
        Ok(out)
    }

    pub(crate) fn render(
        &self,
        bounds: Rect,
        props: &Props,
        float_axis: Option<Axis>,
        ctx: &EntityCtx<'_>,
        rc: &mut vello_cpu::RenderContext,
    ) -> StageResult<()> {
        let (Some(font), Some(block)) = (ctx.text.font_data(), &self.block) else {
            return Ok(());
        };
        let Some(layout) = &block.layout else {
            return Ok(());
        };
        let scale = ctx.viewport.scale_factor();
        let origin = Vec2::new(bounds.x0 + props.offset_x, bounds.y0 + props.offset_y);
        let half = Vec2::new(bounds.width() / 2.0, bounds.height() / 2.0);
        let base = Affine::translate(origin + half) * Affine::scale(props.scale) * Affine::translate(-half);

        if let Some(shadow) = self.shadow {
            let d = shadow_offset(shadow, scale, float_axis);
            rc.set_transform(affine_to_cpu(Affine::translate(d) * base));
            rc.set_paint(shadow.color.to_paint());
            draw_glyphs(rc, font, layout, GlyphPaint::Fill);
        }

        rc.set_transform(affine_to_cpu(base));
        if let Some(stroke) = self.stroke {
            rc.set_stroke(vello_cpu::kurbo::Stroke::new(stroke.width_px * scale));
            rc.set_paint(stroke.color.to_paint());
            draw_glyphs(rc, font, layout, GlyphPaint::Stroke);
        }
        rc.set_paint(self.color.to_paint());
        draw_glyphs(rc, font, layout, GlyphPaint::Fill);
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.text.clear();
        self.block = None;
        self.resolved_size_px = 0.0;
        self.stale = true;
        self.relayout = false;
    }
}

fn draw_glyphs(
    rc: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    layout: &parley::Layout<crate::assets::text::TextBrush>,
    paint: GlyphPaint,
) {
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            let builder = rc.glyph_run(font).font_size(run.run().font_size());
            match paint {
                GlyphPaint::Fill => builder.fill_glyphs(glyphs),
                GlyphPaint::Stroke => builder.stroke_glyphs(glyphs),
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/entity/text.rs"]
mod tests;
