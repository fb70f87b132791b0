use std::sync::Arc;

use crate::foundation::error::{StageError, StageResult};

/// Advance of one character when no font is loaded, in ems.
pub const APPROX_ADVANCE_EM: f64 = 0.5;
/// Line height when no font is loaded, in ems.
pub const APPROX_LINE_HEIGHT_EM: f64 = 1.25;

/// Brush carried through Parley layouts. Paint is chosen at draw time, so this stays default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrush;

/// Measured text, optionally with the shaped layout used for drawing.
#[derive(Clone)]
pub struct TextBlock {
    pub width: f64,
    pub height: f64,
    pub(crate) layout: Option<Arc<parley::Layout<TextBrush>>>,
}

impl std::fmt::Debug for TextBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextBlock")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("shaped", &self.layout.is_some())
            .finish()
    }
}

struct LoadedFont {
    family: String,
    data: vello_cpu::peniko::FontData,
}

/// Off-screen measuring context shared by every text entity.
///
/// With a font loaded, text is shaped by Parley and the resulting layout is kept for drawing.
/// Without one, measurement falls back to fixed em-based metrics and drawing is skipped.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    font: Option<LoadedFont>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            font: None,
        }
    }

    pub fn with_font_bytes(bytes: Vec<u8>) -> StageResult<Self> {
        let mut out = Self::new();
        out.load_font(bytes)?;
        Ok(out)
    }

    /// Register a font file; it becomes the face for all subsequent measurement.
    pub fn load_font(&mut self, bytes: Vec<u8>) -> StageResult<()> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| StageError::config("no font families registered from font bytes"))?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| StageError::config("registered font family has no name"))?
            .to_string();

        tracing::debug!(family = %family, "font loaded");
        self.font = Some(LoadedFont {
            family,
            data: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0),
        });
        Ok(())
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub(crate) fn font_data(&self) -> Option<&vello_cpu::peniko::FontData> {
        self.font.as_ref().map(|f| &f.data)
    }

    /// Measure `text` at `size_px` with extra `letter_spacing_px` between glyphs.
    pub fn measure(
        &mut self,
        text: &str,
        size_px: f64,
        letter_spacing_px: f64,
    ) -> StageResult<TextBlock> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(StageError::config("text size_px must be finite and > 0"));
        }
        let Some(font) = &self.font else {
            return Ok(approximate_block(text, size_px, letter_spacing_px));
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(font.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px as f32));
        if letter_spacing_px != 0.0 {
            builder.push_default(parley::style::StyleProperty::LetterSpacing(
                letter_spacing_px as f32,
            ));
        }
        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);

        let mut width = 0.0f64;
        let mut height = 0.0f64;
        for line in layout.lines() {
            let m = line.metrics();
            width = width.max(f64::from(m.advance));
            height += f64::from(m.ascent + m.descent + m.leading);
        }

        Ok(TextBlock {
            width,
            height,
            layout: Some(Arc::new(layout)),
        })
    }
}

fn approximate_block(text: &str, size_px: f64, letter_spacing_px: f64) -> TextBlock {
    let mut width = 0.0f64;
    let mut lines = 0usize;
    for line in text.split('\n') {
        lines += 1;
        let chars = line.chars().count();
        let spacing = letter_spacing_px * chars.saturating_sub(1) as f64;
        width = width.max(chars as f64 * APPROX_ADVANCE_EM * size_px + spacing);
    }
    TextBlock {
        width: width.max(0.0),
        height: lines as f64 * APPROX_LINE_HEIGHT_EM * size_px,
        layout: None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
