use serde::{Deserialize, Serialize};

/// Interpolated per-frame properties of an entity.
///
/// Every variant reads `opacity` and the offsets. The rest are used by the variants that need
/// them: `scale` (timer rings, zoom phases), `kerning` (text), `sprite_index` (sprite),
/// `angle` (timer sweep, sprite rotation).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Props {
    pub opacity: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
    pub kerning: f64,
    pub sprite_index: f64,
    pub angle: f64,
}

impl Default for Props {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
            kerning: 0.0,
            sprite_index: 0.0,
            angle: 0.0,
        }
    }
}

impl Props {
    /// All fields zero. This is the state of a destroyed entity.
    pub fn zeroed() -> Self {
        Self {
            opacity: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 0.0,
            kerning: 0.0,
            sprite_index: 0.0,
            angle: 0.0,
        }
    }

    pub fn with_opacity(self, opacity: f64) -> Self {
        Self { opacity, ..self }
    }

    pub fn with_offset(self, offset_x: f64, offset_y: f64) -> Self {
        Self {
            offset_x,
            offset_y,
            ..self
        }
    }

    pub fn with_scale(self, scale: f64) -> Self {
        Self { scale, ..self }
    }

    /// Opacity clamped to the drawable range.
    pub fn visible_opacity(&self) -> f32 {
        self.opacity.clamp(0.0, 1.0) as f32
    }
}
