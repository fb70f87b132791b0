use serde::{Deserialize, Serialize};

use crate::animation::phase::PhaseDef;
use crate::animation::props::Props;
use crate::animation::timeline::Timeline;
use crate::assets::color::ColorDef;
use crate::assets::sprite_cache::SpriteRegion;
use crate::config::StageConfig;
use crate::entity::sprite::SpriteEntity;
use crate::entity::text::{ShadowStyle, StrokeStyle, TextAlign, TextEntity};
use crate::entity::timer::{RingStyle, TimerEntity};
use crate::entity::vignette::VignetteEntity;
use crate::entity::{Anchor, Entity, EntityKind, EntityType};
use crate::foundation::error::{StageError, StageResult};
use crate::layer::model::LayerId;

/// Construction payload for one entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntitySpec {
    pub id: String,
    #[serde(default)]
    pub layer: LayerId,
    #[serde(default)]
    pub position: Anchor,
    /// Explicit baseline coordinates; both or neither.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default)]
    pub phases: Vec<PhaseDef>,
    #[serde(default)]
    pub delay: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Props>,
    #[serde(flatten)]
    pub kind: EntityKindSpec,
}

/// Variant fields, selected by `"type"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EntityKindSpec {
    Text {
        text: String,
        color: Option<ColorDef>,
        font_size_px: Option<f64>,
        align: Option<TextAlign>,
        stroke: Option<StrokeStyle>,
        shadow: Option<ShadowStyle>,
    },
    Sprite {
        sheet: String,
        regions: Vec<SpriteRegion>,
        size: Option<[f64; 2]>,
        #[serde(default)]
        flip_x: bool,
        #[serde(default)]
        flip_y: bool,
        #[serde(default)]
        rotation: f64,
    },
    Timer {
        radius_px: Option<f64>,
        color: Option<ColorDef>,
        arc_color: Option<ColorDef>,
        ring: Option<RingStyle>,
    },
    Vignette {
        color: Option<ColorDef>,
        inner: Option<f64>,
        outer: Option<f64>,
    },
}

impl EntityKindSpec {
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::Text { .. } => EntityType::Text,
            Self::Sprite { .. } => EntityType::Sprite,
            Self::Timer { .. } => EntityType::Timer,
            Self::Vignette { .. } => EntityType::Vignette,
        }
    }

    fn build(&self) -> EntityKind {
        match self {
            Self::Text {
                text,
                color,
                font_size_px,
                align,
                stroke,
                shadow,
            } => {
                let mut t = TextEntity::new(text.clone());
                if let Some(c) = color {
                    t = t.with_color(*c);
                }
                if let Some(px) = font_size_px {
                    t = t.with_font_size(*px);
                }
                if let Some(a) = align {
                    t = t.with_align(*a);
                }
                if let Some(s) = stroke {
                    t = t.with_stroke(*s);
                }
                if let Some(s) = shadow {
                    t = t.with_shadow(*s);
                }
                EntityKind::Text(t)
            }
            Self::Sprite {
                sheet,
                regions,
                size,
                flip_x,
                flip_y,
                rotation,
            } => {
                let mut s = SpriteEntity::new(sheet.clone(), regions.clone());
                if let Some([w, h]) = size {
                    s = s.with_size(*w, *h);
                }
                s.flip_x = *flip_x;
                s.flip_y = *flip_y;
                s.rotation = *rotation;
                EntityKind::Sprite(s)
            }
            Self::Timer {
                radius_px,
                color,
                arc_color,
                ring,
            } => {
                let mut t = TimerEntity::default();
                if let Some(r) = radius_px {
                    t.radius_px = *r;
                }
                if let Some(c) = color {
                    t.color = *c;
                }
                if let Some(c) = arc_color {
                    t.arc_color = *c;
                }
                t.ring = *ring;
                EntityKind::Timer(t)
            }
            Self::Vignette {
                color,
                inner,
                outer,
            } => {
                let v = VignetteEntity::new(color.unwrap_or(ColorDef::BLACK));
                let (i, o) = (inner.unwrap_or(v.inner), outer.unwrap_or(v.outer));
                EntityKind::Vignette(v.with_radii(i, o))
            }
        }
    }
}

impl EntitySpec {
    /// Parse one payload. Unknown `"type"` tags are configuration errors.
    pub fn from_value(value: serde_json::Value) -> StageResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| StageError::config(format!("invalid entity payload: {e}")))
    }

    pub fn build(&self, config: &StageConfig) -> StageResult<Entity> {
        if self.id.is_empty() {
            return Err(StageError::config("entity id must be non-empty"));
        }
        let phases = self
            .phases
            .iter()
            .map(PhaseDef::to_phase)
            .collect::<StageResult<Vec<_>>>()?;
        let timeline = Timeline::new(phases, config.animation_speed())?
            .with_default_magnitude(config.magnitude_px);

        let mut entity = Entity::new(self.id.clone(), self.layer, self.kind.build(), timeline)
            .with_anchor(self.position)
            .with_delay(self.delay);
        if let Some(props) = self.props {
            entity = entity.with_props(props);
        }
        match (self.x, self.y) {
            (Some(x), Some(y)) => Ok(entity.at(x, y)),
            (None, None) => Ok(entity),
            _ => Err(StageError::config(format!(
                "entity \"{}\" must set both x and y or neither",
                self.id
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/entity/spec.rs"]
mod tests;
