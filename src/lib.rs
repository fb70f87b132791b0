//! Cardstage is a layered 2D stage for animated card-game scenes.
//!
//! Every visual object is an [`Entity`] driven by a phase [`Timeline`]. Entities live on one of
//! three [`Layer`]s owned by a [`LayerManager`], which reflows text through the
//! [`LayoutManager`] and composites the layer surfaces into a [`FrameRGBA`].
//!
//! - Build entities directly or from JSON [`EntitySpec`] payloads
//! - Hand them to [`LayerManager::set_entity`]
//! - Each tick call `update(now)` then `render()`; or let a [`Stage`] drive a [`SceneDef`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod assets;
/// Stage-wide settings.
pub mod config;
pub(crate) mod entity;
pub(crate) mod layer;
pub(crate) mod layout;
/// JSON scenes and the fixed-step driver.
pub mod scene;

pub use crate::foundation::core::{
    Affine, BASELINE, BezPath, Canvas, Point, Rect, Rgba8Premul, Vec2, Viewport,
};
pub use crate::foundation::error::{StageError, StageResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::interpolate::{Axis, BuiltinPhase, Direction, interpolate_builtin};
pub use crate::animation::phase::{
    AnimationPhase, EasingFn, InterpolateFn, PhaseDef, PhaseEasing, PhaseSample,
};
pub use crate::animation::props::Props;
pub use crate::animation::timeline::{Callback, Timeline};
pub use crate::assets::color::ColorDef;
pub use crate::assets::decode::{DecodedImage, decode_image};
pub use crate::assets::sprite_cache::{SpriteCache, SpriteRegion};
pub use crate::assets::text::{
    APPROX_ADVANCE_EM, APPROX_LINE_HEIGHT_EM, TextBlock, TextBrush, TextEngine,
};
pub use crate::config::{DEFAULT_MAGNITUDE_PX, LayoutConfig, StageConfig};
pub use crate::entity::spec::{EntityKindSpec, EntitySpec};
pub use crate::entity::sprite::SpriteEntity;
pub use crate::entity::text::{
    DEFAULT_FONT_SIZE_PX, ShadowStyle, StrokeStyle, TextAlign, TextEntity,
};
pub use crate::entity::timer::{
    ARC_RADIUS_RATIO, DEFAULT_TIMER_RADIUS_PX, RingStyle, TimerEntity, TimerRadii,
};
pub use crate::entity::vignette::VignetteEntity;
pub use crate::entity::{Anchor, EYELINE_RATIO, Entity, EntityCtx, EntityKind, EntityType};
pub use crate::layer::composite::{FrameRGBA, over, over_in_place};
pub use crate::layer::manager::LayerManager;
pub use crate::layer::model::{ACTION_TEXT_PREFIX, Layer, LayerId, LayerKind};
pub use crate::layer::surface::Surface;
pub use crate::layout::solver::{LayoutManager, StackCursor, StackDirection, place};
pub use crate::scene::{SceneDef, SheetDef, Stage};
