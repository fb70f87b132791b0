pub(crate) mod spec;
pub(crate) mod sprite;
pub(crate) mod text;
pub(crate) mod timer;
pub(crate) mod vignette;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::animation::interpolate::{Axis, BuiltinPhase, interpolate_builtin};
use crate::animation::phase::PhaseSample;
use crate::animation::props::Props;
use crate::animation::timeline::Timeline;
use crate::assets::color::ColorDef;
use crate::assets::text::TextEngine;
use crate::foundation::core::{Point, Rect, Vec2, Viewport};
use crate::foundation::error::{StageError, StageResult};
use crate::layer::model::LayerId;

use sprite::SpriteEntity;
use text::TextEntity;
use timer::TimerEntity;
use vignette::VignetteEntity;

/// Eyeline sits one third down from the top of the viewport.
pub const EYELINE_RATIO: f64 = 1.0 / 3.0;

/// Named viewport-relative placement rule.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    #[default]
    Center,
    Eyeline,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// Explicit x/y in baseline coordinates.
    Free,
}

impl Anchor {
    /// Every anchor that text layout stacks along.
    pub const STACKED: [Anchor; 10] = [
        Anchor::Center,
        Anchor::Eyeline,
        Anchor::Top,
        Anchor::Bottom,
        Anchor::Left,
        Anchor::Right,
        Anchor::TopLeft,
        Anchor::TopRight,
        Anchor::BottomLeft,
        Anchor::BottomRight,
    ];

    pub fn is_top(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    pub fn is_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }

    pub fn is_left(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    pub fn is_right(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }
}

/// Top-left corner of a `width x height` box placed by `anchor`.
pub(crate) fn anchor_origin(
    anchor: Anchor,
    position: Option<Point>,
    viewport: &Viewport,
    padding: Vec2,
    width: f64,
    height: f64,
) -> Point {
    if anchor == Anchor::Free {
        let p = position.unwrap_or(Point::ORIGIN);
        return Point::new(
            p.x * viewport.horizontal_scale(),
            p.y * viewport.vertical_scale(),
        );
    }
    let (vw, vh) = (viewport.width, viewport.height);
    let x = if anchor.is_left() {
        padding.x
    } else if anchor.is_right() {
        vw - padding.x - width
    } else {
        (vw - width) / 2.0
    };
    let y = if anchor.is_top() {
        padding.y
    } else if anchor.is_bottom() {
        vh - padding.y - height
    } else if anchor == Anchor::Eyeline {
        vh * EYELINE_RATIO - height / 2.0
    } else {
        (vh - height) / 2.0
    };
    Point::new(x, y)
}

/// Variant tag, used for lookups by type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityType {
    Text,
    Sprite,
    Timer,
    Vignette,
}

impl FromStr for EntityType {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "sprite" => Ok(Self::Sprite),
            "timer" => Ok(Self::Timer),
            "vignette" => Ok(Self::Vignette),
            other => Err(StageError::config(format!("unknown entity type \"{other}\""))),
        }
    }
}

/// Per-call context shared by update, resize and render.
pub struct EntityCtx<'a> {
    pub viewport: Viewport,
    /// Wall-clock time in seconds.
    pub now: f64,
    /// Scaled horizontal and vertical padding.
    pub padding: Vec2,
    pub text: &'a mut TextEngine,
}

pub enum EntityKind {
    Text(TextEntity),
    Sprite(SpriteEntity),
    Timer(TimerEntity),
    Vignette(VignetteEntity),
}

impl EntityKind {
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::Text(_) => EntityType::Text,
            Self::Sprite(_) => EntityType::Sprite,
            Self::Timer(_) => EntityType::Timer,
            Self::Vignette(_) => EntityType::Vignette,
        }
    }

    fn initial_props(&self) -> Props {
        match self {
            Self::Timer(_) => TimerEntity::initial_props(),
            _ => Props::default(),
        }
    }

    fn interpolate(
        &self,
        phase: &crate::animation::phase::AnimationPhase,
        sample: &PhaseSample,
        props: &Props,
    ) -> Option<Props> {
        match self {
            Self::Sprite(s) => s.interpolate(&phase.name, sample, props),
            Self::Timer(t) => t.interpolate(phase, sample, props),
            Self::Text(_) | Self::Vignette(_) => None,
        }
    }
}

/// One visual object: a shared phase timeline plus variant data.
///
/// Owned by exactly one layer; the driver reaches it through `LayerManager::get_entity_by_id`.
pub struct Entity {
    id: String,
    layer: LayerId,
    anchor: Anchor,
    position: Option<Point>,
    bounds: Rect,
    delay: u32,
    timeline: Timeline,
    props: Props,
    initial_props: Props,
    kind: EntityKind,
}

impl Entity {
    pub fn new(id: impl Into<String>, layer: LayerId, kind: EntityKind, timeline: Timeline) -> Self {
        let props = kind.initial_props();
        Self {
            id: id.into(),
            layer,
            anchor: Anchor::default(),
            position: None,
            bounds: Rect::ZERO,
            delay: 0,
            timeline,
            props,
            initial_props: props,
            kind,
        }
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Place explicitly at baseline coordinates; switches the anchor to `Free`.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.anchor = Anchor::Free;
        self.position = Some(Point::new(x, y));
        self
    }

    pub fn with_delay(mut self, ticks: u32) -> Self {
        self.delay = ticks;
        self
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self.initial_props = props;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn layer(&self) -> LayerId {
        self.layer
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn entity_type(&self) -> EntityType {
        self.kind.entity_type()
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn x(&self) -> f64 {
        self.bounds.x0
    }

    pub fn y(&self) -> f64 {
        self.bounds.y0
    }

    pub fn width(&self) -> f64 {
        self.bounds.width()
    }

    pub fn height(&self) -> f64 {
        self.bounds.height()
    }

    pub fn delay(&self) -> u32 {
        self.delay
    }

    pub fn set_delay(&mut self, ticks: u32) {
        self.delay = ticks;
    }

    pub fn as_text(&self) -> Option<&TextEntity> {
        match &self.kind {
            EntityKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_sprite(&self) -> Option<&SpriteEntity> {
        match &self.kind {
            EntityKind::Sprite(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sprite_mut(&mut self) -> Option<&mut SpriteEntity> {
        match &mut self.kind {
            EntityKind::Sprite(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_vignette(&self) -> Option<&VignetteEntity> {
        match &self.kind {
            EntityKind::Vignette(v) => Some(v),
            _ => None,
        }
    }

    /// Replace the text of a text entity. It is re-measured and re-laid-out on the next frame.
    pub fn set_text(&mut self, text: impl Into<String>) -> StageResult<()> {
        match &mut self.kind {
            EntityKind::Text(t) => {
                t.set_text(text.into());
                Ok(())
            }
            _ => Err(StageError::config(format!(
                "set_text on non-text entity \"{}\"",
                self.id
            ))),
        }
    }

    /// Recolor a text, timer or vignette entity.
    pub fn set_color(&mut self, color: ColorDef) -> StageResult<()> {
        match &mut self.kind {
            EntityKind::Text(t) => t.color = color,
            EntityKind::Timer(t) => t.color = color,
            EntityKind::Vignette(v) => v.set_color(color),
            EntityKind::Sprite(_) => {
                return Err(StageError::config(format!(
                    "set_color on sprite entity \"{}\"",
                    self.id
                )));
            }
        }
        Ok(())
    }

    pub fn advance_phase(&mut self, name: Option<&str>) -> StageResult<()> {
        self.timeline.advance_phase(name)
    }

    pub fn set_on_begin(&mut self, f: impl FnMut() + 'static) {
        self.timeline.set_on_begin(f);
    }

    /// Retarget with a new end callback plus `advance_phase`. A run that already ended
    /// stays ended; call `reset()` first to have the new callback fire.
    pub fn set_on_end(&mut self, f: impl FnMut() + 'static) {
        self.timeline.set_on_end(f);
    }

    pub fn easing(&self) -> StageResult<f64> {
        self.timeline.easing()
    }

    /// Stamp the activation time for looping phases (first call wins).
    pub fn start(&mut self, now: f64) {
        self.timeline.ensure_started(now);
    }

    /// Consume one delay tick. Returns `true` while the entity is still held back.
    pub(crate) fn tick_delay(&mut self) -> bool {
        if self.delay == 0 {
            return false;
        }
        self.delay -= 1;
        self.props.opacity = 0.0;
        true
    }

    pub(crate) fn set_layout_y(&mut self, y: f64) {
        let h = self.bounds.height();
        self.bounds.y0 = y;
        self.bounds.y1 = y + h;
    }

    /// Text that changed since it was last measured.
    pub(crate) fn needs_measure(&self) -> bool {
        matches!(&self.kind, EntityKind::Text(t) if t.is_stale(self.props.kerning))
    }

    pub(crate) fn take_relayout(&mut self) -> bool {
        match &mut self.kind {
            EntityKind::Text(t) => t.take_relayout(),
            _ => false,
        }
    }

    /// Advance the timeline one tick and recompute props.
    pub fn update(&mut self, ctx: &mut EntityCtx<'_>) -> StageResult<()> {
        let mut sample = self.timeline.update(ctx.now)?;
        sample.magnitude *= ctx.viewport.scale_factor();
        self.props = self.interpolate(&sample)?;
        if self.needs_measure() {
            self.resize(ctx)?;
        }
        Ok(())
    }

    /// Props for `sample` under the current phase.
    ///
    /// A phase's own interpolator wins, then variant phases, then the shared builtins. Unknown
    /// names hold the current props.
    pub fn interpolate(&self, sample: &PhaseSample) -> StageResult<Props> {
        let phase = self.timeline.current()?;
        if let Some(f) = &phase.interpolate {
            return Ok(f(sample, &self.props));
        }
        if let Some(p) = self.kind.interpolate(phase, sample, &self.props) {
            return Ok(p);
        }
        if let Some(b) = BuiltinPhase::from_name(&phase.name) {
            return Ok(interpolate_builtin(b, sample, &self.props));
        }
        tracing::trace!(entity = %self.id, phase = %phase.name, "unknown phase holds props");
        Ok(self.props)
    }

    /// Recompute viewport-dependent geometry.
    pub fn resize(&mut self, ctx: &mut EntityCtx<'_>) -> StageResult<()> {
        let vp = ctx.viewport;
        self.bounds = match &mut self.kind {
            EntityKind::Text(t) => {
                t.resize(ctx, self.anchor, self.position, self.bounds.y0, self.props.kerning)?
            }
            EntityKind::Sprite(s) => {
                let (w, h) = s.size(&vp);
                Rect::from_origin_size(
                    anchor_origin(self.anchor, self.position, &vp, ctx.padding, w, h),
                    (w, h),
                )
            }
            EntityKind::Timer(t) => {
                let d = t.diameter(&vp);
                Rect::from_origin_size(
                    anchor_origin(self.anchor, self.position, &vp, ctx.padding, d, d),
                    (d, d),
                )
            }
            EntityKind::Vignette(v) => {
                v.invalidate();
                vp.rect()
            }
        };
        Ok(())
    }

    fn float_axis(&self) -> Option<Axis> {
        self.timeline
            .current_name()
            .and_then(BuiltinPhase::from_name)
            .and_then(BuiltinPhase::float_axis)
    }

    /// Draw onto `rc`. Fully transparent entities are skipped.
    pub fn render(
        &mut self,
        ctx: &EntityCtx<'_>,
        rc: &mut vello_cpu::RenderContext,
    ) -> StageResult<()> {
        let opacity = self.props.visible_opacity();
        if opacity <= 0.0 {
            return Ok(());
        }
        let float_axis = self.float_axis();
        let layered = opacity < 1.0;
        if layered {
            rc.push_opacity_layer(opacity);
        }
        let res = match &mut self.kind {
            EntityKind::Text(t) => t.render(self.bounds, &self.props, float_axis, ctx, rc),
            EntityKind::Sprite(s) => s.render(self.bounds, &self.props, rc),
            EntityKind::Timer(t) => t.render(self.bounds, &self.props, &ctx.viewport, rc),
            EntityKind::Vignette(v) => v.render(&ctx.viewport, rc),
        };
        if layered {
            rc.pop_layer();
        }
        rc.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        res
    }

    /// Rewind the timeline and restore the construction-time props.
    pub fn reset(&mut self) {
        self.timeline.reset();
        self.props = self.initial_props;
    }

    /// Terminal teardown: zero state and drop callbacks and cached bitmaps.
    pub fn destroy(&mut self) {
        tracing::trace!(entity = %self.id, "destroy");
        self.timeline.destroy();
        self.props = Props::zeroed();
        self.initial_props = Props::zeroed();
        self.bounds = Rect::ZERO;
        self.delay = 0;
        self.position = None;
        match &mut self.kind {
            EntityKind::Text(t) => t.clear(),
            EntityKind::Sprite(s) => s.clear(),
            EntityKind::Timer(_) => {}
            EntityKind::Vignette(v) => v.invalidate(),
        }
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("type", &self.entity_type())
            .field("layer", &self.layer)
            .field("anchor", &self.anchor)
            .field("bounds", &self.bounds)
            .field("delay", &self.delay)
            .field("props", &self.props)
            .field("timeline", &self.timeline)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/entity/entity.rs"]
mod tests;
