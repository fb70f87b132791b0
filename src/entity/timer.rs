use std::f64::consts::{FRAC_PI_2, TAU};

use kurbo::Shape;
use serde::{Deserialize, Serialize};

use crate::animation::ease::Ease;
use crate::animation::phase::{AnimationPhase, PhaseSample};
use crate::animation::props::Props;
use crate::assets::color::ColorDef;
use crate::foundation::core::{BezPath, Point, Rect, Vec2, Viewport, bezpath_to_cpu};
use crate::foundation::error::StageResult;

pub const DEFAULT_TIMER_RADIUS_PX: f64 = 48.0;
/// Inner sweep radius as a share of the outer disc.
pub const ARC_RADIUS_RATIO: f64 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RingStyle {
    pub color: ColorDef,
    /// Baseline pixels.
    pub width_px: f64,
}

/// Radial countdown: background disc, optional ring, and a pie sweep of `props.angle`.
#[derive(Clone, Debug)]
pub struct TimerEntity {
    /// Baseline pixels.
    pub radius_px: f64,
    pub(crate) color: ColorDef,
    pub arc_color: ColorDef,
    pub ring: Option<RingStyle>,
}

impl Default for TimerEntity {
    fn default() -> Self {
        Self {
            radius_px: DEFAULT_TIMER_RADIUS_PX,
            color: ColorDef::rgba(0.0, 0.0, 0.0, 0.6),
            arc_color: ColorDef::WHITE,
            ring: None,
        }
    }
}

/// Radii of the three rings at the current scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimerRadii {
    pub disc: f64,
    pub ring: f64,
    pub arc: f64,
}

impl TimerEntity {
    pub fn new(radius_px: f64) -> Self {
        Self {
            radius_px,
            ..Self::default()
        }
    }

    pub fn color(&self) -> ColorDef {
        self.color
    }

    /// Starts collapsed with a full sweep.
    pub(crate) fn initial_props() -> Props {
        Props {
            scale: 0.0,
            angle: TAU,
            ..Props::default()
        }
    }

    pub(crate) fn diameter(&self, vp: &Viewport) -> f64 {
        (2.0 * self.radius_px * vp.scale_factor()).max(0.0)
    }

    pub fn radii(&self, vp: &Viewport, scale: f64) -> TimerRadii {
        let base = self.radius_px * vp.scale_factor() * scale;
        TimerRadii {
            disc: base.max(0.0),
            ring: base.max(0.0),
            arc: (base * ARC_RADIUS_RATIO).max(0.0),
        }
    }

    pub(crate) fn interpolate(
        &self,
        phase: &AnimationPhase,
        sample: &PhaseSample,
        props: &Props,
    ) -> Option<Props> {
        let mut out = *props;
        match phase.name.as_str() {
            "zoom-in" => {
                out.scale = if phase.has_easing() {
                    sample.eased
                } else {
                    Ease::OutBack.apply(sample.local)
                };
            }
            "countdown" => out.angle = TAU * (1.0 - sample.eased.clamp(0.0, 1.0)),
            "zoom-out" => out.scale = 1.0 - sample.eased,
            _ => return None,
        }
        Some(out)
    }

    pub(crate) fn render(
        &self,
        bounds: Rect,
        props: &Props,
        vp: &Viewport,
        rc: &mut vello_cpu::RenderContext,
    ) -> StageResult<()> {
        let radii = self.radii(vp, props.scale);
        let center = bounds.center() + Vec2::new(props.offset_x, props.offset_y);
        rc.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

        if radii.disc > 0.0 {
            let disc = kurbo::Circle::new(center, radii.disc).to_path(0.1);
            rc.set_paint(self.color.to_paint());
            rc.fill_path(&bezpath_to_cpu(&disc));
        }
        if let Some(ring) = self.ring
            && radii.ring > 0.0
        {
            rc.set_stroke(vello_cpu::kurbo::Stroke::new(
                (ring.width_px * vp.scale_factor()).max(0.0),
            ));
            let outline = kurbo::Circle::new(center, radii.ring).to_path(0.1);
            rc.set_paint(ring.color.to_paint());
            rc.stroke_path(&bezpath_to_cpu(&outline));
        }
        let sweep = props.angle.clamp(0.0, TAU);
        if radii.arc > 0.0 && sweep > 0.0 {
            rc.set_paint(self.arc_color.to_paint());
            rc.fill_path(&bezpath_to_cpu(&pie_path(center, radii.arc, sweep)));
        }
        Ok(())
    }
}

/// Closed wedge starting at 12 o'clock and sweeping clockwise by `sweep` radians.
pub(crate) fn pie_path(center: Point, radius: f64, sweep: f64) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(center);
    path.line_to(center + Vec2::new(0.0, -radius));
    let arc = kurbo::Arc::new(center, Vec2::new(radius, radius), -FRAC_PI_2, sweep, 0.0);
    path.extend(arc.append_iter(0.1));
    path.close_path();
    path
}

#[cfg(test)]
#[path = "../../tests/unit/entity/timer.rs"]
mod tests;
