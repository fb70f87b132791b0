use std::f64::consts::TAU;

use crate::animation::phase::PhaseSample;
use crate::animation::props::Props;
use crate::foundation::math::{lerp, oscillate};

/// Direction of travel for slide phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            _ => None,
        }
    }

    /// Unit vector in screen space (y grows downward).
    pub fn unit(self) -> (f64, f64) {
        match self {
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
        }
    }
}

/// Axis a float phase oscillates along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Phase names every entity understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltinPhase {
    FadeIn,
    FadeOut,
    SlideIn(Direction),
    SlideOut(Direction),
    FadeSlideIn(Direction),
    FadeSlideOut(Direction),
    Float(Axis),
    ZoomIn,
    ZoomOut,
    ZoomShake,
    Idle,
}

impl BuiltinPhase {
    pub fn from_name(name: &str) -> Option<Self> {
        let p = match name {
            "fade-in" => Self::FadeIn,
            "fade-out" => Self::FadeOut,
            "float-x" => Self::Float(Axis::X),
            "float-y" => Self::Float(Axis::Y),
            "zoom-in" => Self::ZoomIn,
            "zoom-out" => Self::ZoomOut,
            "zoom-shake" => Self::ZoomShake,
            "idle" => Self::Idle,
            _ => {
                if let Some(d) = name.strip_prefix("fade-slide-in-") {
                    Self::FadeSlideIn(Direction::parse(d)?)
                } else if let Some(d) = name.strip_prefix("fade-slide-out-") {
                    Self::FadeSlideOut(Direction::parse(d)?)
                } else if let Some(d) = name.strip_prefix("slide-in-") {
                    Self::SlideIn(Direction::parse(d)?)
                } else if let Some(d) = name.strip_prefix("slide-out-") {
                    Self::SlideOut(Direction::parse(d)?)
                } else {
                    return None;
                }
            }
        };
        Some(p)
    }

    pub fn float_axis(self) -> Option<Axis> {
        match self {
            Self::Float(axis) => Some(axis),
            _ => None,
        }
    }
}

/// Props after applying `phase` at `sample`. Fields the phase does not drive are carried over.
pub fn interpolate_builtin(phase: BuiltinPhase, sample: &PhaseSample, props: &Props) -> Props {
    let t = sample.eased;
    let m = sample.magnitude;
    let mut out = *props;

    let slide_in = |out: &mut Props, d: Direction| {
        let (dx, dy) = d.unit();
        out.offset_x = -dx * m * (1.0 - t);
        out.offset_y = -dy * m * (1.0 - t);
    };
    let slide_out = |out: &mut Props, d: Direction| {
        let (dx, dy) = d.unit();
        out.offset_x = dx * m * t;
        out.offset_y = dy * m * t;
    };

    match phase {
        BuiltinPhase::FadeIn => out.opacity = lerp(0.0, 1.0, t),
        BuiltinPhase::FadeOut => out.opacity = lerp(1.0, 0.0, t),
        BuiltinPhase::SlideIn(d) => slide_in(&mut out, d),
        BuiltinPhase::SlideOut(d) => slide_out(&mut out, d),
        BuiltinPhase::FadeSlideIn(d) => {
            out.opacity = lerp(0.0, 1.0, t);
            slide_in(&mut out, d);
        }
        BuiltinPhase::FadeSlideOut(d) => {
            out.opacity = lerp(1.0, 0.0, t);
            slide_out(&mut out, d);
        }
        BuiltinPhase::Float(Axis::X) => out.offset_x = oscillate(t, m),
        BuiltinPhase::Float(Axis::Y) => out.offset_y = oscillate(t, m),
        BuiltinPhase::ZoomIn => out.scale = lerp(0.0, 1.0, t),
        BuiltinPhase::ZoomOut => out.scale = lerp(1.0, 0.0, t),
        BuiltinPhase::ZoomShake => out.scale = 1.0 + 0.1 * (TAU * 3.0 * t).sin() * (1.0 - t),
        BuiltinPhase::Idle => out.opacity = 1.0,
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interpolate.rs"]
mod tests;
