use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::animation::ease::Ease;
use crate::animation::props::Props;
use crate::foundation::error::{StageError, StageResult};

pub type EasingFn = Rc<dyn Fn(f64) -> f64>;
pub type InterpolateFn = Rc<dyn Fn(&PhaseSample, &Props) -> Props>;

/// Remapping applied to a phase's local progress.
#[derive(Clone)]
pub enum PhaseEasing {
    Named(Ease),
    Custom(EasingFn),
}

impl PhaseEasing {
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Self::Named(e) => e.apply(t),
            Self::Custom(f) => f(t),
        }
    }
}

impl std::fmt::Debug for PhaseEasing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(e) => f.debug_tuple("Named").field(e).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Timeline state handed to interpolators for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseSample {
    pub index: usize,
    /// Local progress in `[0, 1]`.
    pub local: f64,
    /// `local` after the phase easing; may leave `[0, 1]` for overshooting curves.
    pub eased: f64,
    /// Phase magnitude in pixels, already scaled to the viewport by the entity.
    pub magnitude: f64,
}

/// A named, timed segment of an entity animation.
#[derive(Clone)]
pub struct AnimationPhase {
    pub name: String,
    /// Seconds.
    pub duration: f64,
    pub magnitude: Option<f64>,
    pub looped: bool,
    pub easing: Option<PhaseEasing>,
    pub interpolate: Option<InterpolateFn>,
}

impl AnimationPhase {
    pub fn new(name: impl Into<String>, duration: f64) -> Self {
        Self {
            name: name.into(),
            duration,
            magnitude: None,
            looped: false,
            easing: None,
            interpolate: None,
        }
    }

    pub fn looped(mut self) -> Self {
        self.looped = true;
        self
    }

    pub fn with_magnitude(mut self, magnitude: f64) -> Self {
        self.magnitude = Some(magnitude);
        self
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.easing = Some(PhaseEasing::Named(ease));
        self
    }

    pub fn with_easing_fn(mut self, f: impl Fn(f64) -> f64 + 'static) -> Self {
        self.easing = Some(PhaseEasing::Custom(Rc::new(f)));
        self
    }

    pub fn with_interpolate(
        mut self,
        f: impl Fn(&PhaseSample, &Props) -> Props + 'static,
    ) -> Self {
        self.interpolate = Some(Rc::new(f));
        self
    }

    pub fn has_easing(&self) -> bool {
        self.easing.is_some()
    }

    pub fn ease(&self, t: f64) -> f64 {
        match &self.easing {
            Some(e) => e.apply(t),
            None => t,
        }
    }

    pub fn validate(&self) -> StageResult<()> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(StageError::config(format!(
                "phase \"{}\" duration must be finite and >= 0",
                self.name
            )));
        }
        if let Some(m) = self.magnitude
            && !m.is_finite()
        {
            return Err(StageError::config(format!(
                "phase \"{}\" magnitude must be finite",
                self.name
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for AnimationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationPhase")
            .field("name", &self.name)
            .field("duration", &self.duration)
            .field("magnitude", &self.magnitude)
            .field("looped", &self.looped)
            .field("easing", &self.easing)
            .field("interpolate", &self.interpolate.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Serialized phase, as written in scene files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhaseDef {
    pub name: String,
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<f64>,
    #[serde(rename = "loop", default)]
    pub looped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<Ease>,
}

impl PhaseDef {
    pub fn to_phase(&self) -> StageResult<AnimationPhase> {
        let phase = AnimationPhase {
            name: self.name.clone(),
            duration: self.duration,
            magnitude: self.magnitude,
            looped: self.looped,
            easing: self.easing.map(PhaseEasing::Named),
            interpolate: None,
        };
        phase.validate()?;
        Ok(phase)
    }
}
