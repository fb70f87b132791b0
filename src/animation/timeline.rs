use crate::animation::phase::{AnimationPhase, PhaseSample};
use crate::config::DEFAULT_MAGNITUDE_PX;
use crate::foundation::error::{StageError, StageResult};

pub type Callback = Box<dyn FnMut()>;

/// Phase state machine embedded in every entity.
///
/// Each `update()` advances `progress` by a fixed step (`animation_speed / total_duration`),
/// resolves the current phase from the elapsed share of the total duration, and derives the
/// local progress inside that phase. Looping phases take their local progress from wall-clock
/// time since `start_time` instead, so they keep cycling for as long as they are current.
pub struct Timeline {
    phases: Vec<AnimationPhase>,
    total_duration: f64,
    speed: f64,
    default_magnitude: f64,

    progress: f64,
    phase_index: usize,
    phase_start: f64,
    local_progress: f64,
    current: Option<usize>,
    start_time: Option<f64>,

    has_begin_fired: bool,
    has_end_fired: bool,
    on_begin: Option<Callback>,
    on_end: Option<Callback>,
    destroyed: bool,
}

impl Timeline {
    /// Build a timeline over `phases`; `animation_speed` is seconds per tick (`1 / fps`).
    pub fn new(phases: Vec<AnimationPhase>, animation_speed: f64) -> StageResult<Self> {
        if !animation_speed.is_finite() || animation_speed <= 0.0 {
            return Err(StageError::config(
                "animation speed must be finite and > 0",
            ));
        }
        for p in &phases {
            p.validate()?;
        }
        let total_duration: f64 = phases.iter().map(|p| p.duration).sum();
        let speed = if total_duration > 0.0 {
            animation_speed / total_duration
        } else {
            1.0
        };

        Ok(Self {
            phases,
            total_duration,
            speed,
            default_magnitude: DEFAULT_MAGNITUDE_PX,
            progress: 0.0,
            phase_index: 0,
            phase_start: 0.0,
            local_progress: 0.0,
            current: None,
            start_time: None,
            has_begin_fired: false,
            has_end_fired: false,
            on_begin: None,
            on_end: None,
            destroyed: false,
        })
    }

    pub fn with_default_magnitude(mut self, magnitude: f64) -> Self {
        self.default_magnitude = magnitude;
        self
    }

    pub fn phases(&self) -> &[AnimationPhase] {
        &self.phases
    }

    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Progress added per tick.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    /// Start of the current phase, in seconds into the timeline.
    pub fn phase_start(&self) -> f64 {
        self.phase_start
    }

    pub fn local_progress(&self) -> f64 {
        self.local_progress
    }

    pub fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    pub fn has_begin_fired(&self) -> bool {
        self.has_begin_fired
    }

    pub fn has_end_fired(&self) -> bool {
        self.has_end_fired
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_finished(&self) -> bool {
        self.progress >= 1.0
    }

    /// Stamp the activation time used by looping phases. Later calls are ignored.
    pub fn ensure_started(&mut self, now: f64) {
        if self.start_time.is_none() {
            self.start_time = Some(now);
        }
    }

    pub fn set_on_begin(&mut self, f: impl FnMut() + 'static) {
        self.on_begin = Some(Box::new(f));
    }

    /// Replace the end callback. It fires at most once per run: if the run has already
    /// ended, a later `advance_phase` will not fire it again until `reset()`.
    pub fn set_on_end(&mut self, f: impl FnMut() + 'static) {
        self.on_end = Some(Box::new(f));
    }

    pub fn current(&self) -> StageResult<&AnimationPhase> {
        self.current
            .and_then(|i| self.phases.get(i))
            .ok_or_else(|| StageError::state("no current phase; update() has not run"))
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current
            .and_then(|i| self.phases.get(i))
            .map(|p| p.name.as_str())
    }

    /// Local progress remapped through the current phase's easing.
    pub fn easing(&self) -> StageResult<f64> {
        Ok(self.current()?.ease(self.local_progress))
    }

    pub fn sample(&self) -> StageResult<PhaseSample> {
        let phase = self.current()?;
        Ok(PhaseSample {
            index: self.phase_index,
            local: self.local_progress,
            eased: phase.ease(self.local_progress),
            magnitude: phase.magnitude.unwrap_or(self.default_magnitude),
        })
    }

    /// Advance one tick at wall-clock time `now` (seconds).
    pub fn update(&mut self, now: f64) -> StageResult<PhaseSample> {
        if self.destroyed {
            return Err(StageError::state("update() on a destroyed timeline"));
        }
        if self.phases.is_empty() {
            return Err(StageError::state("update() on a timeline with no phases"));
        }

        self.progress = (self.progress + self.speed).min(1.0);
        self.resolve_phase();
        self.local_progress = self.compute_local(now);

        if !self.has_begin_fired && self.progress > 0.0 {
            self.has_begin_fired = true;
            if let Some(cb) = self.on_begin.as_mut() {
                cb();
            }
        }
        if !self.has_end_fired && self.progress >= 1.0 {
            self.has_end_fired = true;
            if let Some(cb) = self.on_end.as_mut() {
                cb();
            }
        }

        self.sample()
    }

    /// Jump to the next phase (wrapping) or to the phase called `name`.
    ///
    /// Progress is moved to the target phase's start offset. Begin/end flags are left alone, so
    /// a jump never re-fires callbacks; use `reset()` for that.
    pub fn advance_phase(&mut self, name: Option<&str>) -> StageResult<()> {
        if self.destroyed {
            return Err(StageError::state("advance_phase() on a destroyed timeline"));
        }
        if self.phases.is_empty() {
            return Err(StageError::state("advance_phase() on an empty phase list"));
        }
        let target = match name {
            None => self.current.map_or(0, |i| (i + 1) % self.phases.len()),
            Some(name) => self
                .phases
                .iter()
                .position(|p| p.name == name)
                .ok_or_else(|| StageError::config(format!("unknown phase \"{name}\"")))?,
        };

        let start: f64 = self.phases[..target].iter().map(|p| p.duration).sum();
        self.progress = if self.total_duration > 0.0 {
            (start / self.total_duration).min(1.0)
        } else {
            0.0
        };
        self.phase_index = target;
        self.phase_start = start;
        self.current = Some(target);
        self.local_progress = 0.0;
        tracing::trace!(phase = %self.phases[target].name, progress = self.progress, "phase jump");
        Ok(())
    }

    /// Rewind to the beginning and re-arm both callbacks.
    pub fn reset(&mut self) {
        self.progress = 0.0;
        self.phase_index = 0;
        self.phase_start = 0.0;
        self.local_progress = 0.0;
        self.current = None;
        self.start_time = None;
        self.has_begin_fired = false;
        self.has_end_fired = false;
    }

    /// Terminal: drop phases and callbacks. Every later `update()` is an error.
    pub fn destroy(&mut self) {
        self.reset();
        self.phases.clear();
        self.total_duration = 0.0;
        self.speed = 0.0;
        self.on_begin = None;
        self.on_end = None;
        self.destroyed = true;
    }

    fn resolve_phase(&mut self) {
        let elapsed = self.progress * self.total_duration;
        let mut start = 0.0;
        let mut resolved = None;
        for (i, p) in self.phases.iter().enumerate() {
            let end = start + p.duration;
            if elapsed <= end {
                resolved = Some((i, start));
                break;
            }
            start = end;
        }
        let (index, start) = resolved.unwrap_or_else(|| {
            let last = self.phases.len() - 1;
            (last, self.total_duration - self.phases[last].duration)
        });
        self.phase_index = index;
        self.phase_start = start;
        self.current = Some(index);
    }

    fn compute_local(&self, now: f64) -> f64 {
        let phase = &self.phases[self.phase_index];
        if phase.duration <= 0.0 {
            return 1.0;
        }
        let local = if phase.looped {
            let since = now - self.start_time.unwrap_or(now);
            since.rem_euclid(phase.duration) / phase.duration
        } else {
            (self.progress * self.total_duration - self.phase_start) / phase.duration
        };
        local.clamp(0.0, 1.0)
    }
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("phases", &self.phases.len())
            .field("progress", &self.progress)
            .field("phase", &self.current_name())
            .field("local_progress", &self.local_progress)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
