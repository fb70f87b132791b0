use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::assets::color::ColorDef;
use crate::foundation::core::{BASELINE, Canvas};
use crate::foundation::error::{StageError, StageResult};

/// Phase magnitude used when a phase does not declare one, in baseline pixels.
pub const DEFAULT_MAGNITUDE_PX: f64 = 64.0;

/// Spacing used by text layout, in baseline pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub padding_px: f64,
    pub gutter_px: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding_px: 32.0,
            gutter_px: 16.0,
        }
    }
}

/// Stage-wide settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StageConfig {
    /// Tick rate; one timeline step advances `1 / fps` seconds.
    pub fps: f64,
    pub baseline: Canvas,
    pub layout: LayoutConfig,
    pub magnitude_px: f64,
    /// Background for the flattened frame. Transparent when unset.
    pub clear_color: Option<ColorDef>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            fps: 60.0,
            baseline: BASELINE,
            layout: LayoutConfig::default(),
            magnitude_px: DEFAULT_MAGNITUDE_PX,
            clear_color: None,
        }
    }
}

impl StageConfig {
    /// Per-tick timeline step in seconds.
    pub fn animation_speed(&self) -> f64 {
        1.0 / self.fps
    }

    pub fn validate(&self) -> StageResult<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(StageError::config("fps must be finite and > 0"));
        }
        if self.baseline.width == 0 || self.baseline.height == 0 {
            return Err(StageError::config("baseline dimensions must be > 0"));
        }
        for (name, v) in [
            ("layout.padding_px", self.layout.padding_px),
            ("layout.gutter_px", self.layout.gutter_px),
            ("magnitude_px", self.magnitude_px),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(StageError::config(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }

    pub fn from_reader(reader: impl std::io::Read) -> StageResult<Self> {
        let cfg: Self = serde_json::from_reader(reader)
            .map_err(|e| StageError::config(format!("invalid stage config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> StageResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path)
            .with_context(|| format!("open stage config {}", path.display()))?;
        Self::from_reader(std::io::BufReader::new(f))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
