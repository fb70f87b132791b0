use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::assets::sprite_cache::SpriteCache;
use crate::assets::text::TextEngine;
use crate::config::StageConfig;
use crate::entity::Entity;
use crate::entity::spec::EntitySpec;
use crate::foundation::core::{BASELINE, Canvas};
use crate::foundation::error::{StageError, StageResult};
use crate::layer::composite::FrameRGBA;
use crate::layer::manager::LayerManager;

/// A sprite sheet image registered under `id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SheetDef {
    pub id: String,
    /// Relative paths resolve against the scene file's directory.
    pub path: PathBuf,
}

/// JSON scene: stage settings, assets and the initial entities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDef {
    #[serde(default)]
    pub config: StageConfig,
    #[serde(default = "default_viewport")]
    pub viewport: Canvas,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<PathBuf>,
    #[serde(default)]
    pub spritesheets: Vec<SheetDef>,
    #[serde(default)]
    pub entities: Vec<EntitySpec>,
}

fn default_viewport() -> Canvas {
    BASELINE
}

impl SceneDef {
    pub fn from_reader<R: std::io::Read>(r: R) -> StageResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| StageError::config(format!("parse scene JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> StageResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StageError::config(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn to_json_pretty(&self) -> StageResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StageError::serde(format!("serialize scene JSON: {e}")))
    }
}

/// Fixed-step driver around a [`LayerManager`].
///
/// Tick `n` runs at `now = n / fps` seconds: every layer is updated, then rendered.
pub struct Stage {
    manager: LayerManager,
    sprites: SpriteCache,
    ticks: u64,
}

impl Stage {
    pub fn new(manager: LayerManager, sprites: SpriteCache) -> Self {
        Self {
            manager,
            sprites,
            ticks: 0,
        }
    }

    /// Load assets and build every entity of `def`. Relative asset paths resolve against `root`.
    pub fn from_scene(def: &SceneDef, root: &Path) -> StageResult<Self> {
        let mut sprites = SpriteCache::new();
        for sheet in &def.spritesheets {
            sprites.load_sheet_path(sheet.id.clone(), root.join(&sheet.path))?;
        }

        let text = match &def.font {
            Some(p) => {
                let path = root.join(p);
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("read font {}", path.display()))?;
                TextEngine::with_font_bytes(bytes)?
            }
            None => TextEngine::new(),
        };

        let manager = LayerManager::with_text_engine(def.viewport, def.config.clone(), text)?;
        let mut stage = Self::new(manager, sprites);
        for spec in &def.entities {
            let entity = spec.build(&def.config)?;
            stage.add_entity(entity)?;
        }
        tracing::debug!(
            entities = def.entities.len(),
            sheets = def.spritesheets.len(),
            "scene loaded"
        );
        Ok(stage)
    }

    pub fn from_path(path: impl AsRef<Path>) -> StageResult<Self> {
        let path = path.as_ref();
        let def = SceneDef::from_path(path)?;
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_scene(&def, root)
    }

    /// Attach cached sprite frames (if any) and hand the entity to the layer manager.
    pub fn add_entity(&mut self, mut entity: Entity) -> StageResult<()> {
        if let Some(sprite) = entity.as_sprite_mut() {
            let frames = self.sprites.frames(sprite.sheet_id(), sprite.regions())?;
            sprite.set_bitmaps(frames)?;
        }
        self.manager.set_entity(entity)
    }

    pub fn manager(&self) -> &LayerManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut LayerManager {
        &mut self.manager
    }

    pub fn sprites(&self) -> &SpriteCache {
        &self.sprites
    }

    pub fn sprites_mut(&mut self) -> &mut SpriteCache {
        &mut self.sprites
    }

    /// Ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Wall-clock time of the next tick, in seconds.
    pub fn now(&self) -> f64 {
        self.ticks as f64 / self.manager.config().fps
    }

    pub fn tick(&mut self) -> StageResult<()> {
        let now = self.now();
        self.manager.update(now)?;
        self.manager.render()?;
        self.ticks += 1;
        Ok(())
    }

    /// Tick until frame `index` (0-based) has been drawn.
    pub fn advance_to(&mut self, index: u64) -> StageResult<()> {
        while self.ticks <= index {
            self.tick()?;
        }
        Ok(())
    }

    /// Flatten the current layer surfaces.
    pub fn frame(&self) -> StageResult<FrameRGBA> {
        self.manager.composite()
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("manager", &self.manager)
            .field("sprites", &self.sprites.len())
            .field("ticks", &self.ticks)
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/unit/scene.rs"]
mod tests;
