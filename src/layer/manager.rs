use crate::assets::text::TextEngine;
use crate::config::StageConfig;
use crate::entity::{Anchor, Entity, EntityCtx, EntityType};
use crate::foundation::core::{Canvas, Rgba8Premul, Vec2, Viewport};
use crate::foundation::error::StageResult;
use crate::layer::composite::{FrameRGBA, over_in_place};
use crate::layer::model::{Layer, LayerId};
use crate::layer::surface::Surface;
use crate::layout::solver::LayoutManager;

/// Driver-facing entry point: owns the background, game and UI layers and coordinates text
/// layout across them.
///
/// Per frame the driver calls `update(now)` then `render()`. Layout runs at most once per
/// frame, inside `render()`, before any layer draws.
pub struct LayerManager {
    config: StageConfig,
    viewport: Viewport,
    layers: Vec<Layer>,
    layout: LayoutManager,
    text: TextEngine,
    needs_layout: bool,
}

impl LayerManager {
    pub fn new(canvas: Canvas, config: StageConfig) -> StageResult<Self> {
        Self::with_text_engine(canvas, config, TextEngine::new())
    }

    pub fn with_text_engine(
        canvas: Canvas,
        config: StageConfig,
        text: TextEngine,
    ) -> StageResult<Self> {
        config.validate()?;
        let layers = LayerId::ALL
            .iter()
            .map(|&id| Surface::new(canvas).map(|s| Layer::new(id, id.kind(), s)))
            .collect::<StageResult<Vec<_>>>()?;
        Ok(Self {
            viewport: Viewport::from_canvas(canvas, config.baseline),
            layout: LayoutManager::new(config.layout),
            config,
            layers,
            text,
            needs_layout: true,
        })
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn layout(&self) -> &LayoutManager {
        &self.layout
    }

    pub fn text_engine_mut(&mut self) -> &mut TextEngine {
        &mut self.text
    }

    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, id: LayerId) -> &Layer {
        &self.layers[Self::slot(id)]
    }

    fn slot(id: LayerId) -> usize {
        match id {
            LayerId::Background => 0,
            LayerId::Game => 1,
            LayerId::Ui => 2,
        }
    }

    fn padding(&self) -> Vec2 {
        Vec2::new(
            self.layout.padding_x(&self.viewport),
            self.layout.padding_y(&self.viewport),
        )
    }

    /// Insert `entity` into the layer it declares, replacing any entity with the same id.
    ///
    /// Text entities force a full update because they can shift every text sharing their anchor.
    pub fn set_entity(&mut self, mut entity: Entity) -> StageResult<()> {
        let target = entity.layer();
        for layer in &mut self.layers {
            if layer.id() != target && layer.remove(entity.id()).is_some() {
                layer.request_update();
            }
        }

        let mut ctx = EntityCtx {
            viewport: self.viewport,
            now: 0.0,
            padding: self.padding(),
            text: &mut self.text,
        };
        entity.resize(&mut ctx)?;

        let is_text = entity.entity_type() == EntityType::Text;
        tracing::debug!(
            id = entity.id(),
            layer = target.name(),
            kind = ?entity.entity_type(),
            "entity placed"
        );
        let replaced = self.layers[Self::slot(target)].insert(entity);
        let replaced_text = replaced.is_some_and(|e| e.entity_type() == EntityType::Text);
        if is_text || replaced_text {
            self.request_update();
        } else {
            self.layers[Self::slot(target)].request_update();
        }
        Ok(())
    }

    pub fn get_entity_by_id(&mut self, id: &str) -> Option<&mut Entity> {
        self.layers.iter_mut().find_map(|l| l.get_mut(id))
    }

    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.layers.iter().find_map(|l| l.get(id))
    }

    pub fn has_entity_by_id(&self, id: &str) -> bool {
        self.layers.iter().any(|l| l.contains(id))
    }

    /// Detach an entity. The caller owns it afterwards (e.g. to `destroy()` it).
    pub fn remove_entity(&mut self, id: &str) -> Option<Entity> {
        let (slot, entity) = self
            .layers
            .iter_mut()
            .enumerate()
            .find_map(|(i, l)| l.remove(id).map(|e| (i, e)))?;
        if entity.entity_type() == EntityType::Text {
            self.request_update();
        } else {
            self.layers[slot].request_update();
        }
        tracing::debug!(id, "entity removed");
        Some(entity)
    }

    pub fn get_entities_by_type(&self, ty: EntityType) -> Vec<&Entity> {
        self.layers
            .iter()
            .flat_map(|l| l.entities())
            .filter(|e| e.entity_type() == ty)
            .collect()
    }

    /// Re-derive all geometry for a new canvas size and force a full redraw.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn resize(&mut self, canvas: Canvas) -> StageResult<()> {
        canvas.surface_dims()?;
        self.viewport = Viewport::from_canvas(canvas, self.config.baseline);
        tracing::debug!(width = canvas.width, height = canvas.height, "viewport resized");
        let mut ctx = EntityCtx {
            viewport: self.viewport,
            now: 0.0,
            padding: self.padding(),
            text: &mut self.text,
        };
        for layer in &mut self.layers {
            layer.resize(&mut ctx)?;
        }
        self.request_update();
        Ok(())
    }

    /// Flag every layer dirty and schedule a layout pass.
    pub fn request_update(&mut self) {
        for layer in &mut self.layers {
            layer.request_update();
        }
        self.needs_layout = true;
    }

    /// Re-measure changed text, then stack every non-free text entity across all layers.
    pub fn update_layout(&mut self) -> StageResult<()> {
        let mut ctx = EntityCtx {
            viewport: self.viewport,
            now: 0.0,
            padding: self.padding(),
            text: &mut self.text,
        };
        for e in self.layers.iter_mut().flat_map(|l| l.entities_mut()) {
            if e.needs_measure() {
                e.resize(&mut ctx)?;
            }
            e.take_relayout();
        }

        let mut texts = self
            .layers
            .iter_mut()
            .flat_map(|l| l.entities_mut())
            .filter(|e| e.entity_type() == EntityType::Text && e.anchor() != Anchor::Free)
            .collect::<Vec<_>>();
        self.layout.update(&mut texts, &self.viewport)?;
        self.needs_layout = false;
        Ok(())
    }

    /// Advance every layer flagged for update.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn update(&mut self, now: f64) -> StageResult<()> {
        let mut ctx = EntityCtx {
            viewport: self.viewport,
            now,
            padding: self.padding(),
            text: &mut self.text,
        };
        for layer in &mut self.layers {
            if layer.should_update() {
                layer.update(&mut ctx)?;
            }
        }

        let mut text_changed = false;
        for e in self.layers.iter_mut().flat_map(|l| l.entities_mut()) {
            let relayout = e.take_relayout();
            text_changed |= relayout || e.needs_measure();
        }
        if text_changed {
            self.request_update();
        }
        Ok(())
    }

    /// Lay out text if flagged, then redraw every layer flagged for render.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn render(&mut self) -> StageResult<()> {
        if self.needs_layout {
            self.update_layout()?;
        }
        let ctx = EntityCtx {
            viewport: self.viewport,
            now: 0.0,
            padding: self.padding(),
            text: &mut self.text,
        };
        for layer in &mut self.layers {
            layer.render(&ctx)?;
        }
        Ok(())
    }

    /// Drop every entity from every layer.
    pub fn clear(&mut self) {
        for layer in &mut self.layers {
            layer.clear();
        }
        self.needs_layout = false;
    }

    /// Flatten the layer surfaces bottom to top.
    pub fn composite(&self) -> StageResult<FrameRGBA> {
        let canvas = self.viewport.canvas();
        let clear = self
            .config
            .clear_color
            .map_or_else(Rgba8Premul::transparent, |c| c.to_rgba8_premul());
        let mut frame = FrameRGBA::filled(canvas.width, canvas.height, clear);
        for layer in &self.layers {
            over_in_place(&mut frame.data, layer.surface().data(), 1.0)?;
        }
        Ok(frame)
    }
}

impl std::fmt::Debug for LayerManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerManager")
            .field("viewport", &self.viewport)
            .field("layers", &self.layers)
            .field("needs_layout", &self.needs_layout)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/manager.rs"]
mod tests;
