use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityCtx};
use crate::foundation::error::StageResult;
use crate::layer::surface::Surface;

/// Entities whose id starts with this are drawn after everything else in their layer.
pub const ACTION_TEXT_PREFIX: &str = "action-text";

/// The fixed set of layers, in z-order.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum LayerId {
    Background,
    #[default]
    Game,
    Ui,
}

impl LayerId {
    /// Bottom to top.
    pub const ALL: [LayerId; 3] = [LayerId::Background, LayerId::Game, LayerId::Ui];

    pub fn kind(self) -> LayerKind {
        match self {
            Self::Background => LayerKind::Static,
            Self::Game | Self::Ui => LayerKind::Dynamic,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Game => "game",
            Self::Ui => "ui",
        }
    }
}

/// Static layers redraw only when invalidated; dynamic layers update and redraw every tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    Static,
    Dynamic,
}

/// A drawing surface and the entities drawn on it, in insertion order.
pub struct Layer {
    id: LayerId,
    kind: LayerKind,
    surface: Surface,
    entities: Vec<Entity>,
    should_update: bool,
    should_render: bool,
}

impl Layer {
    pub fn new(id: LayerId, kind: LayerKind, surface: Surface) -> Self {
        Self {
            id,
            kind,
            surface,
            entities: Vec::new(),
            should_update: true,
            should_render: true,
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn should_update(&self) -> bool {
        self.should_update
    }

    pub fn should_render(&self) -> bool {
        self.should_render
    }

    pub fn request_update(&mut self) {
        self.should_update = true;
        self.should_render = true;
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub(crate) fn entities_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.iter().any(|e| e.id() == id)
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id() == id)
    }

    /// Insert `entity`, replacing (in place) any entity with the same id.
    pub fn insert(&mut self, entity: Entity) -> Option<Entity> {
        match self.entities.iter().position(|e| e.id() == entity.id()) {
            Some(i) => Some(std::mem::replace(&mut self.entities[i], entity)),
            None => {
                self.entities.push(entity);
                None
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Entity> {
        let i = self.entities.iter().position(|e| e.id() == id)?;
        Some(self.entities.remove(i))
    }

    /// Drop every entity and wipe the surface.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.surface.clear();
        self.request_update();
    }

    /// Ids in the order `render()` draws them.
    pub fn draw_order(&self) -> Vec<&str> {
        self.draw_indices()
            .into_iter()
            .map(|i| self.entities[i].id())
            .collect()
    }

    fn draw_indices(&self) -> Vec<usize> {
        let (mut order, action): (Vec<usize>, Vec<usize>) = (0..self.entities.len())
            .partition(|&i| !self.entities[i].id().starts_with(ACTION_TEXT_PREFIX));
        order.extend(action);
        order
    }

    /// Reallocate the surface and recompute every entity's geometry.
    pub fn resize(&mut self, ctx: &mut EntityCtx<'_>) -> StageResult<()> {
        self.surface.resize(ctx.viewport.canvas())?;
        for e in &mut self.entities {
            e.resize(ctx)?;
        }
        self.request_update();
        Ok(())
    }

    /// Advance entity timelines.
    ///
    /// Static layers only acknowledge the request. Dynamic layers hold back delayed entities
    /// (one tick per call, forced invisible) and update the rest.
    pub fn update(&mut self, ctx: &mut EntityCtx<'_>) -> StageResult<()> {
        match self.kind {
            LayerKind::Static => {
                self.should_update = false;
            }
            LayerKind::Dynamic => {
                for e in &mut self.entities {
                    if e.tick_delay() {
                        continue;
                    }
                    e.start(ctx.now);
                    e.update(ctx)?;
                }
            }
        }
        Ok(())
    }

    /// Redraw the surface if flagged. Static layers clear the flag afterwards.
    pub fn render(&mut self, ctx: &EntityCtx<'_>) -> StageResult<()> {
        if !self.should_render {
            return Ok(());
        }
        let order = self.draw_indices();
        let entities = &mut self.entities;
        self.surface.clear();
        self.surface.draw(|rc| {
            for i in order {
                entities[i].render(ctx, rc)?;
            }
            Ok(())
        })?;
        if self.kind == LayerKind::Static {
            self.should_render = false;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layer")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("entities", &self.entities.len())
            .field("should_update", &self.should_update)
            .field("should_render", &self.should_render)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/model.rs"]
mod tests;
