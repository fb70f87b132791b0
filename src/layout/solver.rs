use std::collections::BTreeMap;

use crate::config::LayoutConfig;
use crate::entity::{Anchor, EYELINE_RATIO, Entity};
use crate::foundation::core::Viewport;
use crate::foundation::error::{StageError, StageResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackDirection {
    Down,
    Up,
    /// First block is centered on the offset, later ones stack down from it.
    Centered,
}

/// Next free offset along one anchor's stacking axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackCursor {
    pub next_offset: f64,
    pub gutter: f64,
    pub direction: StackDirection,
}

/// Place one block of `height` and return its top y plus the advanced cursor.
///
/// Upward cursors track the bottom edge, so the block's own height is subtracted to keep it
/// off the edge.
pub fn place(cursor: StackCursor, height: f64) -> (f64, StackCursor) {
    match cursor.direction {
        StackDirection::Centered => place(
            StackCursor {
                next_offset: cursor.next_offset - height / 2.0,
                direction: StackDirection::Down,
                ..cursor
            },
            height,
        ),
        StackDirection::Down => (
            cursor.next_offset,
            StackCursor {
                next_offset: cursor.next_offset + height + cursor.gutter,
                ..cursor
            },
        ),
        StackDirection::Up => {
            let y = cursor.next_offset - height;
            (
                y,
                StackCursor {
                    next_offset: y - cursor.gutter,
                    ..cursor
                },
            )
        }
    }
}

/// Vertical stacking for text entities that share an anchor.
///
/// Every `update` re-seeds all cursors, so a pass depends only on the entity list it is given.
#[derive(Clone, Debug)]
pub struct LayoutManager {
    config: LayoutConfig,
    anchors: Vec<Anchor>,
    cursors: BTreeMap<Anchor, StackCursor>,
}

impl LayoutManager {
    /// Cursors for every stacking anchor.
    pub fn new(config: LayoutConfig) -> Self {
        Self::with_anchors(config, &Anchor::STACKED)
    }

    /// Cursors for `anchors` only; entities on any other anchor are rejected.
    pub fn with_anchors(config: LayoutConfig, anchors: &[Anchor]) -> Self {
        Self {
            config,
            anchors: anchors.iter().copied().filter(|a| *a != Anchor::Free).collect(),
            cursors: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> LayoutConfig {
        self.config
    }

    pub fn padding_x(&self, vp: &Viewport) -> f64 {
        self.config.padding_px * vp.horizontal_scale()
    }

    pub fn padding_y(&self, vp: &Viewport) -> f64 {
        self.config.padding_px * vp.vertical_scale()
    }

    pub fn gutter(&self, vp: &Viewport) -> f64 {
        self.config.gutter_px * vp.vertical_scale()
    }

    pub fn cursor(&self, anchor: Anchor) -> Option<StackCursor> {
        self.cursors.get(&anchor).copied()
    }

    fn seed(&self, anchor: Anchor, vp: &Viewport) -> StackCursor {
        let (start, direction) = if anchor.is_top() {
            (self.padding_y(vp), StackDirection::Down)
        } else if anchor.is_bottom() {
            (vp.height - self.padding_y(vp), StackDirection::Up)
        } else if anchor == Anchor::Eyeline {
            (vp.height * EYELINE_RATIO, StackDirection::Centered)
        } else {
            (vp.height / 2.0, StackDirection::Centered)
        };
        StackCursor {
            next_offset: start,
            gutter: self.gutter(vp),
            direction,
        }
    }

    /// Re-seed every cursor for `vp`.
    pub fn reset(&mut self, vp: &Viewport) {
        self.cursors = self
            .anchors
            .iter()
            .map(|&a| (a, self.seed(a, vp)))
            .collect();
    }

    /// Assign y to each entity, in the order given, from its anchor's cursor.
    pub fn update(&mut self, entities: &mut [&mut Entity], vp: &Viewport) -> StageResult<()> {
        self.reset(vp);
        for e in entities.iter_mut() {
            let anchor = e.anchor();
            let cursor = self.cursors.get(&anchor).copied().ok_or_else(|| {
                StageError::config(format!(
                    "no layout cursor for anchor {anchor:?} (entity \"{}\")",
                    e.id()
                ))
            })?;
            let (y, next) = place(cursor, e.height());
            e.set_layout_y(y);
            self.cursors.insert(anchor, next);
        }
        tracing::debug!(entities = entities.len(), "layout pass");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/solver.rs"]
mod tests;
