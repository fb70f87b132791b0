use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::assets::decode::{DecodedImage, decode_image};
use crate::foundation::error::{StageError, StageResult};

/// Rectangular frame inside a sprite sheet, in sheet pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SpriteRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

struct Slice {
    width: u32,
    height: u32,
    image: vello_cpu::Image,
}

/// Decoded sprite sheets plus the per-region bitmaps sliced from them.
///
/// Bitmaps are keyed `"{sheet}-sprite-x-{x}-y-{y}"`; a region is sliced once and shared by
/// every sprite that names it. The key carries no size, so a second region at the same
/// origin must match the first one's size.
#[derive(Default)]
pub struct SpriteCache {
    sheets: HashMap<String, DecodedImage>,
    bitmaps: HashMap<String, Slice>,
}

impl SpriteCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(sheet_id: &str, x: u32, y: u32) -> String {
        format!("{sheet_id}-sprite-x-{x}-y-{y}")
    }

    pub fn insert_sheet(&mut self, sheet_id: impl Into<String>, sheet: DecodedImage) {
        let sheet_id = sheet_id.into();
        let prefix = format!("{sheet_id}-sprite-");
        self.bitmaps.retain(|k, _| !k.starts_with(&prefix));
        tracing::debug!(
            sheet = %sheet_id,
            width = sheet.width,
            height = sheet.height,
            "sprite sheet registered"
        );
        self.sheets.insert(sheet_id, sheet);
    }

    pub fn load_sheet(&mut self, sheet_id: impl Into<String>, bytes: &[u8]) -> StageResult<()> {
        let sheet = decode_image(bytes)?;
        self.insert_sheet(sheet_id, sheet);
        Ok(())
    }

    pub fn load_sheet_path(
        &mut self,
        sheet_id: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> StageResult<()> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read sprite sheet {}", path.display()))?;
        self.load_sheet(sheet_id, &bytes)
    }

    pub fn has_sheet(&self, sheet_id: &str) -> bool {
        self.sheets.contains_key(sheet_id)
    }

    pub fn get(&self, key: &str) -> Option<&vello_cpu::Image> {
        self.bitmaps.get(key).map(|s| &s.image)
    }

    pub fn len(&self) -> usize {
        self.bitmaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bitmaps.is_empty()
    }

    /// Slice `region` out of its sheet (once) and return its cache key.
    pub fn prepare(&mut self, sheet_id: &str, region: SpriteRegion) -> StageResult<String> {
        let key = Self::key(sheet_id, region.x, region.y);
        if let Some(slice) = self.bitmaps.get(&key) {
            if (slice.width, slice.height) != (region.width, region.height) {
                return Err(StageError::config(format!(
                    "sprite \"{key}\" already sliced at {}x{}, region asks for {}x{}",
                    slice.width, slice.height, region.width, region.height
                )));
            }
            return Ok(key);
        }
        let sheet = self
            .sheets
            .get(sheet_id)
            .ok_or_else(|| StageError::config(format!("sprite sheet \"{sheet_id}\" not loaded")))?;
        let paint = sheet
            .crop(region.x, region.y, region.width, region.height)?
            .to_paint()?;
        self.bitmaps.insert(
            key.clone(),
            Slice {
                width: region.width,
                height: region.height,
                image: paint,
            },
        );
        Ok(key)
    }

    /// Bitmaps for `regions`, in order, ready to hand to a sprite entity.
    pub fn frames(
        &mut self,
        sheet_id: &str,
        regions: &[SpriteRegion],
    ) -> StageResult<Vec<vello_cpu::Image>> {
        let mut out = Vec::with_capacity(regions.len());
        for region in regions {
            let key = self.prepare(sheet_id, *region)?;
            let img = self
                .get(&key)
                .cloned()
                .ok_or_else(|| StageError::state(format!("sprite bitmap \"{key}\" vanished")))?;
            out.push(img);
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/sprite_cache.rs"]
mod tests;
