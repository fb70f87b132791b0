use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{StageError, StageResult};
use crate::foundation::math::mul_div255;

/// Decoded image in premultiplied RGBA8, row-major.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Vec<u8>,
}

impl DecodedImage {
    /// Copy out a sub-rectangle. The region must lie inside the image.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> StageResult<Self> {
        let fits = x.checked_add(width).is_some_and(|r| r <= self.width)
            && y.checked_add(height).is_some_and(|b| b <= self.height);
        if !fits || width == 0 || height == 0 {
            return Err(StageError::config(format!(
                "region {width}x{height}+{x}+{y} is outside the {}x{} sheet",
                self.width, self.height
            )));
        }
        let stride = self.width as usize * 4;
        let mut out = Vec::with_capacity(width as usize * height as usize * 4);
        for row in y..y + height {
            let start = row as usize * stride + x as usize * 4;
            out.extend_from_slice(&self.rgba8_premul[start..start + width as usize * 4]);
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: out,
        })
    }

    pub fn to_paint(&self) -> StageResult<vello_cpu::Image> {
        let pixmap = pixmap_from_premul_bytes(&self.rgba8_premul, self.width, self.height)?;
        Ok(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        })
    }
}

pub fn decode_image(bytes: &[u8]) -> StageResult<DecodedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(DecodedImage {
        width,
        height,
        rgba8_premul,
    })
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> StageResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| StageError::config("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| StageError::config("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(StageError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        for c in &mut px[..3] {
            *c = mul_div255(u16::from(*c), a) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
