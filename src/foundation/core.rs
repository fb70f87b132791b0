use crate::foundation::error::{StageError, StageResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Reference resolution all pixel constants are authored against.
pub const BASELINE: Canvas = Canvas {
    width: 1920,
    height: 1080,
};

/// Surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Dimensions as `u16`, the range a raster surface accepts.
    pub fn surface_dims(self) -> StageResult<(u16, u16)> {
        if self.width == 0 || self.height == 0 {
            return Err(StageError::config("canvas dimensions must be > 0"));
        }
        let w: u16 = self
            .width
            .try_into()
            .map_err(|_| StageError::config("canvas width exceeds u16"))?;
        let h: u16 = self
            .height
            .try_into()
            .map_err(|_| StageError::config("canvas height exceeds u16"))?;
        Ok((w, h))
    }
}

/// Current drawing area plus the baseline it scales against.
///
/// Every resolution-dependent constant (padding, font size, radius, phase magnitude) is
/// multiplied by one of the scale factors below.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub baseline: Canvas,
}

impl Viewport {
    pub fn new(width: f64, height: f64, baseline: Canvas) -> Self {
        Self {
            width,
            height,
            baseline,
        }
    }

    pub fn from_canvas(canvas: Canvas, baseline: Canvas) -> Self {
        Self::new(f64::from(canvas.width), f64::from(canvas.height), baseline)
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width.max(0.0).round() as u32,
            height: self.height.max(0.0).round() as u32,
        }
    }

    pub fn horizontal_scale(&self) -> f64 {
        if self.baseline.width == 0 {
            return 1.0;
        }
        self.width / f64::from(self.baseline.width)
    }

    pub fn vertical_scale(&self) -> f64 {
        if self.baseline.height == 0 {
            return 1.0;
        }
        self.height / f64::from(self.baseline.height)
    }

    pub fn scale_factor(&self) -> f64 {
        self.horizontal_scale().min(self.vertical_scale())
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Undo premultiplication, as image encoders expect.
    pub fn to_straight(self) -> [u8; 4] {
        if self.a == 0 {
            return [0, 0, 0, 0];
        }
        let un = |c: u8| -> u8 {
            ((u32::from(c) * 255 + u32::from(self.a) / 2) / u32::from(self.a)).min(255) as u8
        };
        [un(self.r), un(self.g), un(self.b), self.a]
    }
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

pub(crate) fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
