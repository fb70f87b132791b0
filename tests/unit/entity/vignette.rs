use super::*;
use crate::foundation::core::{BASELINE, Canvas};
use crate::layer::surface::Surface;

fn small() -> Viewport {
    Viewport::from_canvas(Canvas::new(32, 18), BASELINE)
}

#[test]
fn gradient_is_built_once_and_reused() {
    let mut v = VignetteEntity::default();
    let mut surface = Surface::new(Canvas::new(32, 18)).unwrap();
    surface.draw(|rc| v.render(&small(), rc)).unwrap();
    surface.draw(|rc| v.render(&small(), rc)).unwrap();
    assert_eq!(v.gradient_builds(), 1);
    assert!(v.is_cached());
}

#[test]
fn invalidate_forces_rebuild() {
    let mut v = VignetteEntity::default();
    let mut surface = Surface::new(Canvas::new(32, 18)).unwrap();
    surface.draw(|rc| v.render(&small(), rc)).unwrap();
    v.invalidate();
    assert!(!v.is_cached());
    surface.draw(|rc| v.render(&small(), rc)).unwrap();
    assert_eq!(v.gradient_builds(), 2);
}

#[test]
fn corners_are_darker_than_center() {
    let mut v = VignetteEntity::new(ColorDef::BLACK).with_radii(0.2, 1.0);
    let mut surface = Surface::new(Canvas::new(32, 18)).unwrap();
    surface.draw(|rc| v.render(&small(), rc)).unwrap();
    let center = surface.pixel(16, 9).unwrap()[3];
    let corner = surface.pixel(0, 0).unwrap()[3];
    assert_eq!(center, 0);
    assert!(corner > 128, "corner alpha {corner}");
}

#[test]
fn recolor_drops_cache() {
    let mut v = VignetteEntity::default();
    let mut surface = Surface::new(Canvas::new(32, 18)).unwrap();
    surface.draw(|rc| v.render(&small(), rc)).unwrap();
    v.set_color(ColorDef::WHITE);
    assert!(!v.is_cached());
    assert_eq!(v.color(), ColorDef::WHITE);
}
