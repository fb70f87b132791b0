use super::*;
use crate::assets::text::TextEngine;
use crate::foundation::core::{BASELINE, Canvas, Viewport};

fn measure(
    t: &mut TextEntity,
    vp: Viewport,
    anchor: Anchor,
    position: Option<Point>,
) -> Rect {
    let mut engine = TextEngine::new();
    let mut ctx = EntityCtx {
        viewport: vp,
        now: 0.0,
        padding: Vec2::new(32.0, 32.0),
        text: &mut engine,
    };
    t.resize(&mut ctx, anchor, position, 0.0, 0.0).unwrap()
}

fn baseline() -> Viewport {
    Viewport::from_canvas(BASELINE, BASELINE)
}

#[test]
fn center_anchor_centers_block() {
    // 4 chars * 0.5em * 40px = 80 wide, 50 tall.
    let mut t = TextEntity::new("Deal").with_font_size(40.0);
    let r = measure(&mut t, baseline(), Anchor::Center, None);
    assert_eq!(r.width(), 80.0);
    assert_eq!(r.height(), 50.0);
    assert_eq!(r.x0, 960.0 - 40.0);
    assert_eq!(t.resolved_font_size(), 40.0);
}

#[test]
fn side_anchors_align_to_padding() {
    let mut left = TextEntity::new("Deal").with_font_size(40.0);
    let r = measure(&mut left, baseline(), Anchor::Left, None);
    assert_eq!(r.x0, 32.0);

    let mut right = TextEntity::new("Deal").with_font_size(40.0);
    let r = measure(&mut right, baseline(), Anchor::BottomRight, None);
    assert_eq!(r.x1, 1920.0 - 32.0);
}

#[test]
fn explicit_align_overrides_anchor_default() {
    let mut t = TextEntity::new("Deal")
        .with_font_size(40.0)
        .with_align(TextAlign::End);
    let r = measure(&mut t, baseline(), Anchor::Top, None);
    assert_eq!(r.x1, 960.0);
    assert_eq!(TextAlign::Center.shift(80.0), -40.0);
}

#[test]
fn overflowing_text_shrinks_to_fit() {
    // 100 chars * 0.5em * 48px = 2400 > 1920 - 64.
    let mut t = TextEntity::new("x".repeat(100));
    let r = measure(&mut t, baseline(), Anchor::Center, None);
    assert!((r.width() - 1856.0).abs() < 1e-6);
    assert!(t.resolved_font_size() < DEFAULT_FONT_SIZE_PX);
    assert!((t.resolved_font_size() - 37.12).abs() < 1e-9);
}

#[test]
fn font_size_follows_viewport_scale() {
    let half = Viewport::from_canvas(Canvas::new(960, 540), BASELINE);
    let mut t = TextEntity::new("Deal").with_font_size(40.0);
    let r = measure(&mut t, half, Anchor::Center, None);
    assert_eq!(t.resolved_font_size(), 20.0);
    assert_eq!(r.height(), 25.0);
}

#[test]
fn free_anchor_uses_scaled_position() {
    let half = Viewport::from_canvas(Canvas::new(960, 540), BASELINE);
    let mut t = TextEntity::new("Deal").with_font_size(40.0);
    let r = measure(&mut t, half, Anchor::Free, Some(Point::new(100.0, 200.0)));
    assert_eq!((r.x0, r.y0), (50.0, 100.0));
}

#[test]
fn set_text_marks_stale_and_relayout_once() {
    let mut t = TextEntity::new("Deal").with_font_size(40.0);
    assert!(t.is_stale(0.0));
    measure(&mut t, baseline(), Anchor::Center, None);
    assert!(!t.is_stale(0.0));
    assert!(t.take_relayout());
    assert!(!t.take_relayout());

    t.set_text("Deal".to_string());
    assert!(!t.is_stale(0.0));
    t.set_text("Deal again".to_string());
    assert!(t.is_stale(0.0));
    measure(&mut t, baseline(), Anchor::Center, None);
    assert!(t.take_relayout());
}

#[test]
fn kerning_change_marks_stale() {
    let mut t = TextEntity::new("Deal").with_font_size(40.0);
    measure(&mut t, baseline(), Anchor::Center, None);
    assert!(t.is_stale(2.0));
}

#[test]
fn render_without_font_draws_nothing() {
    let mut t = TextEntity::new("Deal").with_font_size(40.0);
    let bounds = measure(&mut t, baseline(), Anchor::Center, None);
    let mut engine = TextEngine::new();
    let ctx = EntityCtx {
        viewport: baseline(),
        now: 0.0,
        padding: Vec2::ZERO,
        text: &mut engine,
    };
    let mut rc = vello_cpu::RenderContext::new(16, 16);
    t.render(bounds, &Props::default(), None, &ctx, &mut rc).unwrap();
}

fn axis_of(phase: &str) -> Option<Axis> {
    crate::animation::interpolate::BuiltinPhase::from_name(phase)
        .and_then(|p| p.float_axis())
}

#[test]
fn shadow_offset_drops_the_floated_axis() {
    let shadow = ShadowStyle {
        color: ColorDef::BLACK,
        offset_x: 4.0,
        offset_y: 6.0,
    };
    assert_eq!(shadow_offset(shadow, 0.5, axis_of("float-x")), Vec2::new(0.0, 3.0));
    assert_eq!(shadow_offset(shadow, 0.5, axis_of("float-y")), Vec2::new(2.0, 0.0));
    assert_eq!(shadow_offset(shadow, 0.5, axis_of("fade-in")), Vec2::new(2.0, 3.0));
    assert_eq!(shadow_offset(shadow, 1.0, None), Vec2::new(4.0, 6.0));
}
