use super::*;
use crate::foundation::core::{BASELINE, Canvas};

fn vp() -> Viewport {
    Viewport::from_canvas(BASELINE, BASELINE)
}

fn sample(local: f64, eased: f64) -> PhaseSample {
    PhaseSample {
        index: 0,
        local,
        eased,
        magnitude: 0.0,
    }
}

#[test]
fn starts_collapsed_with_full_sweep() {
    let p = TimerEntity::initial_props();
    assert_eq!(p.scale, 0.0);
    assert_eq!(p.angle, TAU);
    assert_eq!(p.opacity, 1.0);
}

#[test]
fn radii_follow_scale_and_viewport() {
    let t = TimerEntity::new(50.0);
    let r = t.radii(&vp(), 1.0);
    assert_eq!(r.disc, 50.0);
    assert_eq!(r.arc, 40.0);

    let half = Viewport::from_canvas(Canvas::new(960, 540), BASELINE);
    assert_eq!(t.radii(&half, 0.5).disc, 12.5);
    assert_eq!(t.diameter(&half), 50.0);
}

#[test]
fn negative_scale_clamps_radii() {
    let r = TimerEntity::default().radii(&vp(), -0.2);
    assert_eq!(r, TimerRadii { disc: 0.0, ring: 0.0, arc: 0.0 });
}

#[test]
fn zoom_in_defaults_to_out_back() {
    let t = TimerEntity::default();
    let phase = AnimationPhase::new("zoom-in", 1.0);
    let p = t
        .interpolate(&phase, &sample(0.5, 0.5), &TimerEntity::initial_props())
        .unwrap();
    assert_eq!(p.scale, Ease::OutBack.apply(0.5));
    assert!(p.scale > 1.0);
}

#[test]
fn zoom_in_respects_phase_easing() {
    let t = TimerEntity::default();
    let phase = AnimationPhase::new("zoom-in", 1.0).with_ease(Ease::InQuad);
    let p = t
        .interpolate(&phase, &sample(0.5, 0.25), &Props::default())
        .unwrap();
    assert_eq!(p.scale, 0.25);
}

#[test]
fn countdown_shrinks_sweep() {
    let t = TimerEntity::default();
    let phase = AnimationPhase::new("countdown", 10.0);
    let p = t
        .interpolate(&phase, &sample(0.25, 0.25), &TimerEntity::initial_props())
        .unwrap();
    assert!((p.angle - TAU * 0.75).abs() < 1e-12);
    let p = t
        .interpolate(&phase, &sample(1.0, 1.0), &p)
        .unwrap();
    assert_eq!(p.angle, 0.0);
}

#[test]
fn unrelated_phase_falls_through() {
    let t = TimerEntity::default();
    let phase = AnimationPhase::new("fade-in", 1.0);
    assert!(t.interpolate(&phase, &sample(0.5, 0.5), &Props::default()).is_none());
}

#[test]
fn pie_path_stays_inside_radius() {
    let c = Point::new(100.0, 100.0);
    let path = pie_path(c, 40.0, TAU * 0.25);
    let bbox = path.bounding_box();
    assert!(bbox.x0 >= 100.0 - 1e-6);
    assert!(bbox.y1 <= 100.0 + 1e-6);
    assert!((bbox.y0 - 60.0).abs() < 1e-6);
    assert!((bbox.x1 - 140.0).abs() < 1e-6);
}
