use std::cell::Cell;
use std::rc::Rc;

use super::*;

fn title_phases() -> Vec<AnimationPhase> {
    vec![
        AnimationPhase::new("fade-in", 1.0),
        AnimationPhase::new("idle", 10.0).looped(),
        AnimationPhase::new("fade-out", 1.0),
    ]
}

fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
    let c = Rc::new(Cell::new(0));
    let c2 = c.clone();
    (c, move || c2.set(c2.get() + 1))
}

#[test]
fn speed_is_animation_speed_over_total() {
    let tl = Timeline::new(title_phases(), 1.0 / 12.0).unwrap();
    assert_eq!(tl.total_duration(), 12.0);
    assert!((tl.speed() - 1.0 / 144.0).abs() < 1e-15);
}

#[test]
fn zero_total_duration_completes_in_one_tick() {
    let mut tl = Timeline::new(vec![AnimationPhase::new("pop", 0.0)], 1.0 / 60.0).unwrap();
    assert_eq!(tl.speed(), 1.0);
    let s = tl.update(0.0).unwrap();
    assert_eq!(tl.progress(), 1.0);
    assert_eq!(s.local, 1.0);
    assert!(tl.has_end_fired());
}

#[test]
fn progress_is_monotonic_and_clamped() {
    let mut tl = Timeline::new(title_phases(), 0.5).unwrap();
    let mut last = tl.progress();
    for tick in 0..100 {
        tl.update(f64::from(tick) * 0.5).unwrap();
        assert!(tl.progress() >= last);
        assert!(tl.progress() <= 1.0);
        last = tl.progress();
    }
    assert_eq!(tl.progress(), 1.0);
    assert_eq!(tl.current_name(), Some("fade-out"));
}

#[test]
fn begin_and_end_fire_once() {
    let mut tl = Timeline::new(vec![AnimationPhase::new("a", 1.0)], 0.25).unwrap();
    let (begins, on_begin) = counter();
    let (ends, on_end) = counter();
    tl.set_on_begin(on_begin);
    tl.set_on_end(on_end);

    tl.update(0.0).unwrap();
    assert_eq!(begins.get(), 1);
    assert_eq!(ends.get(), 0);

    for i in 1..10 {
        tl.update(f64::from(i)).unwrap();
    }
    assert_eq!(begins.get(), 1);
    assert_eq!(ends.get(), 1);
}

#[test]
fn phase_resolution_crosses_into_idle_after_first_second() {
    let mut tl = Timeline::new(title_phases(), 1.0 / 12.0).unwrap();
    for i in 0..11 {
        tl.update(f64::from(i) / 12.0).unwrap();
        assert_eq!(tl.current_name(), Some("fade-in"), "tick {i}");
    }
    tl.update(11.0 / 12.0).unwrap();
    tl.update(12.0 / 12.0).unwrap();
    assert_eq!(tl.current_name(), Some("idle"));
    assert!(tl.progress() > 1.0 / 12.0);
}

#[test]
fn exact_boundary_selects_earlier_phase() {
    let phases = vec![AnimationPhase::new("a", 1.0), AnimationPhase::new("b", 1.0)];
    let mut tl = Timeline::new(phases, 1.0).unwrap();

    tl.update(0.0).unwrap();
    assert_eq!(tl.progress(), 0.5);
    assert_eq!(tl.current_name(), Some("a"));
    assert_eq!(tl.local_progress(), 1.0);

    tl.update(1.0).unwrap();
    assert_eq!(tl.progress(), 1.0);
    assert_eq!(tl.current_name(), Some("b"));
    assert_eq!(tl.phase_start(), 1.0);
    assert_eq!(tl.local_progress(), 1.0);
}

#[test]
fn non_looping_local_progress_is_linear_in_phase() {
    let phases = vec![AnimationPhase::new("a", 1.0), AnimationPhase::new("b", 3.0)];
    let mut tl = Timeline::new(phases, 1.0).unwrap();
    tl.update(0.0).unwrap(); // 0.25 -> a end
    tl.update(0.0).unwrap(); // 0.5 -> 2s elapsed, 1s into b
    assert_eq!(tl.current_name(), Some("b"));
    assert!((tl.local_progress() - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn looping_phase_uses_wall_clock() {
    let phases = vec![AnimationPhase::new("spin", 2.0).looped()];
    let mut tl = Timeline::new(phases, 0.001).unwrap();
    tl.ensure_started(10.0);

    tl.update(10.5).unwrap();
    assert!((tl.local_progress() - 0.25).abs() < 1e-12);
    tl.update(13.0).unwrap();
    assert!((tl.local_progress() - 0.5).abs() < 1e-12);

    tl.ensure_started(99.0);
    assert_eq!(tl.start_time(), Some(10.0));
}

#[test]
fn phase_dependent_calls_before_update_are_state_errors() {
    let tl = Timeline::new(title_phases(), 0.1).unwrap();
    assert!(tl.current().unwrap_err().is_state());
    assert!(tl.easing().unwrap_err().is_state());
    assert!(tl.sample().unwrap_err().is_state());
}

#[test]
fn empty_phase_list_is_state_error() {
    let mut tl = Timeline::new(Vec::new(), 0.1).unwrap();
    assert!(tl.update(0.0).unwrap_err().is_state());
    assert!(tl.advance_phase(None).unwrap_err().is_state());
}

#[test]
fn negative_duration_is_config_error() {
    let err = Timeline::new(vec![AnimationPhase::new("bad", -1.0)], 0.1).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn easing_remaps_local_progress() {
    let phases = vec![AnimationPhase::new("a", 1.0).with_easing_fn(|t| t * t)];
    let mut tl = Timeline::new(phases, 0.5).unwrap();
    let s = tl.update(0.0).unwrap();
    assert_eq!(s.local, 0.5);
    assert_eq!(s.eased, 0.25);
    assert_eq!(tl.easing().unwrap(), 0.25);
}

#[test]
fn sample_magnitude_defaults() {
    let phases = vec![
        AnimationPhase::new("a", 1.0),
        AnimationPhase::new("b", 1.0).with_magnitude(10.0),
    ];
    let mut tl = Timeline::new(phases, 1.0).unwrap();
    assert_eq!(tl.update(0.0).unwrap().magnitude, DEFAULT_MAGNITUDE_PX);
    assert_eq!(tl.update(0.0).unwrap().magnitude, 10.0);
}

#[test]
fn advance_phase_wraps_and_jumps() {
    let mut tl = Timeline::new(title_phases(), 1.0 / 60.0).unwrap();
    tl.update(0.0).unwrap();
    assert_eq!(tl.phase_index(), 0);

    tl.advance_phase(None).unwrap();
    assert_eq!(tl.current_name(), Some("idle"));
    assert!((tl.progress() - 1.0 / 12.0).abs() < 1e-12);
    assert_eq!(tl.local_progress(), 0.0);

    tl.advance_phase(Some("fade-out")).unwrap();
    assert_eq!(tl.phase_start(), 11.0);
    tl.update(0.0).unwrap();
    assert_eq!(tl.current_name(), Some("fade-out"));

    tl.advance_phase(None).unwrap();
    assert_eq!(tl.current_name(), Some("fade-in"));
    assert_eq!(tl.progress(), 0.0);
}

#[test]
fn advance_to_unknown_name_is_config_error() {
    let mut tl = Timeline::new(title_phases(), 0.1).unwrap();
    assert!(tl.advance_phase(Some("spin")).unwrap_err().is_config());
}

#[test]
fn jumps_do_not_rearm_callbacks() {
    let phases = vec![AnimationPhase::new("a", 1.0), AnimationPhase::new("b", 1.0)];
    let mut tl = Timeline::new(phases, 1.0).unwrap();
    let (ends, on_end) = counter();
    tl.set_on_end(on_end);
    tl.update(0.0).unwrap();
    tl.update(0.0).unwrap();
    assert_eq!(ends.get(), 1);

    tl.advance_phase(Some("a")).unwrap();
    tl.update(0.0).unwrap();
    tl.update(0.0).unwrap();
    assert_eq!(ends.get(), 1);
}

#[test]
fn reassigned_end_after_finished_run_waits_for_reset() {
    let phases = vec![AnimationPhase::new("idle", 1.0), AnimationPhase::new("fade-out", 1.0)];
    let mut tl = Timeline::new(phases, 1.0).unwrap();
    tl.update(0.0).unwrap();
    tl.update(0.0).unwrap();
    assert!(tl.has_end_fired());

    let (ends, on_end) = counter();
    tl.set_on_end(on_end);
    tl.advance_phase(Some("fade-out")).unwrap();
    tl.update(0.0).unwrap();
    tl.update(0.0).unwrap();
    assert_eq!(tl.progress(), 1.0);
    assert_eq!(ends.get(), 0);

    tl.reset();
    tl.update(0.0).unwrap();
    tl.update(0.0).unwrap();
    assert_eq!(ends.get(), 1);
}

#[test]
fn reset_replays_identically() {
    let mut tl = Timeline::new(title_phases(), 1.0).unwrap();
    let (begins, on_begin) = counter();
    tl.set_on_begin(on_begin);

    let run = |tl: &mut Timeline| {
        (0..14)
            .map(|i| {
                tl.update(f64::from(i)).unwrap();
                (tl.phase_index(), tl.progress(), tl.local_progress())
            })
            .collect::<Vec<_>>()
    };
    tl.ensure_started(0.0);
    let first = run(&mut tl);

    tl.reset();
    assert_eq!(tl.progress(), 0.0);
    assert!(tl.current().is_err());
    assert!(!tl.has_begin_fired());
    tl.ensure_started(0.0);
    let second = run(&mut tl);

    assert_eq!(first, second);
    assert_eq!(begins.get(), 2);
}

#[test]
fn destroy_is_terminal() {
    let mut tl = Timeline::new(title_phases(), 0.1).unwrap();
    let (begins, on_begin) = counter();
    tl.set_on_begin(on_begin);
    tl.destroy();

    assert!(tl.is_destroyed());
    assert!(tl.phases().is_empty());
    assert!(tl.update(0.0).unwrap_err().is_state());
    assert_eq!(begins.get(), 0);
}
