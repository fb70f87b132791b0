use super::*;

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255(255, 255), 255);
    assert_eq!(mul_div255(255, 0), 0);
    assert_eq!(mul_div255(128, 255), 128);
    assert_eq!(mul_div255(128, 128), 64);
}

#[test]
fn lerp_endpoints() {
    assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
    assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
    assert_eq!(lerp(2.0, 6.0, 0.5), 4.0);
}

#[test]
fn oscillate_peaks_at_quarter() {
    assert!((oscillate(0.25, 10.0) - 10.0).abs() < 1e-9);
    assert!(oscillate(0.0, 10.0).abs() < 1e-9);
    assert!((oscillate(0.75, 10.0) + 10.0).abs() < 1e-9);
}

#[test]
fn smoothstep_is_clamped() {
    assert_eq!(smoothstep(0.4, 1.0, 0.0), 0.0);
    assert_eq!(smoothstep(0.4, 1.0, 2.0), 1.0);
    let mid = smoothstep(0.4, 1.0, 0.7);
    assert!((mid - 0.5).abs() < 1e-9);
}
