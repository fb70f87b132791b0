use super::*;

#[test]
fn approximate_metrics_without_font() {
    let mut engine = TextEngine::new();
    assert!(!engine.has_font());

    let b = engine.measure("ABCD", 20.0, 0.0).unwrap();
    assert_eq!(b.width, 40.0);
    assert_eq!(b.height, 25.0);
    assert!(b.layout.is_none());
}

#[test]
fn approximate_metrics_multiline_and_spacing() {
    let mut engine = TextEngine::new();
    let b = engine.measure("AB\nABCD", 16.0, 0.0).unwrap();
    assert_eq!(b.width, 32.0);
    assert_eq!(b.height, 40.0);

    let spaced = engine.measure("ABCD", 20.0, 2.0).unwrap();
    assert_eq!(spaced.width, 46.0);
}

#[test]
fn empty_text_keeps_one_line() {
    let mut engine = TextEngine::new();
    let b = engine.measure("", 16.0, 0.0).unwrap();
    assert_eq!(b.width, 0.0);
    assert_eq!(b.height, 20.0);
}

#[test]
fn rejects_bad_size() {
    let mut engine = TextEngine::new();
    assert!(engine.measure("x", 0.0, 0.0).unwrap_err().is_config());
    assert!(engine.measure("x", f64::NAN, 0.0).is_err());
}

#[test]
fn rejects_non_font_bytes() {
    assert!(TextEngine::with_font_bytes(b"definitely not a font".to_vec()).is_err());
}
