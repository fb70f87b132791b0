use super::*;

#[test]
fn empty_object_uses_defaults() {
    let cfg = StageConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, StageConfig::default());
    assert_eq!(cfg.fps, 60.0);
    assert_eq!(cfg.baseline, BASELINE);
    assert_eq!(cfg.layout.padding_px, 32.0);
}

#[test]
fn animation_speed_is_one_tick() {
    let cfg = StageConfig {
        fps: 12.0,
        ..StageConfig::default()
    };
    assert!((cfg.animation_speed() - 1.0 / 12.0).abs() < 1e-12);
}

#[test]
fn rejects_bad_fps_and_negative_spacing() {
    let err = StageConfig::from_reader(r#"{"fps": 0}"#.as_bytes()).unwrap_err();
    assert!(err.is_config());

    let err =
        StageConfig::from_reader(r#"{"layout": {"gutter_px": -1}}"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("gutter_px"));
}

#[test]
fn rejects_unknown_fields() {
    let err = StageConfig::from_reader(r#"{"fsp": 30}"#.as_bytes()).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn parses_clear_color() {
    let cfg = StageConfig::from_reader(r##"{"clear_color": "#102030"}"##.as_bytes()).unwrap();
    let c = cfg.clear_color.unwrap().to_rgba8_premul();
    assert_eq!((c.r, c.g, c.b, c.a), (0x10, 0x20, 0x30, 255));
}

#[test]
fn missing_file_is_wrapped() {
    let err = StageConfig::from_path("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, StageError::Other(_)));
}
