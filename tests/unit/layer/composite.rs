use super::*;

#[test]
fn over_opaque_src_replaces() {
    assert_eq!(over([10, 20, 30, 255], [200, 0, 0, 255], 1.0), [200, 0, 0, 255]);
}

#[test]
fn over_transparent_src_keeps_dst() {
    assert_eq!(over([10, 20, 30, 255], [0, 0, 0, 0], 1.0), [10, 20, 30, 255]);
    assert_eq!(over([10, 20, 30, 255], [200, 0, 0, 255], 0.0), [10, 20, 30, 255]);
}

#[test]
fn over_half_alpha_blends() {
    let out = over([0, 0, 255, 255], [128, 0, 0, 128], 1.0);
    assert_eq!(out[3], 255);
    assert_eq!(out[0], 128);
    assert_eq!(out[2], 127);
}

#[test]
fn over_in_place_checks_lengths() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
    over_in_place(&mut dst, &[1, 2, 3, 255, 0, 0, 0, 0], 1.0).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 255, 0, 0, 0, 0]);
}

#[test]
fn straight_conversion_unpremultiplies() {
    let f = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![64, 0, 0, 128],
        premultiplied: true,
    };
    assert_eq!(f.to_straight_rgba8(), vec![128, 0, 0, 128]);
    assert_eq!(f.pixel(0, 0), Some([64, 0, 0, 128]));
    assert_eq!(f.pixel(1, 0), None);
}

#[test]
fn filled_frame_repeats_color() {
    let c = Rgba8Premul {
        r: 1,
        g: 2,
        b: 3,
        a: 4,
    };
    let f = FrameRGBA::filled(2, 1, c);
    assert_eq!(f.data, vec![1, 2, 3, 4, 1, 2, 3, 4]);
}
