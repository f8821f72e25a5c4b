use super::*;

#[test]
fn screen_black_and_white_is_white() {
    assert_eq!(screen([0, 0, 0, 255], [255, 255, 255, 255]), [255, 255, 255, 255]);
    assert_eq!(screen([255, 255, 255, 255], [0, 0, 0, 255]), [255, 255, 255, 255]);
}

#[test]
fn screen_black_and_black_is_black() {
    assert_eq!(screen([0, 0, 0, 255], [0, 0, 0, 255]), [0, 0, 0, 255]);
}

#[test]
fn transparent_black_top_is_identity_on_opaque_bottom() {
    for k in 0..=255u8 {
        let bottom = [k, 255 - k, k / 2, 255];
        assert_eq!(screen(bottom, [0, 0, 0, 0]), bottom, "k={k}");
    }
}

#[test]
fn screen_brightens_and_is_symmetric() {
    let a = [100, 0, 200, 255];
    let b = [100, 50, 0, 255];
    let out = screen(a, b);
    assert_eq!(out, screen(b, a));
    // 1 - (1 - 100/255)^2 = 0.6305.. -> 160
    assert_eq!(out, [160, 50, 200, 255]);
}

#[test]
fn result_is_premultiplied_by_combined_alpha() {
    assert_eq!(screen([0, 0, 0, 0], [255, 255, 255, 128]), [128, 128, 128, 128]);
    assert_eq!(screen([0, 0, 0, 0], [0, 0, 0, 0]), [0, 0, 0, 0]);
}

#[test]
fn mask_scales_all_channels_by_alpha() {
    assert_eq!(mask_onto_transparent([200, 100, 50, 255]), [200, 100, 50, 255]);
    assert_eq!(mask_onto_transparent([200, 100, 50, 0]), [0, 0, 0, 0]);
    assert_eq!(mask_onto_transparent([255, 0, 0, 128]), [128, 0, 0, 64]);
}

#[test]
fn in_place_blend_checks_buffer_shape() {
    let mut bottom = vec![0u8, 0, 0, 255, 10, 20, 30, 255];
    let top = vec![255u8, 255, 255, 255, 0, 0, 0, 0];
    screen_in_place(&mut bottom, &top).unwrap();
    assert_eq!(bottom, vec![255, 255, 255, 255, 10, 20, 30, 255]);

    assert!(screen_in_place(&mut bottom, &top[..4]).is_err());
    let mut odd = vec![0u8; 3];
    assert!(screen_in_place(&mut odd, &[0u8; 3]).is_err());
}
