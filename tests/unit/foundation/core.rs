use super::*;

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert_eq!(
        Canvas::new(640, 360).unwrap(),
        Canvas {
            width: 640,
            height: 360
        }
    );
}

#[test]
fn case_mode_keeps_char_positions() {
    assert_eq!(CaseMode::Upper.apply("Hi 2u"), "HI 2U");
    assert_eq!(CaseMode::Lower.apply("Hi 2U"), "hi 2u");
    assert_eq!(CaseMode::Mixed.apply("Hi 2U"), "Hi 2U");
    // Non-ASCII letters are left alone so indices stay aligned with the input.
    assert_eq!(CaseMode::Upper.apply("ß").chars().count(), 1);
}

#[test]
fn glyph_key_classifies_case_and_digits() {
    let upper = GlyphKey::for_char('H').unwrap();
    assert_eq!(upper.case, CaseVariant::Upper);
    assert_eq!(upper.clip_stem(), "H");
    assert_eq!(upper.still_stem(), "upper_h");

    let digit = GlyphKey::for_char('7').unwrap();
    assert_eq!(digit.case, CaseVariant::Lower);
    assert_eq!(digit.still_stem(), "lower_7");

    assert!(GlyphKey::for_char(' ').is_none());
    assert!(GlyphKey::for_char('@').is_none());
    assert!(GlyphKey::for_char('é').is_none());
}

#[test]
fn still_stem_parses_back() {
    for ch in ['A', 'z', '0'] {
        let key = GlyphKey::for_char(ch).unwrap();
        assert_eq!(GlyphKey::from_still_stem(&key.still_stem()), Some(key));
    }
    assert_eq!(GlyphKey::from_still_stem("upper_ab"), None);
    assert_eq!(GlyphKey::from_still_stem("title_a"), None);
    assert_eq!(GlyphKey::from_still_stem("preview"), None);
}

#[test]
fn case_mode_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&CaseMode::Mixed).unwrap(), "\"mixed\"");
    let m: CaseMode = serde_json::from_str("\"upper\"").unwrap();
    assert_eq!(m, CaseMode::Upper);
}
