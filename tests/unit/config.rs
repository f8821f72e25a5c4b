use super::*;
use crate::{foundation::core::CaseMode, layout::engine::UnsupportedPolicy};

#[test]
fn empty_object_is_the_default_config() {
    let cfg = Config::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, Config::default());
    cfg.validate().unwrap();
}

#[test]
fn partial_nested_sections_keep_their_defaults() {
    let json = r#"{
        "clips_dir": "assets/clips",
        "style": { "case_mode": "upper", "base_char_size": 240 },
        "encode": { "crf": 20 },
        "preview_canvas": { "width": 960, "height": 540 }
    }"#;
    let cfg = Config::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.clips_dir, PathBuf::from("assets/clips"));
    assert_eq!(cfg.style.case_mode, CaseMode::Upper);
    assert_eq!(cfg.style.base_char_size, 240);
    assert_eq!(cfg.style.char_spacing_factor, -0.8);
    assert_eq!(cfg.encode.crf, 20);
    assert_eq!(cfg.encode.codec, "libx264");
    assert_eq!(cfg.preview_canvas, Canvas::new(960, 540).unwrap());
    assert_eq!(cfg.fallback_text, "SampleText");
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = Config::from_reader("{ not json".as_bytes()).unwrap_err();
    assert!(matches!(err, GlyphError::Serde(_)));
    let err = Config::from_reader(r#"{"style": {"fps": "fast"}}"#.as_bytes()).unwrap_err();
    assert!(matches!(err, GlyphError::Serde(_)));
}

#[test]
fn missing_file_is_reported() {
    assert!(Config::from_path("target/unit_config/missing.json").is_err());
}

#[test]
fn validate_rejects_bad_sections() {
    let mut cfg = Config::default();
    cfg.style.fps = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = Config::default();
    cfg.encode.crf = 99;
    assert!(cfg.validate().is_err());

    let mut cfg = Config::default();
    cfg.preview_canvas.width = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn layout_options_follow_request_kind() {
    let cfg = Config {
        fallback_text: "Hello".to_string(),
        preview_fallback_text: "Peek".to_string(),
        ..Config::default()
    };
    let video = cfg.video_opts();
    assert_eq!(video.fallback_text, "Hello");
    assert_eq!(video.unsupported, UnsupportedPolicy::Reject);
    let preview = cfg.preview_opts();
    assert_eq!(preview.fallback_text, "Peek");
    assert_eq!(preview.unsupported, UnsupportedPolicy::Skip);
}
