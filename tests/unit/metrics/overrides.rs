use std::path::PathBuf;

use super::*;
use crate::metrics::table::GlyphMetricsTable;

#[test]
fn overrides_replace_only_vertical_offset() {
    let table = GlyphMetricsTable::builtin();
    let mut overrides = OffsetOverrides::new();
    overrides.set('g', 25);

    let metrics = WithOverrides::new(&table, &overrides);
    let g = metrics.lookup('g');
    assert_eq!(g.vertical_offset, 25);
    assert_eq!(g.left_spacing, table.lookup('g').left_spacing);
    assert_eq!(metrics.lookup('H'), table.lookup('H'));
}

#[test]
fn from_reader_rejects_multi_char_keys() {
    let ok = OffsetOverrides::from_reader(r#"{ "A": -40, "y": 20 }"#.as_bytes()).unwrap();
    assert_eq!(ok.get('A'), Some(-40));
    assert_eq!(ok.get('y'), Some(20));
    assert_eq!(ok.len(), 2);

    let err = OffsetOverrides::from_reader(r#"{ "ab": 1 }"#.as_bytes()).unwrap_err();
    assert!(matches!(err, GlyphError::Validation(_)));

    let err = OffsetOverrides::from_reader("not json".as_bytes()).unwrap_err();
    assert!(matches!(err, GlyphError::Serde(_)));
}

#[test]
fn load_missing_file_is_empty() {
    let path = PathBuf::from("target")
        .join("unit_overrides")
        .join("does_not_exist.json");
    let _ = std::fs::remove_file(&path);
    assert!(OffsetOverrides::load(&path).unwrap().is_empty());
}

#[test]
fn save_then_load_keeps_edits() {
    let dir = PathBuf::from("target").join("unit_overrides");
    let path = dir.join("offsets.json");
    let _ = std::fs::remove_file(&path);

    let mut overrides = OffsetOverrides::new();
    overrides.set('Q', -60);
    overrides.set('p', 14);
    overrides.save(&path).unwrap();

    let mut loaded = OffsetOverrides::load(&path).unwrap();
    assert_eq!(loaded, overrides);
    assert_eq!(loaded.clear('p'), Some(14));
    assert_eq!(loaded.iter().collect::<Vec<_>>(), vec![('Q', -60)]);
}
