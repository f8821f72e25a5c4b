use super::*;

#[test]
fn builtin_covers_letters_digits_and_space() {
    let table = GlyphMetricsTable::builtin();
    assert_eq!(table.len(), 26 + 26 + 10 + 1);
}

#[test]
fn builtin_values_match_library_tuning() {
    let table = GlyphMetricsTable::builtin();

    let h = table.lookup('H');
    assert_eq!((h.vertical_offset, h.left_spacing, h.right_spacing), (-50, -4, -4));

    let big_m = table.lookup('M');
    assert_eq!((big_m.left_spacing, big_m.right_spacing), (4, 4));
    assert_eq!(big_m.width_ratio, 1.2);

    let i = table.lookup('i');
    assert_eq!((i.vertical_offset, i.left_spacing, i.right_spacing), (-10, -10, -10));

    let w = table.lookup('w');
    assert_eq!((w.vertical_offset, w.left_spacing, w.right_spacing), (-8, 16, 10));
    assert_eq!(w.width_ratio, 1.2);

    assert_eq!(table.lookup('y').vertical_offset, 15);
    assert_eq!(table.lookup('5'), GlyphMetric::DEFAULT);
    assert_eq!(table.lookup(' '), GlyphMetric::DEFAULT);
}

#[test]
fn unknown_characters_resolve_to_default() {
    let table = GlyphMetricsTable::builtin();
    assert_eq!(table.lookup('@'), GlyphMetric::DEFAULT);
    assert_eq!(table.lookup('é'), GlyphMetric::DEFAULT);
    assert_eq!(GlyphMetricsTable::flat().lookup('H'), GlyphMetric::DEFAULT);
}

#[test]
fn set_overrides_an_entry() {
    let mut table = GlyphMetricsTable::flat();
    assert!(table.is_empty());
    let metric = GlyphMetric {
        vertical_offset: 3,
        left_spacing: 1,
        right_spacing: 2,
        width_ratio: 1.0,
    };
    table.set('x', metric);
    assert_eq!(table.lookup('x'), metric);
    assert_eq!(table.len(), 1);
}

#[test]
fn references_delegate_lookup() {
    let table = GlyphMetricsTable::builtin();
    let by_ref: &dyn GlyphMetrics = &table;
    assert_eq!((&by_ref).lookup('H'), table.lookup('H'));
}
