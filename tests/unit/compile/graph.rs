use std::collections::HashSet;

use super::*;
use crate::{
    foundation::core::CaseVariant,
    layout::engine::{StyleParams, compute_layout},
    metrics::table::GlyphMetricsTable,
};

struct SetStore {
    present: HashSet<GlyphKey>,
}

impl SetStore {
    fn with(chars: &str) -> Self {
        Self {
            present: chars.chars().filter_map(GlyphKey::for_char).collect(),
        }
    }
}

impl GlyphAssetStore for SetStore {
    fn path_for(&self, key: GlyphKey) -> PathBuf {
        PathBuf::from(key.case.dir_name()).join(format!("{}.mp4", key.clip_stem()))
    }

    fn exists(&self, key: GlyphKey) -> bool {
        self.present.contains(&key)
    }
}

fn layout(text: &str) -> LayoutResult {
    compute_layout(text, &StyleParams::default(), &GlyphMetricsTable::builtin()).unwrap()
}

#[test]
fn hi_builds_a_nine_step_chain() {
    let layout = layout("Hi");
    let graph = build_graph(&layout, &SetStore::with("Hi")).unwrap();
    graph.validate().unwrap();

    assert_eq!(graph.instructions.len(), 4 * 2 + 1);
    let names = graph
        .instructions
        .iter()
        .map(|i| i.op.name())
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            "background",
            "scale",
            "transparent-pad",
            "overlay",
            "screen-blend",
            "scale",
            "transparent-pad",
            "overlay",
            "screen-blend",
        ]
    );

    assert_eq!(graph.inputs.len(), 2);
    assert_eq!(
        graph.inputs[0].path,
        PathBuf::from("UPPER_CASE").join("H.mp4")
    );
    assert_eq!(graph.inputs[1].path, PathBuf::from("LOWER_CASE").join("i.mp4"));

    assert_eq!(
        graph.instructions[1].op,
        CompositeOp::Scale {
            input: InputId(0),
            size: 360
        }
    );
    assert_eq!(
        graph.instructions[3].op,
        CompositeOp::Overlay {
            base: NodeLabel::Pad(0),
            top: NodeLabel::Scaled(0),
            x: 764 - 4,
            y: 340,
        }
    );
    assert_eq!(
        graph.instructions[8].op,
        CompositeOp::ScreenBlend {
            bottom: NodeLabel::Blend(0),
            top: NodeLabel::Overlay(1),
        }
    );
    assert_eq!(graph.final_output, NodeLabel::Blend(1));
}

#[test]
fn spaces_emit_nothing_and_labels_use_char_index() {
    let layout = layout("a b");
    let graph = build_graph(&layout, &SetStore::with("ab")).unwrap();
    graph.validate().unwrap();

    assert_eq!(graph.instructions.len(), 9);
    assert_eq!(graph.instructions[5].output, NodeLabel::Scaled(2));
    assert_eq!(
        graph.instructions[5].op,
        CompositeOp::Scale {
            input: InputId(1),
            size: 300
        }
    );
    assert_eq!(graph.final_output, NodeLabel::Blend(2));
}

#[test]
fn all_space_layout_is_just_the_background() {
    let layout = layout("  ");
    let graph = build_graph(&layout, &SetStore::with("")).unwrap();
    graph.validate().unwrap();

    assert!(graph.inputs.is_empty());
    assert_eq!(graph.instructions.len(), 1);
    assert_eq!(
        graph.instructions[0].op,
        CompositeOp::Background {
            canvas: Canvas {
                width: 1920,
                height: 1080
            },
            duration_secs: 10.0,
            fps: 25,
        }
    );
    assert_eq!(graph.final_output, NodeLabel::Background);
}

#[test]
fn chain_length_is_linear_in_glyph_count() {
    let text = "Ouais Ouais 42";
    let layout = layout(text);
    let graph = build_graph(&layout, &SetStore::with("Ouais42")).unwrap();
    graph.validate().unwrap();
    assert_eq!(graph.instructions.len(), 4 * layout.glyph_count() + 1);
    assert_eq!(graph.inputs.len(), layout.glyph_count());
}

#[test]
fn missing_clip_fails_the_whole_build() {
    let layout = layout("Hat");
    let err = build_graph(&layout, &SetStore::with("Ht")).unwrap_err();
    assert!(matches!(
        err,
        GlyphError::AssetNotFound {
            ch: 'a',
            case: CaseVariant::Lower
        }
    ));
}

#[test]
fn validate_rejects_reused_intermediates() {
    let layout = layout("ab");
    let mut graph = build_graph(&layout, &SetStore::with("ab")).unwrap();
    // Blend the first overlay twice.
    graph.instructions[8].op = CompositeOp::ScreenBlend {
        bottom: NodeLabel::Blend(0),
        top: NodeLabel::Overlay(0),
    };
    assert!(graph.validate().is_err());
}

#[test]
fn validate_rejects_forward_references_and_bad_final_output() {
    let layout = layout("ab");
    let graph = build_graph(&layout, &SetStore::with("ab")).unwrap();

    let mut forward = graph.clone();
    forward.instructions.swap(1, 3);
    assert!(forward.validate().is_err());

    let mut wrong_final = graph;
    wrong_final.final_output = NodeLabel::Blend(0);
    assert!(wrong_final.validate().is_err());
}
