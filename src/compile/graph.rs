use std::{fmt, path::PathBuf};

use crate::{
    assets::store::GlyphAssetStore,
    foundation::core::{Canvas, GlyphKey},
    foundation::error::{GlyphError, GlyphResult},
    layout::engine::LayoutResult,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Index of a source clip in [`CompositeGraph::inputs`].
pub struct InputId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Name of an intermediate result. Glyph-bound labels carry the character index.
pub enum NodeLabel {
    /// The solid background frame (initial accumulator).
    Background,
    /// A clip scaled to its glyph size.
    Scaled(usize),
    /// A transparent canvas-sized frame.
    Pad(usize),
    /// A scaled clip positioned on a transparent frame.
    Overlay(usize),
    /// The accumulator after blending a glyph in.
    Blend(usize),
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Background => f.write_str("bg"),
            Self::Scaled(i) => write!(f, "s{i}"),
            Self::Pad(i) => write!(f, "tmp{i}"),
            Self::Overlay(i) => write!(f, "overlay{i}"),
            Self::Blend(i) => write!(f, "blend{i}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A source clip the external renderer must read.
pub struct GraphInput {
    /// Position in the input list.
    pub id: InputId,
    /// Glyph the clip draws.
    pub key: GlyphKey,
    /// Resolved clip path.
    pub path: PathBuf,
}

#[derive(Clone, Debug, PartialEq)]
/// A compositing operation.
pub enum CompositeOp {
    /// Solid black frame of the output size, duration and frame rate.
    Background {
        /// Frame size.
        canvas: Canvas,
        /// Frame duration in seconds.
        duration_secs: f64,
        /// Frame rate.
        fps: u32,
    },
    /// Scale a source clip to a `size × size` square.
    Scale {
        /// Clip to scale.
        input: InputId,
        /// Target edge length in pixels.
        size: u32,
    },
    /// Fully transparent frame of the output size.
    TransparentPad {
        /// Frame size.
        canvas: Canvas,
        /// Frame duration in seconds.
        duration_secs: f64,
    },
    /// Place `top` on `base` with its top-left corner at `(x, y)`.
    Overlay {
        /// Frame drawn onto.
        base: NodeLabel,
        /// Frame being placed.
        top: NodeLabel,
        /// Canvas x of the top-left corner.
        x: i64,
        /// Canvas y of the top-left corner.
        y: i64,
    },
    /// Screen-blend `top` onto `bottom`.
    ScreenBlend {
        /// Accumulated frame.
        bottom: NodeLabel,
        /// Frame blended in.
        top: NodeLabel,
    },
}

impl CompositeOp {
    /// Short operation name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background { .. } => "background",
            Self::Scale { .. } => "scale",
            Self::TransparentPad { .. } => "transparent-pad",
            Self::Overlay { .. } => "overlay",
            Self::ScreenBlend { .. } => "screen-blend",
        }
    }

    fn node_refs(&self) -> Vec<NodeLabel> {
        match self {
            Self::Background { .. } | Self::Scale { .. } | Self::TransparentPad { .. } => vec![],
            Self::Overlay { base, top, .. } => vec![*base, *top],
            Self::ScreenBlend { bottom, top } => vec![*bottom, *top],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// One node of the composite chain.
pub struct CompositeInstruction {
    /// Label of the produced result.
    pub output: NodeLabel,
    /// Operation producing it.
    pub op: CompositeOp,
}

#[derive(Clone, Debug, PartialEq)]
/// Renderer-agnostic composite program for a laid-out text.
///
/// The instruction list is a strictly linear chain: every instruction only reads inputs
/// or results of earlier instructions, and each intermediate result is read once.
/// `final_output` names the result the renderer must map to its output stream.
pub struct CompositeGraph {
    /// Output canvas.
    pub canvas: Canvas,
    /// Output duration in seconds.
    pub duration_secs: f64,
    /// Output frame rate.
    pub fps: u32,
    /// Source clips, one per visible glyph, in layout order.
    pub inputs: Vec<GraphInput>,
    /// Instructions in execution order.
    pub instructions: Vec<CompositeInstruction>,
    /// Label of the program result.
    pub final_output: NodeLabel,
}

impl CompositeGraph {
    /// Check that every reference points at an earlier result or a declared input, and that
    /// no intermediate result is read twice.
    pub fn validate(&self) -> GlyphResult<()> {
        let mut produced = Vec::<NodeLabel>::with_capacity(self.instructions.len());
        let mut consumed = Vec::<NodeLabel>::with_capacity(self.instructions.len());

        for (idx, ins) in self.instructions.iter().enumerate() {
            if let CompositeOp::Scale { input, .. } = &ins.op
                && !self.inputs.iter().any(|i| i.id == *input)
            {
                return Err(GlyphError::validation(format!(
                    "instruction {idx} ({}) reads undeclared input {}",
                    ins.op.name(),
                    input.0
                )));
            }
            for r in ins.op.node_refs() {
                if !produced.contains(&r) {
                    return Err(GlyphError::validation(format!(
                        "instruction {idx} ({}) reads '{r}' before it is produced",
                        ins.op.name()
                    )));
                }
                if consumed.contains(&r) {
                    return Err(GlyphError::validation(format!(
                        "instruction {idx} ({}) reads '{r}' a second time",
                        ins.op.name()
                    )));
                }
                consumed.push(r);
            }
            if produced.contains(&ins.output) {
                return Err(GlyphError::validation(format!(
                    "label '{}' is produced twice",
                    ins.output
                )));
            }
            produced.push(ins.output);
        }

        if self.instructions.last().map(|i| i.output) != Some(self.final_output) {
            return Err(GlyphError::validation(
                "final output must be the last instruction's result",
            ));
        }
        Ok(())
    }
}

/// Build the composite chain for `layout`, resolving every glyph clip through `assets`.
///
/// All clips are resolved before any instruction is emitted, so a single missing clip
/// fails the whole build with [`GlyphError::AssetNotFound`].
#[tracing::instrument(skip_all, fields(text = %layout.text))]
pub fn build_graph<S: GlyphAssetStore + ?Sized>(
    layout: &LayoutResult,
    assets: &S,
) -> GlyphResult<CompositeGraph> {
    let canvas = layout.canvas();
    let duration_secs = layout.style.duration_secs;
    let fps = layout.style.fps;

    let mut inputs = Vec::<GraphInput>::with_capacity(layout.glyph_count());
    let mut sizes = Vec::<u32>::with_capacity(layout.glyph_count());
    for g in layout.glyphs() {
        let path = assets.resolve(g.key)?;
        let size = u32::try_from(g.size)
            .ok()
            .filter(|s| *s > 0)
            .ok_or_else(|| {
                GlyphError::validation(format!(
                    "glyph {} at index {} has non-positive size {}",
                    g.key, g.index, g.size
                ))
            })?;
        let id = InputId(
            inputs
                .len()
                .try_into()
                .map_err(|_| GlyphError::validation("input id overflow"))?,
        );
        inputs.push(GraphInput {
            id,
            key: g.key,
            path,
        });
        sizes.push(size);
    }

    let mut instructions = Vec::with_capacity(4 * inputs.len() + 1);
    instructions.push(CompositeInstruction {
        output: NodeLabel::Background,
        op: CompositeOp::Background {
            canvas,
            duration_secs,
            fps,
        },
    });

    let mut current = NodeLabel::Background;
    for ((g, input), size) in layout.glyphs().zip(&inputs).zip(sizes) {
        let i = g.index;
        instructions.push(CompositeInstruction {
            output: NodeLabel::Scaled(i),
            op: CompositeOp::Scale {
                input: input.id,
                size,
            },
        });
        instructions.push(CompositeInstruction {
            output: NodeLabel::Pad(i),
            op: CompositeOp::TransparentPad {
                canvas,
                duration_secs,
            },
        });
        instructions.push(CompositeInstruction {
            output: NodeLabel::Overlay(i),
            op: CompositeOp::Overlay {
                base: NodeLabel::Pad(i),
                top: NodeLabel::Scaled(i),
                x: layout.canvas_x(g),
                y: g.y,
            },
        });
        instructions.push(CompositeInstruction {
            output: NodeLabel::Blend(i),
            op: CompositeOp::ScreenBlend {
                bottom: current,
                top: NodeLabel::Overlay(i),
            },
        });
        current = NodeLabel::Blend(i);
    }

    tracing::debug!(
        inputs = inputs.len(),
        instructions = instructions.len(),
        "composite graph built"
    );

    Ok(CompositeGraph {
        canvas,
        duration_secs,
        fps,
        inputs,
        instructions,
        final_output: current,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compile/graph.rs"]
mod tests;
