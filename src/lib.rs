//! Glyphreel renders text as video by compositing one pre-rendered clip per character.
//!
//! Glyphs overlap and combine with a "screen" blend, so the output reads as a single
//! animated word on a black background.
//!
//! # Pipeline overview
//!
//! 1. **Layout**: `text + StyleParams + GlyphMetrics -> LayoutResult` (per-glyph position
//!    and size, with overflow-driven rescaling)
//! 2. **Compile**: `LayoutResult + GlyphAssetStore -> CompositeGraph` (a linear chain of
//!    scale / pad / overlay / screen-blend steps over the glyph clips)
//! 3. **Render**: `CompositeGraph -> FfmpegProgram`, executed by a [`RenderEngine`]
//! 4. **Preview** (alternative to 2-3): the same layout composited in memory on still
//!    images, written as a PNG
//!
//! Layout and graph building are pure functions of their inputs. The glyph metric table
//! and any live-edited offset overrides are passed in explicitly.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod compile;
mod config;
mod encode;
mod foundation;
mod layout;
mod metrics;
mod pipeline;
mod render;

pub use assets::decode::decode_still;
pub use assets::store::{ClipLibrary, GlyphAssetStore, StillImageSource, StillLibrary};
pub use compile::graph::{
    CompositeGraph, CompositeInstruction, CompositeOp, GraphInput, InputId, NodeLabel,
    build_graph,
};
pub use config::Config;
pub use encode::engine::{DryRunEngine, RenderEngine};
pub use encode::ffmpeg::{
    EncodeSettings, FfmpegEngine, ensure_parent_dir, extract_stills, is_ffmpeg_on_path,
    still_extract_args,
};
pub use encode::program::{FfmpegProgram, filter_complex};
pub use foundation::core::{Canvas, CaseMode, CaseVariant, GlyphKey};
pub use foundation::error::{GlyphError, GlyphResult};
pub use layout::engine::{
    DEFAULT_PREVIEW_TEXT, DEFAULT_VIDEO_TEXT, GlyphPlacement, LayoutOpts, LayoutResult,
    PlacedGlyph, StyleParams, UnsupportedPolicy, compute_layout, compute_layout_with,
};
pub use metrics::overrides::{OffsetOverrides, WithOverrides};
pub use metrics::table::{GlyphMetric, GlyphMetrics, GlyphMetricsTable};
pub use pipeline::{VideoPlan, output_file_name, plan_video, render_preview_file, render_video};
pub use render::blend::{Rgba8, mask_onto_transparent, screen, screen_in_place};
pub use render::preview::{PreviewPlacement, PreviewScale, PreviewWriter, render_preview};
