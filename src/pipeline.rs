use std::path::PathBuf;

use crate::{
    assets::store::{GlyphAssetStore, StillImageSource},
    compile::graph::{CompositeGraph, build_graph},
    config::Config,
    encode::{engine::RenderEngine, program::FfmpegProgram},
    foundation::error::GlyphResult,
    layout::engine::{LayoutResult, compute_layout_with},
    metrics::table::GlyphMetrics,
    render::preview::{PreviewWriter, render_preview},
};

/// Everything needed to render one text, computed without running ffmpeg.
#[derive(Clone, Debug)]
pub struct VideoPlan {
    /// Glyph geometry.
    pub layout: LayoutResult,
    /// Composite chain over the glyph clips.
    pub graph: CompositeGraph,
    /// ffmpeg invocation producing the video.
    pub program: FfmpegProgram,
}

/// File name of the video rendered for `text`: `generated_<text>.mp4`.
///
/// Spaces become `_`; anything other than ASCII letters, digits, `-` and `_` is dropped.
pub fn output_file_name(text: &str) -> String {
    let mut stem = text
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect::<String>();
    if stem.is_empty() {
        stem.push_str("text");
    }
    format!("generated_{stem}.mp4")
}

/// Layout → composite graph → ffmpeg program for `text`.
///
/// Unsupported characters and missing clips fail here, before anything is executed.
/// The output goes to `output`, or to [`output_file_name`] inside `cfg.output_dir`.
pub fn plan_video<M, S>(
    text: &str,
    cfg: &Config,
    metrics: &M,
    assets: &S,
    output: Option<PathBuf>,
) -> GlyphResult<VideoPlan>
where
    M: GlyphMetrics + ?Sized,
    S: GlyphAssetStore + ?Sized,
{
    let layout = compute_layout_with(text, &cfg.style, metrics, &cfg.video_opts())?;
    let graph = build_graph(&layout, assets)?;
    let output = output.unwrap_or_else(|| cfg.output_dir.join(output_file_name(&layout.text)));
    let program = FfmpegProgram::from_graph(&graph, &cfg.encode, output)?;
    Ok(VideoPlan {
        layout,
        graph,
        program,
    })
}

/// Plan and render the video for `text`, returning the written file.
#[tracing::instrument(skip(cfg, metrics, assets, engine))]
pub fn render_video<M, S, E>(
    text: &str,
    cfg: &Config,
    metrics: &M,
    assets: &S,
    engine: &mut E,
    output: Option<PathBuf>,
) -> GlyphResult<PathBuf>
where
    M: GlyphMetrics + ?Sized,
    S: GlyphAssetStore + ?Sized,
    E: RenderEngine + ?Sized,
{
    let plan = plan_video(text, cfg, metrics, assets, output)?;
    tracing::info!(
        glyphs = plan.layout.glyph_count(),
        scale = plan.layout.applied_scale,
        "rendering video"
    );
    engine.render(&plan.program)?;
    Ok(plan.program.output)
}

/// Lay out `text` for preview, composite it on stills and write it through `writer`.
///
/// Unsupported characters are skipped rather than rejected.
#[tracing::instrument(skip(cfg, metrics, stills, writer))]
pub fn render_preview_file<M, S>(
    text: &str,
    cfg: &Config,
    metrics: &M,
    stills: &S,
    writer: &PreviewWriter,
) -> GlyphResult<PathBuf>
where
    M: GlyphMetrics + ?Sized,
    S: StillImageSource + ?Sized,
{
    let layout = compute_layout_with(text, &cfg.style, metrics, &cfg.preview_opts())?;
    let img = render_preview(&layout, stills, cfg.preview_canvas)?;
    writer.write(&img)
}
