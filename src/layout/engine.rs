use crate::{
    foundation::core::{Canvas, CaseMode, CaseVariant, GlyphKey},
    foundation::error::{GlyphError, GlyphResult},
    metrics::table::GlyphMetrics,
};

/// Text substituted for an empty video request.
pub const DEFAULT_VIDEO_TEXT: &str = "SampleText";
/// Text substituted for an empty preview request.
pub const DEFAULT_PREVIEW_TEXT: &str = "Preview";

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Styling and output geometry for one layout call.
///
/// The last four fields are tunables that differ between glyph libraries; their defaults
/// match the shipped library.
pub struct StyleParams {
    /// Case normalization applied to the text.
    pub case_mode: CaseMode,
    /// Lower-case glyph size in pixels.
    pub base_char_size: u32,
    /// Gap between consecutive entries as a fraction of `base_char_size`. Negative overlaps.
    pub char_spacing_factor: f64,
    /// Advance of a space in pixels.
    pub space_width: u32,
    /// Output width in pixels.
    pub video_width: u32,
    /// Output height in pixels.
    pub video_height: u32,
    /// Output duration in seconds.
    pub duration_secs: f64,
    /// Output frame rate.
    pub fps: u32,
    /// Upper-case glyph size relative to `base_char_size`.
    pub uppercase_scale: f64,
    /// Extra advance before a non-leading upper-case glyph, relative to `base_char_size`.
    pub uppercase_lead_in: f64,
    /// Character size the metric table was tuned at.
    pub reference_char_size: u32,
    /// Widest allowed text run as a fraction of `video_width` before rescaling.
    pub max_width_fraction: f64,
}

impl Default for StyleParams {
    fn default() -> Self {
        Self {
            case_mode: CaseMode::Mixed,
            base_char_size: 300,
            char_spacing_factor: -0.8,
            space_width: 20,
            video_width: 1920,
            video_height: 1080,
            duration_secs: 10.0,
            fps: 25,
            uppercase_scale: 1.2,
            uppercase_lead_in: 0.2,
            reference_char_size: 300,
            max_width_fraction: 0.9,
        }
    }
}

impl StyleParams {
    /// Check ranges the layout math relies on.
    pub fn validate(&self) -> GlyphResult<()> {
        if self.base_char_size == 0 {
            return Err(GlyphError::validation("base_char_size must be > 0"));
        }
        if self.space_width == 0 {
            return Err(GlyphError::validation("space_width must be > 0"));
        }
        if self.reference_char_size == 0 {
            return Err(GlyphError::validation("reference_char_size must be > 0"));
        }
        if self.video_width == 0 || self.video_height == 0 {
            return Err(GlyphError::validation(
                "video width/height must be non-zero",
            ));
        }
        if self.fps == 0 {
            return Err(GlyphError::validation("fps must be > 0"));
        }
        if !(self.duration_secs.is_finite() && self.duration_secs > 0.0) {
            return Err(GlyphError::validation("duration_secs must be > 0"));
        }
        if !self.char_spacing_factor.is_finite() {
            return Err(GlyphError::validation("char_spacing_factor must be finite"));
        }
        if !(self.uppercase_scale.is_finite() && self.uppercase_scale > 0.0) {
            return Err(GlyphError::validation("uppercase_scale must be > 0"));
        }
        if !self.uppercase_lead_in.is_finite() {
            return Err(GlyphError::validation("uppercase_lead_in must be finite"));
        }
        if !(self.max_width_fraction > 0.0 && self.max_width_fraction <= 1.0) {
            return Err(GlyphError::validation(
                "max_width_fraction must be in (0, 1]",
            ));
        }
        Ok(())
    }

    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.video_width,
            height: self.video_height,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// What to do with characters that have no glyph.
pub enum UnsupportedPolicy {
    /// Fail the layout with [`GlyphError::UnsupportedCharacter`].
    #[default]
    Reject,
    /// Drop the character, record it in [`LayoutResult::skipped`] and log a warning.
    Skip,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Request-level layout options.
pub struct LayoutOpts {
    /// Text laid out when the input is empty.
    pub fallback_text: String,
    /// Handling of characters without a glyph.
    pub unsupported: UnsupportedPolicy,
}

impl Default for LayoutOpts {
    fn default() -> Self {
        Self {
            fallback_text: DEFAULT_VIDEO_TEXT.to_string(),
            unsupported: UnsupportedPolicy::Reject,
        }
    }
}

impl LayoutOpts {
    /// Options used for still previews: tolerant of unsupported characters.
    pub fn preview() -> Self {
        Self {
            fallback_text: DEFAULT_PREVIEW_TEXT.to_string(),
            unsupported: UnsupportedPolicy::Skip,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Position and size of one visible glyph.
pub struct GlyphPlacement {
    /// Library address of the glyph.
    pub key: GlyphKey,
    /// Character index in the normalized text.
    pub index: usize,
    /// Left edge relative to the start of the text run.
    pub x: i64,
    /// Top edge in canvas coordinates.
    pub y: i64,
    /// Width and height of the square glyph.
    pub size: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// One entry of the laid-out text.
pub enum PlacedGlyph {
    /// A space: advances the cursor, draws nothing.
    Space,
    /// A visible glyph.
    Glyph(GlyphPlacement),
}

impl PlacedGlyph {
    /// The placement, if this entry is visible.
    pub fn placement(&self) -> Option<&GlyphPlacement> {
        match self {
            Self::Space => None,
            Self::Glyph(g) => Some(g),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Geometry of a laid-out text run.
pub struct LayoutResult {
    /// The normalized text that was laid out (fallback substituted, skipped chars removed).
    pub text: String,
    /// One entry per character of `text`.
    pub placed: Vec<PlacedGlyph>,
    /// `(index, char)` of characters dropped under [`UnsupportedPolicy::Skip`].
    pub skipped: Vec<(usize, char)>,
    /// Advance of the whole run after rescaling.
    pub total_width: i64,
    /// Canvas x of the run start.
    pub x_offset: i64,
    /// Canvas y of a glyph with zero vertical offset.
    pub y_base: i64,
    /// Lower-case glyph size after rescaling.
    pub effective_char_size: i64,
    /// Inter-entry gap after rescaling.
    pub effective_spacing: i64,
    /// Space advance after rescaling.
    pub effective_space_width: i64,
    /// Rescale factor applied (1.0 when the run fit).
    pub applied_scale: f64,
    /// Style the layout was computed with.
    pub style: StyleParams,
}

impl LayoutResult {
    /// Visible glyphs in layout order.
    pub fn glyphs(&self) -> impl Iterator<Item = &GlyphPlacement> + '_ {
        self.placed.iter().filter_map(PlacedGlyph::placement)
    }

    /// Number of visible glyphs.
    pub fn glyph_count(&self) -> usize {
        self.glyphs().count()
    }

    /// Canvas x of a glyph's left edge.
    pub fn canvas_x(&self, g: &GlyphPlacement) -> i64 {
        self.x_offset + g.x
    }

    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        self.style.canvas()
    }
}

#[derive(Clone, Copy, Debug)]
enum Entry {
    Glyph { key: GlyphKey, index: usize },
    Space,
}

struct Classified {
    text: String,
    entries: Vec<Entry>,
    skipped: Vec<(usize, char)>,
}

/// Lay out `text` with [`LayoutOpts::default`] (reject unsupported characters).
pub fn compute_layout<M: GlyphMetrics + ?Sized>(
    text: &str,
    style: &StyleParams,
    metrics: &M,
) -> GlyphResult<LayoutResult> {
    compute_layout_with(text, style, metrics, &LayoutOpts::default())
}

/// Lay out `text`: normalize case, place every glyph on one line, rescale to fit the
/// canvas and center the run.
#[tracing::instrument(skip_all, fields(text = %text, case = ?style.case_mode))]
pub fn compute_layout_with<M: GlyphMetrics + ?Sized>(
    text: &str,
    style: &StyleParams,
    metrics: &M,
    opts: &LayoutOpts,
) -> GlyphResult<LayoutResult> {
    style.validate()?;

    let classified = match classify(text, style.case_mode, opts.unsupported)? {
        Some(c) => c,
        None => {
            tracing::debug!(fallback = %opts.fallback_text, "nothing to lay out, using fallback text");
            classify(&opts.fallback_text, style.case_mode, opts.unsupported)?
                .ok_or(GlyphError::EmptyInput)?
        }
    };

    let base = i64::from(style.base_char_size);
    let spacing = trunc(base as f64 * style.char_spacing_factor);
    let lead_in = trunc(base as f64 * style.uppercase_lead_in);
    let upper_size = trunc(base as f64 * style.uppercase_scale);
    let space_width = i64::from(style.space_width);
    let space_metric = metrics.lookup(' ');

    // (key, index, x, size) per visible glyph; None for spaces.
    let mut slots = Vec::<Option<(GlyphKey, usize, i64, i64)>>::with_capacity(
        classified.entries.len(),
    );
    let last = classified.entries.len() - 1;
    let mut x = 0i64;
    let mut seen_glyph = false;

    for (pos, entry) in classified.entries.iter().enumerate() {
        match *entry {
            Entry::Space => {
                x += i64::from(space_metric.left_spacing);
                slots.push(None);
                x += space_width;
                x += i64::from(space_metric.right_spacing);
            }
            Entry::Glyph { key, index } => {
                let m = metrics.lookup(key.ch);
                let upper = key.case == CaseVariant::Upper;

                x += i64::from(m.left_spacing);
                if upper && seen_glyph {
                    x += lead_in;
                }
                let size = if upper { upper_size } else { base };
                slots.push(Some((key, index, x, size)));
                x += size;
                x += i64::from(m.right_spacing);
                if pos != last {
                    x += spacing;
                }
                seen_glyph = true;
            }
        }
    }

    let mut total_width = x;
    let mut eff_base = base;
    let mut eff_spacing = spacing;
    let mut eff_space = space_width;
    let mut scale = 1.0f64;

    let limit = style.max_width_fraction * f64::from(style.video_width);
    if total_width as f64 > limit {
        scale = limit / total_width as f64;
        eff_base = trunc(base as f64 * scale);
        eff_spacing = trunc(spacing as f64 * scale);
        eff_space = trunc(space_width as f64 * scale);
        total_width = trunc(total_width as f64 * scale);
        for (_, _, x, size) in slots.iter_mut().flatten() {
            *x = trunc(*x as f64 * scale);
            *size = trunc(*size as f64 * scale);
        }
        tracing::info!(scale, total_width, "text wider than canvas, rescaled");
        if eff_base < 1 {
            return Err(GlyphError::validation(format!(
                "text of {} characters is too long: glyphs would shrink below 1px",
                classified.text.chars().count()
            )));
        }
    }

    let x_offset = (i64::from(style.video_width) - total_width).div_euclid(2);
    let y_base = (i64::from(style.video_height) - eff_base).div_euclid(2);
    // Vertical offsets follow the glyph size, not the canvas.
    let vertical_scale = eff_base as f64 / f64::from(style.reference_char_size);

    let placed = slots
        .into_iter()
        .map(|slot| match slot {
            None => PlacedGlyph::Space,
            Some((key, index, x, size)) => {
                let dy = trunc(f64::from(metrics.lookup(key.ch).vertical_offset) * vertical_scale);
                PlacedGlyph::Glyph(GlyphPlacement {
                    key,
                    index,
                    x,
                    y: y_base + dy,
                    size,
                })
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        entries = placed.len(),
        total_width,
        x_offset,
        y_base,
        "layout computed"
    );

    Ok(LayoutResult {
        text: classified.text,
        placed,
        skipped: classified.skipped,
        total_width,
        x_offset,
        y_base,
        effective_char_size: eff_base,
        effective_spacing: eff_spacing,
        effective_space_width: eff_space,
        applied_scale: scale,
        style: *style,
    })
}

/// Normalize and classify `text`. `Ok(None)` when nothing remains to lay out.
fn classify(
    text: &str,
    case_mode: CaseMode,
    policy: UnsupportedPolicy,
) -> GlyphResult<Option<Classified>> {
    let normalized = case_mode.apply(text);
    let mut kept = String::with_capacity(normalized.len());
    let mut entries = Vec::with_capacity(normalized.len());
    let mut skipped = Vec::new();

    for (index, ch) in normalized.chars().enumerate() {
        if let Some(key) = GlyphKey::for_char(ch) {
            entries.push(Entry::Glyph { key, index });
        } else if ch.is_whitespace() {
            entries.push(Entry::Space);
        } else {
            match policy {
                UnsupportedPolicy::Reject => {
                    return Err(GlyphError::UnsupportedCharacter { ch, index });
                }
                UnsupportedPolicy::Skip => {
                    tracing::warn!(?ch, index, "skipping unsupported character");
                    skipped.push((index, ch));
                    continue;
                }
            }
        }
        kept.push(ch);
    }

    if entries.is_empty() {
        return Ok(None);
    }
    Ok(Some(Classified {
        text: kept,
        entries,
        skipped,
    }))
}

// Truncates toward zero, matching how the glyph library was tuned.
fn trunc(v: f64) -> i64 {
    v as i64
}

#[cfg(test)]
#[path = "../../tests/unit/layout/engine.rs"]
mod tests;
