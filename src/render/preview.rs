use std::path::{Path, PathBuf};

use anyhow::Context;
use image::{Rgb, RgbImage, Rgba, RgbaImage, imageops::FilterType};

use crate::{
    assets::store::StillImageSource,
    foundation::core::Canvas,
    foundation::error::{GlyphError, GlyphResult},
    layout::engine::{GlyphPlacement, LayoutResult},
    render::blend::{mask_onto_transparent, screen_in_place},
};

/// Where a glyph lands on the preview canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreviewPlacement {
    /// Canvas x of the left edge.
    pub x: i64,
    /// Canvas y of the top edge.
    pub y: i64,
    /// Edge length of the square glyph.
    pub size: i64,
}

/// Maps video-space layout geometry onto a preview canvas of a different size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreviewScale {
    /// Uniform scale factor, `min(canvas.w / video.w, canvas.h / video.h)`.
    pub factor: f64,
    x_offset: i64,
    y_base: i64,
    video_y_base: i64,
}

impl PreviewScale {
    /// Fit `layout` into `canvas`, keeping the run centered.
    pub fn fit(layout: &LayoutResult, canvas: Canvas) -> Self {
        let video = layout.canvas();
        let factor = f64::min(
            f64::from(canvas.width) / f64::from(video.width),
            f64::from(canvas.height) / f64::from(video.height),
        );
        let scaled_total = (layout.total_width as f64 * factor) as i64;
        let x_offset = (i64::from(canvas.width) - scaled_total).div_euclid(2);
        let y_base = ((f64::from(canvas.height) - layout.effective_char_size as f64 * factor)
            / 2.0)
            .floor() as i64;
        Self {
            factor,
            x_offset,
            y_base,
            video_y_base: layout.y_base,
        }
    }

    /// Scaled position and size of `g`.
    pub fn place(&self, g: &GlyphPlacement) -> PreviewPlacement {
        let s = |v: i64| (v as f64 * self.factor) as i64;
        PreviewPlacement {
            x: self.x_offset + s(g.x),
            y: self.y_base + s(g.y - self.video_y_base),
            size: s(g.size),
        }
    }
}

/// Composite `layout` on still images into an opaque RGB image of size `canvas`.
///
/// Glyphs without a still are skipped with a warning.
#[tracing::instrument(skip_all, fields(text = %layout.text, w = canvas.width, h = canvas.height))]
pub fn render_preview<S: StillImageSource + ?Sized>(
    layout: &LayoutResult,
    stills: &S,
    canvas: Canvas,
) -> GlyphResult<RgbImage> {
    if canvas.width == 0 || canvas.height == 0 {
        return Err(GlyphError::validation(
            "preview canvas width/height must be non-zero",
        ));
    }

    let scale = PreviewScale::fit(layout, canvas);
    tracing::debug!(factor = scale.factor, "preview scale");

    let mut acc = RgbaImage::from_pixel(canvas.width, canvas.height, Rgba([0, 0, 0, 255]));
    let mut drawn = 0usize;
    for g in layout.glyphs() {
        let Some(still) = stills.still(g.key) else {
            tracing::warn!(key = %g.key, index = g.index, "no preview still; skipping glyph");
            continue;
        };
        let p = scale.place(g);
        let Ok(size) = u32::try_from(p.size) else {
            continue;
        };
        if size == 0 {
            continue;
        }

        let resized = image::imageops::resize(still, size, size, FilterType::Lanczos3);
        screen_paste(&mut acc, &resized, p.x, p.y)?;
        drawn += 1;
    }
    tracing::debug!(drawn, "preview composited");

    Ok(RgbImage::from_fn(canvas.width, canvas.height, |x, y| {
        let p = acc.get_pixel(x, y).0;
        Rgb([p[0], p[1], p[2]])
    }))
}

// Outside the pasted square the layer is transparent black, which screen-blends to the
// identity, so only the covered rows are touched.
fn screen_paste(acc: &mut RgbaImage, glyph: &RgbaImage, x: i64, y: i64) -> GlyphResult<()> {
    let (w, h) = (i64::from(acc.width()), i64::from(acc.height()));
    let (gw, gh) = (i64::from(glyph.width()), i64::from(glyph.height()));
    let x0 = x.max(0);
    let x1 = (x + gw).min(w);
    if x0 >= x1 {
        return Ok(());
    }

    let raw: &mut [u8] = &mut **acc;
    let mut layer = Vec::<u8>::with_capacity(((x1 - x0) * 4) as usize);
    for gy in 0..gh {
        let cy = y + gy;
        if cy < 0 || cy >= h {
            continue;
        }
        layer.clear();
        for cx in x0..x1 {
            let px = glyph.get_pixel((cx - x) as u32, gy as u32);
            layer.extend_from_slice(&mask_onto_transparent(px.0));
        }
        let start = ((cy * w + x0) * 4) as usize;
        let end = ((cy * w + x1) * 4) as usize;
        screen_in_place(&mut raw[start..end], &layer)?;
    }
    Ok(())
}

/// Writes preview images into a directory, keeping only the newest one.
#[derive(Clone, Debug)]
pub struct PreviewWriter {
    dir: PathBuf,
}

impl PreviewWriter {
    /// Writer targeting `dir` (created on first write).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save `img` as `preview_<uuid>.png` and delete every other preview in the directory.
    pub fn write(&self, img: &RgbImage) -> GlyphResult<PathBuf> {
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("failed to create preview directory '{}'", self.dir.display())
        })?;

        let name = format!("preview_{}.png", uuid::Uuid::new_v4().simple());
        let path = self.dir.join(&name);
        let partial = self.dir.join(format!(".{name}.partial"));

        if let Err(e) = img.save_with_format(&partial, image::ImageFormat::Png) {
            let _ = std::fs::remove_file(&partial);
            return Err(GlyphError::Other(anyhow::anyhow!(
                "failed to write preview '{}': {e}",
                partial.display()
            )));
        }
        std::fs::rename(&partial, &path)
            .with_context(|| format!("failed to move preview into '{}'", path.display()))?;
        tracing::info!(path = %path.display(), "preview written");

        self.cleanup(&name);
        Ok(path)
    }

    fn cleanup(&self, keep: &str) {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return;
        };
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let Some(n) = file_name.to_str() else {
                continue;
            };
            if n == keep || !n.starts_with("preview_") || !n.ends_with(".png") {
                continue;
            }
            match std::fs::remove_file(entry.path()) {
                Ok(()) => tracing::debug!(file = n, "deleted old preview"),
                Err(e) => tracing::error!(file = n, "failed to delete old preview: {e}"),
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/preview.rs"]
mod tests;
