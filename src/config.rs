use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    encode::ffmpeg::EncodeSettings,
    foundation::core::Canvas,
    foundation::error::{GlyphError, GlyphResult},
    layout::engine::{DEFAULT_PREVIEW_TEXT, DEFAULT_VIDEO_TEXT, LayoutOpts, StyleParams},
};

/// Runtime configuration: asset locations, default style and encoder settings.
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the glyph clip library.
    pub clips_dir: PathBuf,
    /// Directory of preview stills.
    pub stills_dir: PathBuf,
    /// Directory preview images are written to.
    pub preview_dir: PathBuf,
    /// Directory rendered videos are written to.
    pub output_dir: PathBuf,
    /// JSON file holding vertical offset overrides.
    pub offsets_path: PathBuf,
    /// Default layout style.
    pub style: StyleParams,
    /// ffmpeg output settings.
    pub encode: EncodeSettings,
    /// Text rendered when the video input is empty.
    pub fallback_text: String,
    /// Text rendered when the preview input is empty.
    pub preview_fallback_text: String,
    /// Preview image size.
    pub preview_canvas: Canvas,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clips_dir: PathBuf::from("videos"),
            stills_dir: PathBuf::from("preview_images"),
            preview_dir: PathBuf::from("temp"),
            output_dir: PathBuf::from("."),
            offsets_path: PathBuf::from("offsets.json"),
            style: StyleParams::default(),
            encode: EncodeSettings::default(),
            fallback_text: DEFAULT_VIDEO_TEXT.to_string(),
            preview_fallback_text: DEFAULT_PREVIEW_TEXT.to_string(),
            preview_canvas: Canvas::default(),
        }
    }
}

impl Config {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> GlyphResult<Self> {
        serde_json::from_reader(r).map_err(|e| GlyphError::serde(format!("parse config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> GlyphResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            GlyphError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        let cfg = Self::from_reader(BufReader::new(f))?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(cfg)
    }

    /// Check style, encoder and preview settings.
    pub fn validate(&self) -> GlyphResult<()> {
        self.style.validate()?;
        self.encode.validate()?;
        if self.preview_canvas.width == 0 || self.preview_canvas.height == 0 {
            return Err(GlyphError::validation(
                "preview_canvas width/height must be non-zero",
            ));
        }
        Ok(())
    }

    /// Layout options for full video renders.
    pub fn video_opts(&self) -> LayoutOpts {
        LayoutOpts {
            fallback_text: self.fallback_text.clone(),
            ..LayoutOpts::default()
        }
    }

    /// Layout options for previews.
    pub fn preview_opts(&self) -> LayoutOpts {
        LayoutOpts {
            fallback_text: self.preview_fallback_text.clone(),
            ..LayoutOpts::preview()
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
