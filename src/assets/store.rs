use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    assets::decode::decode_still,
    foundation::core::GlyphKey,
    foundation::error::{GlyphError, GlyphResult},
};

/// Keyed access to the per-glyph video clips.
pub trait GlyphAssetStore {
    /// Where the clip for `key` lives (whether or not it exists).
    fn path_for(&self, key: GlyphKey) -> PathBuf;

    /// `true` when a clip exists for `key`.
    fn exists(&self, key: GlyphKey) -> bool;

    /// Path of the clip for `key`, or [`GlyphError::AssetNotFound`].
    fn resolve(&self, key: GlyphKey) -> GlyphResult<PathBuf> {
        if self.exists(key) {
            Ok(self.path_for(key))
        } else {
            Err(GlyphError::AssetNotFound {
                ch: key.ch,
                case: key.case,
            })
        }
    }
}

#[derive(Clone, Debug)]
/// Clip library on disk: `<root>/UPPER_CASE/A.mp4`, `<root>/LOWER_CASE/a.mp4`.
pub struct ClipLibrary {
    root: PathBuf,
    extension: String,
}

impl ClipLibrary {
    /// Library rooted at `root` holding `.mp4` clips.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "mp4".to_string(),
        }
    }

    /// Use a different clip file extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Library root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every clip present on disk, in a stable order.
    pub fn list(&self) -> Vec<(GlyphKey, PathBuf)> {
        let mut out = Vec::new();
        for ch in ('A'..='Z').chain('a'..='z').chain('0'..='9') {
            let Some(key) = GlyphKey::for_char(ch) else {
                continue;
            };
            if self.exists(key) {
                out.push((key, self.path_for(key)));
            }
        }
        out
    }
}

impl GlyphAssetStore for ClipLibrary {
    fn path_for(&self, key: GlyphKey) -> PathBuf {
        self.root
            .join(key.case.dir_name())
            .join(format!("{}.{}", key.clip_stem(), self.extension))
    }

    fn exists(&self, key: GlyphKey) -> bool {
        let path = self.path_for(key);
        let found = path.is_file();
        tracing::trace!(path = %path.display(), found, "clip lookup");
        found
    }
}

/// Keyed access to the still image of each glyph, used by previews.
pub trait StillImageSource {
    /// Still for `key`, if the library has one.
    fn still(&self, key: GlyphKey) -> Option<&image::RgbaImage>;
}

#[derive(Clone, Debug, Default)]
/// In-memory still library, loaded once from `<dir>/<case>_<char>.png` files.
pub struct StillLibrary {
    images: HashMap<GlyphKey, image::RgbaImage>,
}

impl StillLibrary {
    /// Empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.png` whose stem names a glyph. Unreadable files are logged and skipped.
    pub fn load_dir(dir: impl AsRef<Path>) -> GlyphResult<Self> {
        let dir = dir.as_ref();
        let mut out = Self::default();
        if !dir.is_dir() {
            tracing::warn!(dir = %dir.display(), "still image directory not found");
            return Ok(out);
        }

        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("read still image directory '{}'", dir.display()))?;
        for entry in entries {
            let path = entry
                .with_context(|| format!("read entry in '{}'", dir.display()))?
                .path();
            if path.extension().and_then(|e| e.to_str()) != Some("png") {
                continue;
            }
            let Some(key) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(GlyphKey::from_still_stem)
            else {
                continue;
            };
            match std::fs::read(&path)
                .map_err(|e| GlyphError::Other(e.into()))
                .and_then(|bytes| decode_still(&bytes))
            {
                Ok(img) => {
                    tracing::debug!(%key, "loaded still");
                    out.images.insert(key, img);
                }
                Err(e) => tracing::error!(path = %path.display(), "failed to load still: {e}"),
            }
        }
        tracing::info!(count = out.images.len(), "still images loaded");
        Ok(out)
    }

    /// Add or replace the still for `key`.
    pub fn insert(&mut self, key: GlyphKey, img: image::RgbaImage) {
        self.images.insert(key, img);
    }

    /// Number of loaded stills.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// `true` when no still is loaded.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl StillImageSource for StillLibrary {
    fn still(&self, key: GlyphKey) -> Option<&image::RgbaImage> {
        self.images.get(&key)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
