use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::Path,
};

use anyhow::Context as _;

use crate::{
    foundation::error::{GlyphError, GlyphResult},
    metrics::table::{GlyphMetric, GlyphMetrics},
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// User-edited vertical offset overrides, persisted as a JSON object `{ "g": 12, ... }`.
pub struct OffsetOverrides {
    offsets: BTreeMap<char, i32>,
}

impl OffsetOverrides {
    /// Empty override set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse overrides from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> GlyphResult<Self> {
        let raw: BTreeMap<String, i32> = serde_json::from_reader(r)
            .map_err(|e| GlyphError::serde(format!("parse offset overrides JSON: {e}")))?;
        let mut offsets = BTreeMap::new();
        for (key, px) in raw {
            let mut chars = key.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else {
                return Err(GlyphError::validation(format!(
                    "offset override key '{key}' must be a single character"
                )));
            };
            offsets.insert(ch, px);
        }
        Ok(Self { offsets })
    }

    /// Load overrides from `path`. A missing file yields an empty set.
    pub fn load(path: impl AsRef<Path>) -> GlyphResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no offset override file, starting empty");
            return Ok(Self::default());
        }
        let f = File::open(path)
            .with_context(|| format!("open offset overrides '{}'", path.display()))?;
        let out = Self::from_reader(BufReader::new(f))?;
        tracing::debug!(path = %path.display(), count = out.len(), "loaded offset overrides");
        Ok(out)
    }

    /// Persist overrides to `path`, replacing any previous file in one rename.
    pub fn save(&self, path: impl AsRef<Path>) -> GlyphResult<()> {
        let path = path.as_ref();
        crate::encode::ffmpeg::ensure_parent_dir(path)?;
        let raw: BTreeMap<String, i32> = self
            .offsets
            .iter()
            .map(|(ch, px)| (ch.to_string(), *px))
            .collect();
        let json = serde_json::to_string_pretty(&raw)
            .map_err(|e| GlyphError::serde(format!("encode offset overrides JSON: {e}")))?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("write offset overrides '{}'", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("replace offset overrides '{}'", path.display()))?;
        Ok(())
    }

    /// Override value for `ch`, if any.
    pub fn get(&self, ch: char) -> Option<i32> {
        self.offsets.get(&ch).copied()
    }

    /// Set the vertical offset of `ch` to `px`.
    pub fn set(&mut self, ch: char, px: i32) {
        self.offsets.insert(ch, px);
    }

    /// Drop the override for `ch`. Returns the previous value.
    pub fn clear(&mut self, ch: char) -> Option<i32> {
        self.offsets.remove(&ch)
    }

    /// Iterate overrides in character order.
    pub fn iter(&self) -> impl Iterator<Item = (char, i32)> + '_ {
        self.offsets.iter().map(|(ch, px)| (*ch, *px))
    }

    /// Number of overridden characters.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// `true` when nothing is overridden.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// A metrics provider whose vertical offsets are replaced by user overrides.
#[derive(Clone, Copy, Debug)]
pub struct WithOverrides<'a, M: ?Sized> {
    base: &'a M,
    overrides: &'a OffsetOverrides,
}

impl<'a, M: GlyphMetrics + ?Sized> WithOverrides<'a, M> {
    /// Layer `overrides` over `base`.
    pub fn new(base: &'a M, overrides: &'a OffsetOverrides) -> Self {
        Self { base, overrides }
    }
}

impl<M: GlyphMetrics + ?Sized> GlyphMetrics for WithOverrides<'_, M> {
    fn lookup(&self, ch: char) -> GlyphMetric {
        let mut m = self.base.lookup(ch);
        if let Some(px) = self.overrides.get(ch) {
            m.vertical_offset = px;
        }
        m
    }
}

#[cfg(test)]
#[path = "../../tests/unit/metrics/overrides.rs"]
mod tests;
