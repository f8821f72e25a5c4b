use std::fmt;

use crate::foundation::error::{GlyphError, GlyphResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Pixel dimensions of an output surface.
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Build a canvas, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> GlyphResult<Self> {
        if width == 0 || height == 0 {
            return Err(GlyphError::validation("canvas width/height must be non-zero"));
        }
        Ok(Self { width, height })
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Case normalization applied to input text before layout.
pub enum CaseMode {
    /// Map every letter to upper case.
    Upper,
    /// Map every letter to lower case.
    Lower,
    /// Keep the text as typed.
    #[default]
    Mixed,
}

impl CaseMode {
    /// Apply the mode to `text`. Only ASCII letters change, so char positions are preserved.
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Upper => text.to_ascii_uppercase(),
            Self::Lower => text.to_ascii_lowercase(),
            Self::Mixed => text.to_string(),
        }
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
/// Which half of the glyph library a character is drawn from.
pub enum CaseVariant {
    /// Upper-case letters.
    Upper,
    /// Lower-case letters and digits.
    Lower,
}

impl CaseVariant {
    /// Short lowercase name, used in still-image file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upper => "upper",
            Self::Lower => "lower",
        }
    }

    /// Directory name holding the clips of this variant.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Upper => "UPPER_CASE",
            Self::Lower => "LOWER_CASE",
        }
    }
}

impl fmt::Display for CaseVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
/// Address of one glyph in the clip or still library.
pub struct GlyphKey {
    /// The character as drawn (upper-case for [`CaseVariant::Upper`]).
    pub ch: char,
    /// Library half the glyph lives in.
    pub case: CaseVariant,
}

impl GlyphKey {
    /// Key for a placeable character, or `None` when the library has no glyph for it.
    pub fn for_char(ch: char) -> Option<Self> {
        if !ch.is_ascii_alphanumeric() {
            return None;
        }
        let case = if ch.is_ascii_uppercase() {
            CaseVariant::Upper
        } else {
            CaseVariant::Lower
        };
        Some(Self { ch, case })
    }

    /// File stem used by the clip library (`A` in `UPPER_CASE`, `a` in `LOWER_CASE`).
    pub fn clip_stem(self) -> String {
        match self.case {
            CaseVariant::Upper => self.ch.to_ascii_uppercase().to_string(),
            CaseVariant::Lower => self.ch.to_ascii_lowercase().to_string(),
        }
    }

    /// File stem used by the still library (`upper_a`, `lower_a`, `lower_7`).
    pub fn still_stem(self) -> String {
        format!("{}_{}", self.case.as_str(), self.ch.to_ascii_lowercase())
    }

    /// Parse a still file stem back into a key.
    pub fn from_still_stem(stem: &str) -> Option<Self> {
        let (case, rest) = stem.split_once('_')?;
        let mut chars = rest.chars();
        let ch = chars.next()?;
        if chars.next().is_some() || !ch.is_ascii_alphanumeric() {
            return None;
        }
        match case {
            "upper" => Some(Self {
                ch: ch.to_ascii_uppercase(),
                case: CaseVariant::Upper,
            }),
            "lower" => Some(Self {
                ch: ch.to_ascii_lowercase(),
                case: CaseVariant::Lower,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for GlyphKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self.ch, self.case)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
