use crate::foundation::core::CaseVariant;

/// Convenience result type used across glyphreel.
pub type GlyphResult<T> = Result<T, GlyphError>;

/// Top-level error taxonomy used by layout, graph building, preview and rendering APIs.
#[derive(thiserror::Error, Debug)]
pub enum GlyphError {
    /// Neither the input nor the fallback text contained anything to lay out.
    #[error("empty input: nothing to lay out")]
    EmptyInput,

    /// A character with no glyph in the library.
    #[error("unsupported character {ch:?} at index {index}")]
    UnsupportedCharacter {
        /// Offending character (after case normalization).
        ch: char,
        /// Character index in the normalized text.
        index: usize,
    },

    /// The asset store has no clip for a glyph that the layout placed.
    #[error("no asset found for character {ch:?} ({case})")]
    AssetNotFound {
        /// Character whose asset is missing.
        ch: char,
        /// Case variant that was looked up.
        case: CaseVariant,
    },

    /// The external renderer ran and failed; carries its diagnostic output verbatim.
    #[error("external render failed: {0}")]
    ExternalRender(String),

    /// Invalid user-provided parameters or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GlyphError {
    /// Build a [`GlyphError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GlyphError::ExternalRender`] value.
    pub fn external_render(msg: impl Into<String>) -> Self {
        Self::ExternalRender(msg.into())
    }

    /// Build a [`GlyphError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
