//! Text-to-glyph layout.
//!
//! The engine is a pure function of text, [`engine::StyleParams`] and a metrics provider.
//! Its [`engine::LayoutResult`] feeds either the composite graph builder (full video) or
//! the raster preview compositor.

/// Single-line glyph layout with overflow rescaling.
pub mod engine;
