//! Glyph clip and still-image libraries.

/// Image decoding for still assets.
pub mod decode;
/// Keyed clip/still stores.
pub mod store;
