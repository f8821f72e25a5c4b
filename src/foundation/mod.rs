//! Shared core types and errors.

/// Canvas, case and glyph key types.
pub mod core;
/// Error taxonomy.
pub mod error;
