//! Per-glyph metrics: the built-in table and user offset overrides.

/// Persisted vertical offset overrides layered over a metrics table.
pub mod overrides;
/// The [`table::GlyphMetrics`] lookup trait and the literal table.
pub mod table;
