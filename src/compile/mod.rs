//! Composite graph construction.

/// Renderer-agnostic composite chain.
pub mod graph;
