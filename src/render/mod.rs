//! In-memory raster preview.

/// Screen blend and mask kernels.
pub mod blend;
/// Still-image preview compositor and writer.
pub mod preview;
