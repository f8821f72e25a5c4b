//! External rendering: program serialization and the ffmpeg-backed engine.

/// Render engine contract and the recording engine.
pub mod engine;
/// `ffmpeg` process handling.
pub mod ffmpeg;
/// Composite graph to ffmpeg command translation.
pub mod program;
