use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use serde::{Deserialize, Serialize};

use crate::{
    assets::store::ClipLibrary,
    encode::{engine::RenderEngine, program::FfmpegProgram},
    foundation::error::{GlyphError, GlyphResult},
};

/// Codec and quality settings for MP4 output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeSettings {
    /// ffmpeg binary name or path.
    pub ffmpeg_bin: String,
    /// Video codec passed to `-c:v`.
    pub codec: String,
    /// Encoder preset.
    pub preset: String,
    /// Constant rate factor (0..=51).
    pub crf: u8,
    /// Output pixel format.
    pub pix_fmt: String,
    /// Overwrite an existing output file.
    pub overwrite: bool,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            ffmpeg_bin: "ffmpeg".to_string(),
            codec: "libx264".to_string(),
            preset: "medium".to_string(),
            crf: 18,
            pix_fmt: "yuv420p".to_string(),
            overwrite: true,
        }
    }
}

impl EncodeSettings {
    /// Check for empty fields and out-of-range quality values.
    pub fn validate(&self) -> GlyphResult<()> {
        for (name, value) in [
            ("ffmpeg_bin", &self.ffmpeg_bin),
            ("codec", &self.codec),
            ("preset", &self.preset),
            ("pix_fmt", &self.pix_fmt),
        ] {
            if value.trim().is_empty() {
                return Err(GlyphError::validation(format!(
                    "encode.{name} must not be empty"
                )));
            }
        }
        if self.crf > 51 {
            return Err(GlyphError::validation(format!(
                "encode.crf must be in 0..=51, got {}",
                self.crf
            )));
        }
        Ok(())
    }
}

/// Renders composite programs by running the system `ffmpeg`.
///
/// Output goes to a hidden sibling file first and is renamed into place on success,
/// so a failed run never leaves a partial file at the requested path.
#[derive(Clone, Debug, Default)]
pub struct FfmpegEngine;

impl FfmpegEngine {
    /// Create an engine.
    pub fn new() -> Self {
        Self
    }
}

impl RenderEngine for FfmpegEngine {
    #[tracing::instrument(skip_all, fields(output = %program.output.display()))]
    fn render(&mut self, program: &FfmpegProgram) -> GlyphResult<()> {
        let bin = &program.settings.ffmpeg_bin;
        if !is_ffmpeg_on_path(bin) {
            return Err(GlyphError::external_render(format!(
                "'{bin}' is required for video rendering, but was not found on PATH"
            )));
        }

        ensure_parent_dir(&program.output)?;
        if !program.settings.overwrite && program.output.exists() {
            return Err(GlyphError::validation(format!(
                "output file '{}' already exists",
                program.output.display()
            )));
        }

        let partial = partial_path(&program.output);
        let _ = std::fs::remove_file(&partial);
        let mut staged = program.with_output(&partial);
        staged.settings.overwrite = true;

        tracing::info!(inputs = program.inputs.len(), "running ffmpeg");
        tracing::debug!(command = %staged.command_line());
        let out = Command::new(bin)
            .args(staged.args())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| GlyphError::external_render(format!("failed to spawn '{bin}': {e}")))?;

        if !out.status.success() {
            let _ = std::fs::remove_file(&partial);
            let stderr = String::from_utf8_lossy(&out.stderr).into_owned();
            tracing::error!(status = %out.status, "ffmpeg failed");
            return Err(GlyphError::ExternalRender(stderr));
        }

        std::fs::rename(&partial, &program.output).map_err(|e| {
            let _ = std::fs::remove_file(&partial);
            GlyphError::Other(anyhow::anyhow!(
                "failed to move '{}' to '{}': {e}",
                partial.display(),
                program.output.display()
            ))
        })?;
        tracing::info!("video written");
        Ok(())
    }
}

/// `dir/.name.partial.ext` next to `path`, keeping the extension so ffmpeg picks the muxer.
pub(crate) fn partial_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!(".{stem}.partial.{}", ext.to_string_lossy()),
        None => format!(".{stem}.partial"),
    };
    path.with_file_name(name)
}

/// Arguments extracting the first frame of `clip` as a `size`×`size` PNG at `out`.
pub fn still_extract_args(clip: &Path, out: &Path, size: u32) -> Vec<OsString> {
    let mut args = Vec::<OsString>::with_capacity(12);
    args.extend(["-y", "-loglevel", "error", "-i"].map(OsString::from));
    args.push(clip.as_os_str().to_owned());
    args.extend(
        [
            "-frames:v".to_string(),
            "1".to_string(),
            "-vf".to_string(),
            format!("scale={size}:{size}"),
            "-q:v".to_string(),
            "2".to_string(),
        ]
        .map(OsString::from),
    );
    args.push(out.as_os_str().to_owned());
    args
}

/// Extract one still per clip in `clips` into `stills_dir` as `<case>_<char>.png`.
///
/// Returns the number of stills written. The first failing clip aborts the run.
#[tracing::instrument(skip(settings, clips), fields(root = %clips.root().display()))]
pub fn extract_stills(
    settings: &EncodeSettings,
    clips: &ClipLibrary,
    stills_dir: &Path,
    size: u32,
) -> GlyphResult<usize> {
    if size == 0 {
        return Err(GlyphError::validation("still size must be non-zero"));
    }
    if !is_ffmpeg_on_path(&settings.ffmpeg_bin) {
        return Err(GlyphError::external_render(format!(
            "'{}' is required for still extraction, but was not found on PATH",
            settings.ffmpeg_bin
        )));
    }
    std::fs::create_dir_all(stills_dir).map_err(|e| {
        GlyphError::Other(anyhow::anyhow!(
            "failed to create still directory '{}': {e}",
            stills_dir.display()
        ))
    })?;

    let mut written = 0usize;
    for (key, clip) in clips.list() {
        let out_path = stills_dir.join(format!("{}.png", key.still_stem()));
        let out = Command::new(&settings.ffmpeg_bin)
            .args(still_extract_args(&clip, &out_path, size))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                GlyphError::external_render(format!(
                    "failed to spawn '{}': {e}",
                    settings.ffmpeg_bin
                ))
            })?;
        if !out.status.success() {
            return Err(GlyphError::ExternalRender(
                String::from_utf8_lossy(&out.stderr).into_owned(),
            ));
        }
        tracing::debug!(%key, path = %out_path.display(), "still extracted");
        written += 1;
    }
    tracing::info!(count = written, "stills extracted");
    Ok(written)
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> GlyphResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `bin` can be invoked.
pub fn is_ffmpeg_on_path(bin: &str) -> bool {
    Command::new(bin)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
