use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::{
    compile::graph::{CompositeGraph, CompositeOp, NodeLabel},
    encode::ffmpeg::EncodeSettings,
    foundation::error::{GlyphError, GlyphResult},
};

/// Render `graph` as an ffmpeg `-filter_complex` string.
pub fn filter_complex(graph: &CompositeGraph) -> GlyphResult<String> {
    graph.validate()?;

    let mut parts = Vec::with_capacity(graph.instructions.len());
    for ins in &graph.instructions {
        let out = ins.output;
        let part = match &ins.op {
            CompositeOp::Background {
                canvas,
                duration_secs,
                fps,
            } => format!(
                "color=black:s={}x{}:d={duration_secs}:r={fps}[{out}]",
                canvas.width, canvas.height
            ),
            CompositeOp::Scale { input, size } => {
                format!("[{}:v]scale={size}:{size},setsar=1,format=gbrp[{out}]", input.0)
            }
            CompositeOp::TransparentPad {
                canvas,
                duration_secs,
            } => format!(
                "color=black@0:s={}x{}:d={duration_secs}[{out}]",
                canvas.width, canvas.height
            ),
            CompositeOp::Overlay { base, top, x, y } => {
                format!("[{base}][{top}]overlay=x={x}:y={y}:format=auto[{out}]")
            }
            CompositeOp::ScreenBlend { bottom, top } => {
                format!("[{bottom}][{top}]blend=all_mode='screen':shortest=1[{out}]")
            }
        };
        parts.push(part);
    }
    Ok(parts.join(";"))
}

#[derive(Clone, Debug, PartialEq)]
/// A complete ffmpeg invocation for one composite graph.
pub struct FfmpegProgram {
    /// Clip paths, in input-index order.
    pub inputs: Vec<PathBuf>,
    /// Serialized filter graph.
    pub filter_complex: String,
    /// Label mapped to the output stream.
    pub map: NodeLabel,
    /// Output frame rate.
    pub fps: u32,
    /// Output duration in seconds.
    pub duration_secs: f64,
    /// Codec and quality settings.
    pub settings: EncodeSettings,
    /// Output file.
    pub output: PathBuf,
}

impl FfmpegProgram {
    /// Translate `graph` into an invocation writing `output`.
    pub fn from_graph(
        graph: &CompositeGraph,
        settings: &EncodeSettings,
        output: impl Into<PathBuf>,
    ) -> GlyphResult<Self> {
        settings.validate()?;
        if settings.pix_fmt == "yuv420p"
            && (!graph.canvas.width.is_multiple_of(2) || !graph.canvas.height.is_multiple_of(2))
        {
            return Err(GlyphError::validation(
                "video width/height must be even (required for yuv420p mp4 output)",
            ));
        }

        Ok(Self {
            inputs: graph.inputs.iter().map(|i| i.path.clone()).collect(),
            filter_complex: filter_complex(graph)?,
            map: graph.final_output,
            fps: graph.fps,
            duration_secs: graph.duration_secs,
            settings: settings.clone(),
            output: output.into(),
        })
    }

    /// Same program writing to a different file.
    pub fn with_output(&self, output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            ..self.clone()
        }
    }

    /// Arguments passed to the ffmpeg binary (the binary itself excluded).
    pub fn args(&self) -> Vec<OsString> {
        let mut args = Vec::<OsString>::with_capacity(24 + 2 * self.inputs.len());
        args.push(if self.settings.overwrite { "-y" } else { "-n" }.into());
        args.extend(["-loglevel", "error"].map(OsString::from));
        for input in &self.inputs {
            args.push("-i".into());
            args.push(input.clone().into_os_string());
        }
        args.push("-filter_complex".into());
        args.push(self.filter_complex.clone().into());
        args.push("-map".into());
        args.push(format!("[{}]", self.map).into());
        args.extend(
            [
                "-c:v".to_string(),
                self.settings.codec.clone(),
                "-preset".to_string(),
                self.settings.preset.clone(),
                "-crf".to_string(),
                self.settings.crf.to_string(),
                "-r".to_string(),
                self.fps.to_string(),
                "-t".to_string(),
                self.duration_secs.to_string(),
                "-pix_fmt".to_string(),
                self.settings.pix_fmt.clone(),
                "-movflags".to_string(),
                "+faststart".to_string(),
            ]
            .map(OsString::from),
        );
        args.push(self.output.clone().into_os_string());
        args
    }

    /// Shell-style rendering of the full command, for logs and dry runs.
    pub fn command_line(&self) -> String {
        let mut out = shell_quote(Path::new(&self.settings.ffmpeg_bin).as_os_str());
        for arg in self.args() {
            out.push(' ');
            out.push_str(&shell_quote(&arg));
        }
        out
    }
}

fn shell_quote(arg: &std::ffi::OsStr) -> String {
    let s = arg.to_string_lossy();
    let plain = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:+=@,".contains(c));
    if plain {
        return s.into_owned();
    }
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for c in s.chars() {
        if c == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    quoted
}

#[cfg(test)]
#[path = "../../tests/unit/encode/program.rs"]
mod tests;
