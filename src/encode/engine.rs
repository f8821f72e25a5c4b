use crate::{encode::program::FfmpegProgram, foundation::error::GlyphResult};

/// Executes a composite program and produces the output file.
///
/// Implementations must either leave a complete file at `program.output` or leave no
/// file there at all.
pub trait RenderEngine {
    /// Run `program` to completion.
    fn render(&mut self, program: &FfmpegProgram) -> GlyphResult<()>;
}

/// Engine that only records the programs it is given, for dry runs and tests.
#[derive(Debug, Default)]
pub struct DryRunEngine {
    pub(crate) programs: Vec<FfmpegProgram>,
}

impl DryRunEngine {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Programs recorded so far, in call order.
    pub fn programs(&self) -> &[FfmpegProgram] {
        &self.programs
    }
}

impl RenderEngine for DryRunEngine {
    fn render(&mut self, program: &FfmpegProgram) -> GlyphResult<()> {
        tracing::info!(command = %program.command_line(), "dry run");
        self.programs.push(program.clone());
        Ok(())
    }
}
