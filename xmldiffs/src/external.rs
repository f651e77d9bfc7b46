use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::debug;

/// Renderer used when none is configured, resolved against the working directory.
pub const DEFAULT_DIFF_TOOL: &str = "./diff_to_html.sh";

/// Errors from running the external diff renderer.
#[derive(Debug, Error)]
pub enum ExternalToolError {
    /// The program does not exist.
    #[error("diff tool {} not found", program.display())]
    NotFound { program: PathBuf },
    /// The program exists but could not be started.
    #[error("failed to launch diff tool {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The program ran and reported failure.
    #[error("diff tool {} exited with {}: {}", program.display(), exit_label(*code), stderr.trim())]
    Failed {
        program: PathBuf,
        code: Option<i32>,
        stderr: String,
    },
    /// The program succeeded without producing the report.
    #[error("diff tool {} did not write {}", program.display(), report.display())]
    MissingOutput { program: PathBuf, report: PathBuf },
}

fn exit_label(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// Captured output of a successful renderer run.
#[derive(Debug, Clone, Default)]
pub struct ToolRun {
    pub stdout: String,
    pub stderr: String,
}

/// External program that turns two canonical files into an HTML report.
///
/// Invoked as `program [args...] <left> <right> <report>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffTool {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Default for DiffTool {
    fn default() -> Self {
        Self::new(DEFAULT_DIFF_TOOL)
    }
}

impl DiffTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Leading arguments passed before the three paths.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Run the renderer and wait for it to finish.
    pub fn render(
        &self,
        left: &Path,
        right: &Path,
        report: &Path,
    ) -> Result<ToolRun, ExternalToolError> {
        let mut cmd = self.command();
        cmd.args(&self.args).arg(left).arg(right).arg(report);
        debug!(command = ?cmd, "running diff tool");

        let output = cmd.output().map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ExternalToolError::NotFound {
                    program: self.program.clone(),
                }
            } else {
                ExternalToolError::Spawn {
                    program: self.program.clone(),
                    source,
                }
            }
        })?;

        let run = ToolRun {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !output.status.success() {
            return Err(ExternalToolError::Failed {
                program: self.program.clone(),
                code: output.status.code(),
                stderr: run.stderr,
            });
        }

        if !report.is_file() {
            return Err(ExternalToolError::MissingOutput {
                program: self.program.clone(),
                report: report.to_path_buf(),
            });
        }

        if !run.stdout.trim().is_empty() {
            debug!(stdout = %run.stdout.trim(), "diff tool output");
        }
        Ok(run)
    }

    fn command(&self) -> Command {
        // Shell scripts are not directly executable on Windows.
        if cfg!(windows) && self.program.extension().is_some_and(|ext| ext == "sh") {
            let mut cmd = Command::new("sh");
            cmd.arg(&self.program);
            cmd
        } else {
            Command::new(&self.program)
        }
    }
}
