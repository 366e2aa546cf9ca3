//! External process execution
//!
//! Commands run synchronously with captured output. A non-zero exit status is
//! not an error here; callers inspect [`CommandOutput`] and decide.

use std::path::Path;
use std::process::Command;

use serde::Serialize;

use crate::error::ProcessError;

/// Outcome of one external command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
    /// Program that was run
    pub program: String,
    /// Arguments passed to the program
    pub args: Vec<String>,
    /// Exit code (`None` when terminated by a signal)
    pub code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the command exited with status 0
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// The command line, for log messages
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Short description of a failure: the last stderr line, or the status
    pub fn diagnostic(&self) -> String {
        let status = match self.code {
            Some(code) => format!("exit status {code}"),
            None => "terminated by signal".to_string(),
        };
        match self.stderr.lines().rev().find(|l| !l.trim().is_empty()) {
            Some(line) => format!("{} ({status})", line.trim()),
            None => status,
        }
    }
}

/// Runs external programs
///
/// The seam between the bootstrap workflow and the host system.
pub trait ProcessRunner {
    /// Run `program` with `args` inside `cwd` and wait for it to finish
    fn run(&self, program: &Path, args: &[String], cwd: &Path) -> Result<CommandOutput, ProcessError>;
}

/// [`ProcessRunner`] backed by `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[String], cwd: &Path) -> Result<CommandOutput, ProcessError> {
        let program_name = program.display().to_string();
        tracing::debug!("Running {} {} in {}", program_name, args.join(" "), cwd.display());

        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|e| ProcessError::Spawn {
                program: program_name.clone(),
                error: e.to_string(),
            })?;

        Ok(CommandOutput {
            program: program_name,
            args: args.to_vec(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
