//! Git operations
//!
//! Clones repositories by invoking the `git` client through a
//! [`ProcessRunner`], so the exit status and output reach the caller.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::error::{FilesystemError, ProcessError};
use crate::infra::filesystem::WorkingDirectory;
use crate::infra::process::{CommandOutput, ProcessRunner};

/// Git operation errors
///
/// A clone that runs but exits non-zero is not an error; see
/// [`Git::clone_repository`].
#[derive(Error, Debug)]
pub enum GitError {
    /// Clone destination is unusable
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    /// The git client could not be started
    #[error(transparent)]
    Process(#[from] ProcessError),
}

/// Git client
pub struct Git<'a> {
    runner: &'a dyn ProcessRunner,
    program: PathBuf,
}

impl<'a> Git<'a> {
    /// Use the `git` found on `PATH`
    pub fn new(runner: &'a dyn ProcessRunner) -> Self {
        let program = which::which("git").unwrap_or_else(|_| PathBuf::from("git"));
        Self::with_program(runner, program)
    }

    /// Use a specific git executable
    pub fn with_program(runner: &'a dyn ProcessRunner, program: PathBuf) -> Self {
        Self { runner, program }
    }

    /// Clone `url` into a new directory inside `destination`
    ///
    /// Runs `git clone [--recurse-submodules] <url>` with `destination` as the
    /// working directory, so git names the checkout after the URL (see
    /// [`checkout_name`]). Returns the command outcome whether or not the
    /// clone succeeded.
    pub fn clone_repository(
        &self,
        cwd: &mut WorkingDirectory,
        url: &str,
        destination: &Path,
        recursive: bool,
    ) -> Result<CommandOutput, GitError> {
        let args = clone_args(url, recursive);
        let scope = cwd.enter(destination, false)?;
        tracing::info!("Cloning repo: git {}", args.join(" "));
        let output = self.runner.run(&self.program, &args, scope.current())?;
        if output.success() {
            tracing::debug!("Clone of {} finished", url);
        } else {
            tracing::warn!("Clone of {} failed: {}", url, output.diagnostic());
        }
        Ok(output)
    }
}

/// Arguments for `git clone`
pub fn clone_args(url: &str, recursive: bool) -> Vec<String> {
    let mut args = vec!["clone".to_string()];
    if recursive {
        args.push("--recurse-submodules".to_string());
    }
    args.push(url.to_string());
    args
}

/// Directory name git picks for a clone of `url`
pub fn checkout_name(url: &str) -> String {
    let tail = url
        .trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(url);
    tail.strip_suffix(".git").unwrap_or(tail).to_string()
}

/// Whether `path` holds a git checkout (has a `.git` entry)
pub fn is_checkout(path: &Path) -> bool {
    path.join(".git").exists()
}
