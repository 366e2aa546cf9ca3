//! Test utilities
//!
//! A recording [`ProcessRunner`] that fakes `git clone` and other commands,
//! plus proptest generators.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::error::ProcessError;
use crate::infra::git::checkout_name;
use crate::infra::process::{CommandOutput, ProcessRunner};

/// One recorded invocation
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    /// Whether this was a `git clone`
    pub fn is_clone(&self) -> bool {
        self.args.first().map(String::as_str) == Some("clone")
    }
}

/// Records every command and fakes its effect
///
/// `clone` creates `<cwd>/<checkout name>/.git` unless clones are set to fail.
/// Any other command exits with `other_code`.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<Invocation>>,
    fail_clones: bool,
    other_code: i32,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every clone exits with 128
    pub fn failing_clones() -> Self {
        Self {
            fail_clones: true,
            ..Self::default()
        }
    }

    /// Non-clone commands exit with `code`
    pub fn with_other_exit_code(code: i32) -> Self {
        Self {
            other_code: code,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    pub fn clone_count(&self) -> usize {
        self.calls.borrow().iter().filter(|c| c.is_clone()).count()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, program: &Path, args: &[String], cwd: &Path) -> Result<CommandOutput, ProcessError> {
        let invocation = Invocation {
            program: program.to_path_buf(),
            args: args.to_vec(),
            cwd: cwd.to_path_buf(),
        };
        let is_clone = invocation.is_clone();
        self.calls.borrow_mut().push(invocation);

        let (code, stderr) = if is_clone {
            if self.fail_clones {
                (128, "fatal: repository not found\n".to_string())
            } else {
                let url = args.last().map(String::as_str).unwrap_or_default();
                let checkout = cwd.join(checkout_name(url));
                std::fs::create_dir_all(checkout.join(".git")).map_err(|e| ProcessError::Spawn {
                    program: program.display().to_string(),
                    error: e.to_string(),
                })?;
                (0, String::new())
            }
        } else {
            (self.other_code, String::new())
        };

        Ok(CommandOutput {
            program: program.display().to_string(),
            args: args.to_vec(),
            code: Some(code),
            stdout: String::new(),
            stderr,
        })
    }
}

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    /// A CUDA compute capability code, known or not
    pub fn cuda_arch_code() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("70".to_string()),
            Just("80".to_string()),
            "[1-9][0-9]".prop_map(|s| s),
        ]
    }

    /// A variant name in the package manager's style
    pub fn variant_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_-]{0,15}[a-z0-9]?".prop_filter("Name must not be empty", |s| !s.is_empty())
    }
}
