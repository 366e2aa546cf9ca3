//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Environment variables the binary reads; cleared for every run
const ISOLATED_ENV: &[&str] = &[
    "EXAWIND_PROJECT_DIR",
    "EXAWIND_BUILDER_REPO",
    "EXAWIND_SPACK_REPO",
    "EXAWIND_MAKE_TYPE",
    "SPACK_ROOT",
    "RUST_LOG",
];

/// Test project context
///
/// A temporary directory holding the project under `proj/`, a config
/// directory under `config/` and anything else a test needs.
pub struct TestProject {
    /// Temporary directory for the test
    pub dir: TempDir,
}

#[allow(dead_code)]
impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Path of the temporary directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Project directory passed with `--path`
    pub fn project_dir(&self) -> PathBuf {
        self.dir.path().join("proj")
    }

    /// Config directory exported as `EXAWIND_CONFIG_DIR`
    pub fn config_dir(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    /// Create a file (and its parents) relative to the temporary directory
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory relative to the temporary directory
    pub fn create_dir(&self, name: &str) {
        std::fs::create_dir_all(self.dir.path().join(name)).expect("Failed to create directory");
    }

    /// Check if a path exists relative to the temporary directory
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Fake an exawind-builder checkout offering the given profiles
    pub fn seed_builder(&self, profiles: &[&str]) {
        self.create_dir("proj/exawind-builder/.git");
        for profile in profiles {
            self.create_file(&format!("proj/exawind-builder/envs/{profile}.bash"), "");
        }
        self.create_file("proj/exawind-builder/etc/spack/spack/repos.yaml", "");
    }

    /// Fake a usable spack install and return its root
    pub fn seed_spack_root(&self) -> PathBuf {
        self.create_file("external-spack/share/spack/setup-env.sh", "");
        self.dir.path().join("external-spack")
    }

    /// Run the binary with an isolated environment
    pub fn run(&self, args: &[&str], env: &[(&str, &Path)]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_exawind-bootstrap"));
        cmd.current_dir(self.dir.path());
        for name in ISOLATED_ENV {
            cmd.env_remove(name);
        }
        cmd.env("EXAWIND_CONFIG_DIR", self.config_dir());
        for (name, value) in env {
            cmd.env(name, value);
        }
        cmd.args(args);
        cmd.output().expect("Failed to execute exawind-bootstrap")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Captured stdout as a string
#[allow(dead_code)]
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Captured stderr as a string
#[allow(dead_code)]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
