//! Error types for exawind-bootstrap
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to list a directory
    #[error("Failed to read directory '{path}': {error}")]
    ReadDir { path: PathBuf, error: String },

    /// Scoped directory target does not exist
    #[error("Not a directory: '{path}'")]
    NotADirectory { path: PathBuf },

    /// Failed to create a symbolic link
    #[error("Failed to link '{link}' -> '{target}': {error}")]
    Symlink {
        link: PathBuf,
        target: PathBuf,
        error: String,
    },
}

/// External process errors
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The process could not be started at all
    #[error("Failed to run '{program}': {error}")]
    Spawn { program: String, error: String },
}

/// Bootstrap workflow errors
///
/// Every variant is fatal for the bootstrap run and maps to exit code 1.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// Cloning exawind-builder failed
    #[error("Cannot clone exawind-builder from '{url}': {detail}")]
    BuilderCloneFailed { url: String, detail: String },

    /// Requested system profile has no matching env file
    #[error(
        "Unknown system requested: {requested}. Valid options are:{}",
        format_options(available)
    )]
    UnknownSystem {
        requested: String,
        available: Vec<String>,
    },

    /// Cloning spack failed
    #[error("Cannot clone spack from '{url}': {detail}")]
    PackageManagerCloneFailed { url: String, detail: String },

    /// Filesystem error
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    /// Process error
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// Git client error
    #[error(transparent)]
    Git(#[from] crate::infra::git::GitError),
}

impl BootstrapError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> i32 {
        1
    }
}

fn format_options(options: &[String]) -> String {
    options.iter().map(|o| format!("\n    - {o}")).collect()
}

/// Constraint syntax errors (`name+variant~variant key=value@1.0:`)
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SpecError {
    /// Unexpected character in a constraint
    #[error("Unexpected '{found}' at position {position} in '{input}'")]
    UnexpectedChar {
        input: String,
        position: usize,
        found: char,
    },

    /// Sigil without a following name
    #[error("Expected a name after '{sigil}' in '{input}'")]
    MissingName { input: String, sigil: char },

    /// More than one package name in one constraint
    #[error("Constraint '{input}' names more than one package")]
    DuplicateName { input: String },

    /// A dependency constraint without a package name
    #[error("Dependency constraint '{input}' has no package name")]
    Anonymous { input: String },
}

/// Variant validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VariantError {
    /// Variant not declared by the package
    #[error("Package '{package}' has no variant '{name}'")]
    Unknown { package: String, name: String },

    /// Invalid variant type
    #[error("Variant '{name}' has invalid type: expected {expected}, got {got}")]
    InvalidType {
        name: String,
        expected: String,
        got: String,
    },

    /// Invalid choice value
    #[error("Variant '{name}' has invalid value '{value}': must be one of {choices:?}")]
    InvalidChoice {
        name: String,
        value: String,
        choices: Vec<String>,
    },

    /// Value rejected by the variant's check
    #[error("Variant '{name}' has invalid value '{value}': {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
}

/// Package recipe errors
#[derive(Error, Debug)]
pub enum RecipeError {
    /// No recipe with this name
    #[error("No recipe named '{name}'")]
    NotFound { name: String },

    /// Constraint targets another package
    #[error("Constraint names package '{found}', expected '{expected}'")]
    NameMismatch { expected: String, found: String },

    /// Requested version is not declared
    #[error("Package '{package}' has no version '{version}' (available: {})", available.join(", "))]
    UnknownVersion {
        package: String,
        version: String,
        available: Vec<String>,
    },

    /// A flag needs the install prefix of a dependency that was not supplied
    #[error("Package '{package}' needs the install prefix of '{dependency}' (pass --prefix {dependency}=PATH)")]
    MissingDependencyPrefix { package: String, dependency: String },

    /// Variant error
    #[error(transparent)]
    Variant(#[from] VariantError),

    /// Constraint syntax error
    #[error(transparent)]
    Spec(#[from] SpecError),
}
