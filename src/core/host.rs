//! Host description
//!
//! The facts about the build machine that recipes and the bootstrap depend on:
//! the platform name and the CMake generator.

use serde::Serialize;
use std::fmt;

/// Host platform, named the way spack names `sys.platform`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum Platform {
    Linux,
    Darwin,
    Other(String),
}

impl Platform {
    /// Platform of the running binary
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a Rust `target_os` name
    pub fn from_os(os: &str) -> Self {
        match os {
            "linux" => Self::Linux,
            "macos" | "darwin" => Self::Darwin,
            other => Self::Other(other.to_string()),
        }
    }

    /// Name used for spack's per-platform config directory
    pub fn as_str(&self) -> &str {
        match self {
            Self::Linux => "linux",
            Self::Darwin => "darwin",
            Self::Other(name) => name,
        }
    }

    pub fn is_darwin(&self) -> bool {
        *self == Self::Darwin
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.as_str().to_string()
    }
}

/// CMake generator used by the packaged builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Generator {
    #[default]
    #[serde(rename = "Unix Makefiles")]
    UnixMakefiles,
    Ninja,
}

impl Generator {
    /// `EXAWIND_MAKE_TYPE=ninja` (any case) selects Ninja, anything else Makefiles
    pub fn from_make_type(make_type: Option<&str>) -> Self {
        match make_type {
            Some(value) if value.eq_ignore_ascii_case("ninja") => Self::Ninja,
            _ => Self::UnixMakefiles,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnixMakefiles => "Unix Makefiles",
            Self::Ninja => "Ninja",
        }
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform and generator together
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Host {
    pub platform: Platform,
    pub generator: Generator,
}

impl Host {
    pub fn new(platform: Platform, generator: Generator) -> Self {
        Self { platform, generator }
    }

    /// Detect from the running binary and `EXAWIND_MAKE_TYPE`
    pub fn detect() -> Self {
        let make_type = std::env::var(crate::config::defaults::ENV_MAKE_TYPE).ok();
        Self::new(Platform::current(), Generator::from_make_type(make_type.as_deref()))
    }

    /// Linux with Makefiles
    pub fn linux() -> Self {
        Self::new(Platform::Linux, Generator::UnixMakefiles)
    }

    /// macOS with Makefiles
    pub fn darwin() -> Self {
        Self::new(Platform::Darwin, Generator::UnixMakefiles)
    }
}
