//! Platform-specific directory management
//!
//! Locates the global config directory and the default project directory.
//!
//! Environment variables can override defaults:
//! - `EXAWIND_CONFIG_DIR` - Override config directory

use std::env;
use std::path::PathBuf;

use crate::config::defaults::{CONFIG_FILE_NAME, DEFAULT_PROJECT_DIR_NAME};

/// Environment variable name for the config directory override
pub const ENV_CONFIG_DIR: &str = "EXAWIND_CONFIG_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "exawind";

/// Directory provider for exawind-bootstrap
#[derive(Debug, Clone)]
pub struct ExawindDirs {
    config_dir: PathBuf,
}

impl ExawindDirs {
    /// Check the environment first, then fall back to platform defaults
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
        }
    }

    /// Use an explicit config directory
    #[must_use]
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/exawind` or `~/.config/exawind`
    /// - macOS: `~/Library/Application Support/exawind`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Path to `bootstrap.toml` in the config directory
    #[must_use]
    pub fn global_config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Default project directory: `~/exawind`
    #[must_use]
    pub fn default_project_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_PROJECT_DIR_NAME)
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(path) = env::var(ENV_CONFIG_DIR) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".config").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            })
    }
}

impl Default for ExawindDirs {
    fn default() -> Self {
        Self::new()
    }
}
