//! Global configuration management
//!
//! Reads defaults for the bootstrap from `bootstrap.toml` in the config
//! directory and layers them under command-line values.
//!
//! Settings resolve with priority: CLI (including environment) > config file
//! > built-in default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{defaults, urls};
use crate::infra::dirs::ExawindDirs;
use crate::infra::filesystem::resolve_path;

/// Global configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    ReadError { path: String, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    ParseError { path: String, error: String },
}

/// Contents of `bootstrap.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BootstrapConfig {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub repositories: RepositoriesConfig,
}

/// `[project]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Project directory; `~` and `$VAR` are expanded
    pub path: Option<String>,

    /// System profile
    pub system: Option<String>,
}

/// `[repositories]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoriesConfig {
    /// exawind-builder clone URL
    pub builder: Option<String>,

    /// spack clone URL
    pub spack: Option<String>,
}

impl BootstrapConfig {
    /// Load from the config directory
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` if the file exists but is not valid.
    pub fn load(dirs: &ExawindDirs) -> Result<Self, ConfigError> {
        Self::load_from_path(&dirs.global_config_path())
    }

    /// Load from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config file at {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        let config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

/// Where a setting came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingSource {
    /// Command-line flag or its environment variable (highest priority)
    Cli,
    /// Global config file
    Config,
    /// Built-in default (lowest priority)
    Default,
}

/// Resolved setting with its source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Setting<T> {
    pub value: T,
    pub source: SettingSource,
}

/// Resolve one setting with priority: CLI > config > default
pub fn resolve_setting<T>(cli: Option<T>, config: Option<T>, default: impl FnOnce() -> T) -> Setting<T> {
    if let Some(value) = cli {
        Setting {
            value,
            source: SettingSource::Cli,
        }
    } else if let Some(value) = config {
        Setting {
            value,
            source: SettingSource::Config,
        }
    } else {
        Setting {
            value: default(),
            source: SettingSource::Default,
        }
    }
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct SettingOverrides {
    pub path: Option<String>,
    pub system: Option<String>,
    pub builder_repo: Option<String>,
    pub spack_repo: Option<String>,
}

/// Effective bootstrap settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapSettings {
    pub project_dir: Setting<PathBuf>,
    pub system: Setting<String>,
    pub builder_repo: Setting<String>,
    pub spack_repo: Setting<String>,
}

impl BootstrapSettings {
    /// Layer `overrides` over `config` over the built-in defaults
    pub fn resolve(overrides: SettingOverrides, config: &BootstrapConfig) -> Self {
        let path = resolve_setting(overrides.path, config.project.path.clone(), || {
            ExawindDirs::default_project_dir().display().to_string()
        });
        let settings = Self {
            project_dir: Setting {
                value: resolve_path(&path.value),
                source: path.source,
            },
            system: resolve_setting(overrides.system, config.project.system.clone(), || {
                defaults::DEFAULT_SYSTEM.to_string()
            }),
            builder_repo: resolve_setting(
                overrides.builder_repo,
                config.repositories.builder.clone(),
                || urls::BUILDER_REPO.to_string(),
            ),
            spack_repo: resolve_setting(
                overrides.spack_repo,
                config.repositories.spack.clone(),
                || urls::SPACK_REPO.to_string(),
            ),
        };
        tracing::debug!(
            "Project dir {} (from {:?}), system {} (from {:?})",
            settings.project_dir.value.display(),
            settings.project_dir.source,
            settings.system.value,
            settings.system.source
        );
        settings
    }
}
