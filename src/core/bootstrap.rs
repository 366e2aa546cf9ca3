//! Project bootstrap workflow
//!
//! Creates the project skeleton, fetches exawind-builder, validates the
//! requested system profile and provisions spack with the builder's
//! configuration templates:
//!
//! ```text
//! <project>/
//! ├── install/  scripts/  source/
//! ├── exawind-builder/          (git clone)
//! │   ├── envs/<system>.bash
//! │   └── etc/spack/{spack,osx,<system>}/*.yaml
//! └── spack/                    (git clone, unless SPACK_ROOT is usable)
//!     └── etc/spack/
//!         ├── repos.yaml config.yaml ...   -> exawind-builder/etc/spack/spack/
//!         └── <platform>/*.yaml            -> exawind-builder/etc/spack/<osx|system>/
//! ```
//!
//! Every external command goes through a [`ProcessRunner`], and commands run
//! in an explicit [`WorkingDirectory`] rather than the process directory.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::defaults::{
    BASE_TEMPLATE, BUILDER_SPACK_TEMPLATES, COMPILERS_FILE, CONFIG_FILES, MACOS_TEMPLATE,
    PROFILES_DIR, PROFILE_EXTENSION, PROJECT_SUBDIRECTORIES, REPOS_FILE, SPACK_CONFIG_DIR,
    SPACK_EXECUTABLE, SPACK_SETUP_SCRIPT,
};
use crate::core::host::Platform;
use crate::error::BootstrapError;
use crate::infra::filesystem::{self, WorkingDirectory};
use crate::infra::git::{self, Git};
use crate::infra::process::ProcessRunner;

/// Settings for one bootstrap run
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    /// Absolute project directory
    pub project_dir: PathBuf,
    /// System profile name
    pub system: String,
    /// exawind-builder clone URL
    pub builder_repo: String,
    /// spack clone URL
    pub spack_repo: String,
    /// Value of `SPACK_ROOT`, if set
    pub spack_root: Option<PathBuf>,
    /// Platform name used for the spack config subdirectory
    pub platform: Platform,
}

/// Project directory layout after initialization
#[derive(Debug, Clone, Serialize)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub builder: PathBuf,
    /// The project directory already existed
    pub reused: bool,
    /// exawind-builder was cloned during this run
    pub builder_cloned: bool,
}

impl ProjectPaths {
    /// Directory of system profiles
    pub fn profiles_dir(&self) -> PathBuf {
        self.builder.join(PROFILES_DIR)
    }

    /// Directory of spack configuration templates
    pub fn templates_dir(&self) -> PathBuf {
        self.builder.join(BUILDER_SPACK_TEMPLATES)
    }
}

/// Where the spack instance came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpackOrigin {
    /// `SPACK_ROOT` pointed at a usable install
    Environment,
    /// `<project>/spack` was left by a previous run
    Existing,
    /// Cloned during this run
    Cloned,
}

/// A configuration symlink created in the spack tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigLink {
    pub link: PathBuf,
    pub target: PathBuf,
}

/// Outcome of `spack compiler find`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompilerDiscovery {
    /// A compilers.yaml was linked, nothing to discover
    NotNeeded,
    Succeeded,
    /// Failure is reported but never fatal
    Failed { detail: String },
}

/// Provisioned spack instance
#[derive(Debug, Clone, Serialize)]
pub struct SpackInstall {
    pub root: PathBuf,
    pub origin: SpackOrigin,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<ConfigLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compiler_discovery: Option<CompilerDiscovery>,
}

/// Summary of a full bootstrap run
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    pub project: ProjectPaths,
    pub system: String,
    pub spack: SpackInstall,
}

/// Drives the bootstrap workflow
pub struct Bootstrapper<'a> {
    options: BootstrapOptions,
    runner: &'a dyn ProcessRunner,
    git: Git<'a>,
    cwd: WorkingDirectory,
}

impl<'a> Bootstrapper<'a> {
    pub fn new(options: BootstrapOptions, runner: &'a dyn ProcessRunner) -> Self {
        Self::with_git(options, runner, Git::new(runner))
    }

    /// Use a specific git client
    pub fn with_git(options: BootstrapOptions, runner: &'a dyn ProcessRunner, git: Git<'a>) -> Self {
        let cwd = WorkingDirectory::new(&options.project_dir);
        Self {
            options,
            runner,
            git,
            cwd,
        }
    }

    /// Run every step in order
    pub fn run(&mut self) -> Result<BootstrapReport, BootstrapError> {
        let project = self.initialize_project()?;
        let system = self.validate_system_profile(&project)?;
        let spack = self.provision_package_manager(&project, &system)?;
        Ok(BootstrapReport {
            project,
            system,
            spack,
        })
    }

    /// Create the project skeleton and fetch exawind-builder
    ///
    /// The builder is cloned only when its checkout has no `.git` entry, so
    /// repeated runs clone at most once. A failed clone is fatal.
    pub fn initialize_project(&mut self) -> Result<ProjectPaths, BootstrapError> {
        let root = self.options.project_dir.clone();
        let reused = root.exists();
        if reused {
            tracing::info!("Reusing existing project dir: {}", root.display());
        } else {
            tracing::info!("Creating ExaWind project structure in {}", root.display());
        }

        for subdirectory in PROJECT_SUBDIRECTORIES {
            filesystem::ensure_directory(&root.join(subdirectory))?;
        }

        let builder = root.join(git::checkout_name(&self.options.builder_repo));
        let builder_cloned = if git::is_checkout(&builder) {
            tracing::info!("Found exawind-builder in {}", root.display());
            false
        } else {
            let output = self
                .git
                .clone_repository(&mut self.cwd, &self.options.builder_repo, &root, false)?;
            if !output.success() {
                return Err(BootstrapError::BuilderCloneFailed {
                    url: self.options.builder_repo.clone(),
                    detail: output.diagnostic(),
                });
            }
            true
        };

        Ok(ProjectPaths {
            root,
            builder,
            reused,
            builder_cloned,
        })
    }

    /// Check the requested system against the profiles in `envs/`
    pub fn validate_system_profile(&self, project: &ProjectPaths) -> Result<String, BootstrapError> {
        let requested = &self.options.system;
        let profiles_dir = project.profiles_dir();
        let available = if profiles_dir.is_dir() {
            filesystem::file_stems_with_extension(&profiles_dir, PROFILE_EXTENSION)?
        } else {
            tracing::warn!("No profile directory at {}", profiles_dir.display());
            Default::default()
        };

        if available.contains(requested) {
            tracing::debug!("System profile '{}' is valid", requested);
            Ok(requested.clone())
        } else {
            Err(BootstrapError::UnknownSystem {
                requested: requested.clone(),
                available: available.into_iter().collect(),
            })
        }
    }

    /// Reuse or clone spack and wire in the builder's configuration
    ///
    /// Configuration links are created only right after a fresh clone; a
    /// reused instance is left untouched.
    pub fn provision_package_manager(
        &mut self,
        project: &ProjectPaths,
        system: &str,
    ) -> Result<SpackInstall, BootstrapError> {
        if let Some(root) = self.usable_spack_root() {
            tracing::info!("Using spack from SPACK_ROOT: {}", root.display());
            return Ok(SpackInstall {
                root,
                origin: SpackOrigin::Environment,
                links: Vec::new(),
                compiler_discovery: None,
            });
        }

        let root = project.root.join(git::checkout_name(&self.options.spack_repo));
        if root.exists() {
            tracing::info!("Reusing spack instance: {}", root.display());
            return Ok(SpackInstall {
                root,
                origin: SpackOrigin::Existing,
                links: Vec::new(),
                compiler_discovery: None,
            });
        }

        let output = self
            .git
            .clone_repository(&mut self.cwd, &self.options.spack_repo, &project.root, false)?;
        if !output.success() {
            return Err(BootstrapError::PackageManagerCloneFailed {
                url: self.options.spack_repo.clone(),
                detail: output.diagnostic(),
            });
        }

        tracing::info!("Setting up spack environment");
        let links = self.link_configuration(project, &root, system)?;
        let compiler_discovery = self.discover_compilers(&root);

        Ok(SpackInstall {
            root,
            origin: SpackOrigin::Cloned,
            links,
            compiler_discovery: Some(compiler_discovery),
        })
    }

    fn usable_spack_root(&self) -> Option<PathBuf> {
        let root = self.options.spack_root.as_ref()?;
        if root.join(SPACK_SETUP_SCRIPT).exists() {
            Some(root.clone())
        } else {
            tracing::debug!(
                "Ignoring SPACK_ROOT={}: no {}",
                root.display(),
                SPACK_SETUP_SCRIPT
            );
            None
        }
    }

    /// Name of the template set linked into the platform directory
    pub fn override_template(&self, system: &str) -> String {
        if self.options.platform.is_darwin() {
            MACOS_TEMPLATE.to_string()
        } else {
            system.to_string()
        }
    }

    fn link_configuration(
        &self,
        project: &ProjectPaths,
        spack_root: &Path,
        system: &str,
    ) -> Result<Vec<ConfigLink>, BootstrapError> {
        let config_dir = spack_root.join(SPACK_CONFIG_DIR);
        let platform_dir = filesystem::ensure_directory(&config_dir.join(self.options.platform.as_str()))?;

        let base_src = project.templates_dir().join(BASE_TEMPLATE);
        let override_src = project.templates_dir().join(self.override_template(system));

        let mut links = vec![link(&base_src.join(REPOS_FILE), &config_dir.join(REPOS_FILE))?];
        for file in CONFIG_FILES {
            if let Some(created) = link_if_present(&base_src.join(file), &config_dir.join(file))? {
                links.push(created);
            }
        }
        for file in CONFIG_FILES {
            if let Some(created) = link_if_present(&override_src.join(file), &platform_dir.join(file))? {
                links.push(created);
            }
        }
        Ok(links)
    }

    /// Run `spack compiler find` unless a compilers.yaml is in place
    fn discover_compilers(&self, spack_root: &Path) -> CompilerDiscovery {
        let config_dir = spack_root.join(SPACK_CONFIG_DIR);
        let have_compilers = [
            config_dir.join(COMPILERS_FILE),
            config_dir.join(self.options.platform.as_str()).join(COMPILERS_FILE),
        ]
        .iter()
        .any(|p| p.exists());
        if have_compilers {
            return CompilerDiscovery::NotNeeded;
        }

        let spack = spack_root.join(SPACK_EXECUTABLE);
        let args = vec!["compiler".to_string(), "find".to_string()];
        match self.runner.run(&spack, &args, self.cwd.current()) {
            Ok(output) if output.success() => CompilerDiscovery::Succeeded,
            Ok(output) => {
                let detail = output.diagnostic();
                tracing::warn!("spack compiler find failed: {}", detail);
                CompilerDiscovery::Failed { detail }
            }
            Err(e) => {
                tracing::warn!("spack compiler find failed: {}", e);
                CompilerDiscovery::Failed {
                    detail: e.to_string(),
                }
            }
        }
    }
}

fn link(target: &Path, link: &Path) -> Result<ConfigLink, BootstrapError> {
    filesystem::symlink(target, link)?;
    tracing::debug!("Linked {} -> {}", link.display(), target.display());
    Ok(ConfigLink {
        link: link.to_path_buf(),
        target: target.to_path_buf(),
    })
}

fn link_if_present(target: &Path, link_path: &Path) -> Result<Option<ConfigLink>, BootstrapError> {
    if target.exists() {
        link(target, link_path).map(Some)
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::urls;
    use crate::test_utils::RecordingRunner;
    use std::fs;
    use tempfile::TempDir;

    fn options(project: &Path, system: &str) -> BootstrapOptions {
        BootstrapOptions {
            project_dir: project.to_path_buf(),
            system: system.to_string(),
            builder_repo: urls::BUILDER_REPO.to_string(),
            spack_repo: urls::SPACK_REPO.to_string(),
            spack_root: None,
            platform: Platform::Linux,
        }
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    /// A builder checkout with profiles `a` and `b` and some templates
    fn seed_builder(project: &Path) {
        let builder = project.join("exawind-builder");
        fs::create_dir_all(builder.join(".git")).unwrap();
        touch(&builder.join("envs/a.bash"));
        touch(&builder.join("envs/b.bash"));
        touch(&builder.join("envs/notes.txt"));
        touch(&builder.join("etc/spack/spack/repos.yaml"));
        touch(&builder.join("etc/spack/spack/config.yaml"));
        touch(&builder.join("etc/spack/spack/packages.yaml"));
        touch(&builder.join("etc/spack/a/packages.yaml"));
        touch(&builder.join("etc/spack/osx/compilers.yaml"));
    }

    #[test]
    fn test_initialize_creates_layout_and_clones_builder() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("proj");
        let runner = RecordingRunner::new();
        let mut bootstrapper = Bootstrapper::new(options(&project, "a"), &runner);

        let paths = bootstrapper.initialize_project().unwrap();
        assert!(!paths.reused);
        assert!(paths.builder_cloned);
        for dir in ["install", "scripts", "source"] {
            assert!(project.join(dir).is_dir(), "{dir} missing");
        }
        assert_eq!(paths.builder, project.join("exawind-builder"));

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].cwd, project);
        assert_eq!(calls[0].args, vec!["clone", urls::BUILDER_REPO]);
    }

    #[test]
    fn test_initialize_twice_clones_once() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("proj");
        let runner = RecordingRunner::new();
        let mut bootstrapper = Bootstrapper::new(options(&project, "a"), &runner);

        bootstrapper.initialize_project().unwrap();
        let second = bootstrapper.initialize_project().unwrap();
        assert!(second.reused);
        assert!(!second.builder_cloned);
        assert_eq!(runner.clone_count(), 1);
    }

    #[test]
    fn test_failed_builder_clone_is_fatal() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::failing_clones();
        let mut bootstrapper = Bootstrapper::new(options(temp.path(), "a"), &runner);

        let err = bootstrapper.initialize_project().unwrap_err();
        assert!(matches!(err, BootstrapError::BuilderCloneFailed { .. }));
        assert!(err.to_string().contains("repository not found"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_validate_system_profile() {
        let temp = TempDir::new().unwrap();
        seed_builder(temp.path());
        let runner = RecordingRunner::new();

        let mut bootstrapper = Bootstrapper::new(options(temp.path(), "a"), &runner);
        let paths = bootstrapper.initialize_project().unwrap();
        assert_eq!(bootstrapper.validate_system_profile(&paths).unwrap(), "a");

        let bootstrapper = Bootstrapper::new(options(temp.path(), "c"), &runner);
        match bootstrapper.validate_system_profile(&paths) {
            Err(BootstrapError::UnknownSystem {
                requested,
                available,
            }) => {
                assert_eq!(requested, "c");
                assert_eq!(available, vec!["a", "b"]);
            }
            other => panic!("expected UnknownSystem, got {other:?}"),
        }
        assert_eq!(runner.clone_count(), 0);
    }

    #[test]
    fn test_unknown_system_message_lists_options() {
        let err = BootstrapError::UnknownSystem {
            requested: "c".to_string(),
            available: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unknown system requested: c. Valid options are:\n    - a\n    - b"
        );
    }

    #[test]
    fn test_valid_spack_root_is_reused_without_clone() {
        let temp = TempDir::new().unwrap();
        seed_builder(temp.path());
        let spack_root = temp.path().join("external-spack");
        touch(&spack_root.join("share/spack/setup-env.sh"));

        let runner = RecordingRunner::new();
        let mut opts = options(temp.path(), "a");
        opts.spack_root = Some(spack_root.clone());
        let mut bootstrapper = Bootstrapper::new(opts, &runner);

        let report = bootstrapper.run().unwrap();
        assert_eq!(report.spack.origin, SpackOrigin::Environment);
        assert_eq!(report.spack.root, spack_root);
        assert!(runner.calls().is_empty());
        assert!(!temp.path().join("spack").exists());
    }

    #[test]
    fn test_unusable_spack_root_falls_through() {
        let temp = TempDir::new().unwrap();
        seed_builder(temp.path());
        let runner = RecordingRunner::new();
        let mut opts = options(temp.path(), "a");
        opts.spack_root = Some(temp.path().join("no-such-spack"));
        let mut bootstrapper = Bootstrapper::new(opts, &runner);

        let report = bootstrapper.run().unwrap();
        assert_eq!(report.spack.origin, SpackOrigin::Cloned);
        assert_eq!(runner.clone_count(), 1);
    }

    #[test]
    fn test_existing_spack_is_left_alone() {
        let temp = TempDir::new().unwrap();
        seed_builder(temp.path());
        fs::create_dir_all(temp.path().join("spack")).unwrap();
        let runner = RecordingRunner::new();
        let mut bootstrapper = Bootstrapper::new(options(temp.path(), "a"), &runner);

        let report = bootstrapper.run().unwrap();
        assert_eq!(report.spack.origin, SpackOrigin::Existing);
        assert!(report.spack.links.is_empty());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_fresh_clone_links_configuration() {
        let temp = TempDir::new().unwrap();
        seed_builder(temp.path());
        let runner = RecordingRunner::new();
        let mut bootstrapper = Bootstrapper::new(options(temp.path(), "a"), &runner);

        let report = bootstrapper.run().unwrap();
        let config = temp.path().join("spack/etc/spack");
        let templates = temp.path().join("exawind-builder/etc/spack");

        assert!(config.join("linux").is_dir());
        assert_eq!(
            fs::read_link(config.join("repos.yaml")).unwrap(),
            templates.join("spack/repos.yaml")
        );
        assert!(fs::symlink_metadata(config.join("config.yaml")).is_ok());
        assert!(fs::symlink_metadata(config.join("compilers.yaml")).is_err());
        assert_eq!(
            fs::read_link(config.join("linux/packages.yaml")).unwrap(),
            templates.join("a/packages.yaml")
        );
        assert_eq!(report.spack.links.len(), 4);
    }

    #[test]
    fn test_darwin_links_osx_overrides() {
        let temp = TempDir::new().unwrap();
        seed_builder(temp.path());
        let runner = RecordingRunner::new();
        let mut opts = options(temp.path(), "a");
        opts.platform = Platform::Darwin;
        let mut bootstrapper = Bootstrapper::new(opts, &runner);

        let report = bootstrapper.run().unwrap();
        let platform_dir = temp.path().join("spack/etc/spack/darwin");
        assert_eq!(
            fs::read_link(platform_dir.join("compilers.yaml")).unwrap(),
            temp.path().join("exawind-builder/etc/spack/osx/compilers.yaml")
        );
        assert!(fs::symlink_metadata(platform_dir.join("packages.yaml")).is_err());
        assert_eq!(report.spack.compiler_discovery, Some(CompilerDiscovery::NotNeeded));
    }

    #[test]
    fn test_compiler_find_runs_without_compilers_yaml() {
        let temp = TempDir::new().unwrap();
        seed_builder(temp.path());
        let runner = RecordingRunner::new();
        let mut bootstrapper = Bootstrapper::new(options(temp.path(), "a"), &runner);

        let report = bootstrapper.run().unwrap();
        assert_eq!(report.spack.compiler_discovery, Some(CompilerDiscovery::Succeeded));

        let calls = runner.calls();
        let find = calls.last().unwrap();
        assert_eq!(find.program, temp.path().join("spack/bin/spack"));
        assert_eq!(find.args, vec!["compiler", "find"]);
    }

    #[test]
    fn test_compiler_find_failure_is_not_fatal() {
        let temp = TempDir::new().unwrap();
        seed_builder(temp.path());
        let runner = RecordingRunner::with_other_exit_code(2);
        let mut bootstrapper = Bootstrapper::new(options(temp.path(), "a"), &runner);

        let report = bootstrapper.run().unwrap();
        assert!(matches!(
            report.spack.compiler_discovery,
            Some(CompilerDiscovery::Failed { .. })
        ));
    }

    #[test]
    fn test_failed_spack_clone_is_fatal() {
        let temp = TempDir::new().unwrap();
        seed_builder(temp.path());
        let runner = RecordingRunner::failing_clones();
        let mut bootstrapper = Bootstrapper::new(options(temp.path(), "a"), &runner);

        let err = bootstrapper.run().unwrap_err();
        assert!(matches!(err, BootstrapError::PackageManagerCloneFailed { .. }));
    }

    #[test]
    fn test_unknown_system_stops_before_spack() {
        let temp = TempDir::new().unwrap();
        seed_builder(temp.path());
        let runner = RecordingRunner::new();
        let mut bootstrapper = Bootstrapper::new(options(temp.path(), "c"), &runner);

        assert!(matches!(bootstrapper.run(), Err(BootstrapError::UnknownSystem { .. })));
        assert!(runner.calls().is_empty());
        assert!(!temp.path().join("spack").exists());
    }
}
