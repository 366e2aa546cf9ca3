//! Default configuration values and fixed project layout

/// Project directory name under the home directory
pub const DEFAULT_PROJECT_DIR_NAME: &str = "exawind";

/// Default system profile
pub const DEFAULT_SYSTEM: &str = "spack";

/// Global config file name
pub const CONFIG_FILE_NAME: &str = "bootstrap.toml";

/// Subdirectories created in every project
pub const PROJECT_SUBDIRECTORIES: &[&str] = &["install", "scripts", "source"];

/// Directory of system profiles inside the builder checkout
pub const PROFILES_DIR: &str = "envs";

/// Extension of system profile files
pub const PROFILE_EXTENSION: &str = "bash";

/// Spack install marker, relative to the spack root
pub const SPACK_SETUP_SCRIPT: &str = "share/spack/setup-env.sh";

/// Spack executable, relative to the spack root
pub const SPACK_EXECUTABLE: &str = "bin/spack";

/// Spack configuration tree, relative to the spack root
pub const SPACK_CONFIG_DIR: &str = "etc/spack";

/// Configuration templates, relative to the builder checkout
pub const BUILDER_SPACK_TEMPLATES: &str = "etc/spack";

/// Template set linked into the base spack config directory
pub const BASE_TEMPLATE: &str = "spack";

/// Template set used on macOS instead of the system profile
pub const MACOS_TEMPLATE: &str = "osx";

/// Repository index, always linked
pub const REPOS_FILE: &str = "repos.yaml";

/// Configuration files linked when present
pub const CONFIG_FILES: &[&str] = &["config.yaml", "compilers.yaml", "packages.yaml"];

/// Compiler list checked before running compiler discovery
pub const COMPILERS_FILE: &str = "compilers.yaml";

/// Compiler assumed when a constraint names none
pub const DEFAULT_COMPILER: &str = "gcc";

/// Environment variable naming the project directory
pub const ENV_PROJECT_DIR: &str = "EXAWIND_PROJECT_DIR";

/// Environment variable selecting the CMake generator
pub const ENV_MAKE_TYPE: &str = "EXAWIND_MAKE_TYPE";

/// Environment variable pointing at an existing spack install
pub const ENV_SPACK_ROOT: &str = "SPACK_ROOT";

/// Environment variable overriding the builder repository URL
pub const ENV_BUILDER_REPO: &str = "EXAWIND_BUILDER_REPO";

/// Environment variable overriding the spack repository URL
pub const ENV_SPACK_REPO: &str = "EXAWIND_SPACK_REPO";
