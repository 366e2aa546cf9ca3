//! Repository URLs

/// exawind-builder: environment profiles and spack configuration templates
pub const BUILDER_REPO: &str = "https://github.com/exawind/exawind-builder.git";

/// Spack package manager
pub const SPACK_REPO: &str = "https://github.com/spack/spack.git";
