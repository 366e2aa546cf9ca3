//! Package definition handling
//!
//! A package definition is plain data: source location, versions, variants
//! and conditional dependencies. Flag translation lives with each recipe in
//! [`crate::core::recipes`].

use serde::{Serialize, Serializer};
use std::fmt;

use crate::core::constraint::Constraint;
use crate::core::host::{Generator, Platform};
use crate::core::spec::ResolvedSpec;
use crate::core::variant::VariantDefinition;
use crate::error::SpecError;

/// Build system of a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildSystem {
    CMake,
}

/// Git reference of a declared version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GitRef {
    Branch(String),
}

/// A declared version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionDeclaration {
    pub name: String,
    #[serde(flatten)]
    pub git_ref: GitRef,
    /// Check out submodules recursively
    pub submodules: bool,
}

impl VersionDeclaration {
    /// Version that tracks a branch of the same name
    pub fn branch(name: &str, submodules: bool) -> Self {
        Self {
            name: name.to_string(),
            git_ref: GitRef::Branch(name.to_string()),
            submodules,
        }
    }
}

/// When a dependency applies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Always,
    /// Variant/version/compiler condition such as `+hypre~cuda` or `@2.0:`
    Spec(Constraint),
    /// Host platform
    Platform(Platform),
    /// CMake generator
    Generator(Generator),
}

impl Condition {
    /// Parse a `when` constraint
    pub fn when(input: &str) -> Result<Self, SpecError> {
        Ok(Self::Spec(Constraint::parse(input)?))
    }

    /// Whether the condition holds for `spec`
    pub fn holds(&self, spec: &ResolvedSpec) -> bool {
        match self {
            Self::Always => true,
            Self::Spec(constraint) => spec.satisfies(constraint),
            Self::Platform(platform) => spec.host.platform == *platform,
            Self::Generator(generator) => spec.host.generator == *generator,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => Ok(()),
            Self::Spec(constraint) => write!(f, "{constraint}"),
            Self::Platform(platform) => write!(f, "platform={platform}"),
            Self::Generator(generator) => write!(f, "generator={generator}"),
        }
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// How a dependency is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    Build,
    Link,
}

/// A conditional dependency declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    /// Constrained package, e.g. `trilinos+cuda+wrapper`
    pub spec: Constraint,
    #[serde(rename = "type")]
    pub dep_type: DependencyType,
    #[serde(skip_serializing_if = "Condition::is_always")]
    pub when: Condition,
}

impl Condition {
    fn is_always(&self) -> bool {
        *self == Self::Always
    }
}

impl Dependency {
    /// Unconditional link dependency
    pub fn on(spec: &str) -> Result<Self, SpecError> {
        Ok(Self {
            spec: Constraint::parse_named(spec)?,
            dep_type: DependencyType::Link,
            when: Condition::Always,
        })
    }

    /// Link dependency active when `when` holds
    pub fn on_when(spec: &str, when: &str) -> Result<Self, SpecError> {
        Ok(Self::on(spec)?.with_condition(Condition::when(when)?))
    }

    /// Replace the condition
    #[must_use]
    pub fn with_condition(mut self, when: Condition) -> Self {
        self.when = when;
        self
    }

    /// Mark as build-only
    #[must_use]
    pub fn build_only(mut self) -> Self {
        self.dep_type = DependencyType::Build;
        self
    }

    /// Name of the package depended on
    pub fn name(&self) -> &str {
        self.spec.package()
    }
}

/// Complete package definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDefinition {
    pub name: String,
    pub description: String,
    pub homepage: String,
    pub git: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub maintainers: Vec<String>,
    pub versions: Vec<VersionDeclaration>,
    pub build_system: BuildSystem,
    /// Upstream recipe this definition extends, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    pub variants: Vec<VariantDefinition>,
    pub dependencies: Vec<Dependency>,
}

impl PackageDefinition {
    /// Start a CMake package definition
    pub fn cmake(name: &str, description: &str, homepage: &str, git: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            homepage: homepage.to_string(),
            git: git.to_string(),
            maintainers: Vec::new(),
            versions: Vec::new(),
            build_system: BuildSystem::CMake,
            extends: None,
            variants: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Look up a variant by name
    pub fn variant(&self, name: &str) -> Option<&VariantDefinition> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// First declared version
    pub fn default_version(&self) -> Option<&VersionDeclaration> {
        self.versions.first()
    }

    /// Dependencies whose condition holds for `spec`, in declaration order
    pub fn active_dependencies(&self, spec: &ResolvedSpec) -> Vec<&Dependency> {
        self.dependencies.iter().filter(|d| d.when.holds(spec)).collect()
    }
}
