//! Resolved package configuration
//!
//! A [`ResolvedSpec`] fixes every variant of one package to a value, along
//! with the version, compiler, host, and the install prefixes of
//! dependencies that flag translation may refer to.
//!
//! Variant values resolve with priority: request > package default.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::defaults::DEFAULT_COMPILER;
use crate::core::constraint::{Constraint, VersionBound};
use crate::core::host::Host;
use crate::core::package::PackageDefinition;
use crate::core::variant::VariantValue;
use crate::error::{RecipeError, VariantError};

/// Fully resolved configuration of one package
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSpec {
    pub name: String,
    /// Selected version; `None` when the definition declares none
    pub version: Option<String>,
    pub compiler: String,
    pub host: Host,
    pub variants: BTreeMap<String, VariantValue>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub prefixes: BTreeMap<String, PathBuf>,
}

impl ResolvedSpec {
    /// Resolve `request` against the defaults of `definition`
    ///
    /// Unknown variants are rejected unless the definition extends an upstream
    /// recipe, which owns variants this definition doesn't declare.
    pub fn resolve(
        definition: &PackageDefinition,
        host: &Host,
        request: &Constraint,
    ) -> Result<Self, RecipeError> {
        if let Some(name) = &request.name {
            if *name != definition.name {
                return Err(RecipeError::NameMismatch {
                    expected: definition.name.clone(),
                    found: name.clone(),
                });
            }
        }

        let version = resolve_version(definition, request.version.as_ref())?;

        let mut variants: BTreeMap<String, VariantValue> = definition
            .variants
            .iter()
            .map(|v| (v.name.clone(), v.default.clone()))
            .collect();

        for (names, value) in [(&request.enabled, true), (&request.disabled, false)] {
            for name in names {
                let resolved = match definition.variant(name) {
                    Some(def) if def.is_bool() => VariantValue::Bool(value),
                    Some(def) => {
                        return Err(VariantError::InvalidType {
                            name: def.name.clone(),
                            expected: "value (use name=value)".to_string(),
                            got: "bool".to_string(),
                        }
                        .into())
                    }
                    None => passthrough(definition, name, VariantValue::Bool(value))?,
                };
                variants.insert(name.clone(), resolved);
            }
        }

        for (name, raw) in &request.values {
            let resolved = match definition.variant(name) {
                Some(def) => def.parse_value(raw)?,
                None => passthrough(definition, name, VariantValue::Single(raw.clone()))?,
            };
            variants.insert(name.clone(), resolved);
        }

        for def in &definition.variants {
            if let Some(value) = variants.get(&def.name) {
                def.validate(value)?;
            }
        }

        tracing::debug!("Resolved {} with {} variants", definition.name, variants.len());

        Ok(Self {
            name: definition.name.clone(),
            version,
            compiler: request
                .compiler
                .clone()
                .unwrap_or_else(|| DEFAULT_COMPILER.to_string()),
            host: host.clone(),
            variants,
            prefixes: BTreeMap::new(),
        })
    }

    /// Record the install prefix of a dependency
    #[must_use]
    pub fn with_prefix(mut self, dependency: &str, prefix: impl Into<PathBuf>) -> Self {
        self.prefixes.insert(dependency.to_string(), prefix.into());
        self
    }

    /// Value of a variant
    pub fn variant(&self, name: &str) -> Option<&VariantValue> {
        self.variants.get(name)
    }

    /// Whether a boolean variant is on; non-boolean or missing variants are off
    pub fn is_enabled(&self, name: &str) -> bool {
        matches!(self.variants.get(name), Some(VariantValue::Bool(true)))
    }

    /// Install prefix of a dependency
    pub fn prefix(&self, dependency: &str) -> Result<&Path, RecipeError> {
        self.prefixes
            .get(dependency)
            .map(PathBuf::as_path)
            .ok_or_else(|| RecipeError::MissingDependencyPrefix {
                package: self.name.clone(),
                dependency: dependency.to_string(),
            })
    }

    /// Whether this spec meets `constraint`
    ///
    /// A variant the spec doesn't have satisfies neither `+name` nor `~name`.
    pub fn satisfies(&self, constraint: &Constraint) -> bool {
        if constraint.name.as_ref().is_some_and(|n| *n != self.name) {
            return false;
        }
        let on = constraint.enabled.iter().all(|v| self.is_enabled(v));
        let off = constraint
            .disabled
            .iter()
            .all(|v| matches!(self.variants.get(v), Some(VariantValue::Bool(false))));
        let values = constraint
            .values
            .iter()
            .all(|(key, value)| self.has_value(key, value));
        let version = match (&constraint.version, &self.version) {
            (None, _) => true,
            (Some(bound), Some(version)) => bound.admits(version),
            (Some(_), None) => false,
        };
        let compiler = constraint
            .compiler
            .as_ref()
            .map_or(true, |c| *c == self.compiler);
        on && off && values && version && compiler
    }

    fn has_value(&self, key: &str, expected: &str) -> bool {
        match self.variants.get(key) {
            Some(VariantValue::Single(v)) => v == expected,
            Some(VariantValue::Multi(values)) => expected
                .split(',')
                .all(|e| values.iter().any(|v| v == e)),
            Some(VariantValue::Bool(b)) => b.to_string() == expected.to_ascii_lowercase(),
            None => false,
        }
    }
}

fn resolve_version(
    definition: &PackageDefinition,
    bound: Option<&VersionBound>,
) -> Result<Option<String>, RecipeError> {
    let Some(bound) = bound else {
        return Ok(definition.default_version().map(|v| v.name.clone()));
    };

    if definition.versions.is_empty() {
        return Ok(match bound {
            VersionBound::Exact(v) | VersionBound::AtLeast(v) => Some(v.clone()),
        });
    }

    definition
        .versions
        .iter()
        .find(|v| bound.admits(&v.name))
        .map(|v| Some(v.name.clone()))
        .ok_or_else(|| RecipeError::UnknownVersion {
            package: definition.name.clone(),
            version: bound.to_string().trim_start_matches('@').to_string(),
            available: definition.versions.iter().map(|v| v.name.clone()).collect(),
        })
}

fn passthrough(
    definition: &PackageDefinition,
    name: &str,
    value: VariantValue,
) -> Result<VariantValue, RecipeError> {
    if definition.extends.is_some() {
        Ok(value)
    } else {
        Err(VariantError::Unknown {
            package: definition.name.clone(),
            name: name.to_string(),
        }
        .into())
    }
}
