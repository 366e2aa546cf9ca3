//! Package recipes
//!
//! Each recipe pairs a definition builder with a translation from a
//! [`ResolvedSpec`] to CMake arguments. Native recipes produce the full
//! argument list; overlays patch the list produced by the recipe they extend.
//!
//! # Submodules
//!
//! - [`amr_wind`] - AMR-Wind
//! - [`nalu_wind`] - Nalu-Wind
//! - [`tioga_utils`] - TIOGA utilities
//! - [`trilinos`] - Trilinos overlay
//! - [`cuda`] - CUDA capability shared by the GPU recipes

pub mod amr_wind;
pub mod cuda;
pub mod nalu_wind;
pub mod tioga_utils;
pub mod trilinos;

use serde::Serialize;

use crate::core::constraint::Constraint;
use crate::core::host::Host;
use crate::core::package::PackageDefinition;
use crate::core::spec::ResolvedSpec;
use crate::error::RecipeError;

/// How a recipe produces its CMake arguments
#[derive(Debug, Clone, Copy)]
pub enum Translation {
    /// Builds the whole argument list
    Native(fn(&ResolvedSpec) -> Result<Vec<String>, RecipeError>),
    /// Patches the argument list of the upstream recipe
    Overlay(fn(Vec<String>, &ResolvedSpec) -> Vec<String>),
}

/// A registered recipe
#[derive(Debug, Clone, Copy)]
pub struct Recipe {
    pub name: &'static str,
    pub definition: fn(&Host) -> Result<PackageDefinition, RecipeError>,
    pub translation: Translation,
}

/// Kind of recipe, as reported by `recipe list`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeKind {
    Native,
    Overlay,
}

impl Recipe {
    pub fn kind(&self) -> RecipeKind {
        match self.translation {
            Translation::Native(_) => RecipeKind::Native,
            Translation::Overlay(_) => RecipeKind::Overlay,
        }
    }

    /// Build the package definition for `host`
    pub fn definition(&self, host: &Host) -> Result<PackageDefinition, RecipeError> {
        (self.definition)(host)
    }

    /// Resolve a request against this recipe's definition
    pub fn resolve(&self, host: &Host, request: &Constraint) -> Result<ResolvedSpec, RecipeError> {
        ResolvedSpec::resolve(&self.definition(host)?, host, request)
    }

    /// CMake arguments for `spec`
    ///
    /// `base` is the argument list of the upstream recipe; native recipes
    /// ignore it.
    pub fn translate(&self, spec: &ResolvedSpec, base: Vec<String>) -> Result<Vec<String>, RecipeError> {
        match self.translation {
            Translation::Native(translate) => translate(spec),
            Translation::Overlay(patch) => Ok(patch(base, spec)),
        }
    }

    /// CMake arguments for `spec` with no upstream arguments
    pub fn cmake_args(&self, spec: &ResolvedSpec) -> Result<Vec<String>, RecipeError> {
        self.translate(spec, Vec::new())
    }
}

static RECIPES: &[Recipe] = &[
    Recipe {
        name: amr_wind::NAME,
        definition: amr_wind::definition,
        translation: Translation::Native(amr_wind::cmake_args),
    },
    Recipe {
        name: nalu_wind::NAME,
        definition: nalu_wind::definition,
        translation: Translation::Native(nalu_wind::cmake_args),
    },
    Recipe {
        name: tioga_utils::NAME,
        definition: tioga_utils::definition,
        translation: Translation::Native(tioga_utils::cmake_args),
    },
    Recipe {
        name: trilinos::NAME,
        definition: trilinos::definition,
        translation: Translation::Overlay(trilinos::patch),
    },
];

/// All recipes, sorted by name
pub fn all() -> &'static [Recipe] {
    RECIPES
}

/// Look up a recipe by name
pub fn find(name: &str) -> Result<&'static Recipe, RecipeError> {
    RECIPES
        .iter()
        .find(|r| r.name == name)
        .ok_or_else(|| RecipeError::NotFound {
            name: name.to_string(),
        })
}
