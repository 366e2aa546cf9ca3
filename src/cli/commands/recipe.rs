//! CLI implementation of `exawind-bootstrap recipe`
//!
//! Read-only views of the package recipes and their flag translation.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::cli::output::{is_json, print_json};
use crate::core::constraint::Constraint;
use crate::core::host::Host;
use crate::core::package::{Dependency, PackageDefinition};
use crate::core::recipes::{self, RecipeKind};
use crate::core::spec::ResolvedSpec;
use crate::core::variant::VariantKind;
use crate::infra::filesystem::resolve_path;

#[derive(Serialize)]
struct RecipeSummary {
    name: &'static str,
    kind: RecipeKind,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_version: Option<String>,
}

#[derive(Serialize)]
struct RecipeInfo<'a> {
    definition: &'a PackageDefinition,
    spec: &'a ResolvedSpec,
    active_dependencies: Vec<&'a Dependency>,
}

#[derive(Serialize)]
struct RecipeArgs<'a> {
    name: &'a str,
    args: &'a [String],
}

/// List all recipes
pub fn list() -> Result<()> {
    let host = Host::detect();
    let mut summaries = Vec::new();
    for recipe in recipes::all() {
        let def = recipe.definition(&host)?;
        summaries.push(RecipeSummary {
            name: recipe.name,
            kind: recipe.kind(),
            description: def.description,
            default_version: def.versions.first().map(|v| v.name.clone()),
        });
    }

    if is_json() {
        return print_json(&summaries);
    }
    let width = summaries.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for summary in &summaries {
        let version = summary.default_version.as_deref().unwrap_or("-");
        println!("{:<width$}  {:<12}  {}", summary.name, version, summary.description);
    }
    Ok(())
}

/// Show a recipe resolved against `constraint`
pub fn info(name: &str, constraint: &[String]) -> Result<()> {
    let recipe = recipes::find(name)?;
    let host = Host::detect();
    let def = recipe.definition(&host)?;
    let spec = ResolvedSpec::resolve(&def, &host, &parse_request(constraint)?)
        .with_context(|| format!("Invalid configuration for {name}"))?;
    let active_dependencies = def.active_dependencies(&spec);

    if is_json() {
        return print_json(&RecipeInfo {
            definition: &def,
            spec: &spec,
            active_dependencies,
        });
    }

    println!("{} - {}", def.name, def.description);
    println!("  homepage: {}", def.homepage);
    println!("  git:      {}", def.git);
    if let Some(upstream) = &def.extends {
        println!("  extends:  {upstream}");
    }
    if !def.maintainers.is_empty() {
        println!("  maintainers: {}", def.maintainers.join(", "));
    }
    if !def.versions.is_empty() {
        let versions: Vec<&str> = def.versions.iter().map(|v| v.name.as_str()).collect();
        println!("  versions: {}", versions.join(", "));
    }

    if !spec.variants.is_empty() {
        println!();
        println!("Variants:");
        for (variant, value) in &spec.variants {
            match def.variant(variant) {
                Some(variant_def) => {
                    let kind = match variant_def.kind {
                        VariantKind::Bool => "bool",
                        VariantKind::Single { .. } => "value",
                        VariantKind::Multi { .. } => "multi",
                    };
                    println!(
                        "  {variant:<16} {:<10} [{kind}] {}",
                        value.to_string(),
                        variant_def.description
                    );
                }
                None => println!("  {variant:<16} {value} [upstream]"),
            }
        }
    }

    if !active_dependencies.is_empty() {
        println!();
        println!("Dependencies:");
        for dep in active_dependencies {
            println!("  {} ({:?})", dep.spec, dep.dep_type);
        }
    }
    Ok(())
}

/// Print CMake arguments for a configuration
pub fn args(
    name: &str,
    constraint: &[String],
    prefixes: &[String],
    compiler: Option<&str>,
    base_args: Vec<String>,
) -> Result<()> {
    let recipe = recipes::find(name)?;
    let host = Host::detect();
    let mut request = parse_request(constraint)?;
    if let Some(compiler) = compiler {
        request.compiler = Some(compiler.to_string());
    }

    let mut spec = recipe
        .resolve(&host, &request)
        .with_context(|| format!("Invalid configuration for {name}"))?;
    for (dependency, path) in parse_prefixes(prefixes)? {
        spec = spec.with_prefix(&dependency, path);
    }

    let args = recipe.translate(&spec, base_args)?;
    tracing::info!("{} CMake arguments for {}", args.len(), name);

    if is_json() {
        return print_json(&RecipeArgs { name, args: &args });
    }
    for arg in &args {
        println!("{arg}");
    }
    Ok(())
}

fn parse_request(tokens: &[String]) -> Result<Constraint> {
    let input = tokens.join(" ");
    Constraint::parse(&input).with_context(|| format!("Invalid constraint '{input}'"))
}

/// Parse `dep=PATH` pairs; paths are expanded and made absolute
fn parse_prefixes(values: &[String]) -> Result<Vec<(String, PathBuf)>> {
    values
        .iter()
        .map(|value| match value.split_once('=') {
            Some((dependency, path)) if !dependency.is_empty() && !path.is_empty() => {
                Ok((dependency.to_string(), resolve_path(path)))
            }
            _ => bail!("Invalid prefix '{value}': expected DEP=PATH"),
        })
        .collect()
}
