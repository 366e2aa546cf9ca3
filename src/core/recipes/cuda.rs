//! CUDA capability shared by GPU-enabled recipes
//!
//! Recipes compose this in rather than inheriting it: [`add_to`] appends the
//! `cuda` and `cuda_arch` variants and the `cuda` dependency to a definition.

use crate::core::package::{Dependency, PackageDefinition};
use crate::core::variant::{ValueCheck, VariantDefinition};
use crate::error::SpecError;

/// Compute capability code to the dotted form AMReX expects
pub const AMREX_ARCH_TABLE: &[(&str, &str)] = &[
    ("20", "2.0"),
    ("21", "2.1"),
    ("30", "3.0"),
    ("32", "3.2"),
    ("35", "3.5"),
    ("37", "3.7"),
    ("50", "5.0"),
    ("52", "5.2"),
    ("53", "5.3"),
    ("60", "6.0"),
    ("61", "6.1"),
    ("62", "6.2"),
    ("70", "7.0"),
    ("72", "7.2"),
    ("75", "7.5"),
    ("80", "8.0"),
    ("86", "8.6"),
];

/// Add the CUDA variants and dependency to `definition`
pub fn add_to(definition: &mut PackageDefinition) -> Result<(), SpecError> {
    definition
        .variants
        .push(VariantDefinition::bool("cuda", false, "Build with CUDA"));
    definition.variants.push(VariantDefinition::multi(
        "cuda_arch",
        ValueCheck::Digits,
        "CUDA architecture (compute capability codes, e.g. 70,80)",
    ));
    definition.dependencies.push(Dependency::on_when("cuda", "+cuda")?);
    Ok(())
}

/// Translate compute capability codes to AMReX architecture strings
///
/// Codes missing from [`AMREX_ARCH_TABLE`] are dropped; this never fails.
pub fn amrex_cuda_arch(codes: &[String]) -> Vec<String> {
    codes
        .iter()
        .filter_map(|code| {
            let arch = AMREX_ARCH_TABLE
                .iter()
                .find(|(known, _)| *known == code.as_str())
                .map(|(_, dotted)| (*dotted).to_string());
            if arch.is_none() {
                tracing::debug!("Dropping unknown CUDA architecture '{}'", code);
            }
            arch
        })
        .collect()
}
