//! Trilinos overlay on the upstream recipe
//!
//! Inherits every version, variant and flag from the upstream definition and
//! patches the resulting argument list.

use crate::core::cmake::define_bool;
use crate::core::host::Host;
use crate::core::package::PackageDefinition;
use crate::core::spec::ResolvedSpec;
use crate::error::RecipeError;

pub const NAME: &str = "trilinos";

/// Upstream recipe this overlay extends
pub const UPSTREAM: &str = "builtin.trilinos";

pub fn definition(_host: &Host) -> Result<PackageDefinition, RecipeError> {
    let mut def = PackageDefinition::cmake(
        NAME,
        "Trilinos with ExaWind build adjustments",
        "https://trilinos.org",
        "https://github.com/trilinos/Trilinos.git",
    );
    def.extends = Some(UPSTREAM.to_string());
    Ok(def)
}

/// STKTools fails to build with the Intel compilers
pub fn patch(mut base: Vec<String>, spec: &ResolvedSpec) -> Vec<String> {
    if spec.compiler == "intel" {
        base.push(define_bool("Trilinos_ENABLE_STKTools", false));
    }
    base
}
