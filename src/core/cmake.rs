//! CMake argument construction
//!
//! Builds `-D<NAME>:<TYPE>=<value>` cache definitions the way spack's
//! `CMakePackage.define` does: booleans become `BOOL` with `ON`/`OFF`,
//! everything else becomes `STRING`, lists are joined with `;`.

use std::path::Path;

use crate::core::spec::ResolvedSpec;
use crate::core::variant::VariantValue;
use crate::error::VariantError;

/// `-D<name>:BOOL=ON|OFF`
pub fn define_bool(name: &str, value: bool) -> String {
    format!("-D{name}:BOOL={}", if value { "ON" } else { "OFF" })
}

/// `-D<name>:STRING=<value>`
pub fn define_string(name: &str, value: &str) -> String {
    format!("-D{name}:STRING={value}")
}

/// `-D<name>:STRING=<a;b;c>`
pub fn define_list(name: &str, values: &[String]) -> String {
    define_string(name, &values.join(";"))
}

/// Install prefix as a `STRING` definition
pub fn define_path(name: &str, path: &Path) -> String {
    define_string(name, &path.display().to_string())
}

/// Flags for one variant
///
/// A boolean variant yields one `BOOL` flag, a valued variant one `STRING`
/// flag carrying the value verbatim, a multi-valued variant one joined flag,
/// or none when it holds no values.
pub fn flags_for_variant(
    spec: &ResolvedSpec,
    cmake_name: &str,
    variant: &str,
) -> Result<Vec<String>, VariantError> {
    let value = spec.variant(variant).ok_or_else(|| VariantError::Unknown {
        package: spec.name.clone(),
        name: variant.to_string(),
    })?;
    Ok(match value {
        VariantValue::Bool(on) => vec![define_bool(cmake_name, *on)],
        VariantValue::Single(v) => vec![define_string(cmake_name, v)],
        VariantValue::Multi(values) if values.is_empty() => Vec::new(),
        VariantValue::Multi(values) => vec![define_list(cmake_name, values)],
    })
}

/// Flags for several variants named `<prefix><VARIANT>` in upper case
pub fn flags_for_variants(
    spec: &ResolvedSpec,
    prefix: &str,
    variants: &[&str],
) -> Result<Vec<String>, VariantError> {
    let mut flags = Vec::new();
    for variant in variants {
        let cmake_name = format!("{prefix}{}", variant.to_uppercase().replace('-', "_"));
        flags.extend(flags_for_variant(spec, &cmake_name, variant)?);
    }
    Ok(flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constraint::Constraint;
    use crate::core::host::Host;
    use crate::core::package::PackageDefinition;
    use crate::core::variant::{ValueCheck, VariantDefinition};

    fn spec(request: &str) -> ResolvedSpec {
        let mut def = PackageDefinition::cmake("pkg", "Pkg", "https://x", "https://x.git");
        def.variants = vec![
            VariantDefinition::bool("mpi", true, "MPI"),
            VariantDefinition::bool("internal-amrex", false, "AMReX"),
            VariantDefinition::single("abs_tol", "1.0e-15", ValueCheck::PositiveFloat, "tol"),
            VariantDefinition::multi("cuda_arch", ValueCheck::Digits, "archs"),
        ];
        ResolvedSpec::resolve(&def, &Host::linux(), &Constraint::parse(request).unwrap()).unwrap()
    }

    #[test]
    fn test_define_helpers() {
        assert_eq!(define_bool("X", true), "-DX:BOOL=ON");
        assert_eq!(define_bool("X", false), "-DX:BOOL=OFF");
        assert_eq!(define_string("X", "a b"), "-DX:STRING=a b");
        assert_eq!(define_list("X", &["7.0".to_string(), "8.0".to_string()]), "-DX:STRING=7.0;8.0");
        assert_eq!(define_path("X_DIR", Path::new("/opt/x")), "-DX_DIR:STRING=/opt/x");
    }

    #[test]
    fn test_flags_for_bool_and_valued_variants() {
        let spec = spec("~mpi abs_tol=1e-9");
        assert_eq!(flags_for_variant(&spec, "ENABLE_MPI", "mpi").unwrap(), vec!["-DENABLE_MPI:BOOL=OFF"]);
        assert_eq!(
            flags_for_variant(&spec, "TEST_TOLERANCE", "abs_tol").unwrap(),
            vec!["-DTEST_TOLERANCE:STRING=1e-9"]
        );
    }

    #[test]
    fn test_flags_for_multi_variant() {
        assert!(flags_for_variant(&spec(""), "ARCH", "cuda_arch").unwrap().is_empty());
        assert_eq!(
            flags_for_variant(&spec("cuda_arch=70,80"), "ARCH", "cuda_arch").unwrap(),
            vec!["-DARCH:STRING=70;80"]
        );
    }

    #[test]
    fn test_flags_for_unknown_variant() {
        assert!(matches!(
            flags_for_variant(&spec(""), "X", "nope"),
            Err(VariantError::Unknown { .. })
        ));
    }

    #[test]
    fn test_flags_for_variants_in_order() {
        let flags = flags_for_variants(&spec(""), "USE_", &["mpi", "internal-amrex"]).unwrap();
        assert_eq!(flags, vec!["-DUSE_MPI:BOOL=ON", "-DUSE_INTERNAL_AMREX:BOOL=OFF"]);
    }
}
