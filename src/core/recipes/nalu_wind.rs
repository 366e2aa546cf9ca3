//! Nalu-Wind: unstructured, incompressible CFD solver

use crate::core::cmake::{define_bool, flags_for_variant, flags_for_variants};
use crate::core::host::Host;
use crate::core::package::{Dependency, PackageDefinition, VersionDeclaration};
use crate::core::recipes::cuda;
use crate::core::spec::ResolvedSpec;
use crate::core::variant::{ValueCheck, VariantDefinition};
use crate::error::RecipeError;

pub const NAME: &str = "nalu-wind";

/// Variants mapped to `ENABLE_<NAME>`, in flag order
const ENABLE_VARIANTS: &[&str] = &["cuda", "openfast", "tioga", "hypre", "fftw", "openmp", "boost", "tests"];

pub fn definition(host: &Host) -> Result<PackageDefinition, RecipeError> {
    let mut def = PackageDefinition::cmake(
        NAME,
        "ExaWind Nalu-Wind unstructured, incompressible CFD solver",
        "https://nalu-wind.readthedocs.io",
        "https://github.com/exawind/nalu-wind.git",
    );
    def.maintainers = vec!["sayerhs".to_string(), "jrood-nrel".to_string()];
    def.versions.push(VersionDeclaration::branch("master", true));

    def.variants = vec![
        VariantDefinition::bool("shared", !host.platform.is_darwin(), "Build shared libraries"),
        VariantDefinition::bool("pic", true, "Enable position independent code"),
        VariantDefinition::bool("openfast", true, "Enable OpenFAST integration"),
        VariantDefinition::bool("tioga", true, "Enable TIOGA integration"),
        VariantDefinition::bool("hypre", true, "Enable hypre integration"),
        VariantDefinition::bool("fftw", false, "Enable FFTW integration"),
        VariantDefinition::bool("openmp", false, "Enable OpenMP support"),
        VariantDefinition::bool("boost", false, "Enable Boost integration"),
        VariantDefinition::bool("tests", true, "Activate regression testing"),
        VariantDefinition::single(
            "abs_tol",
            "1.0e-15",
            ValueCheck::PositiveFloat,
            "Absolute tolerance for tests",
        ),
        VariantDefinition::single(
            "rel_tol",
            "1.0e-12",
            ValueCheck::PositiveFloat,
            "Relative tolerance for tests",
        ),
    ];

    def.dependencies = vec![
        Dependency::on("mpi")?,
        Dependency::on_when("kokkos-nvcc-wrapper", "+cuda")?.build_only(),
        Dependency::on_when("trilinos+cuda+wrapper", "+cuda")?,
        Dependency::on_when("trilinos~cuda~wrapper", "~cuda")?,
        Dependency::on("yaml-cpp@0.6.2:")?,
        Dependency::on_when("openfast+cxx", "+openfast")?,
        Dependency::on_when("tioga", "+tioga")?,
        Dependency::on_when("hypre+mpi+int64~superlu-dist", "+hypre~cuda")?,
        Dependency::on_when("hypre+mpi~int64~superlu-dist@2.18.2:", "+hypre+cuda")?,
        Dependency::on_when("fftw", "+fftw")?,
        Dependency::on_when("boost cxxstd=14", "+boost")?,
    ];
    cuda::add_to(&mut def)?;
    Ok(def)
}

pub fn cmake_args(spec: &ResolvedSpec) -> Result<Vec<String>, RecipeError> {
    let mut args = flags_for_variant(spec, "BUILD_SHARED_LIBS", "shared")?;
    args.extend(flags_for_variant(spec, "CMAKE_POSITION_INDEPENDENT_CODE", "pic")?);
    args.push(define_bool("CMAKE_EXPORT_COMPILE_COMMANDS", true));
    args.extend(flags_for_variants(spec, "ENABLE_", ENABLE_VARIANTS)?);

    if spec.host.platform.is_darwin() {
        args.push(define_bool("CMAKE_MACOSX_RPATH", true));
    }

    if spec.is_enabled("tests") {
        args.extend(flags_for_variant(spec, "TEST_TOLERANCE", "abs_tol")?);
        args.extend(flags_for_variant(spec, "TEST_REL_TOL", "rel_tol")?);
    }

    Ok(args)
}
