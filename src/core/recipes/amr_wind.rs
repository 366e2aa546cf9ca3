//! AMR-Wind: block-structured, incompressible flow solver

use crate::core::cmake::{define_bool, define_list, define_path, flags_for_variants};
use crate::core::host::{Generator, Host};
use crate::core::package::{Condition, Dependency, PackageDefinition, VersionDeclaration};
use crate::core::recipes::cuda;
use crate::core::spec::ResolvedSpec;
use crate::core::variant::{VariantDefinition, VariantValue};
use crate::error::RecipeError;

pub const NAME: &str = "amr-wind";

/// Variants mapped to `AMR_WIND_ENABLE_<NAME>`, in flag order
const ENABLE_VARIANTS: &[&str] = &["mpi", "cuda", "openmp", "netcdf", "hypre", "masa", "tests"];

pub fn definition(_host: &Host) -> Result<PackageDefinition, RecipeError> {
    let mut def = PackageDefinition::cmake(
        NAME,
        "ExaWind AMR-Wind block-structured, incompressible solver",
        "https://exawind.github.io/amr-wind",
        "https://github.com/exawind/amr-wind",
    );
    def.maintainers = ["sayerhs", "jrood-nrel", "michaeljbrazell"]
        .map(String::from)
        .to_vec();
    def.versions.push(VersionDeclaration::branch("development", true));

    def.variants = vec![
        VariantDefinition::bool("unit", true, "Build unit tests"),
        VariantDefinition::bool("tests", true, "Activate regression tests"),
        VariantDefinition::bool("mpi", true, "Enable MPI"),
        VariantDefinition::bool("openmp", false, "Enable OpenMP"),
        VariantDefinition::bool("netcdf", true, "Enable NetCDF support"),
        VariantDefinition::bool("hypre", true, "Enable hypre integration"),
        VariantDefinition::bool("masa", false, "Enable MASA integration"),
        VariantDefinition::bool("internal-amrex", true, "Use AMReX submodule to build"),
    ];

    def.dependencies = vec![
        Dependency::on("ninja-fortran")?
            .build_only()
            .with_condition(Condition::Generator(Generator::Ninja)),
        Dependency::on_when("amrex", "~internal-amrex")?,
        Dependency::on_when("mpi", "+mpi")?,
        Dependency::on_when("netcdf-c", "+netcdf")?,
        Dependency::on_when("hypre", "+hypre")?,
        Dependency::on_when("masa", "+masa")?,
    ];
    cuda::add_to(&mut def)?;
    Ok(def)
}

pub fn cmake_args(spec: &ResolvedSpec) -> Result<Vec<String>, RecipeError> {
    let mut args = flags_for_variants(spec, "AMR_WIND_ENABLE_", ENABLE_VARIANTS)?;

    args.extend([
        define_bool("CMAKE_EXPORT_COMPILE_COMMANDS", true),
        define_bool("AMR_WIND_ENABLE_ALL_WARNINGS", true),
        define_bool("AMR_WIND_TEST_WITH_FCOMPARE", spec.is_enabled("tests")),
    ]);

    if spec.is_enabled("cuda") {
        let codes: &[String] = match spec.variant("cuda_arch") {
            Some(VariantValue::Multi(codes)) => codes.as_slice(),
            _ => &[],
        };
        let amrex_arch = cuda::amrex_cuda_arch(codes);
        if amrex_arch.is_empty() {
            if !codes.is_empty() {
                tracing::warn!(
                    "None of cuda_arch={} is known to AMReX; building without AMReX_CUDA_ARCH",
                    codes.join(",")
                );
            }
        } else {
            args.push(define_list("AMReX_CUDA_ARCH", &amrex_arch));
        }
    }

    if spec.is_enabled("internal-amrex") {
        args.push(define_bool("AMR_WIND_USE_INTERNAL_AMREX", true));
    } else {
        args.push(define_bool("AMR_WIND_USE_INTERNAL_AMREX", false));
        args.push(define_path("AMReX_ROOT", spec.prefix("amrex")?));
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constraint::Constraint;

    fn spec(request: &str, host: &Host) -> ResolvedSpec {
        let def = definition(host).unwrap();
        ResolvedSpec::resolve(&def, host, &Constraint::parse(request).unwrap()).unwrap()
    }

    #[test]
    fn test_default_args() {
        let args = cmake_args(&spec("", &Host::linux())).unwrap();
        assert_eq!(
            args,
            vec![
                "-DAMR_WIND_ENABLE_MPI:BOOL=ON",
                "-DAMR_WIND_ENABLE_CUDA:BOOL=OFF",
                "-DAMR_WIND_ENABLE_OPENMP:BOOL=OFF",
                "-DAMR_WIND_ENABLE_NETCDF:BOOL=ON",
                "-DAMR_WIND_ENABLE_HYPRE:BOOL=ON",
                "-DAMR_WIND_ENABLE_MASA:BOOL=OFF",
                "-DAMR_WIND_ENABLE_TESTS:BOOL=ON",
                "-DCMAKE_EXPORT_COMPILE_COMMANDS:BOOL=ON",
                "-DAMR_WIND_ENABLE_ALL_WARNINGS:BOOL=ON",
                "-DAMR_WIND_TEST_WITH_FCOMPARE:BOOL=ON",
                "-DAMR_WIND_USE_INTERNAL_AMREX:BOOL=ON",
            ]
        );
    }

    #[test]
    fn test_cuda_arch_flag() {
        let args = cmake_args(&spec("+cuda cuda_arch=70,99,80", &Host::linux())).unwrap();
        assert!(args.contains(&"-DAMR_WIND_ENABLE_CUDA:BOOL=ON".to_string()));
        assert!(args.contains(&"-DAMReX_CUDA_ARCH:STRING=7.0;8.0".to_string()));
    }

    #[test]
    fn test_cuda_without_known_arch_emits_no_arch_flag() {
        for request in ["+cuda", "+cuda cuda_arch=99"] {
            let args = cmake_args(&spec(request, &Host::linux())).unwrap();
            assert!(!args.iter().any(|a| a.contains("AMReX_CUDA_ARCH")), "{request}: {args:?}");
        }
    }

    #[test]
    fn test_cuda_arch_ignored_without_cuda() {
        let args = cmake_args(&spec("cuda_arch=70", &Host::linux())).unwrap();
        assert!(!args.iter().any(|a| a.contains("AMReX_CUDA_ARCH")));
    }

    #[test]
    fn test_external_amrex_needs_prefix() {
        let external = spec("~internal-amrex", &Host::linux());
        assert!(matches!(
            cmake_args(&external),
            Err(RecipeError::MissingDependencyPrefix { .. })
        ));

        let args = cmake_args(&external.with_prefix("amrex", "/opt/amrex")).unwrap();
        let tail = &args[args.len() - 2..];
        assert_eq!(
            tail,
            ["-DAMR_WIND_USE_INTERNAL_AMREX:BOOL=OFF", "-DAMReX_ROOT:STRING=/opt/amrex"]
        );
    }

    #[test]
    fn test_tests_off_disables_fcompare() {
        let args = cmake_args(&spec("~tests", &Host::linux())).unwrap();
        assert!(args.contains(&"-DAMR_WIND_TEST_WITH_FCOMPARE:BOOL=OFF".to_string()));
    }

    #[test]
    fn test_dependencies() {
        let host = Host::new(crate::core::host::Platform::Linux, Generator::Ninja);
        let def = definition(&host).unwrap();
        let s = spec("~internal-amrex~hypre+masa", &host);
        let names: Vec<&str> = def.active_dependencies(&s).into_iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["ninja-fortran", "amrex", "mpi", "netcdf-c", "masa"]);

        let def = definition(&Host::linux()).unwrap();
        let s = spec("+cuda", &Host::linux());
        let names: Vec<&str> = def.active_dependencies(&s).into_iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["mpi", "netcdf-c", "hypre", "cuda"]);
    }
}
