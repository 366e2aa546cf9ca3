//! TIOGA utilities: mesh generation and overset connectivity tools

use crate::core::cmake::{define_bool, define_path, flags_for_variant};
use crate::core::host::Host;
use crate::core::package::{Dependency, PackageDefinition, VersionDeclaration};
use crate::core::recipes::cuda;
use crate::core::spec::ResolvedSpec;
use crate::core::variant::VariantDefinition;
use crate::error::RecipeError;

pub const NAME: &str = "tioga-utils";

pub fn definition(host: &Host) -> Result<PackageDefinition, RecipeError> {
    let mut def = PackageDefinition::cmake(
        NAME,
        "ExaWind TIOGA utilities",
        "https://github.com/sayerhs/tioga_utils",
        "https://github.com/sayerhs/tioga_utils.git",
    );
    def.maintainers = vec!["sayerhs".to_string()];
    def.versions.push(VersionDeclaration::branch("exawind", true));

    def.variants = vec![
        VariantDefinition::bool("shared", !host.platform.is_darwin(), "Build shared libraries"),
        VariantDefinition::bool("pic", true, "Position independent code"),
        VariantDefinition::bool("nalu", false, "Link to Nalu-Wind"),
    ];

    def.dependencies = vec![
        Dependency::on_when("kokkos-nvcc-wrapper", "+cuda")?,
        Dependency::on("trilinos")?,
        Dependency::on("tioga")?,
        Dependency::on("yaml-cpp")?,
        Dependency::on_when("nalu-wind", "+nalu")?,
    ];
    cuda::add_to(&mut def)?;
    Ok(def)
}

pub fn cmake_args(spec: &ResolvedSpec) -> Result<Vec<String>, RecipeError> {
    let mut args = flags_for_variant(spec, "BUILD_SHARED_LIBS", "shared")?;
    args.extend(flags_for_variant(spec, "CMAKE_POSITION_INDEPENDENT_CODE", "pic")?);
    args.extend([
        define_path("Trilinos_DIR", spec.prefix("trilinos")?),
        define_path("TIOGA_DIR", spec.prefix("tioga")?),
        define_path("YAML_DIR", spec.prefix("yaml-cpp")?),
    ]);
    args.extend(flags_for_variant(spec, "ENABLE_NALU", "nalu")?);

    if spec.is_enabled("nalu") {
        args.push(define_path("NALU_DIR", spec.prefix("nalu-wind")?));
    }

    if spec.host.platform.is_darwin() {
        args.push(define_bool("CMAKE_MACOSX_RPATH", true));
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constraint::Constraint;
    use crate::core::package::DependencyType;

    fn spec(request: &str, host: &Host) -> ResolvedSpec {
        let def = definition(host).unwrap();
        ResolvedSpec::resolve(&def, host, &Constraint::parse(request).unwrap())
            .unwrap()
            .with_prefix("trilinos", "/opt/trilinos")
            .with_prefix("tioga", "/opt/tioga")
            .with_prefix("yaml-cpp", "/opt/yaml-cpp")
    }

    #[test]
    fn test_default_args() {
        let args = cmake_args(&spec("", &Host::linux())).unwrap();
        assert_eq!(
            args,
            vec![
                "-DBUILD_SHARED_LIBS:BOOL=ON",
                "-DCMAKE_POSITION_INDEPENDENT_CODE:BOOL=ON",
                "-DTrilinos_DIR:STRING=/opt/trilinos",
                "-DTIOGA_DIR:STRING=/opt/tioga",
                "-DYAML_DIR:STRING=/opt/yaml-cpp",
                "-DENABLE_NALU:BOOL=OFF",
            ]
        );
    }

    #[test]
    fn test_nalu_needs_prefix() {
        let with_nalu = spec("+nalu", &Host::linux());
        assert!(matches!(
            cmake_args(&with_nalu),
            Err(RecipeError::MissingDependencyPrefix { ref dependency, .. }) if dependency == "nalu-wind"
        ));

        let args = cmake_args(&with_nalu.with_prefix("nalu-wind", "/opt/nalu")).unwrap();
        assert!(args.contains(&"-DENABLE_NALU:BOOL=ON".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("-DNALU_DIR:STRING=/opt/nalu"));
    }

    #[test]
    fn test_darwin() {
        let args = cmake_args(&spec("", &Host::darwin())).unwrap();
        assert_eq!(args[0], "-DBUILD_SHARED_LIBS:BOOL=OFF");
        assert_eq!(args.last().map(String::as_str), Some("-DCMAKE_MACOSX_RPATH:BOOL=ON"));
    }

    #[test]
    fn test_missing_required_prefix() {
        let host = Host::linux();
        let def = definition(&host).unwrap();
        let bare = ResolvedSpec::resolve(&def, &host, &Constraint::default()).unwrap();
        assert!(matches!(
            cmake_args(&bare),
            Err(RecipeError::MissingDependencyPrefix { ref dependency, .. }) if dependency == "trilinos"
        ));
    }

    #[test]
    fn test_dependencies() {
        let host = Host::linux();
        let def = definition(&host).unwrap();
        let names: Vec<&str> = def
            .active_dependencies(&spec("+nalu", &host))
            .into_iter()
            .map(|d| d.name())
            .collect();
        assert_eq!(names, vec!["trilinos", "tioga", "yaml-cpp", "nalu-wind"]);
    }

    #[test]
    fn test_cuda_links_nvcc_wrapper() {
        let host = Host::linux();
        let def = definition(&host).unwrap();
        let cuda = spec("+cuda", &host);
        let wrapper = def
            .active_dependencies(&cuda)
            .into_iter()
            .find(|d| d.name() == "kokkos-nvcc-wrapper")
            .unwrap();
        assert_eq!(wrapper.dep_type, DependencyType::Link);
        assert_eq!(def.description, "ExaWind TIOGA utilities");
        assert_eq!(def.variant("nalu").unwrap().description, "Link to Nalu-Wind");
    }
}
