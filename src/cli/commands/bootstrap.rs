//! CLI implementation of the default bootstrap run

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::output::{create_spinner, is_json, print_detail, print_info, print_json, print_success, print_warning};
use crate::cli::BootstrapArgs;
use crate::config::defaults::ENV_SPACK_ROOT;
use crate::core::bootstrap::{BootstrapOptions, BootstrapReport, Bootstrapper, CompilerDiscovery, SpackOrigin};
use crate::core::global_config::{BootstrapConfig, BootstrapSettings};
use crate::core::host::Platform;
use crate::infra::dirs::ExawindDirs;
use crate::infra::process::SystemRunner;

/// Execute the bootstrap
pub fn execute(args: BootstrapArgs) -> Result<()> {
    let dirs = ExawindDirs::new();
    let config = BootstrapConfig::load(&dirs).context("Failed to load global configuration")?;
    let settings = BootstrapSettings::resolve(args.into(), &config);

    let options = BootstrapOptions {
        project_dir: settings.project_dir.value,
        system: settings.system.value,
        builder_repo: settings.builder_repo.value,
        spack_repo: settings.spack_repo.value,
        spack_root: std::env::var_os(ENV_SPACK_ROOT)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from),
        platform: Platform::current(),
    };
    tracing::info!("Bootstrapping {} for system '{}'", options.project_dir.display(), options.system);

    let runner = SystemRunner;
    let mut bootstrapper = Bootstrapper::new(options, &runner);

    let spinner = create_spinner("Setting up ExaWind project...");
    let result = bootstrapper.run();
    spinner.finish_and_clear();
    let report = result?;

    if is_json() {
        return print_json(&report);
    }
    print_report(&report);
    Ok(())
}

fn print_report(report: &BootstrapReport) {
    let project = &report.project;
    if project.reused {
        print_info(&format!("Reusing existing project dir: {}", project.root.display()));
    } else {
        print_info(&format!("Created ExaWind project structure in {}", project.root.display()));
    }
    if project.builder_cloned {
        print_detail(&format!("Cloned exawind-builder into {}", project.builder.display()));
    } else {
        print_detail(&format!("Found exawind-builder in {}", project.builder.display()));
    }

    let spack = &report.spack;
    match spack.origin {
        SpackOrigin::Environment => print_info(&format!("Using spack from SPACK_ROOT: {}", spack.root.display())),
        SpackOrigin::Existing => print_info(&format!("Reusing spack instance: {}", spack.root.display())),
        SpackOrigin::Cloned => {
            print_info(&format!("Cloned spack into {}", spack.root.display()));
            for link in &spack.links {
                print_detail(&format!("{} -> {}", link.link.display(), link.target.display()));
            }
        }
    }
    match &spack.compiler_discovery {
        Some(CompilerDiscovery::Succeeded) => print_detail("Ran spack compiler find"),
        Some(CompilerDiscovery::Failed { detail }) => {
            print_warning(&format!("spack compiler find failed: {detail}"));
        }
        Some(CompilerDiscovery::NotNeeded) | None => {}
    }

    print_success(&format!(
        "ExaWind project ready in {} (system: {})",
        project.root.display(),
        report.system
    ));
}
