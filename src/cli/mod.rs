//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use anyhow::Result;
use clap::{Args, Parser};

use crate::config::defaults::{ENV_BUILDER_REPO, ENV_PROJECT_DIR, ENV_SPACK_REPO};
use crate::core::global_config::SettingOverrides;
use commands::Commands;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ", built ",
    env!("VERGEN_BUILD_TIMESTAMP"),
    " for ",
    env!("VERGEN_CARGO_TARGET_TRIPLE"),
    ")"
);

/// ExaWind project bootstrap
///
/// Without a subcommand, sets up an ExaWind project: fetches exawind-builder
/// and spack and links the system's spack configuration.
#[derive(Parser, Debug)]
#[command(name = "exawind-bootstrap")]
#[command(author, version, long_version = LONG_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub bootstrap: BootstrapArgs,

    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format for scripting
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options of the bootstrap run
#[derive(Args, Debug, Clone, Default)]
pub struct BootstrapArgs {
    /// Directory where the ExaWind project is installed [default: ~/exawind]
    #[arg(short, long, env = ENV_PROJECT_DIR)]
    pub path: Option<String>,

    /// System profile to configure [default: spack]
    #[arg(short, long)]
    pub system: Option<String>,

    /// exawind-builder repository to clone
    #[arg(long, env = ENV_BUILDER_REPO, value_name = "URL")]
    pub builder_repo: Option<String>,

    /// Spack repository to clone
    #[arg(long, env = ENV_SPACK_REPO, value_name = "URL")]
    pub spack_repo: Option<String>,
}

impl From<BootstrapArgs> for SettingOverrides {
    fn from(args: BootstrapArgs) -> Self {
        Self {
            path: args.path,
            system: args.system,
            builder_repo: args.builder_repo,
            spack_repo: args.spack_repo,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Some(cmd) => cmd.run(),
            None => commands::bootstrap::execute(self.bootstrap),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_bootstrap_flags() {
        let cli = Cli::try_parse_from(["exawind-bootstrap", "-p", "/tmp/proj", "-s", "eagle", "-vv"]).unwrap();
        assert_eq!(cli.bootstrap.path.as_deref(), Some("/tmp/proj"));
        assert_eq!(cli.bootstrap.system.as_deref(), Some("eagle"));
        assert_eq!(cli.verbose, 2);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_recipe_args() {
        let cli = Cli::try_parse_from([
            "exawind-bootstrap",
            "recipe",
            "args",
            "tioga-utils",
            "+nalu",
            "--prefix",
            "nalu-wind=/opt/nalu",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Some(Commands::Recipe { .. })));
    }
}
