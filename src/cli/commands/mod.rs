//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod bootstrap;
pub mod recipe;

use anyhow::Result;
use clap::Subcommand;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect package recipes
    Recipe {
        #[command(subcommand)]
        command: RecipeCommands,
    },
}

/// Recipe subcommands
#[derive(Subcommand, Debug)]
pub enum RecipeCommands {
    /// List available recipes
    List,

    /// Show a recipe's versions, variants and dependencies
    Info {
        /// Recipe name
        name: String,

        /// Constraint tokens selecting variants, e.g. +cuda cuda_arch=70
        constraint: Vec<String>,
    },

    /// Print the CMake arguments for a configuration
    Args {
        /// Recipe name
        name: String,

        /// Constraint tokens selecting variants, e.g. +cuda cuda_arch=70
        constraint: Vec<String>,

        /// Install prefix of a dependency
        #[arg(long = "prefix", value_name = "DEP=PATH")]
        prefixes: Vec<String>,

        /// Compiler name
        #[arg(long)]
        compiler: Option<String>,

        /// Upstream argument an overlay recipe patches (repeatable)
        #[arg(long = "base-arg", value_name = "ARG", allow_hyphen_values = true)]
        base_args: Vec<String>,
    },
}

impl Commands {
    /// Execute the command
    pub fn run(self) -> Result<()> {
        match self {
            Self::Recipe { command } => match command {
                RecipeCommands::List => recipe::list(),
                RecipeCommands::Info { name, constraint } => recipe::info(&name, &constraint),
                RecipeCommands::Args {
                    name,
                    constraint,
                    prefixes,
                    compiler,
                    base_args,
                } => recipe::args(&name, &constraint, &prefixes, compiler.as_deref(), base_args),
            },
        }
    }
}
