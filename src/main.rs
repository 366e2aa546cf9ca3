//! exawind-bootstrap CLI
//!
//! Entry point for the exawind-bootstrap command-line application.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use exawind_bootstrap::cli::output::{display_error, OutputConfig};
use exawind_bootstrap::cli::Cli;
use exawind_bootstrap::error::BootstrapError;

fn main() {
    // Usage errors exit 1 like every other failure; --help and --version exit 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(i32::from(e.use_stderr()));
        }
    };

    let output_config = OutputConfig::new(cli.quiet, cli.json, cli.verbose);
    output_config.apply_global();

    // RUST_LOG wins over -v; logs go to stderr so stdout stays clean for --json
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(output_config.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = cli.run() {
        display_error(&e);
        let code = e
            .downcast_ref::<BootstrapError>()
            .map_or(1, BootstrapError::exit_code);
        std::process::exit(code);
    }
}
