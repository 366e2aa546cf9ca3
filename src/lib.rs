//! exawind-bootstrap - ExaWind project bootstrap and package recipes
//!
//! Sets up an ExaWind project directory with exawind-builder and spack, and
//! carries the package recipes that translate a configuration into CMake
//! arguments.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Business logic
//! - [`infra`] - Infrastructure layer (filesystem, processes)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
