//! Core business logic module
//!
//! Package definitions, constraint handling and the bootstrap workflow. Side
//! effects go through [`crate::infra`].
//!
//! # Submodules
//!
//! - [`bootstrap`] - Project bootstrap workflow
//! - [`global_config`] - Global configuration and setting resolution
//! - [`host`] - Host platform and CMake generator
//! - [`constraint`] - Compact constraint syntax
//! - [`version`] - Version ordering
//! - [`variant`] - Variant definitions and validation
//! - [`package`] - Package definition handling
//! - [`spec`] - Resolved package configuration
//! - [`cmake`] - CMake argument construction
//! - [`recipes`] - Package recipes

pub mod bootstrap;
pub mod cmake;
pub mod constraint;
pub mod global_config;
pub mod host;
pub mod package;
pub mod recipes;
pub mod spec;
pub mod variant;
pub mod version;
