//! Configuration and constants
//!
//! - [`defaults`] - Default values and fixed file layout
//! - [`urls`] - Repository URLs

pub mod defaults;
pub mod urls;
