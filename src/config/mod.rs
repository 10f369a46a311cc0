//! Configuration for the tooltip generator
//!
//! Provides types and parsing for `tooltipgen.toml`.

pub mod loader;
pub mod schema;

pub use loader::{load_config, CliOverrides, ConfigError};
pub use schema::*;
