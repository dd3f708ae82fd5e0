//! Configuration for the squad-token CLI
//!
//! Provides types and loading for `squad.toml`.

pub mod loader;
pub mod schema;

pub use loader::{find_config, load_config, merge_cli_overrides, CliOverrides, ConfigError, CONFIG_FILE};
pub use schema::*;
