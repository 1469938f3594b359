//! Configuration for the weft translator.
//!
//! Settings come from an optional `weft.toml`. Every field has a default, so an
//! empty file (or no file at all) yields [`WeftConfig::default`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::{GraphConfig, NetlistConfig, VerilogConfig, WeftConfig};
