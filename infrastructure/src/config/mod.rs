//! Configuration management
//!
//! Raw TOML structures in `file_config`, multi-source merging in `loader`.

pub mod file_config;
pub mod loader;

pub use file_config::{ConfigError, FileConfig};
pub use loader::ConfigLoader;
