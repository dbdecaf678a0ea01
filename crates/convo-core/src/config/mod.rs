//! Client configuration: YAML file, then environment, then command-line flags.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::*;
