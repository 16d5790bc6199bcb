//! Configuration loading and types

pub mod loader;
pub mod types;

pub use loader::HierarchicalConfigLoader;
pub use types::*;
