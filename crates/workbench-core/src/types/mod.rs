//! Shared data model for the release pipeline

pub mod release;
pub mod tool;

pub use release::*;
pub use tool::*;
