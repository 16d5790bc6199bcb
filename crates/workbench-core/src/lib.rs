//! # workbench-core
//!
//! Core library for the workbench CLI providing:
//! - Layered configuration (embedded defaults, user file, environment)
//! - The pipeline error type and per-unit failure records
//! - Shared types for releases, tool manifests, and requirements

pub mod config;
pub mod error;
pub mod types;

pub use config::{HierarchicalConfigLoader, WorkbenchConfig};
pub use error::{Error, Result, UnitFailure};
