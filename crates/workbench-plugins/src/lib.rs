//! Plugin package handling for the workbench CLI
//!
//! Downloaded plugin packages are nested ZIP archives. This crate expands them
//! recursively, finds the tool manifest of the newest bundled workflow version,
//! and parses it into `ToolManifest` values.

pub mod archive;
pub mod discovery;
pub mod locator;
pub mod manifest;

pub use archive::{expanded_dir_name, ArchiveExpander, ExpandedArchive, ExpansionReport};
pub use discovery::{discover_manifests, DiscoveryReport, PluginManifest};
pub use locator::ManifestLocator;
pub use manifest::ManifestReader;
