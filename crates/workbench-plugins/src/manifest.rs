//! Tool manifest parsing

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;
use workbench_core::types::ToolManifest;
use workbench_core::{Error, Result};

/// Reads and validates `tools.yaml` documents
pub struct ManifestReader;

impl ManifestReader {
    /// Read a manifest file; entries keep document order
    pub fn read(path: &Path) -> Result<ToolManifest> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::not_found(path)),
            Err(e) => return Err(e.into()),
        };

        let manifest = Self::parse(&content, path)?;
        debug!("Read {} tools from {}", manifest.tools.len(), path.display());
        Ok(manifest)
    }

    /// Parse manifest text; `path` is only used for error reporting
    pub fn parse(content: &str, path: &Path) -> Result<ToolManifest> {
        let manifest: ToolManifest =
            serde_yaml_ng::from_str(content).map_err(|e| Error::parse(path, e.to_string()))?;

        for tool in &manifest.tools {
            if tool.revisions.is_empty() {
                return Err(Error::parse(
                    path,
                    format!("tool {}/{} lists no revisions", tool.owner, tool.name),
                ));
            }
        }

        Ok(manifest)
    }
}
