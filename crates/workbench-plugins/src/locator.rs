//! Tool manifest discovery inside an expanded plugin package
//!
//! A package ships its Galaxy workflows under `workflows/<version>/`. The
//! version directory picked is the lexicographically greatest name, so
//! `v10` sorts before `v2`.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use workbench_core::{Error, Result};

/// Directory holding the versioned workflow directories
pub const WORKFLOWS_DIR: &str = "workflows";

/// Tool manifest file name
pub const MANIFEST_FILE: &str = "tools.yaml";

/// Extension of Galaxy workflow files
pub const WORKFLOW_EXTENSION: &str = "ga";

/// Finds the tool manifest of the latest workflow version
pub struct ManifestLocator;

impl ManifestLocator {
    /// `<root>/workflows/<latest version>`
    pub fn locate_workflow_dir(root: &Path) -> Result<PathBuf> {
        let workflows = root.join(WORKFLOWS_DIR);
        if !workflows.is_dir() {
            return Err(Error::not_found(&workflows));
        }

        let mut versions = Vec::new();
        for entry in fs::read_dir(&workflows)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                versions.push(entry.file_name());
            }
        }
        versions.sort();

        let latest = versions.pop().ok_or_else(|| Error::not_found(&workflows))?;
        debug!(
            "Latest workflow version under {}: {}",
            workflows.display(),
            latest.to_string_lossy()
        );
        Ok(workflows.join(latest))
    }

    /// `<root>/workflows/<latest version>/tools.yaml`
    pub fn locate(root: &Path) -> Result<PathBuf> {
        let manifest = Self::locate_workflow_dir(root)?.join(MANIFEST_FILE);
        if !manifest.is_file() {
            return Err(Error::not_found(&manifest));
        }
        Ok(manifest)
    }

    /// Galaxy workflow files directly inside a workflow directory, sorted by name
    pub fn workflow_files(workflow_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(workflow_dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == WORKFLOW_EXTENSION) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}
