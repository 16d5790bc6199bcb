//! Manifest discovery across every expanded plugin package

use std::path::{Path, PathBuf};
use tracing::{info, warn};
use workbench_core::types::ToolManifest;
use workbench_core::{Result, UnitFailure};

use crate::archive::ArchiveExpander;
use crate::locator::ManifestLocator;
use crate::manifest::ManifestReader;

/// Manifest of one expanded plugin package
#[derive(Debug, Clone)]
pub struct PluginManifest {
    /// Expansion directory of the package
    pub package: PathBuf,

    /// Selected `workflows/<version>` directory
    pub workflow_dir: PathBuf,

    /// Parsed tool manifest
    pub manifest: ToolManifest,
}

/// Manifests found under a plugins directory, plus packages that had none
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    pub manifests: Vec<PluginManifest>,
    pub failures: Vec<UnitFailure>,
}

/// Locate and read the tool manifest of every expanded package under `plugins_dir`
pub fn discover_manifests(expander: &ArchiveExpander, plugins_dir: &Path) -> Result<DiscoveryReport> {
    let mut report = DiscoveryReport::default();

    for package in expander.expanded_roots(plugins_dir)? {
        match read_package(&package) {
            Ok(found) => {
                info!(
                    "Found {} tools in {}",
                    found.manifest.tools.len(),
                    found.workflow_dir.display()
                );
                report.manifests.push(found);
            }
            Err(e) => {
                warn!("No usable manifest in {}: {}", package.display(), e);
                report
                    .failures
                    .push(UnitFailure::new(package.display().to_string(), e));
            }
        }
    }

    Ok(report)
}

fn read_package(package: &Path) -> Result<PluginManifest> {
    let workflow_dir = ManifestLocator::locate_workflow_dir(package)?;
    let manifest_path = ManifestLocator::locate(package)?;
    let manifest = ManifestReader::read(&manifest_path)?;
    Ok(PluginManifest {
        package: package.to_path_buf(),
        workflow_dir,
        manifest,
    })
}
