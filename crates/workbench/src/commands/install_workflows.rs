//! Install-workflows command

use anyhow::{Context, Result};
use std::path::Path;
use tracing::warn;
use workbench_core::UnitFailure;
use workbench_plugins::{ArchiveExpander, ManifestLocator};
use workbench_toolshed::InstallPlanner;

use crate::cli::InstallWorkflowsArgs;
use crate::output;

pub async fn run(args: InstallWorkflowsArgs, plugins_dir: Option<&Path>) -> Result<()> {
    let mut config = super::load_config(plugins_dir)?;
    super::apply_galaxy_args(&mut config, args.galaxy);
    if let Some(installer) = args.installer {
        config.installer.workflow_install = installer;
    }

    let expander = ArchiveExpander::new(&config.archive);
    let packages = expander
        .expanded_roots(&config.plugins_dir)
        .context("Cannot list expanded plugins; run `workbench extract` first")?;

    let mut workflows = Vec::new();
    let mut failures = Vec::new();
    for package in &packages {
        let found = ManifestLocator::locate_workflow_dir(package)
            .and_then(|dir| ManifestLocator::workflow_files(&dir));
        match found {
            Ok(files) if files.is_empty() => {
                warn!("No workflow files in {}", package.display());
            }
            Ok(files) => workflows.extend(files),
            Err(e) => failures.push(UnitFailure::new(package.display().to_string(), e)),
        }
    }

    output::header(&format!("Installing {} workflows", workflows.len()));
    let planner = InstallPlanner::from_config(&config);
    let report = planner.install_workflows(&workflows).await;
    for workflow in &report.installed {
        output::success(workflow);
    }
    failures.extend(report.failures);

    super::finish("Workflow installation", &failures)
}
