//! Install-tools command

use anyhow::{Context, Result};
use std::path::Path;
use workbench_plugins::{discover_manifests, ArchiveExpander};
use workbench_toolshed::InstallPlanner;

use crate::cli::InstallToolsArgs;
use crate::output;

pub async fn run(args: InstallToolsArgs, plugins_dir: Option<&Path>) -> Result<()> {
    let mut config = super::load_config(plugins_dir)?;
    super::apply_galaxy_args(&mut config, args.galaxy);
    if let Some(installer) = args.installer {
        config.installer.shed_tools = installer;
    }

    let expander = ArchiveExpander::new(&config.archive);
    let discovery = discover_manifests(&expander, &config.plugins_dir)
        .context("Cannot read plugin manifests; run `workbench extract` first")?;

    let planner = InstallPlanner::from_config(&config);
    let mut failures = discovery.failures;

    for plugin in &discovery.manifests {
        output::header(&format!(
            "Installing {} tools from {}",
            plugin.manifest.tools.len(),
            plugin.workflow_dir.display()
        ));

        let report = planner.install_all(&plugin.manifest.tools).await;
        for tool in &report.installed {
            output::success(tool);
        }
        failures.extend(report.failures);
    }

    super::finish("Tool installation", &failures)
}
