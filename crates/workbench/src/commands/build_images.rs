//! Build-images command
//!
//! Downloads and expands the requested plugin releases, then resolves the
//! pinned dependencies of every manifest tool. The pins feed container image
//! builds, optionally as one conda environment file per tool.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use workbench_plugins::{discover_manifests, ArchiveExpander};
use workbench_toolshed::{CondaEnvironment, DependencySpec, PackagePin, RegistryResolver};

use crate::cli::BuildImagesArgs;
use crate::output;

pub async fn run(args: BuildImagesArgs, plugins_dir: Option<&Path>) -> Result<()> {
    let mut config = super::load_config(plugins_dir)?;
    super::apply_release_args(&mut config, args.release);

    let mut failures = super::download::fetch_releases(&config).await?;
    failures.extend(super::extract::expand_packages(&config)?);

    let expander = ArchiveExpander::new(&config.archive);
    let discovery = discover_manifests(&expander, &config.plugins_dir)
        .context("Cannot read plugin manifests")?;
    failures.extend(discovery.failures);

    let resolver = RegistryResolver::from_network(&config.network)
        .context("Failed to set up Tool Shed access")?;
    let mut resolved = Vec::new();

    for plugin in &discovery.manifests {
        output::header(&format!("Resolving tools from {}", plugin.workflow_dir.display()));

        let report = resolver.resolve_all(&plugin.manifest.tools).await;
        for spec in &report.specs {
            output::kv(&spec.tool_id, &spec.joined());
            if !spec.unversioned.is_empty() {
                output::warning(&format!(
                    "{} has unversioned requirements: {}",
                    spec.tool_id,
                    spec.unversioned.join(", ")
                ));
            }
        }
        resolved.extend(report.specs);
        failures.extend(report.failures);
    }

    if let Some(conda_dir) = &args.conda_dir {
        write_environments(conda_dir, &resolved, args.channels.as_deref())?;
    }

    super::finish("Dependency resolution", &failures)
}

/// Write `<tool-id>.yml` per resolved tool
fn write_environments(
    conda_dir: &Path,
    specs: &[DependencySpec],
    channels: Option<&[String]>,
) -> Result<()> {
    fs::create_dir_all(conda_dir)
        .with_context(|| format!("Failed to create {}", conda_dir.display()))?;

    for spec in specs {
        let pins = spec.specs.iter().filter_map(|s| PackagePin::parse(s)).collect();
        let mut environment = CondaEnvironment::from_pins(&spec.tool_id, pins, &[]);
        if let Some(channels) = channels {
            environment = environment.with_channels(channels.to_vec());
        }

        let path = conda_dir.join(format!("{}.yml", spec.tool_id.replace('/', "_")));
        fs::write(&path, environment.to_yaml()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        output::info(&format!("Wrote {}", path.display()));
    }

    Ok(())
}
