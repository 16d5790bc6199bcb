//! CLI command implementations

pub mod build_images;
pub mod conda_env;
pub mod download;
pub mod extract;
pub mod install_tools;
pub mod install_workflows;

use anyhow::{bail, Context, Result};
use std::path::Path;
use workbench_core::{HierarchicalConfigLoader, UnitFailure, WorkbenchConfig};

use crate::cli::{DownloadArgs, GalaxyArgs};
use crate::output;

/// Load layered configuration and apply the global `--plugins-dir` flag
pub fn load_config(plugins_dir: Option<&Path>) -> Result<WorkbenchConfig> {
    let mut config = HierarchicalConfigLoader::new()
        .and_then(|loader| loader.load())
        .context("Failed to load workbench configuration")?;

    if let Some(dir) = plugins_dir {
        config.plugins_dir = dir.to_path_buf();
    }
    Ok(config)
}

const ILLUMINA_PLUGIN: &str = "irida-plugin-sars-cov-2-illumina";
const NANOPORE_PLUGIN: &str = "irida-plugin-sars-cov-2-nanopore";

/// Apply release flags over the configured plugin set
pub fn apply_release_args(config: &mut WorkbenchConfig, args: DownloadArgs) {
    if let Some(token) = args.access_token {
        config.github.access_token = Some(token);
    }
    if let Some(organization) = args.organization {
        config.release.organization = organization;
    }
    if let Some(version) = args.illumina_version {
        config.release.plugins.insert(ILLUMINA_PLUGIN.to_string(), version);
    }
    if let Some(version) = args.nanopore_version {
        config.release.plugins.insert(NANOPORE_PLUGIN.to_string(), version);
    }
}

/// Apply Galaxy connection flags over the configured target
pub fn apply_galaxy_args(config: &mut WorkbenchConfig, args: GalaxyArgs) {
    let galaxy = &mut config.galaxy;
    if let Some(url) = args.galaxy_url {
        galaxy.url = url;
    }
    if let Some(api_key) = args.api_key {
        galaxy.api_key = api_key;
    }
    if let Some(user) = args.user {
        galaxy.user = user;
    }
    if let Some(password) = args.password {
        galaxy.password = password;
    }
}

/// Report per-unit failures; any failure makes the command fail
pub fn finish(stage: &str, failures: &[UnitFailure]) -> Result<()> {
    if failures.is_empty() {
        output::success(&format!("{} completed", stage));
        return Ok(());
    }

    for failure in failures {
        output::error(&failure.to_string());
    }
    bail!("{} finished with {} failed unit(s)", stage, failures.len())
}
