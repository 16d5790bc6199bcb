//! Download command

use anyhow::{Context, Result};
use std::path::Path;
use workbench_core::{UnitFailure, WorkbenchConfig};
use workbench_release::{human_readable_size, ReleaseFetcher};

use crate::cli::DownloadArgs;
use crate::output;

pub async fn run(args: DownloadArgs, plugins_dir: Option<&Path>) -> Result<()> {
    let mut config = super::load_config(plugins_dir)?;
    super::apply_release_args(&mut config, args);

    let failures = fetch_releases(&config).await?;
    super::finish("Download", &failures)
}

/// Download every configured plugin release into the plugins directory
///
/// Returns the per-repository and per-asset failures; credential failures
/// abort with an error.
pub async fn fetch_releases(config: &WorkbenchConfig) -> Result<Vec<UnitFailure>> {
    let spec = config.release_spec();
    output::header(&format!("Downloading plugin releases from {}", spec.organization));
    for (repository, version) in &spec.versions {
        output::kv(repository, version);
    }

    let fetcher = ReleaseFetcher::from_config(config).context("Failed to set up GitHub access")?;
    let report = fetcher
        .fetch(&spec)
        .await
        .context("Plugin download aborted")?;

    for asset in &report.downloaded {
        output::info(&format!(
            "{} {}: {} ({})",
            asset.repository,
            asset.tag,
            asset.path.display(),
            human_readable_size(asset.bytes)
        ));
    }

    Ok(report.failures)
}
