//! Extract command

use anyhow::{Context, Result};
use std::path::Path;
use workbench_core::{UnitFailure, WorkbenchConfig};
use workbench_plugins::ArchiveExpander;

use crate::cli::ExtractArgs;
use crate::output;

pub fn run(args: ExtractArgs, plugins_dir: Option<&Path>) -> Result<()> {
    let mut config = super::load_config(plugins_dir)?;
    if let Some(max_depth) = args.max_depth {
        config.archive.max_depth = max_depth;
    }

    let failures = expand_packages(&config)?;
    super::finish("Extraction", &failures)
}

/// Expand every downloaded plugin package, returning per-archive failures
pub fn expand_packages(config: &WorkbenchConfig) -> Result<Vec<UnitFailure>> {
    output::header(&format!(
        "Expanding plugin packages in {}",
        config.plugins_dir.display()
    ));

    let expander = ArchiveExpander::new(&config.archive);
    let spinner = output::spinner("Expanding archives...");
    let report = expander.expand_all(&config.plugins_dir);
    spinner.finish_and_clear();

    let report = report.with_context(|| {
        format!(
            "Cannot expand plugin packages in {}",
            config.plugins_dir.display()
        )
    })?;

    if report.expanded.is_empty() && report.failures.is_empty() {
        output::warning("No plugin packages found; run `workbench download` first");
    }
    for archive in &report.expanded {
        output::kv(
            &archive.archive.display().to_string(),
            &archive.target.display().to_string(),
        );
    }

    Ok(report.failures)
}
