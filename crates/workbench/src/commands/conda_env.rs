//! Conda-env command

use anyhow::{Context, Result};
use std::fs;
use workbench_toolshed::{parse_requirements, CondaEnvironment};

use crate::cli::CondaEnvArgs;
use crate::output;

pub fn run(args: CondaEnvArgs) -> Result<()> {
    let text = fs::read_to_string(&args.requirements_file).with_context(|| {
        format!(
            "Failed to read requirements file {}",
            args.requirements_file.display()
        )
    })?;
    let pins = parse_requirements(&text, &args.requirements_file)?;

    let mut environment = CondaEnvironment::from_pins(&args.name, pins, &args.exclude);
    if let Some(channels) = args.channels {
        environment = environment.with_channels(channels);
    }
    let yaml = environment.to_yaml()?;

    match &args.output_file {
        Some(path) => {
            fs::write(path, yaml)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            output::success(&format!("Wrote environment {} to {}", args.name, path.display()));
        }
        None => print!("{}", yaml),
    }

    Ok(())
}
