//! Workbench CLI - Galaxy plugin release pipeline
//!
//! Downloads plugin releases, expands them, and installs the tools and
//! workflows they bundle into a Galaxy instance.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);
    output::set_quiet(cli.quiet);

    let plugins_dir = cli.plugins_dir.as_deref();
    match cli.command {
        Commands::Download(args) => commands::download::run(args, plugins_dir).await,
        Commands::Extract(args) => commands::extract::run(args, plugins_dir),
        Commands::InstallTools(args) => commands::install_tools::run(args, plugins_dir).await,
        Commands::BuildImages(args) => commands::build_images::run(args, plugins_dir).await,
        Commands::InstallWorkflows(args) => {
            commands::install_workflows::run(args, plugins_dir).await
        }
        Commands::CondaEnv(args) => commands::conda_env::run(args),
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
