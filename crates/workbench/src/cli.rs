//! CLI argument parsing with clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Workbench - fetch, expand, and install Galaxy plugin releases
#[derive(Parser, Debug)]
#[command(name = "workbench")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress everything but warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory plugin packages are downloaded to and expanded in
    #[arg(long, global = true)]
    pub plugins_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download plugin releases from GitHub
    Download(DownloadArgs),

    /// Expand downloaded plugin packages, including nested archives
    Extract(ExtractArgs),

    /// Install the Galaxy tools listed in every plugin manifest
    InstallTools(InstallToolsArgs),

    /// Download and expand plugins, then resolve pinned tool dependencies for image builds
    BuildImages(BuildImagesArgs),

    /// Install the Galaxy workflows bundled with every plugin
    InstallWorkflows(InstallWorkflowsArgs),

    /// Convert a pinned requirements file into a conda environment file
    CondaEnv(CondaEnvArgs),
}

// Download command
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// GitHub personal access token
    #[arg(long, env = "GITHUB_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Organization owning the plugin repositories
    #[arg(long)]
    pub organization: Option<String>,

    /// Release tag of the Illumina plugin, or "latest"
    #[arg(long, env = "ILLUMINA_VERSION")]
    pub illumina_version: Option<String>,

    /// Release tag of the Nanopore plugin, or "latest"
    #[arg(long, env = "NANOPORE_VERSION")]
    pub nanopore_version: Option<String>,
}

// Extract command
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Maximum archive nesting depth
    #[arg(long)]
    pub max_depth: Option<usize>,
}

/// Galaxy connection overrides
#[derive(Args, Debug, Default)]
pub struct GalaxyArgs {
    /// Galaxy URL
    #[arg(short = 'g', long)]
    pub galaxy_url: Option<String>,

    /// Galaxy admin API key
    #[arg(short = 'a', long)]
    pub api_key: Option<String>,

    /// Galaxy admin user
    #[arg(short = 'u', long)]
    pub user: Option<String>,

    /// Galaxy admin password
    #[arg(short = 'p', long)]
    pub password: Option<String>,
}

// Install-tools command
#[derive(Args, Debug)]
pub struct InstallToolsArgs {
    #[command(flatten)]
    pub galaxy: GalaxyArgs,

    /// Tool installer executable
    #[arg(long)]
    pub installer: Option<String>,
}

// Build-images command
#[derive(Args, Debug)]
pub struct BuildImagesArgs {
    #[command(flatten)]
    pub release: DownloadArgs,

    /// Write a conda environment file per resolved tool into this directory
    #[arg(long)]
    pub conda_dir: Option<PathBuf>,

    /// Conda channels for generated environment files (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub channels: Option<Vec<String>>,
}

// Install-workflows command
#[derive(Args, Debug)]
pub struct InstallWorkflowsArgs {
    #[command(flatten)]
    pub galaxy: GalaxyArgs,

    /// Workflow installer executable
    #[arg(long)]
    pub installer: Option<String>,
}

// Conda-env command
#[derive(Args, Debug)]
pub struct CondaEnvArgs {
    /// Environment name
    pub name: String,

    /// Requirements file with one name==version pin per line
    pub requirements_file: PathBuf,

    /// Output file (default: stdout)
    pub output_file: Option<PathBuf>,

    /// Conda channels (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub channels: Option<Vec<String>>,

    /// Packages to leave out (comma separated)
    #[arg(short = 'X', long, value_delimiter = ',')]
    pub exclude: Vec<String>,
}
