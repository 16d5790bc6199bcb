//! Configuration types
//!
//! One `WorkbenchConfig` is built at startup and handed to every pipeline
//! stage by reference.

use crate::types::{GalaxyTarget, ReleaseSpec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Complete workbench configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WorkbenchConfig {
    /// Directory downloaded plugin packages are stored in and expanded under
    #[serde(default = "default_plugins_dir")]
    pub plugins_dir: PathBuf,

    /// Release host settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// Which plugin releases to fetch
    #[serde(default)]
    pub release: ReleaseDefaults,

    /// Target Galaxy instance
    #[serde(default)]
    pub galaxy: GalaxyTarget,

    /// External installer executables
    #[serde(default)]
    pub installer: InstallerConfig,

    /// Archive expansion settings
    #[serde(default)]
    pub archive: ArchiveConfig,

    /// HTTP client settings
    #[serde(default)]
    pub network: NetworkConfig,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            plugins_dir: default_plugins_dir(),
            github: GitHubConfig::default(),
            release: ReleaseDefaults::default(),
            galaxy: GalaxyTarget::default(),
            installer: InstallerConfig::default(),
            archive: ArchiveConfig::default(),
            network: NetworkConfig::default(),
        }
    }
}

impl WorkbenchConfig {
    /// Build the release spec from the configured organization and plugin versions
    pub fn release_spec(&self) -> ReleaseSpec {
        ReleaseSpec {
            organization: self.release.organization.clone(),
            versions: self.release.plugins.clone(),
        }
    }
}

fn default_plugins_dir() -> PathBuf {
    PathBuf::from("sources/plugins")
}

/// GitHub API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitHubConfig {
    /// REST API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Personal access token; normally supplied via GITHUB_ACCESS_TOKEN
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            access_token: None,
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

/// Plugin release selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReleaseDefaults {
    /// Organization owning the plugin repositories
    #[serde(default = "default_organization")]
    pub organization: String,

    /// Repository name -> version tag or "latest"
    #[serde(default)]
    pub plugins: BTreeMap<String, String>,
}

impl Default for ReleaseDefaults {
    fn default() -> Self {
        Self {
            organization: default_organization(),
            plugins: BTreeMap::new(),
        }
    }
}

fn default_organization() -> String {
    "combat-sars-cov-2".to_string()
}

/// Installer executables (ephemeris)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InstallerConfig {
    #[serde(default = "default_shed_tools")]
    pub shed_tools: String,

    #[serde(default = "default_workflow_install")]
    pub workflow_install: String,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            shed_tools: default_shed_tools(),
            workflow_install: default_workflow_install(),
        }
    }
}

fn default_shed_tools() -> String {
    "shed-tools".to_string()
}
fn default_workflow_install() -> String {
    "workflow-install".to_string()
}

/// Archive expansion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArchiveConfig {
    /// File name suffixes treated as expandable archives
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Maximum nesting depth below a top-level archive
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            max_depth: default_max_depth(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec![".jar".to_string()]
}
fn default_max_depth() -> usize {
    16
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Render download progress bars
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            show_progress: default_show_progress(),
        }
    }
}

fn default_user_agent() -> String {
    format!(
        "workbench/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
fn default_show_progress() -> bool {
    true
}
