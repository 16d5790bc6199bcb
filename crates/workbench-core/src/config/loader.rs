//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. User config (~/.workbench/config.yaml)
//! 3. Environment variables (WORKBENCH_* prefix, plus GITHUB_ACCESS_TOKEN)
//! 4. CLI flags (handled by caller)

use crate::config::types::WorkbenchConfig;
use crate::error::{Error, Result};
use rust_embed::RustEmbed;
use serde_yaml_ng::Value;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

const DEFAULTS_FILE: &str = "workbench-defaults.yaml";
const USER_CONFIG_FILE: &str = "config.yaml";

/// Configuration hierarchy loader
pub struct HierarchicalConfigLoader {
    /// Directory holding the user config file
    config_dir: PathBuf,
}

impl HierarchicalConfigLoader {
    /// Create a loader rooted at ~/.workbench
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::config("Could not determine home directory"))?;
        Ok(Self {
            config_dir: home.join(".workbench"),
        })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load configuration with hierarchical precedence
    pub fn load(&self) -> Result<WorkbenchConfig> {
        let mut merged = Self::load_embedded_defaults()?;

        let user_config_path = self.config_dir.join(USER_CONFIG_FILE);
        if user_config_path.exists() {
            debug!("Applying user config: {}", user_config_path.display());
            let content = fs::read_to_string(&user_config_path)?;
            let overlay: Value = serde_yaml_ng::from_str(&content)
                .map_err(|e| Error::parse(&user_config_path, e.to_string()))?;
            merge_values(&mut merged, overlay);
        }

        let config: WorkbenchConfig = serde_yaml_ng::from_value(merged)
            .map_err(|e| Error::config(format!("Failed to build configuration: {}", e)))?;

        apply_env_overrides(config)
    }

    fn load_embedded_defaults() -> Result<Value> {
        let embedded_file = EmbeddedConfigs::get(DEFAULTS_FILE).ok_or_else(|| {
            Error::config(format!("Embedded config not found: {}", DEFAULTS_FILE))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::config(format!("Invalid UTF-8 in embedded config: {}", DEFAULTS_FILE))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::config(format!(
                "Failed to parse embedded config {}: {}",
                DEFAULTS_FILE, e
            ))
        })
    }
}

/// Deep-merge `overlay` into `base`; mappings merge key by key, anything else replaces
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        // An empty section in the overlay keeps the base value
        (_, Value::Null) => {}
        (base, overlay) => *base = overlay,
    }
}

/// Apply environment variable overrides
fn apply_env_overrides(mut config: WorkbenchConfig) -> Result<WorkbenchConfig> {
    if let Some(token) = non_empty_var("GITHUB_ACCESS_TOKEN") {
        config.github.access_token = Some(token);
    }

    if let Some(val) = non_empty_var("WORKBENCH_PLUGINS_DIR") {
        config.plugins_dir = PathBuf::from(val);
    }

    if let Some(val) = non_empty_var("WORKBENCH_GITHUB_API_URL") {
        config.github.api_url = val;
    }

    if let Some(val) = non_empty_var("WORKBENCH_ORGANIZATION") {
        config.release.organization = val;
    }

    if let Some(val) = non_empty_var("WORKBENCH_GALAXY_URL") {
        config.galaxy.url = val;
    }

    if let Some(val) = non_empty_var("WORKBENCH_INSTALLER") {
        config.installer.shed_tools = val;
    }

    if let Some(val) = non_empty_var("WORKBENCH_MAX_DEPTH") {
        config.archive.max_depth = val
            .parse()
            .map_err(|_| Error::config("WORKBENCH_MAX_DEPTH must be a valid number"))?;
    }

    Ok(config)
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
