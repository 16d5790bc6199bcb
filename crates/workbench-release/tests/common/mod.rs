//! Common test infrastructure for workbench-release tests
//!
//! - `mock_server`: wiremock helpers emulating the GitHub REST API

#![allow(dead_code)]

pub mod mock_server;

pub use mock_server::*;

use workbench_core::config::{GitHubConfig, NetworkConfig};

pub const ORG: &str = "combat-sars-cov-2";
pub const ILLUMINA: &str = "irida-plugin-sars-cov-2-illumina";
pub const NANOPORE: &str = "irida-plugin-sars-cov-2-nanopore";
pub const TOKEN: &str = "ghp_test_token";

pub fn github_config(api_url: &str) -> GitHubConfig {
    GitHubConfig {
        api_url: api_url.to_string(),
        access_token: Some(TOKEN.to_string()),
    }
}

pub fn quiet_network() -> NetworkConfig {
    NetworkConfig {
        show_progress: false,
        ..NetworkConfig::default()
    }
}
