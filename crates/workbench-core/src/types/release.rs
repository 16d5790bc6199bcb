//! Release acquisition types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel version token that selects the most recent release
pub const LATEST: &str = "latest";

/// Which releases to fetch from an organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseSpec {
    /// Organization owning the plugin repositories
    pub organization: String,

    /// Repository name -> release tag or "latest"
    pub versions: BTreeMap<String, String>,
}

impl ReleaseSpec {
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            versions: BTreeMap::new(),
        }
    }

    /// Request a version for a repository
    pub fn with_version(mut self, repository: impl Into<String>, version: impl Into<String>) -> Self {
        self.versions.insert(repository.into(), version.into());
        self
    }

    /// Version requested for a repository, if the repository is part of this spec
    pub fn requested(&self, repository: &str) -> Option<&str> {
        self.versions.get(repository).map(String::as_str)
    }
}

/// Whether a version token is the "latest" sentinel
pub fn is_latest(version: &str) -> bool {
    version == LATEST
}

/// A downloadable file attached to a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    /// Direct download URL
    pub download_url: String,

    /// File name used for the local copy
    pub file_name: String,

    /// Size reported by the host, when known
    pub byte_length: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_versions() {
        let spec = ReleaseSpec::new("combat-sars-cov-2")
            .with_version("irida-plugin-sars-cov-2-illumina", "latest")
            .with_version("irida-plugin-sars-cov-2-nanopore", "0.2.1");

        assert_eq!(spec.requested("irida-plugin-sars-cov-2-illumina"), Some("latest"));
        assert_eq!(spec.requested("irida-plugin-sars-cov-2-nanopore"), Some("0.2.1"));
        assert_eq!(spec.requested("some-other-repo"), None);
    }

    #[test]
    fn test_latest_sentinel_is_exact() {
        assert!(is_latest("latest"));
        assert!(!is_latest("Latest"));
        assert!(!is_latest("v1.0.0"));
    }
}
