//! Release fetching
//!
//! Resolves every requested repository of an organization to a release and
//! streams that release's assets into the plugins directory. A failure for
//! one repository is recorded and the loop moves on; credential failures
//! abort the whole fetch.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use workbench_core::types::{is_latest, ReleaseSpec};
use workbench_core::{Error, Result, UnitFailure, WorkbenchConfig};

use crate::download::{AssetDownloader, DownloadedFile};
use crate::host::{GitHubReleaseHost, Release, ReleaseHost};

/// An asset persisted during a fetch
#[derive(Debug, Clone)]
pub struct DownloadedAsset {
    /// Repository the release belongs to
    pub repository: String,

    /// Resolved release tag
    pub tag: String,

    /// Local file path
    pub path: PathBuf,

    /// Bytes written
    pub bytes: u64,
}

/// Outcome of a fetch across all requested repositories
#[derive(Debug, Default)]
pub struct FetchReport {
    pub downloaded: Vec<DownloadedAsset>,
    pub failures: Vec<UnitFailure>,
}

impl FetchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fetches plugin releases from a release host
pub struct ReleaseFetcher<H: ReleaseHost> {
    host: H,
    downloader: AssetDownloader,
    plugins_dir: PathBuf,
}

impl ReleaseFetcher<GitHubReleaseHost> {
    /// Build a GitHub-backed fetcher from configuration
    pub fn from_config(config: &WorkbenchConfig) -> Result<Self> {
        let host = GitHubReleaseHost::new(&config.github, &config.network)?;
        let downloader = AssetDownloader::new(&config.network)?;
        Ok(Self::new(host, downloader, config.plugins_dir.clone()))
    }
}

impl<H: ReleaseHost> ReleaseFetcher<H> {
    pub fn new(host: H, downloader: AssetDownloader, plugins_dir: impl Into<PathBuf>) -> Self {
        Self {
            host,
            downloader,
            plugins_dir: plugins_dir.into(),
        }
    }

    pub fn plugins_dir(&self) -> &Path {
        &self.plugins_dir
    }

    /// Fetch every release named in `spec`
    pub async fn fetch(&self, spec: &ReleaseSpec) -> Result<FetchReport> {
        let organization = spec.organization.as_str();
        info!("Listing repositories of {}", organization);

        let repositories = self.host.list_repositories(organization).await?;

        let mut report = FetchReport::default();
        let mut seen = BTreeSet::new();

        for repository in &repositories {
            let Some(version) = spec.requested(&repository.name) else {
                continue;
            };
            seen.insert(repository.name.as_str());

            if let Err(e) = self
                .fetch_repository(organization, &repository.name, version, &mut report)
                .await
            {
                if e.is_fatal() {
                    return Err(e);
                }
                error!(
                    "Failed to fetch {} ({}): {}",
                    repository.name, version, e
                );
                report
                    .failures
                    .push(UnitFailure::new(repository.name.clone(), e));
            }
        }

        for name in spec.versions.keys() {
            if !seen.contains(name.as_str()) {
                warn!("Repository {} not found in {}", name, organization);
                report.failures.push(UnitFailure::new(
                    name.clone(),
                    Error::resolution(
                        name,
                        format!("repository not found in organization {}", organization),
                    ),
                ));
            }
        }

        Ok(report)
    }

    /// Download every asset of the requested release
    ///
    /// A failed asset is recorded as `<repository>/<asset>` and the remaining
    /// assets are still tried. Only release resolution and fatal errors are
    /// returned.
    async fn fetch_repository(
        &self,
        organization: &str,
        repository: &str,
        version: &str,
        report: &mut FetchReport,
    ) -> Result<()> {
        let release = self.resolve_release(organization, repository, version).await?;

        info!(
            "Download begin for plugin package: {} {}",
            repository, release.tag_name
        );
        if release.assets.is_empty() {
            warn!("Release {} of {} has no assets", release.tag_name, repository);
        }

        for asset in &release.assets {
            match self
                .downloader
                .download(&asset.descriptor(), &self.plugins_dir)
                .await
            {
                Ok(DownloadedFile { path, bytes }) => report.downloaded.push(DownloadedAsset {
                    repository: repository.to_string(),
                    tag: release.tag_name.clone(),
                    path,
                    bytes,
                }),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    error!("Failed to download {} of {}: {}", asset.name, repository, e);
                    report
                        .failures
                        .push(UnitFailure::new(format!("{}/{}", repository, asset.name), e));
                }
            }
        }

        info!("Downloading is done: {} {}", repository, release.tag_name);
        Ok(())
    }

    async fn resolve_release(
        &self,
        organization: &str,
        repository: &str,
        version: &str,
    ) -> Result<Release> {
        if is_latest(version) {
            self.host.latest_release(organization, repository).await
        } else {
            self.host
                .release_by_tag(organization, repository, version)
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ReleaseAsset, Repository};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use workbench_core::config::NetworkConfig;

    /// In-memory host recording which release lookups were made
    struct StaticHost {
        repositories: Vec<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ReleaseHost for StaticHost {
        async fn list_repositories(&self, _organization: &str) -> Result<Vec<Repository>> {
            Ok(self
                .repositories
                .iter()
                .map(|name| Repository {
                    name: name.to_string(),
                })
                .collect())
        }

        async fn latest_release(&self, _organization: &str, repository: &str) -> Result<Release> {
            self.calls.lock().unwrap().push(format!("latest:{}", repository));
            Ok(Release {
                tag_name: "1.0.0".to_string(),
                name: None,
                assets: Vec::<ReleaseAsset>::new(),
            })
        }

        async fn release_by_tag(
            &self,
            _organization: &str,
            repository: &str,
            tag: &str,
        ) -> Result<Release> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("tag:{}:{}", repository, tag));
            Err(Error::resolution(repository, format!("release {} not found", tag)))
        }
    }

    fn downloader() -> AssetDownloader {
        AssetDownloader::new(&NetworkConfig::default())
            .unwrap()
            .with_progress(false)
    }

    #[tokio::test]
    async fn test_only_requested_repositories_are_resolved() {
        let host = StaticHost {
            repositories: vec!["plugin-a", "unrelated", "plugin-b"],
            calls: Mutex::new(Vec::new()),
        };
        let fetcher = ReleaseFetcher::new(host, downloader(), "/nonexistent");

        let spec = ReleaseSpec::new("org")
            .with_version("plugin-a", "latest")
            .with_version("plugin-b", "0.9");

        let report = fetcher.fetch(&spec).await.unwrap();

        let calls = fetcher.host.calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["latest:plugin-a", "tag:plugin-b:0.9"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].unit, "plugin-b");
        assert!(report.downloaded.is_empty());
    }

    #[tokio::test]
    async fn test_requested_repository_missing_from_organization() {
        let host = StaticHost {
            repositories: vec![],
            calls: Mutex::new(Vec::new()),
        };
        let fetcher = ReleaseFetcher::new(host, downloader(), "/nonexistent");
        let spec = ReleaseSpec::new("org").with_version("ghost", "latest");

        let report = fetcher.fetch(&spec).await.unwrap();
        assert!(!report.is_success());
        assert!(matches!(
            report.failures[0].error,
            Error::Resolution { .. }
        ));
    }
}
