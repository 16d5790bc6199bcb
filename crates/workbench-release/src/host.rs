//! Release host access
//!
//! `ReleaseHost` is the narrow interface the fetcher needs from a source code
//! hosting service. `GitHubReleaseHost` implements it over the GitHub REST API.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;
use workbench_core::config::{GitHubConfig, NetworkConfig};
use workbench_core::types::AssetDescriptor;
use workbench_core::{Error, Result};

/// Repositories requested per page when listing an organization
const PAGE_SIZE: usize = 100;

/// Repository summary
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
}

/// Release information
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Release tag (e.g., "0.1.2")
    pub tag_name: String,

    /// Release name
    #[serde(default)]
    pub name: Option<String>,

    /// Release assets
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// Release asset
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    /// Asset name
    pub name: String,

    /// Download URL
    pub browser_download_url: String,

    /// Asset size in bytes
    #[serde(default)]
    pub size: Option<u64>,
}

impl ReleaseAsset {
    pub fn descriptor(&self) -> AssetDescriptor {
        AssetDescriptor {
            download_url: self.browser_download_url.clone(),
            file_name: self.name.clone(),
            byte_length: self.size,
        }
    }
}

/// Source code hosting service that publishes plugin releases
#[async_trait]
pub trait ReleaseHost: Send + Sync {
    /// List every repository of an organization
    async fn list_repositories(&self, organization: &str) -> Result<Vec<Repository>>;

    /// Most recent published release of a repository
    async fn latest_release(&self, organization: &str, repository: &str) -> Result<Release>;

    /// Release with an exact tag
    async fn release_by_tag(&self, organization: &str, repository: &str, tag: &str)
        -> Result<Release>;
}

/// GitHub REST API release host
pub struct GitHubReleaseHost {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl GitHubReleaseHost {
    /// Create a GitHub host; fails with `Error::Auth` when no token is configured
    pub fn new(github: &GitHubConfig, network: &NetworkConfig) -> Result<Self> {
        let token = github
            .access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::auth("GitHub access token is missing"))?
            .to_string();

        let client = reqwest::Client::builder()
            .user_agent(&network.user_agent)
            .build()?;

        Ok(Self {
            client,
            api_url: github.api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn get(&self, url: &str) -> RequestBuilder {
        self.client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
    }

    async fn fetch_release(&self, url: &str, subject: String, missing: String) -> Result<Release> {
        debug!("Fetching release from: {}", url);

        let response = self
            .get(url)
            .send()
            .await
            .map_err(|e| Error::resolution(&subject, e.to_string()))?;

        let response = check_status(response, &subject, missing)?;
        response
            .json::<Release>()
            .await
            .map_err(|e| Error::resolution(subject, format!("invalid release payload: {}", e)))
    }
}

#[async_trait]
impl ReleaseHost for GitHubReleaseHost {
    async fn list_repositories(&self, organization: &str) -> Result<Vec<Repository>> {
        let mut repositories = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{}/orgs/{}/repos?per_page={}&page={}",
                self.api_url, organization, PAGE_SIZE, page
            );
            debug!("Listing repositories: {}", url);

            let response = self
                .get(&url)
                .send()
                .await
                .map_err(|e| Error::resolution(organization, e.to_string()))?;
            let response = check_status(
                response,
                organization,
                format!("organization {} not found", organization),
            )?;

            let batch: Vec<Repository> = response.json().await.map_err(|e| {
                Error::resolution(organization, format!("invalid repository listing: {}", e))
            })?;
            let last_page = batch.len() < PAGE_SIZE;
            repositories.extend(batch);

            if last_page {
                break;
            }
            page += 1;
        }

        debug!(
            "Organization {} has {} repositories",
            organization,
            repositories.len()
        );
        Ok(repositories)
    }

    async fn latest_release(&self, organization: &str, repository: &str) -> Result<Release> {
        let url = format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_url, organization, repository
        );
        self.fetch_release(
            &url,
            repository.to_string(),
            "no published release found for \"latest\"".to_string(),
        )
        .await
    }

    async fn release_by_tag(
        &self,
        organization: &str,
        repository: &str,
        tag: &str,
    ) -> Result<Release> {
        let url = format!(
            "{}/repos/{}/{}/releases/tags/{}",
            self.api_url, organization, repository, tag
        );
        self.fetch_release(
            &url,
            repository.to_string(),
            format!("release {} not found", tag),
        )
        .await
    }
}

/// Map host status codes onto pipeline errors
fn check_status(response: Response, subject: &str, missing: String) -> Result<Response> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::auth(format!(
            "GitHub rejected the access token ({})",
            response.status()
        ))),
        StatusCode::NOT_FOUND => Err(Error::resolution(subject, missing)),
        status => Err(Error::resolution(
            subject,
            format!("unexpected response status {}", status),
        )),
    }
}
