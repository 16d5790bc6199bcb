//! Tool Shed dependency resolution
//!
//! For every revision of a manifest entry the Tool Shed is asked for the
//! repository's install info. The response is a JSON array of records; the
//! one carrying `valid_tools` describes each tool and its requirements.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use url::Url;
use workbench_core::config::NetworkConfig;
use workbench_core::types::{RequirementRecord, ToolEntry};
use workbench_core::{Error, Result, UnitFailure};

/// Install-info endpoint, relative to the Tool Shed base URL
const INSTALL_INFO_PATH: &str = "api/repositories/get_repository_revision_install_info";

/// One metadata record of a revision
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RevisionMetadata {
    #[serde(default)]
    pub valid_tools: Option<Vec<ToolDescriptor>>,
}

/// An installable tool within a repository revision
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToolDescriptor {
    pub id: String,

    #[serde(default)]
    pub requirements: Vec<RequirementRecord>,
}

/// Package registry holding tool repositories
#[async_trait]
pub trait ToolShed: Send + Sync {
    /// Metadata records of one repository revision
    async fn revision_install_info(
        &self,
        base_url: &str,
        name: &str,
        owner: &str,
        revision: &str,
    ) -> Result<Vec<RevisionMetadata>>;
}

/// Galaxy Tool Shed HTTP API client
pub struct ToolShedClient {
    client: reqwest::Client,
}

impl ToolShedClient {
    pub fn new(network: &NetworkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&network.user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Full install-info URL; a base without a scheme is assumed to be https
    pub fn install_info_url(base_url: &str, name: &str, owner: &str, revision: &str) -> Result<Url> {
        let base = if base_url.contains("://") {
            base_url.to_string()
        } else {
            format!("https://{}", base_url)
        };
        let base = format!("{}/", base.trim_end_matches('/'));

        let mut url = Url::parse(&base)
            .and_then(|b| b.join(INSTALL_INFO_PATH))
            .map_err(|e| {
                Error::resolution(
                    format!("{}/{}", owner, name),
                    format!("invalid tool shed url {}: {}", base_url, e),
                )
            })?;
        url.query_pairs_mut()
            .append_pair("name", name)
            .append_pair("owner", owner)
            .append_pair("changeset_revision", revision);
        Ok(url)
    }
}

#[async_trait]
impl ToolShed for ToolShedClient {
    async fn revision_install_info(
        &self,
        base_url: &str,
        name: &str,
        owner: &str,
        revision: &str,
    ) -> Result<Vec<RevisionMetadata>> {
        let subject = format!("{}/{}", owner, name);
        let url = Self::install_info_url(base_url, name, owner, revision)?;
        debug!("Fetching install info: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::resolution(&subject, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::resolution(
                &subject,
                format!("revision {} lookup failed with status {}", revision, response.status()),
            ));
        }

        let records: Vec<Value> = response
            .json()
            .await
            .map_err(|e| Error::resolution(&subject, format!("invalid install info: {}", e)))?;

        records
            .into_iter()
            .filter(Value::is_object)
            .map(|record| {
                serde_json::from_value(record).map_err(|e| {
                    Error::resolution(&subject, format!("invalid revision metadata: {}", e))
                })
            })
            .collect()
    }
}

/// Pinned dependencies of one resolved tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    /// Tool identifier from the registry
    pub tool_id: String,

    /// `name==version` strings in encounter order
    pub specs: Vec<String>,

    /// Names of requirements that carry no version
    pub unversioned: Vec<String>,
}

impl DependencySpec {
    /// Comma-joined spec strings
    pub fn joined(&self) -> String {
        self.specs.join(",")
    }
}

/// Resolution results across a batch of manifest entries
#[derive(Debug, Default)]
pub struct ResolutionReport {
    pub specs: Vec<DependencySpec>,
    pub failures: Vec<UnitFailure>,
}

impl ResolutionReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Resolves manifest entries to pinned dependency lists
pub struct RegistryResolver<S: ToolShed> {
    shed: S,
}

impl RegistryResolver<ToolShedClient> {
    pub fn from_network(network: &NetworkConfig) -> Result<Self> {
        Ok(Self::new(ToolShedClient::new(network)?))
    }
}

impl<S: ToolShed> RegistryResolver<S> {
    pub fn new(shed: S) -> Self {
        Self { shed }
    }

    /// Dependency specs of every tool in every revision of `tool`
    pub async fn resolve(&self, tool: &ToolEntry) -> Result<Vec<DependencySpec>> {
        if tool.name.trim().is_empty() || tool.owner.trim().is_empty() {
            error!("No tool specified to fetch metadata for");
            return Err(Error::resolution("<empty>", "no tool supplied"));
        }

        let mut resolved = Vec::new();
        for revision in &tool.revisions {
            let records = self
                .shed
                .revision_install_info(&tool.tool_shed_url, &tool.name, &tool.owner, revision)
                .await?;

            for descriptor in records.into_iter().filter_map(|r| r.valid_tools).flatten() {
                resolved.push(dependency_spec(descriptor));
            }
        }

        Ok(resolved)
    }

    /// Resolve every entry, recording failures and continuing
    pub async fn resolve_all(&self, tools: &[ToolEntry]) -> ResolutionReport {
        let mut report = ResolutionReport::default();

        for tool in tools {
            match self.resolve(tool).await {
                Ok(specs) => {
                    info!("Resolved {} tools from {}/{}", specs.len(), tool.owner, tool.name);
                    report.specs.extend(specs);
                }
                Err(e) => {
                    error!("Failed to resolve {}/{}: {}", tool.owner, tool.name, e);
                    report
                        .failures
                        .push(UnitFailure::new(format!("{}/{}", tool.owner, tool.name), e));
                }
            }
        }

        report
    }
}

fn dependency_spec(descriptor: ToolDescriptor) -> DependencySpec {
    let mut specs = Vec::new();
    let mut unversioned = Vec::new();

    for requirement in &descriptor.requirements {
        match requirement.spec_string() {
            Some(spec) => specs.push(spec),
            None => {
                warn!(
                    "Unversioned requirement {} of tool {}",
                    requirement.name, descriptor.id
                );
                unversioned.push(requirement.name.clone());
            }
        }
    }

    DependencySpec {
        tool_id: descriptor.id,
        specs,
        unversioned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CannedShed {
        records: Vec<RevisionMetadata>,
        queried: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ToolShed for CannedShed {
        async fn revision_install_info(
            &self,
            _base_url: &str,
            _name: &str,
            _owner: &str,
            revision: &str,
        ) -> Result<Vec<RevisionMetadata>> {
            self.queried.lock().unwrap().push(revision.to_string());
            Ok(self.records.clone())
        }
    }

    fn entry(name: &str, owner: &str, revisions: &[&str]) -> ToolEntry {
        ToolEntry {
            name: name.to_string(),
            owner: owner.to_string(),
            tool_shed_url: "toolshed.g2.bx.psu.edu".to_string(),
            revisions: revisions.iter().map(|r| r.to_string()).collect(),
            tool_panel_section_label: "Mapping".to_string(),
        }
    }

    fn shed() -> CannedShed {
        CannedShed {
            records: vec![
                RevisionMetadata::default(),
                RevisionMetadata {
                    valid_tools: Some(vec![ToolDescriptor {
                        id: "bwa_mem".to_string(),
                        requirements: vec![
                            RequirementRecord::versioned("samtools", "1.9"),
                            RequirementRecord::unversioned("bwa"),
                        ],
                    }]),
                },
            ],
            queried: Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn test_unversioned_requirements_are_set_aside() {
        let resolver = RegistryResolver::new(shed());
        let specs = resolver.resolve(&entry("bwa", "devteam", &["abc"])).await.unwrap();

        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].tool_id, "bwa_mem");
        assert_eq!(specs[0].specs, vec!["samtools==1.9"]);
        assert_eq!(specs[0].unversioned, vec!["bwa"]);
        assert_eq!(specs[0].joined(), "samtools==1.9");
    }

    #[tokio::test]
    async fn test_every_revision_is_queried_in_order() {
        let resolver = RegistryResolver::new(shed());
        let specs = resolver
            .resolve(&entry("bwa", "devteam", &["r1", "r2"]))
            .await
            .unwrap();

        assert_eq!(specs.len(), 2);
        assert_eq!(*resolver.shed.queried.lock().unwrap(), vec!["r1", "r2"]);
    }

    #[tokio::test]
    async fn test_empty_tool_is_rejected() {
        let resolver = RegistryResolver::new(shed());
        let result = resolver.resolve(&entry("", "devteam", &["r1"])).await;

        match result {
            Err(Error::Resolution { message, .. }) => assert_eq!(message, "no tool supplied"),
            other => panic!("expected Resolution, got {:?}", other),
        }
        assert!(resolver.shed.queried.lock().unwrap().is_empty());
    }

    #[test]
    fn test_install_info_url_defaults_to_https() {
        let url = ToolShedClient::install_info_url("toolshed.g2.bx.psu.edu", "bwa", "devteam", "abc")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://toolshed.g2.bx.psu.edu/api/repositories/get_repository_revision_install_info?name=bwa&owner=devteam&changeset_revision=abc"
        );
    }

    #[test]
    fn test_install_info_url_keeps_scheme_and_path() {
        let url = ToolShedClient::install_info_url("http://localhost:9009/shed/", "my tool", "me", "r")
            .unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(
            url.path(),
            "/shed/api/repositories/get_repository_revision_install_info"
        );
        assert!(url.query().unwrap().contains("name=my+tool"));
    }
}
