//! Tool manifest and registry types

use serde::{Deserialize, Serialize};

/// Parsed `tools.yaml` document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolManifest {
    /// Tool entries in document order
    pub tools: Vec<ToolEntry>,
}

/// One installable tool from a plugin manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolEntry {
    /// Repository name in the tool shed
    pub name: String,

    /// Repository owner in the tool shed
    pub owner: String,

    /// Tool shed the repository lives in
    pub tool_shed_url: String,

    /// Changeset revisions to install, in order
    pub revisions: Vec<String>,

    /// Galaxy tool panel section
    pub tool_panel_section_label: String,
}

/// A dependency requirement of a resolved tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementRecord {
    pub name: String,

    #[serde(default)]
    pub version: Option<String>,
}

impl RequirementRecord {
    pub fn versioned(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
        }
    }

    pub fn unversioned(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    pub fn is_versioned(&self) -> bool {
        self.version.is_some()
    }

    /// `name==version`, or `None` for an unversioned requirement
    pub fn spec_string(&self) -> Option<String> {
        self.version
            .as_ref()
            .map(|version| format!("{}=={}", self.name, version))
    }
}

/// Connection parameters of the Galaxy instance tools are installed into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GalaxyTarget {
    pub url: String,
    pub user: String,
    pub password: String,
    pub api_key: String,
}

impl Default for GalaxyTarget {
    fn default() -> Self {
        Self {
            url: "http://nginx:90".to_string(),
            user: "admin@galaxy.org".to_string(),
            password: "password".to_string(),
            api_key: "fakekey".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_spec_string() {
        assert_eq!(
            RequirementRecord::versioned("samtools", "1.9").spec_string(),
            Some("samtools==1.9".to_string())
        );
        assert_eq!(RequirementRecord::unversioned("bwa").spec_string(), None);
    }

    #[test]
    fn test_requirement_version_is_optional_in_json() {
        let req: RequirementRecord = serde_yaml_ng::from_str("name: bwa\ntype: package\n").unwrap();
        assert_eq!(req, RequirementRecord::unversioned("bwa"));
        assert!(!req.is_versioned());
    }
}
