//! Conda environment files from pinned requirements
//!
//! Requirements use pip-style `name==version` pins; conda environment
//! dependencies use `name=version`. Excluded packages are kept as comments at
//! the end of the document so the file still records them.

use serde::Serialize;
use std::path::Path;
use workbench_core::{Error, Result};

/// A `name==version` requirement pin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePin {
    pub name: String,
    pub version: String,
}

impl PackagePin {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parse a `name==version` spec string
    pub fn parse(spec: &str) -> Option<Self> {
        let (name, version) = spec.trim().split_once("==")?;
        if name.is_empty() || version.is_empty() || version.contains("==") {
            return None;
        }
        Some(Self::new(name, version))
    }
}

/// Parse requirement text, skipping blank lines and `#` comments
pub fn parse_requirements(text: &str, source: &Path) -> Result<Vec<PackagePin>> {
    let mut pins = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim_end();
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let pin = PackagePin::parse(line).ok_or_else(|| {
            Error::parse(
                source,
                format!("line {}: expected name==version, got {:?}", index + 1, line),
            )
        })?;
        pins.push(pin);
    }

    Ok(pins)
}

/// A conda environment definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CondaEnvironment {
    pub name: String,
    pub channels: Option<Vec<String>>,
    pub dependencies: Vec<PackagePin>,
    pub excluded: Vec<PackagePin>,
}

#[derive(Serialize)]
struct EnvironmentDocument<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    channels: Option<&'a [String]>,
    dependencies: Vec<String>,
}

impl CondaEnvironment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channels: None,
            dependencies: Vec::new(),
            excluded: Vec::new(),
        }
    }

    pub fn with_channels(mut self, channels: Vec<String>) -> Self {
        self.channels = Some(channels);
        self
    }

    /// Build from pins, moving any package named in `exclude` aside.
    /// A repeated package keeps its first position and takes the last version.
    pub fn from_pins(name: impl Into<String>, pins: Vec<PackagePin>, exclude: &[String]) -> Self {
        let mut environment = Self::new(name);
        for pin in pins {
            if exclude.contains(&pin.name) {
                environment.excluded.push(pin);
            } else if let Some(existing) = environment
                .dependencies
                .iter_mut()
                .find(|d| d.name == pin.name)
            {
                existing.version = pin.version;
            } else {
                environment.dependencies.push(pin);
            }
        }
        environment
    }

    /// Render the environment file
    pub fn to_yaml(&self) -> Result<String> {
        let document = EnvironmentDocument {
            name: &self.name,
            channels: self.channels.as_deref(),
            dependencies: self
                .dependencies
                .iter()
                .map(|pin| format!("{}={}", pin.name, pin.version))
                .collect(),
        };

        let mut yaml = serde_yaml_ng::to_string(&document)?;
        if !self.excluded.is_empty() {
            yaml.push_str("\n# packages excluded\n");
            for pin in &self.excluded {
                yaml.push_str(&format!("#{}=={}\n", pin.name, pin.version));
            }
        }
        Ok(yaml)
    }
}
