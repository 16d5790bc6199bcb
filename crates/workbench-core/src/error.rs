//! Error types for the workbench pipeline

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using workbench-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline error kinds
#[derive(Error, Debug)]
pub enum Error {
    /// Access credential missing or rejected by the release host
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// Release or registry lookup failed
    #[error("Could not resolve {subject}: {message}")]
    Resolution { subject: String, message: String },

    /// Decompression of an archive failed
    #[error("Failed to extract {path}: {message}")]
    Extraction { path: PathBuf, message: String },

    /// Expected file or directory is missing
    #[error("Not found: {path}")]
    NotFound { path: PathBuf },

    /// Malformed manifest or requirements file
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Installer process failed
    #[error("Failed to install {tool}: {message}")]
    Install { tool: String, message: String },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// ZIP container error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl Error {
    /// Create an authentication error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a resolution error for a repository, release, or tool
    pub fn resolution(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolution {
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Create an extraction error
    pub fn extraction(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Extraction {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        Self::NotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a parse error
    pub fn parse(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create an install error
    pub fn install(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Install {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error must abort the whole run rather than a single unit
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth { .. } | Self::Config { .. })
    }
}

/// A failure scoped to one repository, archive, tool, or workflow
#[derive(Debug)]
pub struct UnitFailure {
    /// Identifier of the failed unit (repository name, archive path, tool name)
    pub unit: String,

    /// The error that ended processing of this unit
    pub error: Error,
}

impl UnitFailure {
    pub fn new(unit: impl Into<String>, error: Error) -> Self {
        Self {
            unit: unit.into(),
            error,
        }
    }
}

impl std::fmt::Display for UnitFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.unit, self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_kinds() {
        assert!(Error::auth("token missing").is_fatal());
        assert!(Error::config("bad value").is_fatal());
        assert!(!Error::resolution("repo", "no release").is_fatal());
        assert!(!Error::install("fastqc", "exit 1").is_fatal());
        assert!(!Error::not_found("/tmp/x").is_fatal());
    }

    #[test]
    fn test_display_names_the_unit() {
        let err = Error::resolution("irida-plugin-sars-cov-2-illumina", "release 9.9 not found");
        assert_eq!(
            err.to_string(),
            "Could not resolve irida-plugin-sars-cov-2-illumina: release 9.9 not found"
        );

        let failure = UnitFailure::new("fastqc", Error::install("fastqc", "exit status 2"));
        assert_eq!(
            failure.to_string(),
            "fastqc: Failed to install fastqc: exit status 2"
        );
    }
}
