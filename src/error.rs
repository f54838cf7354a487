//! Error types for kube-scorecard.

use crate::types::FileLocation;
use std::path::PathBuf;
use thiserror::Error;

/// A document that could not be turned into a typed object.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The document bytes are not UTF-8.
    #[error("{location}: document is not valid UTF-8")]
    InvalidUtf8 { location: FileLocation },

    /// `apiVersion` and `kind` could not be read from the document.
    #[error("{location}: failed to detect apiVersion and kind: {source}")]
    Detect {
        location: FileLocation,
        source: serde_yaml::Error,
    },

    /// The document has a known apiVersion and kind but does not match its schema.
    #[error("{location}: failed to parse {api_version}/{kind}: {source}")]
    Decode {
        location: FileLocation,
        api_version: String,
        kind: String,
        source: serde_yaml::Error,
    },
}

impl DecodeError {
    /// Location of the offending document.
    pub fn location(&self) -> &FileLocation {
        match self {
            Self::InvalidUtf8 { location }
            | Self::Detect { location, .. }
            | Self::Decode { location, .. } => location,
        }
    }
}

/// Every decode failure of a batch, reported once the whole batch was read.
#[derive(Debug, Error)]
#[error("{} document(s) failed to parse:\n{}", .0.len(), join_errors(.0))]
pub struct ParseErrors(pub Vec<DecodeError>);

impl ParseErrors {
    pub fn iter(&self) -> impl Iterator<Item = &DecodeError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn join_errors(errors: &[DecodeError]) -> String {
    errors
        .iter()
        .map(|e| format!("  {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A label selector that cannot be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("{operator:?} is not a valid label selector operator (key {key:?})")]
    UnknownOperator { key: String, operator: String },

    #[error("operator {operator} on key {key:?} requires at least one value")]
    MissingValues { key: String, operator: String },

    #[error("operator {operator} on key {key:?} must not have values")]
    UnexpectedValues { key: String, operator: String },

    #[error("{0:?} is not a valid label key")]
    InvalidKey(String),

    #[error("{value:?} is not a valid label value for key {key:?}")]
    InvalidValue { key: String, value: String },
}

/// Failure of a single check evaluation. Recorded on that one result only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("{0}")]
    Evaluation(String),
}

/// Run configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid Kubernetes version {0:?}, expected a value like v1.18")]
    InvalidKubernetesVersion(String),
}

/// Crate-level error for the convenience entry points.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseErrors),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for kube-scorecard operations.
pub type Result<T> = std::result::Result<T, Error>;
