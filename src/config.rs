//! Run configuration.
//!
//! A `RunConfig` controls which checks are selected and how object
//! annotations are interpreted. It can be built in code or loaded from a
//! YAML file:
//!
//! ```yaml
//! useIgnoreChecksAnnotation: true
//! enabledOptionalChecks: [container-seccomp-profile]
//! ignoredChecks: [label-values]
//! kubernetesVersion: v1.24
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Kubernetes version as (major, minor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KubernetesVersion {
    pub major: u32,
    pub minor: u32,
}

impl KubernetesVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse from a string like "1.25" or "v1.25". Patch components are ignored.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidKubernetesVersion(s.to_string());
        let trimmed = s.trim().trim_start_matches('v');
        let mut parts = trimmed.split('.');
        let major = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        let minor = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        Ok(Self { major, minor })
    }
}

impl Default for KubernetesVersion {
    fn default() -> Self {
        Self::new(1, 18)
    }
}

impl fmt::Display for KubernetesVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

impl FromStr for KubernetesVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for KubernetesVersion {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<KubernetesVersion> for String {
    fn from(version: KubernetesVersion) -> Self {
        version.to_string()
    }
}

/// Configuration for a scoring run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunConfig {
    /// Honour the `kube-score/ignore` annotation on objects.
    pub use_ignore_checks_annotation: bool,

    /// Honour the `kube-score/enable` annotation on objects.
    pub use_optional_checks_annotation: bool,

    /// Run every optional check on every object.
    pub all_optional_checks: bool,

    /// Optional check IDs to run on every object.
    pub enabled_optional_checks: Vec<String>,

    /// Check IDs that are skipped for every object.
    pub ignored_checks: Vec<String>,

    /// Target cluster version, used by version-aware checks.
    pub kubernetes_version: KubernetesVersion,

    /// Fan parsing and scoring out over a thread pool.
    pub parallel: bool,
}

impl RunConfig {
    /// Create a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a YAML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from_str(&content)
    }

    /// Load a configuration from a YAML string.
    pub fn load_from_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Enable or disable the ignore annotation.
    pub fn with_ignore_annotation(mut self, enabled: bool) -> Self {
        self.use_ignore_checks_annotation = enabled;
        self
    }

    /// Enable or disable the optional-check annotation.
    pub fn with_optional_annotation(mut self, enabled: bool) -> Self {
        self.use_optional_checks_annotation = enabled;
        self
    }

    /// Run all optional checks.
    pub fn with_all_optional(mut self) -> Self {
        self.all_optional_checks = true;
        self
    }

    /// Enable one optional check by ID.
    pub fn enable(mut self, check_id: impl Into<String>) -> Self {
        self.enabled_optional_checks.push(check_id.into());
        self
    }

    /// Skip one check by ID for every object.
    pub fn ignore(mut self, check_id: impl Into<String>) -> Self {
        self.ignored_checks.push(check_id.into());
        self
    }

    /// Set the target Kubernetes version.
    pub fn with_kubernetes_version(mut self, version: KubernetesVersion) -> Self {
        self.kubernetes_version = version;
        self
    }

    /// Enable parallel parsing and scoring.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Whether the check is enabled for every object by this configuration.
    pub fn is_optional_enabled(&self, check_id: &str) -> bool {
        self.all_optional_checks || self.enabled_optional_checks.iter().any(|c| c == check_id)
    }

    /// Whether the check is skipped for every object by this configuration.
    pub fn is_check_ignored(&self, check_id: &str) -> bool {
        self.ignored_checks.iter().any(|c| c == check_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert!(!config.use_ignore_checks_annotation);
        assert!(!config.use_optional_checks_annotation);
        assert!(!config.all_optional_checks);
        assert_eq!(config.kubernetes_version, KubernetesVersion::new(1, 18));
    }

    #[test]
    fn test_builder_methods() {
        let config = RunConfig::new()
            .with_ignore_annotation(true)
            .enable("container-seccomp-profile")
            .ignore("label-values");

        assert!(config.use_ignore_checks_annotation);
        assert!(config.is_optional_enabled("container-seccomp-profile"));
        assert!(!config.is_optional_enabled("pod-networkpolicy"));
        assert!(config.is_check_ignored("label-values"));
    }

    #[test]
    fn test_all_optional_enables_everything() {
        let config = RunConfig::new().with_all_optional();
        assert!(config.is_optional_enabled("anything"));
    }

    #[test]
    fn test_load_from_yaml() {
        let yaml = r#"
useIgnoreChecksAnnotation: true
enabledOptionalChecks:
  - container-seccomp-profile
ignoredChecks:
  - stable-version
kubernetesVersion: v1.24
"#;
        let config = RunConfig::load_from_str(yaml).unwrap();
        assert!(config.use_ignore_checks_annotation);
        assert!(!config.use_optional_checks_annotation);
        assert_eq!(config.enabled_optional_checks, vec!["container-seccomp-profile"]);
        assert_eq!(config.ignored_checks, vec!["stable-version"]);
        assert_eq!(config.kubernetes_version, KubernetesVersion::new(1, 24));
    }

    #[test]
    fn test_load_empty_yaml() {
        assert_eq!(RunConfig::load_from_str("").unwrap(), RunConfig::default());
    }

    #[test]
    fn test_load_invalid_version() {
        let err = RunConfig::load_from_str("kubernetesVersion: latest").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_kubernetes_version_parse() {
        assert_eq!(KubernetesVersion::parse("1.25").unwrap(), KubernetesVersion::new(1, 25));
        assert_eq!(KubernetesVersion::parse("v1.9").unwrap(), KubernetesVersion::new(1, 9));
        assert_eq!(KubernetesVersion::parse("v1.21.3").unwrap(), KubernetesVersion::new(1, 21));
        assert!(KubernetesVersion::parse("1").is_err());
        assert!(KubernetesVersion::parse("one.two").is_err());
    }

    #[test]
    fn test_kubernetes_version_ordering() {
        assert!(KubernetesVersion::new(1, 9) < KubernetesVersion::new(1, 18));
        assert!(KubernetesVersion::new(1, 21) > KubernetesVersion::new(1, 19));
        assert!(KubernetesVersion::new(2, 0) > KubernetesVersion::new(1, 30));
        assert_eq!(KubernetesVersion::new(1, 19).to_string(), "v1.19");
    }
}
