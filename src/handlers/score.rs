//! Handler for the `score` command.

use crate::audit;
use crate::checks::builtin::builtin_checks;
use crate::config::{KubernetesVersion, RunConfig};
use crate::error::Result;
use crate::formatter::{OutputFormat, PlainOptions, format_scorecard};
use crate::handlers::input::collect_sources;
use crate::types::Grade;
use std::path::{Path, PathBuf};

/// Configuration for the score command
#[derive(Debug, Clone, Default)]
pub struct ScoreOptions {
    /// Run configuration file, applied before the flags below
    pub config_file: Option<PathBuf>,
    /// Output format
    pub format: OutputFormat,
    /// Target Kubernetes version
    pub kubernetes_version: Option<String>,
    /// Optional check IDs to enable
    pub enable_optional: Vec<String>,
    /// Enable every optional check
    pub all_optional: bool,
    /// Check IDs to skip
    pub ignore: Vec<String>,
    /// Ignore the kube-score/ignore annotation
    pub disable_ignore_annotation: bool,
    /// Ignore the kube-score/enable annotation
    pub disable_optional_annotation: bool,
    /// Parse and score in parallel
    pub parallel: bool,
    /// List passed and skipped checks too
    pub show_ok: bool,
}

impl ScoreOptions {
    /// Build the run configuration: file first, then flags.
    ///
    /// Both annotations are honoured unless disabled by a flag.
    pub fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config_file {
            Some(path) => load_config(path)?,
            None => RunConfig::default(),
        };

        config.use_ignore_checks_annotation = !self.disable_ignore_annotation;
        config.use_optional_checks_annotation = !self.disable_optional_annotation;
        config.all_optional_checks |= self.all_optional;
        config.parallel |= self.parallel;
        config
            .enabled_optional_checks
            .extend(self.enable_optional.iter().cloned());
        config.ignored_checks.extend(self.ignore.iter().cloned());

        if let Some(version) = &self.kubernetes_version {
            config.kubernetes_version = KubernetesVersion::parse(version)?;
        }

        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<RunConfig> {
    log::debug!("Loading run configuration from {}", path.display());
    Ok(RunConfig::load_from_file(path)?)
}

/// Handle the `score` command.
///
/// Returns whether any evaluated check graded `Critical`.
pub fn handle_score(files: &[PathBuf], options: &ScoreOptions) -> Result<bool> {
    let config = options.run_config()?;
    let sources = collect_sources(files)?;
    let checks = builtin_checks();

    let card = audit(&sources, &checks, &config)?;
    format_scorecard(
        &card,
        options.format,
        PlainOptions {
            show_ok: options.show_ok,
        },
    );

    Ok(card.has_grade_at_or_below(Grade::Critical))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let options = ScoreOptions {
            kubernetes_version: Some("v1.25".to_string()),
            enable_optional: vec!["container-seccomp-profile".to_string()],
            ignore: vec!["label-values".to_string()],
            disable_ignore_annotation: true,
            ..Default::default()
        };
        let config = options.run_config().unwrap();
        assert!(!config.use_ignore_checks_annotation);
        assert!(config.use_optional_checks_annotation);
        assert_eq!(config.kubernetes_version, KubernetesVersion::new(1, 25));
        assert!(config.is_optional_enabled("container-seccomp-profile"));
        assert!(config.is_check_ignored("label-values"));
    }

    #[test]
    fn test_invalid_version() {
        let options = ScoreOptions {
            kubernetes_version: Some("latest".to_string()),
            ..Default::default()
        };
        assert!(options.run_config().is_err());
    }
}
