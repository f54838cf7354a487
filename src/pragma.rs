//! Annotation-driven check selection.
//!
//! Objects can name checks to skip with `kube-score/ignore` and optional
//! checks to run with `kube-score/enable`. Both take a comma-separated list
//! of check IDs. The annotations are only honoured when the run enables them.

use std::collections::BTreeMap;

/// Annotation listing checks to skip for an object.
pub const IGNORE_ANNOTATION: &str = "kube-score/ignore";

/// Annotation listing optional checks to run for an object.
pub const ENABLE_ANNOTATION: &str = "kube-score/enable";

/// Split an annotation value into check IDs.
pub fn parse_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|id| !id.is_empty())
}

fn annotation_names(sources: &[&BTreeMap<String, String>], annotation: &str, check_id: &str) -> bool {
    sources
        .iter()
        .filter_map(|annotations| annotations.get(annotation))
        .any(|value| parse_list(value).any(|id| id == check_id))
}

/// Whether any of the annotation maps asks to skip the check.
pub fn is_ignored(sources: &[&BTreeMap<String, String>], check_id: &str) -> bool {
    annotation_names(sources, IGNORE_ANNOTATION, check_id)
}

/// Whether any of the annotation maps opts in to the optional check.
pub fn is_enabled(sources: &[&BTreeMap<String, String>], check_id: &str) -> bool {
    annotation_names(sources, ENABLE_ANNOTATION, check_id)
}
