//! Label selector evaluation.
//!
//! Follows the platform's selector semantics:
//! - no selector matches nothing, an empty selector matches everything
//! - `In` needs the key with one of the values, `NotIn` matches a missing key
//! - `Exists` / `DoesNotExist` test the key only
//!
//! Every requirement is validated before any label is compared, so an
//! invalid selector is an error even when an earlier requirement already fails.

use super::labels::{is_valid_label_key, is_valid_label_value};
use crate::context::schema::{LabelSelector, LabelSelectorRequirement};
use crate::error::SelectorError;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    In,
    NotIn,
    Exists,
    DoesNotExist,
}

impl Operator {
    fn parse(requirement: &LabelSelectorRequirement) -> Result<Self, SelectorError> {
        let op = match requirement.operator.as_str() {
            "In" => Self::In,
            "NotIn" => Self::NotIn,
            "Exists" => Self::Exists,
            "DoesNotExist" => Self::DoesNotExist,
            other => {
                return Err(SelectorError::UnknownOperator {
                    key: requirement.key.clone(),
                    operator: other.to_string(),
                });
            }
        };

        let has_values = !requirement.values.is_empty();
        match op {
            Self::In | Self::NotIn if !has_values => Err(SelectorError::MissingValues {
                key: requirement.key.clone(),
                operator: requirement.operator.clone(),
            }),
            Self::Exists | Self::DoesNotExist if has_values => {
                Err(SelectorError::UnexpectedValues {
                    key: requirement.key.clone(),
                    operator: requirement.operator.clone(),
                })
            }
            _ => Ok(op),
        }
    }
}

/// A requirement that passed validation.
struct Requirement<'a> {
    key: &'a str,
    op: Operator,
    values: &'a [String],
}

impl Requirement<'_> {
    fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        let value = labels.get(self.key);
        match self.op {
            Operator::In => value.is_some_and(|v| self.values.contains(v)),
            Operator::NotIn => value.is_none_or(|v| !self.values.contains(v)),
            Operator::Exists => value.is_some(),
            Operator::DoesNotExist => value.is_none(),
        }
    }
}

fn validate_key(key: &str) -> Result<(), SelectorError> {
    if is_valid_label_key(key) {
        Ok(())
    } else {
        Err(SelectorError::InvalidKey(key.to_string()))
    }
}

fn validate_value(key: &str, value: &str) -> Result<(), SelectorError> {
    if is_valid_label_value(value) {
        Ok(())
    } else {
        Err(SelectorError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// Convert a selector into validated requirements, `matchLabels` first.
fn requirements(selector: &LabelSelector) -> Result<Vec<Requirement<'_>>, SelectorError> {
    let mut out = Vec::with_capacity(selector.match_labels.len() + selector.match_expressions.len());

    for (key, value) in &selector.match_labels {
        validate_key(key)?;
        validate_value(key, value)?;
        out.push(Requirement {
            key,
            op: Operator::In,
            values: std::slice::from_ref(value),
        });
    }

    for expr in &selector.match_expressions {
        let op = Operator::parse(expr)?;
        validate_key(&expr.key)?;
        for value in &expr.values {
            validate_value(&expr.key, value)?;
        }
        out.push(Requirement {
            key: &expr.key,
            op,
            values: &expr.values,
        });
    }

    Ok(out)
}

/// Evaluate a selector against a label set.
pub fn matches(
    selector: &LabelSelector,
    labels: &BTreeMap<String, String>,
) -> Result<bool, SelectorError> {
    let requirements = requirements(selector)?;
    Ok(requirements.iter().all(|r| r.matches(labels)))
}

/// Evaluate an optional selector. `None` matches nothing.
pub fn selector_matches(
    selector: Option<&LabelSelector>,
    labels: &BTreeMap<String, String>,
) -> Result<bool, SelectorError> {
    match selector {
        Some(selector) => matches(selector, labels),
        None => Ok(false),
    }
}

/// Like [`selector_matches`], but an invalid selector simply does not match.
pub fn matches_lenient(
    selector: Option<&LabelSelector>,
    labels: &BTreeMap<String, String>,
) -> bool {
    selector_matches(selector, labels).unwrap_or_else(|err| {
        log::debug!("treating invalid label selector as no match: {}", err);
        false
    })
}

/// Equality-only selector of a service. An empty selector matches nothing.
pub fn map_selector_matches(
    selector: &BTreeMap<String, String>,
    labels: &BTreeMap<String, String>,
) -> bool {
    !selector.is_empty() && selector.iter().all(|(k, v)| labels.get(k) == Some(v))
}
