//! PodDisruptionBudget.
//!
//! The two versions share a shape but differ on an empty selector:
//! `policy/v1beta1` selects no pods, `policy/v1` selects every pod in the namespace.

use crate::context::schema::{IntOrString, LabelSelector, ObjectSpec};
use crate::context::{DisruptionBudgetHolder, Versioned};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdbV1beta1Spec {
    pub min_available: Option<IntOrString>,
    pub max_unavailable: Option<IntOrString>,
    pub selector: Option<LabelSelector>,
    pub unhealthy_pod_eviction_policy: Option<String>,
}

impl ObjectSpec for PdbV1beta1Spec {}

impl DisruptionBudgetHolder for Versioned<PdbV1beta1Spec> {
    fn selector(&self) -> Option<&LabelSelector> {
        self.obj.spec.selector.as_ref().filter(|s| !s.is_empty())
    }

    fn min_available(&self) -> Option<&IntOrString> {
        self.obj.spec.min_available.as_ref()
    }

    fn max_unavailable(&self) -> Option<&IntOrString> {
        self.obj.spec.max_unavailable.as_ref()
    }

    fn unhealthy_pod_eviction_policy(&self) -> Option<&str> {
        self.obj.spec.unhealthy_pod_eviction_policy.as_deref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdbV1Spec {
    pub min_available: Option<IntOrString>,
    pub max_unavailable: Option<IntOrString>,
    pub selector: Option<LabelSelector>,
    pub unhealthy_pod_eviction_policy: Option<String>,
}

impl ObjectSpec for PdbV1Spec {}

impl DisruptionBudgetHolder for Versioned<PdbV1Spec> {
    fn selector(&self) -> Option<&LabelSelector> {
        self.obj.spec.selector.as_ref()
    }

    fn min_available(&self) -> Option<&IntOrString> {
        self.obj.spec.min_available.as_ref()
    }

    fn max_unavailable(&self) -> Option<&IntOrString> {
        self.obj.spec.max_unavailable.as_ref()
    }

    fn unhealthy_pod_eviction_policy(&self) -> Option<&str> {
        self.obj.spec.unhealthy_pod_eviction_policy.as_deref()
    }
}
