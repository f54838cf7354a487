//! Deployments, stateful sets and daemon sets.
//!
//! `apps/v1` and `apps/v1beta2` require an explicit selector. The older
//! `apps/v1beta1` and `extensions/v1beta1` shapes default a missing selector
//! to the template labels, which is applied on decode.

use super::TemplateSpec;
use crate::context::schema::{null_as_default, LabelSelector, ObjectSpec, PodTemplateSpec};
use crate::context::{DeploymentHolder, StatefulSetHolder, Versioned};
use serde::Deserialize;

fn default_selector(selector: &mut Option<LabelSelector>, template: &PodTemplateSpec) {
    if selector.is_none() {
        *selector = Some(LabelSelector::from_labels(&template.metadata.labels));
    }
}

/// `apps/v1` and `apps/v1beta2` Deployment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    pub replicas: Option<i32>,
    pub selector: Option<LabelSelector>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub template: PodTemplateSpec,
}

impl ObjectSpec for DeploymentSpec {}

impl TemplateSpec for DeploymentSpec {
    fn template(&self) -> &PodTemplateSpec {
        &self.template
    }
}

impl DeploymentHolder for Versioned<DeploymentSpec> {
    fn replicas(&self) -> Option<i32> {
        self.obj.spec.replicas
    }

    fn selector(&self) -> Option<&LabelSelector> {
        self.obj.spec.selector.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RollbackConfig {
    #[serde(default)]
    pub revision: i64,
}

/// `apps/v1beta1` and `extensions/v1beta1` Deployment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyDeploymentSpec {
    pub replicas: Option<i32>,
    pub selector: Option<LabelSelector>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub template: PodTemplateSpec,
    pub rollback_to: Option<RollbackConfig>,
}

impl ObjectSpec for LegacyDeploymentSpec {
    fn apply_defaults(&mut self) {
        default_selector(&mut self.selector, &self.template);
    }
}

impl TemplateSpec for LegacyDeploymentSpec {
    fn template(&self) -> &PodTemplateSpec {
        &self.template
    }
}

impl DeploymentHolder for Versioned<LegacyDeploymentSpec> {
    fn replicas(&self) -> Option<i32> {
        self.obj.spec.replicas
    }

    fn selector(&self) -> Option<&LabelSelector> {
        self.obj.spec.selector.as_ref()
    }
}

/// `apps/v1` and `apps/v1beta2` StatefulSet.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatefulSetSpec {
    pub replicas: Option<i32>,
    pub selector: Option<LabelSelector>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub template: PodTemplateSpec,
}

impl ObjectSpec for StatefulSetSpec {}

impl TemplateSpec for StatefulSetSpec {
    fn template(&self) -> &PodTemplateSpec {
        &self.template
    }
}

impl StatefulSetHolder for Versioned<StatefulSetSpec> {
    fn replicas(&self) -> Option<i32> {
        self.obj.spec.replicas
    }

    fn selector(&self) -> Option<&LabelSelector> {
        self.obj.spec.selector.as_ref()
    }

    fn service_name(&self) -> &str {
        &self.obj.spec.service_name
    }
}

/// `apps/v1beta1` StatefulSet.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyStatefulSetSpec {
    pub replicas: Option<i32>,
    pub selector: Option<LabelSelector>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub template: PodTemplateSpec,
}

impl ObjectSpec for LegacyStatefulSetSpec {
    fn apply_defaults(&mut self) {
        default_selector(&mut self.selector, &self.template);
    }
}

impl TemplateSpec for LegacyStatefulSetSpec {
    fn template(&self) -> &PodTemplateSpec {
        &self.template
    }
}

impl StatefulSetHolder for Versioned<LegacyStatefulSetSpec> {
    fn replicas(&self) -> Option<i32> {
        self.obj.spec.replicas
    }

    fn selector(&self) -> Option<&LabelSelector> {
        self.obj.spec.selector.as_ref()
    }

    fn service_name(&self) -> &str {
        &self.obj.spec.service_name
    }
}

/// `apps/v1` and `apps/v1beta2` DaemonSet.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaemonSetSpec {
    pub selector: Option<LabelSelector>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub template: PodTemplateSpec,
}

impl ObjectSpec for DaemonSetSpec {}

impl TemplateSpec for DaemonSetSpec {
    fn template(&self) -> &PodTemplateSpec {
        &self.template
    }
}

/// `extensions/v1beta1` DaemonSet.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyDaemonSetSpec {
    pub selector: Option<LabelSelector>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub template: PodTemplateSpec,
    pub template_generation: Option<i64>,
}

impl ObjectSpec for LegacyDaemonSetSpec {
    fn apply_defaults(&mut self) {
        default_selector(&mut self.selector, &self.template);
    }
}

impl TemplateSpec for LegacyDaemonSetSpec {
    fn template(&self) -> &PodTemplateSpec {
        &self.template
    }
}
