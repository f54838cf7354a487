//! Version-agnostic views over decoded objects.
//!
//! Every supported (apiVersion, kind) pair is decoded into its own spec type
//! (see [`adapters`]) and exposed to checks through the narrow capability
//! traits below. Checks are written once against a trait and never see the
//! version-specific shapes.

pub mod adapters;
pub mod batch;
pub mod schema;

pub use adapters::Versioned;
pub use batch::{Entry, NormalizedBatch, TypedObject};
pub use schema::{
    Container, IntOrString, LabelSelector, LabelSelectorRequirement, ObjectMeta, PodSpec,
    PodTemplateSpec, TypeMeta,
};

use crate::types::FileLocation;
use serde::Serialize;
use std::collections::BTreeMap;

/// Type and object metadata of any decoded object, with its location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BothMeta {
    pub type_meta: TypeMeta,
    pub object_meta: ObjectMeta,
    pub location: FileLocation,
}

/// Identity shared by every decoded object.
pub trait ObjectIdentity: Send + Sync {
    fn type_meta(&self) -> TypeMeta;

    fn object_meta(&self) -> &ObjectMeta;

    fn location(&self) -> &FileLocation;

    fn name(&self) -> &str {
        &self.object_meta().name
    }

    fn namespace(&self) -> &str {
        &self.object_meta().namespace
    }

    fn both_meta(&self) -> BothMeta {
        BothMeta {
            type_meta: self.type_meta(),
            object_meta: self.object_meta().clone(),
            location: self.location().clone(),
        }
    }
}

/// Borrowed view of a pod template.
#[derive(Debug, Clone, Copy)]
pub struct PodTemplate<'a> {
    /// Namespace of the enclosing object. Templates never carry their own.
    pub namespace: &'a str,
    pub metadata: &'a ObjectMeta,
    pub spec: &'a PodSpec,
}

impl<'a> PodTemplate<'a> {
    pub fn labels(&self) -> &'a BTreeMap<String, String> {
        &self.metadata.labels
    }

    pub fn annotations(&self) -> &'a BTreeMap<String, String> {
        &self.metadata.annotations
    }
}

/// Anything that runs pods: pods, deployments, stateful sets, daemon sets, jobs and cron jobs.
pub trait PodTemplateHolder: ObjectIdentity {
    fn pod_template(&self) -> PodTemplate<'_>;

    /// Annotation maps that may carry check pragmas for this template, outermost first.
    fn annotation_sources(&self) -> Vec<&BTreeMap<String, String>> {
        vec![
            &self.object_meta().annotations,
            self.pod_template().annotations(),
        ]
    }
}

pub trait DeploymentHolder: PodTemplateHolder {
    fn replicas(&self) -> Option<i32>;

    fn selector(&self) -> Option<&LabelSelector>;
}

pub trait StatefulSetHolder: PodTemplateHolder {
    fn replicas(&self) -> Option<i32>;

    fn selector(&self) -> Option<&LabelSelector>;

    fn service_name(&self) -> &str;
}

pub trait CronJobHolder: PodTemplateHolder {
    fn starting_deadline_seconds(&self) -> Option<i64>;

    /// Backoff limit of the jobs created from the job template.
    fn backoff_limit(&self) -> Option<i32>;
}

/// One port exposed by a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePort {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub port: i64,
    pub target_port: Option<IntOrString>,
    pub protocol: Option<String>,
}

pub trait ServiceHolder: ObjectIdentity {
    /// Equality selector; empty when the service selects nothing.
    fn selector(&self) -> &BTreeMap<String, String>;

    fn cluster_ip(&self) -> Option<&str>;

    /// `ClusterIP` when unset.
    fn service_type(&self) -> &str;

    fn ports(&self) -> &[ServicePort];
}

pub trait NetworkPolicyHolder: ObjectIdentity {
    fn pod_selector(&self) -> &LabelSelector;

    fn policy_types(&self) -> &[String];

    fn has_ingress_rules(&self) -> bool;

    fn has_egress_rules(&self) -> bool;

    /// Without explicit policy types every policy covers ingress.
    fn covers_ingress(&self) -> bool {
        let types = self.policy_types();
        types.is_empty() || types.iter().any(|t| t == "Ingress")
    }

    /// Without explicit policy types a policy covers egress only when it has egress rules.
    fn covers_egress(&self) -> bool {
        let types = self.policy_types();
        if types.is_empty() {
            return self.has_egress_rules();
        }
        types.iter().any(|t| t == "Egress")
    }
}

/// A service referenced by an ingress rule or default backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngressBackendRef {
    pub host: Option<String>,
    pub path: Option<String>,
    pub service_name: String,
    pub service_port: Option<IntOrString>,
}

pub trait IngressHolder: ObjectIdentity {
    fn ingress_class_name(&self) -> Option<&str>;

    /// Every service backend of the ingress, default backend first.
    fn backends(&self) -> Vec<IngressBackendRef>;
}

/// The object an autoscaler scales.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossVersionObjectReference {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

pub trait AutoscaleTargetHolder: ObjectIdentity {
    fn scale_target(&self) -> &CrossVersionObjectReference;

    fn min_replicas(&self) -> Option<i32>;

    fn max_replicas(&self) -> i32;

    /// Target average CPU utilization in percent, whichever metric shape declares it.
    fn target_cpu_utilization(&self) -> Option<i32>;
}

pub trait DisruptionBudgetHolder: ObjectIdentity {
    /// Selector with the version's empty-selector semantics applied.
    /// `None` selects nothing.
    fn selector(&self) -> Option<&LabelSelector>;

    fn min_available(&self) -> Option<&IntOrString>;

    fn max_unavailable(&self) -> Option<&IntOrString>;

    fn unhealthy_pod_eviction_policy(&self) -> Option<&str>;
}
