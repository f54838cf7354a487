//! Dispatch table from (apiVersion, kind) to a decode routine.

use crate::context::adapters::apps::{
    DaemonSetSpec, DeploymentSpec, LegacyDaemonSetSpec, LegacyDeploymentSpec,
    LegacyStatefulSetSpec, StatefulSetSpec,
};
use crate::context::adapters::autoscaling::{HpaV1Spec, HpaV2Spec, HpaV2beta1Spec};
use crate::context::adapters::batch::{CronJobSpec, JobSpec};
use crate::context::adapters::corev1::ServiceSpec;
use crate::context::adapters::networking::{
    ExtensionsIngressSpec, IngressV1Spec, IngressV1beta1Spec, NetworkPolicySpec,
};
use crate::context::adapters::policy::{PdbV1Spec, PdbV1beta1Spec};
use crate::context::schema::{ObjectSpec, PodSpec};
use crate::context::{
    AutoscaleTargetHolder, CronJobHolder, DeploymentHolder, DisruptionBudgetHolder,
    IngressHolder, NetworkPolicyHolder, NormalizedBatch, PodTemplateHolder, ServiceHolder,
    StatefulSetHolder, Versioned,
};
use crate::types::FileLocation;
use serde_yaml::Value;
use std::collections::BTreeMap;

/// Decodes one document and adds the resulting object to the batch.
pub type DecodeFn = fn(&mut NormalizedBatch, Value, FileLocation) -> Result<(), serde_yaml::Error>;

/// The (apiVersion, kind) pairs understood by the parser.
///
/// `v1/List` is not part of the table; the parser expands lists itself.
#[derive(Debug, Clone)]
pub struct Scheme {
    decoders: BTreeMap<(String, String), DecodeFn>,
}

impl Default for Scheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheme {
    /// Build the table of every supported pair.
    pub fn new() -> Self {
        let mut scheme = Self::empty();

        scheme.register("v1", "Pod", pod);
        scheme.register("v1", "Service", service::<ServiceSpec>);

        scheme.register("batch/v1", "Job", job::<JobSpec>);
        scheme.register("batch/v1beta1", "CronJob", cron_job::<CronJobSpec>);
        scheme.register("batch/v1", "CronJob", cron_job::<CronJobSpec>);

        scheme.register("apps/v1", "Deployment", deployment::<DeploymentSpec>);
        scheme.register("apps/v1beta2", "Deployment", deployment::<DeploymentSpec>);
        scheme.register("apps/v1beta1", "Deployment", deployment::<LegacyDeploymentSpec>);
        scheme.register(
            "extensions/v1beta1",
            "Deployment",
            deployment::<LegacyDeploymentSpec>,
        );

        scheme.register("apps/v1", "StatefulSet", stateful_set::<StatefulSetSpec>);
        scheme.register("apps/v1beta2", "StatefulSet", stateful_set::<StatefulSetSpec>);
        scheme.register(
            "apps/v1beta1",
            "StatefulSet",
            stateful_set::<LegacyStatefulSetSpec>,
        );

        scheme.register("apps/v1", "DaemonSet", daemon_set::<DaemonSetSpec>);
        scheme.register("apps/v1beta2", "DaemonSet", daemon_set::<DaemonSetSpec>);
        scheme.register(
            "extensions/v1beta1",
            "DaemonSet",
            daemon_set::<LegacyDaemonSetSpec>,
        );

        scheme.register(
            "networking.k8s.io/v1",
            "NetworkPolicy",
            network_policy::<NetworkPolicySpec>,
        );
        scheme.register(
            "extensions/v1beta1",
            "NetworkPolicy",
            network_policy::<NetworkPolicySpec>,
        );

        scheme.register("extensions/v1beta1", "Ingress", ingress::<ExtensionsIngressSpec>);
        scheme.register(
            "networking.k8s.io/v1beta1",
            "Ingress",
            ingress::<IngressV1beta1Spec>,
        );
        scheme.register("networking.k8s.io/v1", "Ingress", ingress::<IngressV1Spec>);

        scheme.register(
            "autoscaling/v1",
            "HorizontalPodAutoscaler",
            autoscaler::<HpaV1Spec>,
        );
        scheme.register(
            "autoscaling/v2beta1",
            "HorizontalPodAutoscaler",
            autoscaler::<HpaV2beta1Spec>,
        );
        scheme.register(
            "autoscaling/v2beta2",
            "HorizontalPodAutoscaler",
            autoscaler::<HpaV2Spec>,
        );
        scheme.register(
            "autoscaling/v2",
            "HorizontalPodAutoscaler",
            autoscaler::<HpaV2Spec>,
        );

        scheme.register(
            "policy/v1beta1",
            "PodDisruptionBudget",
            disruption_budget::<PdbV1beta1Spec>,
        );
        scheme.register(
            "policy/v1",
            "PodDisruptionBudget",
            disruption_budget::<PdbV1Spec>,
        );

        scheme
    }

    /// A table with no entries.
    pub fn empty() -> Self {
        Self {
            decoders: BTreeMap::new(),
        }
    }

    /// Add or replace the decoder for a pair.
    pub fn register(&mut self, api_version: &str, kind: &str, decode: DecodeFn) {
        self.decoders
            .insert((api_version.to_string(), kind.to_string()), decode);
    }

    pub fn lookup(&self, api_version: &str, kind: &str) -> Option<DecodeFn> {
        self.decoders
            .get(&(api_version.to_string(), kind.to_string()))
            .copied()
    }

    pub fn contains(&self, api_version: &str, kind: &str) -> bool {
        self.lookup(api_version, kind).is_some()
    }

    /// Every registered pair, sorted.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.decoders
            .keys()
            .map(|(api_version, kind)| (api_version.as_str(), kind.as_str()))
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

fn pod(batch: &mut NormalizedBatch, value: Value, loc: FileLocation) -> Result<(), serde_yaml::Error> {
    batch.add_pod(Versioned::<PodSpec>::from_value(value, loc)?);
    Ok(())
}

fn job<S>(batch: &mut NormalizedBatch, value: Value, loc: FileLocation) -> Result<(), serde_yaml::Error>
where
    S: ObjectSpec,
    Versioned<S>: PodTemplateHolder,
{
    batch.add_job(Versioned::<S>::from_value(value, loc)?);
    Ok(())
}

fn cron_job<S>(
    batch: &mut NormalizedBatch,
    value: Value,
    loc: FileLocation,
) -> Result<(), serde_yaml::Error>
where
    S: ObjectSpec,
    Versioned<S>: CronJobHolder,
{
    batch.add_cron_job(Versioned::<S>::from_value(value, loc)?);
    Ok(())
}

fn deployment<S>(
    batch: &mut NormalizedBatch,
    value: Value,
    loc: FileLocation,
) -> Result<(), serde_yaml::Error>
where
    S: ObjectSpec,
    Versioned<S>: DeploymentHolder,
{
    batch.add_deployment(Versioned::<S>::from_value(value, loc)?);
    Ok(())
}

fn stateful_set<S>(
    batch: &mut NormalizedBatch,
    value: Value,
    loc: FileLocation,
) -> Result<(), serde_yaml::Error>
where
    S: ObjectSpec,
    Versioned<S>: StatefulSetHolder,
{
    batch.add_stateful_set(Versioned::<S>::from_value(value, loc)?);
    Ok(())
}

fn daemon_set<S>(
    batch: &mut NormalizedBatch,
    value: Value,
    loc: FileLocation,
) -> Result<(), serde_yaml::Error>
where
    S: ObjectSpec,
    Versioned<S>: PodTemplateHolder,
{
    batch.add_daemon_set(Versioned::<S>::from_value(value, loc)?);
    Ok(())
}

fn service<S>(
    batch: &mut NormalizedBatch,
    value: Value,
    loc: FileLocation,
) -> Result<(), serde_yaml::Error>
where
    S: ObjectSpec,
    Versioned<S>: ServiceHolder,
{
    batch.add_service(Versioned::<S>::from_value(value, loc)?);
    Ok(())
}

fn network_policy<S>(
    batch: &mut NormalizedBatch,
    value: Value,
    loc: FileLocation,
) -> Result<(), serde_yaml::Error>
where
    S: ObjectSpec,
    Versioned<S>: NetworkPolicyHolder,
{
    batch.add_network_policy(Versioned::<S>::from_value(value, loc)?);
    Ok(())
}

fn ingress<S>(
    batch: &mut NormalizedBatch,
    value: Value,
    loc: FileLocation,
) -> Result<(), serde_yaml::Error>
where
    S: ObjectSpec,
    Versioned<S>: IngressHolder,
{
    batch.add_ingress(Versioned::<S>::from_value(value, loc)?);
    Ok(())
}

fn autoscaler<S>(
    batch: &mut NormalizedBatch,
    value: Value,
    loc: FileLocation,
) -> Result<(), serde_yaml::Error>
where
    S: ObjectSpec,
    Versioned<S>: AutoscaleTargetHolder,
{
    batch.add_autoscaler(Versioned::<S>::from_value(value, loc)?);
    Ok(())
}

fn disruption_budget<S>(
    batch: &mut NormalizedBatch,
    value: Value,
    loc: FileLocation,
) -> Result<(), serde_yaml::Error>
where
    S: ObjectSpec,
    Versioned<S>: DisruptionBudgetHolder,
{
    batch.add_disruption_budget(Versioned::<S>::from_value(value, loc)?);
    Ok(())
}
