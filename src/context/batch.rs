//! The normalized output of a parse run.

use super::{
    AutoscaleTargetHolder, BothMeta, CronJobHolder, DeploymentHolder, DisruptionBudgetHolder,
    IngressHolder, NetworkPolicyHolder, PodTemplateHolder, ServiceHolder, StatefulSetHolder,
};
use crate::error::{DecodeError, ParseErrors};
use std::fmt;
use std::sync::Arc;

/// A decoded object, tagged with its category.
#[derive(Clone)]
pub enum TypedObject {
    Pod(Arc<dyn PodTemplateHolder>),
    Deployment(Arc<dyn DeploymentHolder>),
    StatefulSet(Arc<dyn StatefulSetHolder>),
    DaemonSet(Arc<dyn PodTemplateHolder>),
    Job(Arc<dyn PodTemplateHolder>),
    CronJob(Arc<dyn CronJobHolder>),
    Service(Arc<dyn ServiceHolder>),
    NetworkPolicy(Arc<dyn NetworkPolicyHolder>),
    Ingress(Arc<dyn IngressHolder>),
    PodDisruptionBudget(Arc<dyn DisruptionBudgetHolder>),
    HorizontalPodAutoscaler(Arc<dyn AutoscaleTargetHolder>),
}

impl TypedObject {
    pub fn category_name(&self) -> &'static str {
        match self {
            Self::Pod(_) => "Pod",
            Self::Deployment(_) => "Deployment",
            Self::StatefulSet(_) => "StatefulSet",
            Self::DaemonSet(_) => "DaemonSet",
            Self::Job(_) => "Job",
            Self::CronJob(_) => "CronJob",
            Self::Service(_) => "Service",
            Self::NetworkPolicy(_) => "NetworkPolicy",
            Self::Ingress(_) => "Ingress",
            Self::PodDisruptionBudget(_) => "PodDisruptionBudget",
            Self::HorizontalPodAutoscaler(_) => "HorizontalPodAutoscaler",
        }
    }
}

impl fmt::Debug for TypedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category_name())
    }
}

/// One decoded object: its identity, its typed handle and, for anything
/// that runs pods, its pod-template view.
#[derive(Debug, Clone)]
pub struct Entry {
    pub meta: BothMeta,
    pub object: TypedObject,
    pub pod_template: Option<Arc<dyn PodTemplateHolder>>,
}

impl fmt::Debug for dyn PodTemplateHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PodTemplateHolder({})", self.location())
    }
}

/// Every object decoded from a set of sources, in encounter order, plus the
/// decode errors met along the way.
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    entries: Vec<Entry>,
    errors: Vec<DecodeError>,
}

impl NormalizedBatch {
    /// Create a new empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pod<T: PodTemplateHolder + 'static>(&mut self, obj: T) {
        let obj = Arc::new(obj);
        let template: Arc<dyn PodTemplateHolder> = obj.clone();
        self.push(obj.both_meta(), TypedObject::Pod(obj), Some(template));
    }

    pub fn add_deployment<T: DeploymentHolder + 'static>(&mut self, obj: T) {
        let obj = Arc::new(obj);
        let template: Arc<dyn PodTemplateHolder> = obj.clone();
        self.push(obj.both_meta(), TypedObject::Deployment(obj), Some(template));
    }

    pub fn add_stateful_set<T: StatefulSetHolder + 'static>(&mut self, obj: T) {
        let obj = Arc::new(obj);
        let template: Arc<dyn PodTemplateHolder> = obj.clone();
        self.push(obj.both_meta(), TypedObject::StatefulSet(obj), Some(template));
    }

    pub fn add_daemon_set<T: PodTemplateHolder + 'static>(&mut self, obj: T) {
        let obj = Arc::new(obj);
        let template: Arc<dyn PodTemplateHolder> = obj.clone();
        self.push(obj.both_meta(), TypedObject::DaemonSet(obj), Some(template));
    }

    pub fn add_job<T: PodTemplateHolder + 'static>(&mut self, obj: T) {
        let obj = Arc::new(obj);
        let template: Arc<dyn PodTemplateHolder> = obj.clone();
        self.push(obj.both_meta(), TypedObject::Job(obj), Some(template));
    }

    pub fn add_cron_job<T: CronJobHolder + 'static>(&mut self, obj: T) {
        let obj = Arc::new(obj);
        let template: Arc<dyn PodTemplateHolder> = obj.clone();
        self.push(obj.both_meta(), TypedObject::CronJob(obj), Some(template));
    }

    pub fn add_service<T: ServiceHolder + 'static>(&mut self, obj: T) {
        let meta = obj.both_meta();
        self.push(meta, TypedObject::Service(Arc::new(obj)), None);
    }

    pub fn add_network_policy<T: NetworkPolicyHolder + 'static>(&mut self, obj: T) {
        let meta = obj.both_meta();
        self.push(meta, TypedObject::NetworkPolicy(Arc::new(obj)), None);
    }

    pub fn add_ingress<T: IngressHolder + 'static>(&mut self, obj: T) {
        let meta = obj.both_meta();
        self.push(meta, TypedObject::Ingress(Arc::new(obj)), None);
    }

    pub fn add_disruption_budget<T: DisruptionBudgetHolder + 'static>(&mut self, obj: T) {
        let meta = obj.both_meta();
        self.push(meta, TypedObject::PodDisruptionBudget(Arc::new(obj)), None);
    }

    pub fn add_autoscaler<T: AutoscaleTargetHolder + 'static>(&mut self, obj: T) {
        let meta = obj.both_meta();
        self.push(meta, TypedObject::HorizontalPodAutoscaler(Arc::new(obj)), None);
    }

    fn push(
        &mut self,
        meta: BothMeta,
        object: TypedObject,
        pod_template: Option<Arc<dyn PodTemplateHolder>>,
    ) {
        self.entries.push(Entry {
            meta,
            object,
            pod_template,
        });
    }

    /// Record a document that failed to decode.
    pub fn add_error(&mut self, error: DecodeError) {
        self.errors.push(error);
    }

    /// Move everything from `other` to the end of this batch.
    pub fn append(&mut self, other: &mut NormalizedBatch) {
        self.entries.append(&mut other.entries);
        self.errors.append(&mut other.errors);
    }

    /// Every decoded object in encounter order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Identity of every decoded object in encounter order.
    pub fn metas(&self) -> impl Iterator<Item = &BothMeta> {
        self.entries.iter().map(|e| &e.meta)
    }

    /// Every object that runs pods, bare pods included.
    pub fn pod_templates(&self) -> impl Iterator<Item = &dyn PodTemplateHolder> {
        self.entries
            .iter()
            .filter_map(|e| e.pod_template.as_deref())
    }

    pub fn pods(&self) -> impl Iterator<Item = &dyn PodTemplateHolder> {
        self.entries.iter().filter_map(|e| match &e.object {
            TypedObject::Pod(p) => Some(p.as_ref()),
            _ => None,
        })
    }

    pub fn deployments(&self) -> impl Iterator<Item = &dyn DeploymentHolder> {
        self.entries.iter().filter_map(|e| match &e.object {
            TypedObject::Deployment(d) => Some(d.as_ref()),
            _ => None,
        })
    }

    pub fn stateful_sets(&self) -> impl Iterator<Item = &dyn StatefulSetHolder> {
        self.entries.iter().filter_map(|e| match &e.object {
            TypedObject::StatefulSet(s) => Some(s.as_ref()),
            _ => None,
        })
    }

    pub fn daemon_sets(&self) -> impl Iterator<Item = &dyn PodTemplateHolder> {
        self.entries.iter().filter_map(|e| match &e.object {
            TypedObject::DaemonSet(d) => Some(d.as_ref()),
            _ => None,
        })
    }

    pub fn jobs(&self) -> impl Iterator<Item = &dyn PodTemplateHolder> {
        self.entries.iter().filter_map(|e| match &e.object {
            TypedObject::Job(j) => Some(j.as_ref()),
            _ => None,
        })
    }

    pub fn cron_jobs(&self) -> impl Iterator<Item = &dyn CronJobHolder> {
        self.entries.iter().filter_map(|e| match &e.object {
            TypedObject::CronJob(c) => Some(c.as_ref()),
            _ => None,
        })
    }

    pub fn services(&self) -> impl Iterator<Item = &dyn ServiceHolder> {
        self.entries.iter().filter_map(|e| match &e.object {
            TypedObject::Service(s) => Some(s.as_ref()),
            _ => None,
        })
    }

    pub fn network_policies(&self) -> impl Iterator<Item = &dyn NetworkPolicyHolder> {
        self.entries.iter().filter_map(|e| match &e.object {
            TypedObject::NetworkPolicy(n) => Some(n.as_ref()),
            _ => None,
        })
    }

    pub fn ingresses(&self) -> impl Iterator<Item = &dyn IngressHolder> {
        self.entries.iter().filter_map(|e| match &e.object {
            TypedObject::Ingress(i) => Some(i.as_ref()),
            _ => None,
        })
    }

    pub fn disruption_budgets(&self) -> impl Iterator<Item = &dyn DisruptionBudgetHolder> {
        self.entries.iter().filter_map(|e| match &e.object {
            TypedObject::PodDisruptionBudget(p) => Some(p.as_ref()),
            _ => None,
        })
    }

    pub fn autoscalers(&self) -> impl Iterator<Item = &dyn AutoscaleTargetHolder> {
        self.entries.iter().filter_map(|e| match &e.object {
            TypedObject::HorizontalPodAutoscaler(h) => Some(h.as_ref()),
            _ => None,
        })
    }

    /// Decode errors retained so far.
    pub fn errors(&self) -> &[DecodeError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of decoded objects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fail late: the batch if every document decoded, otherwise every error.
    pub fn into_result(self) -> Result<Self, ParseErrors> {
        if self.errors.is_empty() {
            Ok(self)
        } else {
            Err(ParseErrors(self.errors))
        }
    }
}
