//! Check registry.
//!
//! A [`Checks`] catalogue is filled once at startup (see [`builtin::builtin_checks`])
//! and only read afterwards. Every check is bound to one [`Category`] through
//! its [`Evaluator`], so an evaluator can only ever see the view it was written for.

pub mod builtin;

use crate::config::RunConfig;
use crate::context::{
    AutoscaleTargetHolder, BothMeta, CronJobHolder, DeploymentHolder, DisruptionBudgetHolder,
    IngressHolder, NetworkPolicyHolder, NormalizedBatch, PodTemplateHolder, ServiceHolder,
    StatefulSetHolder,
};
use crate::error::CheckError;
use crate::types::TestScore;
use serde::Serialize;
use std::fmt;

/// Outcome of one evaluator call.
pub type CheckOutcome = Result<TestScore, CheckError>;

/// Object category a check is registered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    /// Identity of every object.
    Meta,
    /// Every object with a pod template, bare pods included.
    Pod,
    Deployment,
    StatefulSet,
    CronJob,
    Service,
    NetworkPolicy,
    Ingress,
    PodDisruptionBudget,
    HorizontalPodAutoscaler,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Meta => "Meta",
            Self::Pod => "Pod",
            Self::Deployment => "Deployment",
            Self::StatefulSet => "StatefulSet",
            Self::CronJob => "CronJob",
            Self::Service => "Service",
            Self::NetworkPolicy => "NetworkPolicy",
            Self::Ingress => "Ingress",
            Self::PodDisruptionBudget => "PodDisruptionBudget",
            Self::HorizontalPodAutoscaler => "HorizontalPodAutoscaler",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Correlation data handed to every evaluator.
///
/// Evaluators read other objects only through this context.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub batch: &'a NormalizedBatch,
    pub config: &'a RunConfig,
}

impl<'a> CheckContext<'a> {
    pub fn new(batch: &'a NormalizedBatch, config: &'a RunConfig) -> Self {
        Self { batch, config }
    }
}

pub type MetaFn = dyn Fn(&BothMeta, &CheckContext<'_>) -> CheckOutcome + Send + Sync;
pub type PodFn = dyn Fn(&dyn PodTemplateHolder, &CheckContext<'_>) -> CheckOutcome + Send + Sync;
pub type DeploymentFn =
    dyn Fn(&dyn DeploymentHolder, &CheckContext<'_>) -> CheckOutcome + Send + Sync;
pub type StatefulSetFn =
    dyn Fn(&dyn StatefulSetHolder, &CheckContext<'_>) -> CheckOutcome + Send + Sync;
pub type CronJobFn = dyn Fn(&dyn CronJobHolder, &CheckContext<'_>) -> CheckOutcome + Send + Sync;
pub type ServiceFn = dyn Fn(&dyn ServiceHolder, &CheckContext<'_>) -> CheckOutcome + Send + Sync;
pub type NetworkPolicyFn =
    dyn Fn(&dyn NetworkPolicyHolder, &CheckContext<'_>) -> CheckOutcome + Send + Sync;
pub type IngressFn = dyn Fn(&dyn IngressHolder, &CheckContext<'_>) -> CheckOutcome + Send + Sync;
pub type DisruptionBudgetFn =
    dyn Fn(&dyn DisruptionBudgetHolder, &CheckContext<'_>) -> CheckOutcome + Send + Sync;
pub type AutoscalerFn =
    dyn Fn(&dyn AutoscaleTargetHolder, &CheckContext<'_>) -> CheckOutcome + Send + Sync;

/// Evaluation function of a check, tagged with the view it accepts.
pub enum Evaluator {
    Meta(Box<MetaFn>),
    Pod(Box<PodFn>),
    Deployment(Box<DeploymentFn>),
    StatefulSet(Box<StatefulSetFn>),
    CronJob(Box<CronJobFn>),
    Service(Box<ServiceFn>),
    NetworkPolicy(Box<NetworkPolicyFn>),
    Ingress(Box<IngressFn>),
    PodDisruptionBudget(Box<DisruptionBudgetFn>),
    HorizontalPodAutoscaler(Box<AutoscalerFn>),
}

impl Evaluator {
    pub fn meta<F>(f: F) -> Self
    where
        F: Fn(&BothMeta, &CheckContext<'_>) -> CheckOutcome + Send + Sync + 'static,
    {
        Self::Meta(Box::new(f))
    }

    pub fn pod<F>(f: F) -> Self
    where
        F: Fn(&dyn PodTemplateHolder, &CheckContext<'_>) -> CheckOutcome + Send + Sync + 'static,
    {
        Self::Pod(Box::new(f))
    }

    pub fn deployment<F>(f: F) -> Self
    where
        F: Fn(&dyn DeploymentHolder, &CheckContext<'_>) -> CheckOutcome + Send + Sync + 'static,
    {
        Self::Deployment(Box::new(f))
    }

    pub fn stateful_set<F>(f: F) -> Self
    where
        F: Fn(&dyn StatefulSetHolder, &CheckContext<'_>) -> CheckOutcome + Send + Sync + 'static,
    {
        Self::StatefulSet(Box::new(f))
    }

    pub fn cron_job<F>(f: F) -> Self
    where
        F: Fn(&dyn CronJobHolder, &CheckContext<'_>) -> CheckOutcome + Send + Sync + 'static,
    {
        Self::CronJob(Box::new(f))
    }

    pub fn service<F>(f: F) -> Self
    where
        F: Fn(&dyn ServiceHolder, &CheckContext<'_>) -> CheckOutcome + Send + Sync + 'static,
    {
        Self::Service(Box::new(f))
    }

    pub fn network_policy<F>(f: F) -> Self
    where
        F: Fn(&dyn NetworkPolicyHolder, &CheckContext<'_>) -> CheckOutcome + Send + Sync + 'static,
    {
        Self::NetworkPolicy(Box::new(f))
    }

    pub fn ingress<F>(f: F) -> Self
    where
        F: Fn(&dyn IngressHolder, &CheckContext<'_>) -> CheckOutcome + Send + Sync + 'static,
    {
        Self::Ingress(Box::new(f))
    }

    pub fn disruption_budget<F>(f: F) -> Self
    where
        F: Fn(&dyn DisruptionBudgetHolder, &CheckContext<'_>) -> CheckOutcome
            + Send
            + Sync
            + 'static,
    {
        Self::PodDisruptionBudget(Box::new(f))
    }

    pub fn autoscaler<F>(f: F) -> Self
    where
        F: Fn(&dyn AutoscaleTargetHolder, &CheckContext<'_>) -> CheckOutcome
            + Send
            + Sync
            + 'static,
    {
        Self::HorizontalPodAutoscaler(Box::new(f))
    }

    pub fn category(&self) -> Category {
        match self {
            Self::Meta(_) => Category::Meta,
            Self::Pod(_) => Category::Pod,
            Self::Deployment(_) => Category::Deployment,
            Self::StatefulSet(_) => Category::StatefulSet,
            Self::CronJob(_) => Category::CronJob,
            Self::Service(_) => Category::Service,
            Self::NetworkPolicy(_) => Category::NetworkPolicy,
            Self::Ingress(_) => Category::Ingress,
            Self::PodDisruptionBudget(_) => Category::PodDisruptionBudget,
            Self::HorizontalPodAutoscaler(_) => Category::HorizontalPodAutoscaler,
        }
    }

    /// Run the evaluator when the subject has the view it expects.
    pub fn evaluate(&self, subject: Subject<'_>, ctx: &CheckContext<'_>) -> Option<CheckOutcome> {
        let outcome = match (self, subject) {
            (Self::Meta(f), Subject::Meta(m)) => f(m, ctx),
            (Self::Pod(f), Subject::Pod(p)) => f(p, ctx),
            (Self::Deployment(f), Subject::Deployment(d)) => f(d, ctx),
            (Self::StatefulSet(f), Subject::StatefulSet(s)) => f(s, ctx),
            (Self::CronJob(f), Subject::CronJob(c)) => f(c, ctx),
            (Self::Service(f), Subject::Service(s)) => f(s, ctx),
            (Self::NetworkPolicy(f), Subject::NetworkPolicy(n)) => f(n, ctx),
            (Self::Ingress(f), Subject::Ingress(i)) => f(i, ctx),
            (Self::PodDisruptionBudget(f), Subject::PodDisruptionBudget(p)) => f(p, ctx),
            (Self::HorizontalPodAutoscaler(f), Subject::HorizontalPodAutoscaler(h)) => f(h, ctx),
            _ => return None,
        };
        Some(outcome)
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Evaluator({})", self.category())
    }
}

/// The view of one object that a check is evaluated against.
#[derive(Clone, Copy)]
pub enum Subject<'a> {
    Meta(&'a BothMeta),
    Pod(&'a dyn PodTemplateHolder),
    Deployment(&'a dyn DeploymentHolder),
    StatefulSet(&'a dyn StatefulSetHolder),
    CronJob(&'a dyn CronJobHolder),
    Service(&'a dyn ServiceHolder),
    NetworkPolicy(&'a dyn NetworkPolicyHolder),
    Ingress(&'a dyn IngressHolder),
    PodDisruptionBudget(&'a dyn DisruptionBudgetHolder),
    HorizontalPodAutoscaler(&'a dyn AutoscaleTargetHolder),
}

impl Subject<'_> {
    pub fn category(&self) -> Category {
        match self {
            Self::Meta(_) => Category::Meta,
            Self::Pod(_) => Category::Pod,
            Self::Deployment(_) => Category::Deployment,
            Self::StatefulSet(_) => Category::StatefulSet,
            Self::CronJob(_) => Category::CronJob,
            Self::Service(_) => Category::Service,
            Self::NetworkPolicy(_) => Category::NetworkPolicy,
            Self::Ingress(_) => Category::Ingress,
            Self::PodDisruptionBudget(_) => Category::PodDisruptionBudget,
            Self::HorizontalPodAutoscaler(_) => Category::HorizontalPodAutoscaler,
        }
    }
}

/// Turn a display name into the ID used by annotations and the run config.
pub fn check_id(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Static description of a registered check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInfo {
    pub name: String,
    pub id: String,
    pub description: String,
    pub category: Category,
    pub optional: bool,
}

/// A registered check.
#[derive(Debug)]
pub struct Check {
    pub info: CheckInfo,
    pub evaluator: Evaluator,
}

impl Check {
    pub fn id(&self) -> &str {
        &self.info.id
    }

    pub fn category(&self) -> Category {
        self.info.category
    }

    pub fn is_optional(&self) -> bool {
        self.info.optional
    }
}

/// The catalogue of checks, in registration order.
#[derive(Debug, Default)]
pub struct Checks {
    checks: Vec<Check>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a check that runs by default.
    ///
    /// # Panics
    ///
    /// Panics if a check with the same ID is already registered for the category.
    pub fn register(&mut self, name: &str, description: &str, evaluator: Evaluator) {
        self.add(name, description, evaluator, false);
    }

    /// Register a check that only runs when enabled.
    ///
    /// # Panics
    ///
    /// Panics if a check with the same ID is already registered for the category.
    pub fn register_optional(&mut self, name: &str, description: &str, evaluator: Evaluator) {
        self.add(name, description, evaluator, true);
    }

    fn add(&mut self, name: &str, description: &str, evaluator: Evaluator, optional: bool) {
        let info = CheckInfo {
            name: name.to_string(),
            id: check_id(name),
            description: description.to_string(),
            category: evaluator.category(),
            optional,
        };

        if self
            .checks
            .iter()
            .any(|c| c.info.category == info.category && c.info.id == info.id)
        {
            panic!(
                "check {:?} registered twice for category {}",
                info.id, info.category
            );
        }

        self.checks.push(Check { info, evaluator });
    }

    /// Checks registered against a category, in registration order.
    pub fn for_category(&self, category: Category) -> impl Iterator<Item = &Check> {
        self.checks.iter().filter(move |c| c.info.category == category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter()
    }

    /// Find a check by ID.
    pub fn get(&self, id: &str) -> Option<&Check> {
        self.checks.iter().find(|c| c.info.id == id)
    }

    pub fn infos(&self) -> Vec<CheckInfo> {
        self.checks.iter().map(|c| c.info.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Grade;

    fn always_ok(_: &BothMeta, _: &CheckContext<'_>) -> CheckOutcome {
        Ok(TestScore::new())
    }

    #[test]
    fn test_check_id() {
        assert_eq!(check_id("Pod NetworkPolicy"), "pod-networkpolicy");
        assert_eq!(
            check_id("Container Security Context User Group ID"),
            "container-security-context-user-group-id"
        );
    }

    #[test]
    fn test_register_and_lookup() {
        let mut checks = Checks::new();
        checks.register("Label values", "labels", Evaluator::meta(always_ok));
        checks.register_optional(
            "Container Seccomp Profile",
            "seccomp",
            Evaluator::pod(|_, _| Ok(TestScore::with_grade(Grade::Warning))),
        );

        assert_eq!(checks.len(), 2);
        assert_eq!(checks.for_category(Category::Meta).count(), 1);
        assert_eq!(checks.for_category(Category::Service).count(), 0);

        let seccomp = checks.get("container-seccomp-profile").unwrap();
        assert!(seccomp.is_optional());
        assert_eq!(seccomp.category(), Category::Pod);
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_duplicate_registration_panics() {
        let mut checks = Checks::new();
        checks.register("Label values", "a", Evaluator::meta(always_ok));
        checks.register("Label Values", "b", Evaluator::meta(always_ok));
    }

    #[test]
    fn test_same_name_in_other_category_is_allowed() {
        let mut checks = Checks::new();
        checks.register("Has owner", "a", Evaluator::meta(always_ok));
        checks.register("Has owner", "b", Evaluator::pod(|_, _| Ok(TestScore::new())));
        assert_eq!(checks.len(), 2);
    }

    #[test]
    fn test_evaluator_ignores_other_views() {
        let evaluator = Evaluator::meta(always_ok);
        let batch = NormalizedBatch::new();
        let config = RunConfig::default();
        let ctx = CheckContext::new(&batch, &config);
        let meta = BothMeta {
            type_meta: Default::default(),
            object_meta: Default::default(),
            location: Default::default(),
        };
        assert!(evaluator.evaluate(Subject::Meta(&meta), &ctx).is_some());
    }
}
