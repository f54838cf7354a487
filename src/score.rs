//! The scoring engine.
//!
//! For every object in a [`NormalizedBatch`] the engine runs the checks
//! registered for each view the object offers: its identity, its pod
//! template when it has one, and its own category. Annotation and run-level
//! selection is applied before an evaluator is ever called.

use crate::checks::{Check, CheckContext, Checks, Subject};
use crate::config::RunConfig;
use crate::context::{Entry, NormalizedBatch, ObjectIdentity, TypedObject};
use crate::error::CheckError;
use crate::pragma;
use crate::scorecard::{CheckResult, CheckStatus, ScoredObject, Scorecard};
use crate::types::TestScore;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Runs a check catalogue over normalized batches.
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine<'a> {
    checks: &'a Checks,
    config: &'a RunConfig,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(checks: &'a Checks, config: &'a RunConfig) -> Self {
        Self { checks, config }
    }

    /// Score every object of the batch in order.
    pub fn score(&self, batch: &NormalizedBatch) -> Scorecard {
        let ctx = CheckContext::new(batch, self.config);
        let objects = batch
            .entries()
            .iter()
            .map(|entry| self.score_entry(entry, &ctx))
            .collect();
        self.finish(objects)
    }

    /// Same result as [`ScoringEngine::score`], with objects scored on the rayon pool.
    pub fn score_parallel(&self, batch: &NormalizedBatch) -> Scorecard {
        let ctx = CheckContext::new(batch, self.config);
        let objects = batch
            .entries()
            .par_iter()
            .map(|entry| self.score_entry(entry, &ctx))
            .collect();
        self.finish(objects)
    }

    fn finish(&self, objects: Vec<ScoredObject>) -> Scorecard {
        let card = Scorecard { objects };
        log::info!(
            "Scored {} objects: {} evaluated, {} ignored, {} not enabled, {} failed",
            card.len(),
            card.count_status(CheckStatus::Evaluated),
            card.count_status(CheckStatus::Ignored),
            card.count_status(CheckStatus::NotEnabled),
            card.count_status(CheckStatus::Failed),
        );
        card
    }

    fn score_entry(&self, entry: &Entry, ctx: &CheckContext<'_>) -> ScoredObject {
        let sources: Vec<&BTreeMap<String, String>> = match &entry.pod_template {
            Some(holder) => holder.annotation_sources(),
            None => vec![&entry.meta.object_meta.annotations],
        };

        let mut checks = Vec::new();
        for subject in subjects(entry) {
            for check in self.checks.for_category(subject.category()) {
                checks.push(self.run_check(check, subject, &sources, ctx));
            }
        }

        ScoredObject {
            type_meta: entry.meta.type_meta.clone(),
            object_meta: entry.meta.object_meta.clone(),
            location: entry.meta.location.clone(),
            checks,
        }
    }

    fn is_enabled(&self, check: &Check, sources: &[&BTreeMap<String, String>]) -> bool {
        if !check.is_optional() || self.config.is_optional_enabled(check.id()) {
            return true;
        }
        self.config.use_optional_checks_annotation && pragma::is_enabled(sources, check.id())
    }

    fn is_ignored(&self, check: &Check, sources: &[&BTreeMap<String, String>]) -> bool {
        if self.config.is_check_ignored(check.id()) {
            return true;
        }
        self.config.use_ignore_checks_annotation && pragma::is_ignored(sources, check.id())
    }

    fn run_check(
        &self,
        check: &Check,
        subject: Subject<'_>,
        sources: &[&BTreeMap<String, String>],
        ctx: &CheckContext<'_>,
    ) -> CheckResult {
        let info = check.info.clone();

        if !self.is_enabled(check, sources) {
            return CheckResult::new(info, CheckStatus::NotEnabled, TestScore::default());
        }
        if self.is_ignored(check, sources) {
            let score = TestScore {
                skipped: true,
                ..TestScore::default()
            };
            return CheckResult::new(info, CheckStatus::Ignored, score);
        }

        let outcome = check.evaluator.evaluate(subject, ctx).unwrap_or_else(|| {
            Err(CheckError::Evaluation(format!(
                "check does not accept {} objects",
                subject.category()
            )))
        });

        match outcome {
            Ok(score) => CheckResult::new(info, CheckStatus::Evaluated, score),
            Err(err) => {
                log::warn!("Check {:?} failed on {}: {}", info.id, subject_location(subject), err);
                CheckResult::failed(info, err)
            }
        }
    }
}

fn subject_location(subject: Subject<'_>) -> String {
    match subject {
        Subject::Meta(m) => m.location.to_string(),
        Subject::Pod(p) => p.location().to_string(),
        Subject::Deployment(d) => d.location().to_string(),
        Subject::StatefulSet(s) => s.location().to_string(),
        Subject::CronJob(c) => c.location().to_string(),
        Subject::Service(s) => s.location().to_string(),
        Subject::NetworkPolicy(n) => n.location().to_string(),
        Subject::Ingress(i) => i.location().to_string(),
        Subject::PodDisruptionBudget(p) => p.location().to_string(),
        Subject::HorizontalPodAutoscaler(h) => h.location().to_string(),
    }
}

/// Every view of the entry, in the order its checks are reported.
fn subjects(entry: &Entry) -> Vec<Subject<'_>> {
    let mut subjects = vec![Subject::Meta(&entry.meta)];

    if let Some(template) = &entry.pod_template {
        subjects.push(Subject::Pod(template.as_ref()));
    }

    let own = match &entry.object {
        TypedObject::Deployment(d) => Some(Subject::Deployment(d.as_ref())),
        TypedObject::StatefulSet(s) => Some(Subject::StatefulSet(s.as_ref())),
        TypedObject::CronJob(c) => Some(Subject::CronJob(c.as_ref())),
        TypedObject::Service(s) => Some(Subject::Service(s.as_ref())),
        TypedObject::NetworkPolicy(n) => Some(Subject::NetworkPolicy(n.as_ref())),
        TypedObject::Ingress(i) => Some(Subject::Ingress(i.as_ref())),
        TypedObject::PodDisruptionBudget(p) => Some(Subject::PodDisruptionBudget(p.as_ref())),
        TypedObject::HorizontalPodAutoscaler(h) => {
            Some(Subject::HorizontalPodAutoscaler(h.as_ref()))
        }
        TypedObject::Pod(_) | TypedObject::DaemonSet(_) | TypedObject::Job(_) => None,
    };
    subjects.extend(own);

    subjects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::Evaluator;
    use crate::parser::DocumentParser;
    use crate::types::Grade;

    const POD: &str = "apiVersion: v1
kind: Pod
metadata:
  name: web
  annotations:
    kube-score/ignore: always-critical
    kube-score/enable: optional-warning
spec:
  containers:
    - name: web
";

    fn test_checks() -> Checks {
        let mut checks = Checks::new();
        checks.register(
            "Always critical",
            "",
            Evaluator::pod(|_, _| Ok(TestScore::with_grade(Grade::Critical))),
        );
        checks.register_optional(
            "Optional warning",
            "",
            Evaluator::meta(|_, _| Ok(TestScore::with_grade(Grade::Warning))),
        );
        checks.register(
            "Broken",
            "",
            Evaluator::meta(|_, _| Err(CheckError::Evaluation("boom".to_string()))),
        );
        checks
    }

    fn statuses(config: &RunConfig) -> Vec<(String, CheckStatus)> {
        let batch = DocumentParser::default().parse_str("pod.yaml", POD);
        let checks = test_checks();
        let card = ScoringEngine::new(&checks, config).score(&batch);
        card.objects[0]
            .checks
            .iter()
            .map(|c| (c.check.id.clone(), c.status))
            .collect()
    }

    #[test]
    fn test_annotations_are_inert_by_default() {
        assert_eq!(
            statuses(&RunConfig::default()),
            vec![
                ("optional-warning".to_string(), CheckStatus::NotEnabled),
                ("broken".to_string(), CheckStatus::Failed),
                ("always-critical".to_string(), CheckStatus::Evaluated),
            ]
        );
    }

    #[test]
    fn test_annotations_when_enabled() {
        let config = RunConfig::default()
            .with_ignore_annotation(true)
            .with_optional_annotation(true);
        assert_eq!(
            statuses(&config),
            vec![
                ("optional-warning".to_string(), CheckStatus::Evaluated),
                ("broken".to_string(), CheckStatus::Failed),
                ("always-critical".to_string(), CheckStatus::Ignored),
            ]
        );
    }

    #[test]
    fn test_run_level_selection() {
        let config = RunConfig::default().with_all_optional().ignore("broken");
        assert_eq!(
            statuses(&config),
            vec![
                ("optional-warning".to_string(), CheckStatus::Evaluated),
                ("broken".to_string(), CheckStatus::Ignored),
                ("always-critical".to_string(), CheckStatus::Evaluated),
            ]
        );
    }

    #[test]
    fn test_failure_is_recorded_on_one_result() {
        let batch = DocumentParser::default().parse_str("pod.yaml", POD);
        let checks = test_checks();
        let config = RunConfig::default();
        let card = ScoringEngine::new(&checks, &config).score(&batch);
        let broken = card.objects[0]
            .checks
            .iter()
            .find(|c| c.check.id == "broken")
            .unwrap();
        assert_eq!(broken.error, Some(CheckError::Evaluation("boom".to_string())));
        assert_eq!(broken.effective_grade(), None);
        assert_eq!(card.worst_grade(), Some(Grade::Critical));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let yaml = format!("{}---\n{}", POD, POD.replace("name: web", "name: api"));
        let batch = DocumentParser::default().parse_str("pods.yaml", &yaml);
        let checks = test_checks();
        let config = RunConfig::default();
        let engine = ScoringEngine::new(&checks, &config);
        assert_eq!(engine.score(&batch), engine.score_parallel(&batch));
    }
}
