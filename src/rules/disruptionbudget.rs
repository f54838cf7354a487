//! PodDisruptionBudget checks.

use crate::checks::{CheckContext, CheckOutcome, Checks, Evaluator};
use crate::context::{
    DeploymentHolder, DisruptionBudgetHolder, ObjectIdentity, PodTemplate, PodTemplateHolder,
    StatefulSetHolder,
};
use crate::extract::selector::matches_lenient;
use crate::types::{Grade, TestScore};

pub fn register(checks: &mut Checks) {
    checks.register(
        "Deployment has PodDisruptionBudget",
        "Makes sure that all Deployments are targeted by a PDB",
        Evaluator::deployment(deployment_has_budget),
    );
    checks.register(
        "StatefulSet has PodDisruptionBudget",
        "Makes sure that all StatefulSets are targeted by a PDB",
        Evaluator::stateful_set(stateful_set_has_budget),
    );
    checks.register(
        "PodDisruptionBudget has policy",
        "Makes sure that PodDisruptionBudgets specify minAvailable or maxUnavailable",
        Evaluator::disruption_budget(budget_has_policy),
    );
    checks.register_optional(
        "PodDisruptionBudget has unhealthyPodEvictionPolicy",
        "Makes sure that PodDisruptionBudgets specify unhealthyPodEvictionPolicy",
        Evaluator::disruption_budget(budget_has_eviction_policy),
    );
}

fn deployment_has_budget(d: &dyn DeploymentHolder, ctx: &CheckContext<'_>) -> CheckOutcome {
    Ok(budget_score(d.replicas(), d.pod_template(), ctx))
}

fn stateful_set_has_budget(s: &dyn StatefulSetHolder, ctx: &CheckContext<'_>) -> CheckOutcome {
    Ok(budget_score(s.replicas(), s.pod_template(), ctx))
}

fn budget_score(replicas: Option<i32>, template: PodTemplate<'_>, ctx: &CheckContext<'_>) -> TestScore {
    if replicas.is_some_and(|r| r < 2) {
        return TestScore::skipped("Skipped because the object has less than 2 replicas");
    }

    let has_budget = ctx.batch.disruption_budgets().any(|pdb| {
        pdb.namespace() == template.namespace && matches_lenient(pdb.selector(), template.labels())
    });

    if has_budget {
        return TestScore::new();
    }

    TestScore::with_grade(Grade::Critical).comment(
        "",
        "No matching PodDisruptionBudget was found",
        "It's recommended to define a PodDisruptionBudget to avoid unexpected downtime during Kubernetes maintenance operations, such as when draining a node.",
    )
}

fn budget_has_policy(pdb: &dyn DisruptionBudgetHolder, _: &CheckContext<'_>) -> CheckOutcome {
    if pdb.min_available().is_some() || pdb.max_unavailable().is_some() {
        return Ok(TestScore::new());
    }

    Ok(TestScore::with_grade(Grade::Critical).comment(
        "",
        "PodDisruptionBudget missing policy",
        "PodDisruptionBudget should specify minAvailable or maxUnavailable.",
    ))
}

fn budget_has_eviction_policy(
    pdb: &dyn DisruptionBudgetHolder,
    _: &CheckContext<'_>,
) -> CheckOutcome {
    if pdb.unhealthy_pod_eviction_policy().is_some() {
        return Ok(TestScore::new());
    }

    Ok(TestScore::with_grade(Grade::Warning).comment(
        "",
        "PodDisruptionBudget missing unhealthyPodEvictionPolicy",
        "It's recommended to set unhealthyPodEvictionPolicy to AlwaysAllow so pods that never become ready do not block node drains.",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::rules::testing::{score_of, score_with};

    fn deployment(replicas: i32) -> String {
        format!(
            "apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  namespace: shop
spec:
  replicas: {replicas}
  selector:
    matchLabels:
      app: web
  template:
    metadata:
      labels:
        app: web
    spec:
      containers:
        - name: web
          image: web:1
"
        )
    }

    fn budget(api_version: &str, spec: &str) -> String {
        budget_in("shop", api_version, spec)
    }

    fn budget_in(namespace: &str, api_version: &str, spec: &str) -> String {
        format!(
            "---
apiVersion: {api_version}
kind: PodDisruptionBudget
metadata:
  name: web
  namespace: {namespace}
spec:
{spec}"
        )
    }

    const SELECT_WEB: &str = "  minAvailable: 1\n  selector:\n    matchLabels:\n      app: web\n";

    #[test]
    fn test_single_replica_is_skipped() {
        let score = score_of(&deployment(1), "Deployment has PodDisruptionBudget");
        assert!(score.skipped);
    }

    #[test]
    fn test_missing_budget() {
        let score = score_of(&deployment(3), "Deployment has PodDisruptionBudget");
        assert_eq!(score.grade, Grade::Critical);
        assert_eq!(score.comments[0].summary, "No matching PodDisruptionBudget was found");
    }

    #[test]
    fn test_matching_budget() {
        let yaml = format!("{}{}", deployment(3), budget("policy/v1", SELECT_WEB));
        assert_eq!(
            score_of(&yaml, "Deployment has PodDisruptionBudget").grade,
            Grade::AllOk
        );
    }

    #[test]
    fn test_budget_in_other_namespace_does_not_count() {
        let yaml = format!("{}{}", deployment(3), budget_in("other", "policy/v1", SELECT_WEB));
        let score = score_of(&yaml, "Deployment has PodDisruptionBudget");
        assert_eq!(score.grade, Grade::Critical);
        assert_eq!(score.comments[0].summary, "No matching PodDisruptionBudget was found");
    }

    #[test]
    fn test_empty_selector_depends_on_version() {
        let empty = "  minAvailable: 1\n  selector: {}\n";

        let v1 = format!("{}{}", deployment(3), budget("policy/v1", empty));
        assert_eq!(score_of(&v1, "Deployment has PodDisruptionBudget").grade, Grade::AllOk);

        let beta = format!("{}{}", deployment(3), budget("policy/v1beta1", empty));
        assert_eq!(
            score_of(&beta, "Deployment has PodDisruptionBudget").grade,
            Grade::Critical
        );
    }

    #[test]
    fn test_budget_policy() {
        let without = budget("policy/v1", "  selector:\n    matchLabels:\n      app: web\n");
        let score = score_of(&without, "PodDisruptionBudget has policy");
        assert_eq!(score.grade, Grade::Critical);

        let with = budget("policy/v1", "  maxUnavailable: 10%\n");
        assert_eq!(score_of(&with, "PodDisruptionBudget has policy").grade, Grade::AllOk);
    }

    #[test]
    fn test_eviction_policy_is_optional() {
        let yaml = budget("policy/v1", SELECT_WEB);
        let config = RunConfig::default().enable("poddisruptionbudget-has-unhealthypodevictionpolicy");
        let score = score_with(&yaml, "PodDisruptionBudget has unhealthyPodEvictionPolicy", &config);
        assert_eq!(score.grade, Grade::Warning);

        let yaml = budget("policy/v1", &format!("{}  unhealthyPodEvictionPolicy: AlwaysAllow\n", SELECT_WEB));
        let score = score_with(&yaml, "PodDisruptionBudget has unhealthyPodEvictionPolicy", &config);
        assert_eq!(score.grade, Grade::AllOk);
    }
}
