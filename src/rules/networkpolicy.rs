//! Network policy coverage.

use crate::checks::{CheckContext, CheckOutcome, Checks, Evaluator};
use crate::context::{NetworkPolicyHolder, ObjectIdentity, PodTemplateHolder};
use crate::extract::selector::matches_lenient;
use crate::types::{Grade, TestScore};

pub fn register(checks: &mut Checks) {
    checks.register(
        "Pod NetworkPolicy",
        "Makes sure that all Pods are targeted by a NetworkPolicy",
        Evaluator::pod(pod_has_network_policy),
    );
    checks.register(
        "NetworkPolicy targets Pod",
        "Makes sure that all NetworkPolicies targets at least one Pod",
        Evaluator::network_policy(network_policy_targets_pod),
    );
}

/// A pod needs an ingress and an egress policy, possibly from different objects.
fn pod_has_network_policy(pod: &dyn PodTemplateHolder, ctx: &CheckContext<'_>) -> CheckOutcome {
    let template = pod.pod_template();
    let mut ingress = false;
    let mut egress = false;

    for policy in ctx.batch.network_policies() {
        if policy.namespace() != template.namespace {
            continue;
        }
        if !matches_lenient(Some(policy.pod_selector()), template.labels()) {
            continue;
        }
        ingress |= policy.covers_ingress();
        egress |= policy.covers_egress();
    }

    let score = match (ingress, egress) {
        (true, true) => TestScore::new(),
        (false, true) => TestScore::with_grade(Grade::Warning).comment(
            "",
            "The pod does not have a matching ingress NetworkPolicy",
            "Add a ingress policy to the pods NetworkPolicy",
        ),
        (true, false) => TestScore::with_grade(Grade::Warning).comment(
            "",
            "The pod does not have a matching egress NetworkPolicy",
            "Add a egress policy to the pods NetworkPolicy",
        ),
        (false, false) => TestScore::with_grade(Grade::Critical).comment(
            "",
            "The pod does not have a matching NetworkPolicy",
            "Create a NetworkPolicy that targets this pod to control who/what can communicate with this pod. Note, this feature needs to be supported by the CNI implementation used in the Kubernetes cluster to have an effect.",
        ),
    };
    Ok(score)
}

fn network_policy_targets_pod(
    policy: &dyn NetworkPolicyHolder,
    ctx: &CheckContext<'_>,
) -> CheckOutcome {
    let has_match = ctx.batch.pod_templates().any(|pod| {
        let template = pod.pod_template();
        template.namespace == policy.namespace()
            && matches_lenient(Some(policy.pod_selector()), template.labels())
    });

    if has_match {
        return Ok(TestScore::new());
    }

    Ok(TestScore::with_grade(Grade::Critical).comment(
        "",
        "The NetworkPolicys selector doesn't match any pods",
        "",
    ))
}
