//! Deployment and StatefulSet checks.

use crate::checks::{CheckContext, CheckOutcome, Checks, Evaluator};
use crate::context::schema::Affinity;
use crate::context::{
    DeploymentHolder, LabelSelector, ObjectIdentity, PodTemplate, PodTemplateHolder,
    StatefulSetHolder,
};
use crate::extract::selector::{map_selector_matches, matches_lenient, selector_matches};
use crate::types::{Grade, TestScore};
use std::collections::BTreeMap;

/// Topology keys that spread pods over hosts, zones or regions.
const APPROVED_TOPOLOGY_KEYS: &[&str] = &[
    "kubernetes.io/hostname",
    "topology.kubernetes.io/region",
    "topology.kubernetes.io/zone",
    // Deprecated in Kubernetes v1.17
    "failure-domain.beta.kubernetes.io/region",
    "failure-domain.beta.kubernetes.io/zone",
];

pub fn register(checks: &mut Checks) {
    checks.register(
        "Deployment has host PodAntiAffinity",
        "Makes sure that a podAntiAffinity has been set that prevents multiple pods from being scheduled on the same node. https://kubernetes.io/docs/concepts/configuration/assign-pod-node/",
        Evaluator::deployment(deployment_has_anti_affinity),
    );
    checks.register(
        "StatefulSet has host PodAntiAffinity",
        "Makes sure that a podAntiAffinity has been set that prevents multiple pods from being scheduled on the same node. https://kubernetes.io/docs/concepts/configuration/assign-pod-node/",
        Evaluator::stateful_set(stateful_set_has_anti_affinity),
    );
    checks.register(
        "Deployment targeted by HPA does not have replicas configured",
        "Makes sure that Deployments using a HorizontalPodAutoscaler doesn't have a statically configured replica count set",
        Evaluator::deployment(hpa_deployment_no_replicas),
    );
    checks.register(
        "StatefulSet has ServiceName",
        "Makes sure that StatefulSets have an existing headless serviceName.",
        Evaluator::stateful_set(stateful_set_has_service_name),
    );
    checks.register(
        "Deployment Pod Selector labels match template metadata labels",
        "Ensure the Deployment selector labels match the template metadata labels.",
        Evaluator::deployment(deployment_selector_labels_matching),
    );
    checks.register(
        "StatefulSet Pod Selector labels match template metadata labels",
        "Ensure the StatefulSet selector labels match the template metadata labels.",
        Evaluator::stateful_set(stateful_set_selector_labels_matching),
    );
}

fn deployment_has_anti_affinity(d: &dyn DeploymentHolder, _: &CheckContext<'_>) -> CheckOutcome {
    Ok(anti_affinity_score("deployment", "Deployment", d.replicas(), d.pod_template()))
}

fn stateful_set_has_anti_affinity(s: &dyn StatefulSetHolder, _: &CheckContext<'_>) -> CheckOutcome {
    Ok(anti_affinity_score("statefulset", "StatefulSet", s.replicas(), s.pod_template()))
}

/// Shared by deployments and stateful sets.
///
/// An unset replica count is still checked, it usually means an autoscaler
/// manages the replicas.
fn anti_affinity_score(
    noun: &str,
    kind: &str,
    replicas: Option<i32>,
    template: PodTemplate<'_>,
) -> TestScore {
    if replicas.is_some_and(|r| r < 2) {
        return TestScore::skipped(format!("Skipped because the {} has less than 2 replicas", noun));
    }

    let ok = template
        .spec
        .affinity
        .as_ref()
        .is_some_and(|affinity| has_pod_anti_affinity(template.labels(), affinity));

    if ok {
        return TestScore::new();
    }

    TestScore::with_grade(Grade::Warning).comment(
        "",
        format!("{} does not have a host podAntiAffinity set", kind),
        format!(
            "It's recommended to set a podAntiAffinity that stops multiple pods from a {} from being scheduled on the same node. This increases availability in case the node becomes unavailable.",
            noun
        ),
    )
}

fn has_pod_anti_affinity(self_labels: &BTreeMap<String, String>, affinity: &Affinity) -> bool {
    let Some(anti) = &affinity.pod_anti_affinity else {
        return false;
    };

    let preferred = anti
        .preferred_during_scheduling_ignored_during_execution
        .iter()
        .map(|w| &w.pod_affinity_term);
    let required = anti.required_during_scheduling_ignored_during_execution.iter();

    preferred.chain(required).any(|term| {
        APPROVED_TOPOLOGY_KEYS.contains(&term.topology_key.as_str())
            && matches_lenient(term.label_selector.as_ref(), self_labels)
    })
}

fn hpa_deployment_no_replicas(d: &dyn DeploymentHolder, ctx: &CheckContext<'_>) -> CheckOutcome {
    let kind = d.type_meta().kind;

    let targeted = ctx.batch.autoscalers().any(|hpa| {
        let target = hpa.scale_target();
        hpa.namespace() == d.namespace()
            && target.kind.eq_ignore_ascii_case(&kind)
            && target.name == d.name()
    });

    if !targeted {
        return Ok(TestScore::skipped(
            "Skipped because the deployment is not targeted by a HorizontalPodAutoscaler",
        ));
    }

    if d.replicas().is_none() {
        return Ok(TestScore::new());
    }

    Ok(TestScore::with_grade(Grade::Critical).comment(
        "",
        "The deployment is targeted by a HPA, but a static replica count is configured in the DeploymentSpec",
        "When replicas are both statically set and managed by the HPA, the replicas will be changed to the statically configured count when the spec is applied, even if the HPA wants the replica count to be higher.",
    ))
}

fn stateful_set_has_service_name(s: &dyn StatefulSetHolder, ctx: &CheckContext<'_>) -> CheckOutcome {
    let labels = s.pod_template().labels();

    let found = ctx.batch.services().any(|svc| {
        svc.namespace() == s.namespace()
            && svc.name() == s.service_name()
            && svc.cluster_ip() == Some("None")
            && map_selector_matches(svc.selector(), labels)
    });

    if found {
        return Ok(TestScore::new());
    }

    Ok(TestScore::with_grade(Grade::Critical).comment(
        "",
        "StatefulSet does not have a valid serviceName",
        "StatefulSets currently require a Headless Service to be responsible for the network identity of the Pods. You are responsible for creating this Service. https://kubernetes.io/docs/concepts/workloads/controllers/statefulset/#limitations",
    ))
}

fn deployment_selector_labels_matching(
    d: &dyn DeploymentHolder,
    _: &CheckContext<'_>,
) -> CheckOutcome {
    Ok(selector_labels_score(
        "Deployment",
        d.selector(),
        d.pod_template(),
        "Deployment require `.spec.selector` to match `.spec.template.metadata.labels`. https://kubernetes.io/docs/concepts/workloads/controllers/deployment/",
    ))
}

fn stateful_set_selector_labels_matching(
    s: &dyn StatefulSetHolder,
    _: &CheckContext<'_>,
) -> CheckOutcome {
    Ok(selector_labels_score(
        "StatefulSet",
        s.selector(),
        s.pod_template(),
        "StatefulSets require `.spec.selector` to match `.spec.template.metadata.labels`. https://kubernetes.io/docs/concepts/workloads/controllers/statefulset/#pod-selector",
    ))
}

fn selector_labels_score(
    kind: &str,
    selector: Option<&LabelSelector>,
    template: PodTemplate<'_>,
    advice: &str,
) -> TestScore {
    match selector_matches(selector, template.labels()) {
        Ok(true) => TestScore::new(),
        Ok(false) => TestScore::with_grade(Grade::Critical).comment(
            "",
            format!("{} selector labels not matching template metadata labels", kind),
            advice,
        ),
        Err(err) => TestScore::with_grade(Grade::Critical).comment(
            "",
            format!("{} selector labels are not matching template metadata labels", kind),
            format!("Invalid selector: {}", err),
        ),
    }
}
