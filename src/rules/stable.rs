//! Deprecated API version detection.

use crate::checks::{CheckContext, CheckOutcome, Checks, Evaluator};
use crate::config::KubernetesVersion;
use crate::context::BothMeta;
use crate::types::{Grade, TestScore};

/// A deprecated apiVersion and the stable version replacing it.
struct Replacement {
    from: &'static str,
    kinds: &'static [&'static str],
    to: &'static str,
    since: KubernetesVersion,
}

const REPLACEMENTS: &[Replacement] = &[
    Replacement {
        from: "extensions/v1beta1",
        kinds: &["Deployment", "DaemonSet"],
        to: "apps/v1",
        since: KubernetesVersion::new(1, 9),
    },
    Replacement {
        from: "extensions/v1beta1",
        kinds: &["Ingress", "IngressClass"],
        to: "networking.k8s.io/v1",
        since: KubernetesVersion::new(1, 19),
    },
    Replacement {
        from: "apps/v1beta1",
        kinds: &["Deployment", "StatefulSet"],
        to: "apps/v1",
        since: KubernetesVersion::new(1, 9),
    },
    Replacement {
        from: "apps/v1beta2",
        kinds: &["Deployment", "StatefulSet", "DaemonSet"],
        to: "apps/v1",
        since: KubernetesVersion::new(1, 9),
    },
    Replacement {
        from: "batch/v1beta1",
        kinds: &["CronJob"],
        to: "batch/v1",
        since: KubernetesVersion::new(1, 21),
    },
    Replacement {
        from: "policy/v1beta1",
        kinds: &["PodDisruptionBudget"],
        to: "policy/v1",
        since: KubernetesVersion::new(1, 21),
    },
    Replacement {
        from: "networking.k8s.io/v1beta1",
        kinds: &["Ingress", "IngressClass"],
        to: "networking.k8s.io/v1",
        since: KubernetesVersion::new(1, 19),
    },
];

pub fn register(checks: &mut Checks) {
    checks.register(
        "Stable version",
        "Checks if the object is using a deprecated apiVersion",
        Evaluator::meta(stable_version),
    );
}

fn replacement_for(api_version: &str, kind: &str) -> Option<&'static Replacement> {
    REPLACEMENTS
        .iter()
        .find(|r| r.from == api_version && r.kinds.contains(&kind))
}

fn stable_version(meta: &BothMeta, ctx: &CheckContext<'_>) -> CheckOutcome {
    let tm = &meta.type_meta;
    let Some(replacement) = replacement_for(&tm.api_version, &tm.kind) else {
        return Ok(TestScore::new());
    };

    // The stable version is not served by the target cluster yet.
    if ctx.config.kubernetes_version < replacement.since {
        return Ok(TestScore::new());
    }

    Ok(TestScore::with_grade(Grade::Warning).comment(
        "",
        &format!("The apiVersion and kind {}/{} is deprecated", tm.api_version, tm.kind),
        &format!(
            "It's recommended to use {} instead which has been available since Kubernetes {}",
            replacement.to, replacement.since
        ),
    ))
}
