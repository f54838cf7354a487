//! Service checks.

use crate::checks::{CheckContext, CheckOutcome, Checks, Evaluator};
use crate::context::{ObjectIdentity, ServiceHolder};
use crate::extract::selector::map_selector_matches;
use crate::types::{Grade, TestScore};

pub fn register(checks: &mut Checks) {
    checks.register(
        "Service targets Pod",
        "Makes sure that all Services targets a Pod",
        Evaluator::service(service_targets_pod),
    );
}

fn service_targets_pod(service: &dyn ServiceHolder, ctx: &CheckContext<'_>) -> CheckOutcome {
    // Services without a selector have their endpoints managed elsewhere.
    if service.selector().is_empty() {
        return Ok(TestScore::skipped("The service has no selector"));
    }
    if service.service_type() == "ExternalName" {
        return Ok(TestScore::skipped("ExternalName services do not select pods"));
    }

    let has_match = ctx.batch.pod_templates().any(|pod| {
        let template = pod.pod_template();
        template.namespace == service.namespace()
            && map_selector_matches(service.selector(), template.labels())
    });

    if has_match {
        return Ok(TestScore::new());
    }

    Ok(TestScore::with_grade(Grade::Critical).comment(
        "",
        "The services selector does not match any pods",
        "",
    ))
}
