//! HorizontalPodAutoscaler checks.

use crate::checks::{CheckContext, CheckOutcome, Checks, Evaluator};
use crate::context::{AutoscaleTargetHolder, ObjectIdentity};
use crate::types::{Grade, TestScore};

pub fn register(checks: &mut Checks) {
    checks.register(
        "HorizontalPodAutoscaler has target",
        "Makes sure that the HPA targets a valid object",
        Evaluator::autoscaler(hpa_has_target),
    );
}

fn hpa_has_target(hpa: &dyn AutoscaleTargetHolder, ctx: &CheckContext<'_>) -> CheckOutcome {
    let target = hpa.scale_target();

    let found = ctx.batch.metas().any(|meta| {
        meta.object_meta.namespace == hpa.namespace()
            && meta.object_meta.name == target.name
            && meta.type_meta.kind.eq_ignore_ascii_case(&target.kind)
    });

    if found {
        return Ok(TestScore::new());
    }

    Ok(TestScore::with_grade(Grade::Critical).comment(
        "",
        "The HPA target does not match anything",
        "",
    ))
}
