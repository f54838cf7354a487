//! Container security context checks.

use crate::checks::{CheckContext, CheckOutcome, Checks, Evaluator};
use crate::context::PodTemplateHolder;
use crate::extract::container::{all_containers, effective_security_context};
use crate::types::{Grade, TestScore};

/// Lowest user and group ID that cannot collide with host accounts.
pub const MIN_SAFE_ID: i64 = 10000;

pub const SECCOMP_ANNOTATION: &str = "seccomp.security.alpha.kubernetes.io/defaultProfileName";

const NO_CONTEXT_SUMMARY: &str = "Container has no configured security context";
const NO_CONTEXT_DESCRIPTION: &str =
    "Set securityContext to run the container in a more secure context.";

pub fn register(checks: &mut Checks) {
    checks.register(
        "Container Security Context User Group ID",
        "Makes sure that all pods have a security context with valid UID and GID set",
        Evaluator::pod(container_security_context_user_group_id),
    );
    checks.register(
        "Container Security Context Privileged",
        "Makes sure that all pods have a unprivileged security context set",
        Evaluator::pod(container_security_context_privileged),
    );
    checks.register(
        "Container Security Context ReadOnlyRootFilesystem",
        "Makes sure that all pods have a security context with read only filesystem set",
        Evaluator::pod(container_security_context_read_only_root_filesystem),
    );
    checks.register_optional(
        "Container Seccomp Profile",
        "Makes sure that all pods have at a seccomp policy configured.",
        Evaluator::pod(pod_seccomp_profile),
    );
}

fn grade_if(failed: bool, score: TestScore) -> TestScore {
    TestScore {
        grade: if failed { Grade::Critical } else { Grade::AllOk },
        ..score
    }
}

fn container_security_context_user_group_id(
    pod: &dyn PodTemplateHolder,
    _: &CheckContext<'_>,
) -> CheckOutcome {
    let spec = pod.pod_template().spec;
    let mut score = TestScore::new();
    let mut failed = false;

    for container in all_containers(spec) {
        let Some(sc) = effective_security_context(spec, container) else {
            failed = true;
            score.add_comment(&container.name, NO_CONTEXT_SUMMARY, NO_CONTEXT_DESCRIPTION);
            continue;
        };

        if sc.run_as_user.is_none_or(|uid| uid < MIN_SAFE_ID) {
            failed = true;
            score.add_comment(
                &container.name,
                "The container is running with a low user ID",
                "A userid above 10 000 is recommended to avoid conflicts with the host. Set securityContext.runAsUser to a value > 10000",
            );
        }

        if sc.run_as_group.is_none_or(|gid| gid < MIN_SAFE_ID) {
            failed = true;
            score.add_comment(
                &container.name,
                "The container running with a low group ID",
                "A groupid above 10 000 is recommended to avoid conflicts with the host. Set securityContext.runAsGroup to a value > 10000",
            );
        }
    }

    Ok(grade_if(failed, score))
}

fn container_security_context_privileged(
    pod: &dyn PodTemplateHolder,
    _: &CheckContext<'_>,
) -> CheckOutcome {
    let mut score = TestScore::new();
    let mut failed = false;

    for container in all_containers(pod.pod_template().spec) {
        let privileged = container
            .security_context
            .as_ref()
            .and_then(|sc| sc.privileged)
            .unwrap_or(false);
        if privileged {
            failed = true;
            score.add_comment(
                &container.name,
                "The container is privileged",
                "Set securityContext.privileged to false. Privileged containers can access all devices on the host, and grants almost the same access as non-containerized processes on the host.",
            );
        }
    }

    Ok(grade_if(failed, score))
}

fn container_security_context_read_only_root_filesystem(
    pod: &dyn PodTemplateHolder,
    _: &CheckContext<'_>,
) -> CheckOutcome {
    let mut score = TestScore::new();
    let mut failed = false;

    for container in all_containers(pod.pod_template().spec) {
        let Some(sc) = &container.security_context else {
            failed = true;
            score.add_comment(&container.name, NO_CONTEXT_SUMMARY, NO_CONTEXT_DESCRIPTION);
            continue;
        };
        if sc.read_only_root_filesystem != Some(true) {
            failed = true;
            score.add_comment(
                &container.name,
                "The pod has a container with a writable root filesystem",
                "Set securityContext.readOnlyRootFilesystem to true",
            );
        }
    }

    Ok(grade_if(failed, score))
}

fn pod_seccomp_profile(pod: &dyn PodTemplateHolder, _: &CheckContext<'_>) -> CheckOutcome {
    let template = pod.pod_template();

    if template.annotations().contains_key(SECCOMP_ANNOTATION) {
        return Ok(TestScore::new());
    }

    Ok(TestScore::with_grade(Grade::Warning).comment(
        &template.metadata.name,
        "The pod has not configured Seccomp for its containers",
        "Running containers with Seccomp is recommended to reduce the kernel attack surface",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::context::{NormalizedBatch, Versioned};
    use crate::context::schema::PodSpec;
    use crate::types::FileLocation;

    fn pod(spec: &str) -> Versioned<PodSpec> {
        let yaml = format!(
            "apiVersion: v1\nkind: Pod\nmetadata:\n  name: p\nspec:\n{}",
            spec
        );
        Versioned::from_yaml(&yaml, FileLocation::default()).unwrap()
    }

    fn run(
        f: fn(&dyn PodTemplateHolder, &CheckContext<'_>) -> CheckOutcome,
        pod: &Versioned<PodSpec>,
    ) -> TestScore {
        let batch = NormalizedBatch::new();
        let config = RunConfig::default();
        f(pod, &CheckContext::new(&batch, &config)).unwrap()
    }

    const SECURE: &str = "  containers:
    - name: app
      securityContext:
        runAsUser: 20000
        runAsGroup: 20000
        privileged: false
        readOnlyRootFilesystem: true
";

    #[test]
    fn test_secure_container_passes_everything() {
        let p = pod(SECURE);
        assert_eq!(run(container_security_context_user_group_id, &p).grade, Grade::AllOk);
        assert_eq!(run(container_security_context_privileged, &p).grade, Grade::AllOk);
        assert_eq!(
            run(container_security_context_read_only_root_filesystem, &p).grade,
            Grade::AllOk
        );
    }

    #[test]
    fn test_missing_context() {
        let p = pod("  containers:\n    - name: app\n");
        let score = run(container_security_context_user_group_id, &p);
        assert_eq!(score.grade, Grade::Critical);
        assert_eq!(score.comments[0].subject, "app");
        assert_eq!(score.comments[0].summary, NO_CONTEXT_SUMMARY);

        assert_eq!(
            run(container_security_context_read_only_root_filesystem, &p).grade,
            Grade::Critical
        );
        assert_eq!(run(container_security_context_privileged, &p).grade, Grade::AllOk);
    }

    #[test]
    fn test_pod_level_ids_are_forwarded() {
        let p = pod("  securityContext:
    runAsUser: 20000
    runAsGroup: 20000
  containers:
    - name: app
");
        assert_eq!(run(container_security_context_user_group_id, &p).grade, Grade::AllOk);
    }

    #[test]
    fn test_low_ids() {
        let p = pod("  initContainers:
    - name: init
      securityContext:
        runAsUser: 0
        runAsGroup: 20000
  containers:
    - name: app
      securityContext:
        runAsUser: 20000
");
        let score = run(container_security_context_user_group_id, &p);
        assert_eq!(score.grade, Grade::Critical);
        let subjects: Vec<(&str, &str)> = score
            .comments
            .iter()
            .map(|c| (c.subject.as_str(), c.summary.as_str()))
            .collect();
        assert_eq!(
            subjects,
            vec![
                ("init", "The container is running with a low user ID"),
                ("app", "The container running with a low group ID"),
            ]
        );
    }

    #[test]
    fn test_privileged() {
        let p = pod("  containers:\n    - name: app\n      securityContext:\n        privileged: true\n");
        let score = run(container_security_context_privileged, &p);
        assert_eq!(score.grade, Grade::Critical);
        assert_eq!(score.comments[0].subject, "app");
    }

    #[test]
    fn test_seccomp_annotation() {
        let without = pod(SECURE);
        assert_eq!(run(pod_seccomp_profile, &without).grade, Grade::Warning);

        let yaml = format!(
            "apiVersion: v1\nkind: Pod\nmetadata:\n  name: p\n  annotations:\n    {}: runtime/default\nspec:\n{}",
            SECCOMP_ANNOTATION, SECURE
        );
        let with: Versioned<PodSpec> = Versioned::from_yaml(&yaml, FileLocation::default()).unwrap();
        assert_eq!(run(pod_seccomp_profile, &with).grade, Grade::AllOk);
    }
}
