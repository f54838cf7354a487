//! Container extraction utilities.

use crate::context::schema::{Container, PodSpec, SecurityContext};

/// Init containers followed by containers.
pub fn all_containers(pod_spec: &PodSpec) -> Vec<&Container> {
    let mut containers: Vec<&Container> = pod_spec.init_containers.iter().collect();
    containers.extend(pod_spec.containers.iter());
    containers
}

/// The container's security context with the pod-level user and group
/// filled in where the container leaves them unset.
///
/// `None` when neither the container nor the pod sets a security context.
pub fn effective_security_context(
    pod_spec: &PodSpec,
    container: &Container,
) -> Option<SecurityContext> {
    let pod_sc = pod_spec.security_context.as_ref();
    if container.security_context.is_none() && pod_sc.is_none() {
        return None;
    }

    let mut sc = container.security_context.clone().unwrap_or_default();
    if let Some(pod_sc) = pod_sc {
        sc.run_as_user = sc.run_as_user.or(pod_sc.run_as_user);
        sc.run_as_group = sc.run_as_group.or(pod_sc.run_as_group);
    }
    Some(sc)
}
