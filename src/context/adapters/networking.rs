//! Network policies and the three ingress shapes.
//!
//! - `extensions/v1beta1` Ingress: `serviceName`/`servicePort` backends, class only by annotation
//! - `networking.k8s.io/v1beta1` Ingress: same backends, adds `ingressClassName`
//! - `networking.k8s.io/v1` Ingress: `service.name`/`service.port` backends, `defaultBackend`

use crate::context::schema::{null_as_default, IntOrString, LabelSelector, ObjectSpec};
use crate::context::{
    IngressBackendRef, IngressHolder, NetworkPolicyHolder, ObjectIdentity, Versioned,
};
use serde::Deserialize;

/// Annotation used for the ingress class before `ingressClassName` existed.
pub const INGRESS_CLASS_ANNOTATION: &str = "kubernetes.io/ingress.class";

/// `networking.k8s.io/v1` and `extensions/v1beta1` NetworkPolicy.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPolicySpec {
    #[serde(default, deserialize_with = "null_as_default")]
    pub pod_selector: LabelSelector,
    #[serde(default, deserialize_with = "null_as_default")]
    pub policy_types: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingress: Vec<serde_yaml::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub egress: Vec<serde_yaml::Value>,
}

impl ObjectSpec for NetworkPolicySpec {}

impl NetworkPolicyHolder for Versioned<NetworkPolicySpec> {
    fn pod_selector(&self) -> &LabelSelector {
        &self.obj.spec.pod_selector
    }

    fn policy_types(&self) -> &[String] {
        &self.obj.spec.policy_types
    }

    fn has_ingress_rules(&self) -> bool {
        !self.obj.spec.ingress.is_empty()
    }

    fn has_egress_rules(&self) -> bool {
        !self.obj.spec.egress.is_empty()
    }
}

/// Converts a version-specific backend into the service it points at.
trait BackendService {
    fn service(&self) -> Option<(String, Option<IntOrString>)>;
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(bound(deserialize = "B: Deserialize<'de> + Default"))]
pub struct IngressRule<B> {
    pub host: Option<String>,
    pub http: Option<HttpIngressRuleValue<B>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(bound(deserialize = "B: Deserialize<'de> + Default"))]
pub struct HttpIngressRuleValue<B> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub paths: Vec<HttpIngressPath<B>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(
    rename_all = "camelCase",
    bound(deserialize = "B: Deserialize<'de> + Default")
)]
pub struct HttpIngressPath<B> {
    pub path: Option<String>,
    pub path_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub backend: B,
}

fn collect_backends<B: BackendService>(
    default_backend: Option<&B>,
    rules: &[IngressRule<B>],
) -> Vec<IngressBackendRef> {
    let mut backends = Vec::new();

    if let Some((service_name, service_port)) = default_backend.and_then(B::service) {
        backends.push(IngressBackendRef {
            host: None,
            path: None,
            service_name,
            service_port,
        });
    }

    for rule in rules {
        let Some(http) = &rule.http else {
            continue;
        };
        for path in &http.paths {
            if let Some((service_name, service_port)) = path.backend.service() {
                backends.push(IngressBackendRef {
                    host: rule.host.clone(),
                    path: path.path.clone(),
                    service_name,
                    service_port,
                });
            }
        }
    }

    backends
}

/// Backend shape of both v1beta1 ingress versions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyIngressBackend {
    pub service_name: Option<String>,
    pub service_port: Option<IntOrString>,
}

impl BackendService for LegacyIngressBackend {
    fn service(&self) -> Option<(String, Option<IntOrString>)> {
        let name = self.service_name.as_ref().filter(|n| !n.is_empty())?;
        Some((name.clone(), self.service_port.clone()))
    }
}

/// `extensions/v1beta1` Ingress.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtensionsIngressSpec {
    pub backend: Option<LegacyIngressBackend>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rules: Vec<IngressRule<LegacyIngressBackend>>,
}

impl ObjectSpec for ExtensionsIngressSpec {}

impl IngressHolder for Versioned<ExtensionsIngressSpec> {
    fn ingress_class_name(&self) -> Option<&str> {
        self.object_meta()
            .annotations
            .get(INGRESS_CLASS_ANNOTATION)
            .map(String::as_str)
    }

    fn backends(&self) -> Vec<IngressBackendRef> {
        collect_backends(self.obj.spec.backend.as_ref(), &self.obj.spec.rules)
    }
}

/// `networking.k8s.io/v1beta1` Ingress.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressV1beta1Spec {
    pub ingress_class_name: Option<String>,
    pub backend: Option<LegacyIngressBackend>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rules: Vec<IngressRule<LegacyIngressBackend>>,
}

impl ObjectSpec for IngressV1beta1Spec {}

impl IngressHolder for Versioned<IngressV1beta1Spec> {
    fn ingress_class_name(&self) -> Option<&str> {
        self.obj.spec.ingress_class_name.as_deref().or_else(|| {
            self.object_meta()
                .annotations
                .get(INGRESS_CLASS_ANNOTATION)
                .map(String::as_str)
        })
    }

    fn backends(&self) -> Vec<IngressBackendRef> {
        collect_backends(self.obj.spec.backend.as_ref(), &self.obj.spec.rules)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceBackendPort {
    pub number: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngressServiceBackend {
    #[serde(default)]
    pub name: String,
    pub port: Option<ServiceBackendPort>,
}

/// Backend shape of `networking.k8s.io/v1` Ingress.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngressBackendV1 {
    pub service: Option<IngressServiceBackend>,
}

impl BackendService for IngressBackendV1 {
    fn service(&self) -> Option<(String, Option<IntOrString>)> {
        let service = self.service.as_ref().filter(|s| !s.name.is_empty())?;
        let port = service.port.as_ref().and_then(|p| match (p.number, &p.name) {
            (Some(number), _) => Some(IntOrString::Int(number)),
            (None, Some(name)) => Some(IntOrString::String(name.clone())),
            (None, None) => None,
        });
        Some((service.name.clone(), port))
    }
}

/// `networking.k8s.io/v1` Ingress.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressV1Spec {
    pub ingress_class_name: Option<String>,
    pub default_backend: Option<IngressBackendV1>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rules: Vec<IngressRule<IngressBackendV1>>,
}

impl ObjectSpec for IngressV1Spec {}

impl IngressHolder for Versioned<IngressV1Spec> {
    fn ingress_class_name(&self) -> Option<&str> {
        self.obj.spec.ingress_class_name.as_deref().or_else(|| {
            self.object_meta()
                .annotations
                .get(INGRESS_CLASS_ANNOTATION)
                .map(String::as_str)
        })
    }

    fn backends(&self) -> Vec<IngressBackendRef> {
        collect_backends(self.obj.spec.default_backend.as_ref(), &self.obj.spec.rules)
    }
}
