//! `v1` Pod and Service.

use crate::context::schema::{null_as_default, ObjectSpec, PodSpec};
use crate::context::{PodTemplate, PodTemplateHolder, ServiceHolder, ServicePort, Versioned};
use serde::Deserialize;
use std::collections::BTreeMap;

impl PodTemplateHolder for Versioned<PodSpec> {
    fn pod_template(&self) -> PodTemplate<'_> {
        PodTemplate {
            namespace: &self.obj.metadata.namespace,
            metadata: &self.obj.metadata,
            spec: &self.obj.spec,
        }
    }

    fn annotation_sources(&self) -> Vec<&BTreeMap<String, String>> {
        vec![&self.obj.metadata.annotations]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    #[serde(default, deserialize_with = "null_as_default")]
    pub selector: BTreeMap<String, String>,
    #[serde(rename = "clusterIP")]
    pub cluster_ip: Option<String>,
    #[serde(rename = "type")]
    pub service_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ports: Vec<ServicePort>,
    pub external_name: Option<String>,
}

impl ObjectSpec for ServiceSpec {}

impl ServiceHolder for Versioned<ServiceSpec> {
    fn selector(&self) -> &BTreeMap<String, String> {
        &self.obj.spec.selector
    }

    fn cluster_ip(&self) -> Option<&str> {
        self.obj.spec.cluster_ip.as_deref()
    }

    fn service_type(&self) -> &str {
        self.obj.spec.service_type.as_deref().unwrap_or("ClusterIP")
    }

    fn ports(&self) -> &[ServicePort] {
        &self.obj.spec.ports
    }
}
