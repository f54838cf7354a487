//! One adapter per (apiVersion, kind) pair.
//!
//! An adapter is a [`Versioned`] wrapping the decoded resource of a
//! version-specific spec type. Each submodule defines the spec types of one
//! API group and implements the capability traits for them.

pub mod apps;
pub mod autoscaling;
pub mod batch;
pub mod corev1;
pub mod networking;
pub mod policy;

use super::schema::{ObjectMeta, ObjectSpec, PodTemplateSpec, Resource, TypeMeta};
use super::{ObjectIdentity, PodTemplate, PodTemplateHolder};
use crate::types::FileLocation;
use std::collections::BTreeMap;

/// A decoded object together with the location it was read from.
#[derive(Debug, Clone)]
pub struct Versioned<S> {
    pub obj: Resource<S>,
    pub location: FileLocation,
}

impl<S: ObjectSpec> Versioned<S> {
    /// Wrap a decoded resource, applying the defaults of its schema version.
    pub fn new(mut obj: Resource<S>, location: FileLocation) -> Self {
        obj.spec.apply_defaults();
        Self { obj, location }
    }

    /// Decode from a parsed YAML document.
    pub fn from_value(
        value: serde_yaml::Value,
        location: FileLocation,
    ) -> Result<Self, serde_yaml::Error> {
        Ok(Self::new(serde_yaml::from_value(value)?, location))
    }

    /// Decode from YAML text.
    pub fn from_yaml(text: &str, location: FileLocation) -> Result<Self, serde_yaml::Error> {
        Ok(Self::new(serde_yaml::from_str(text)?, location))
    }
}

impl<S: ObjectSpec> ObjectIdentity for Versioned<S> {
    fn type_meta(&self) -> TypeMeta {
        self.obj.type_meta()
    }

    fn object_meta(&self) -> &ObjectMeta {
        &self.obj.metadata
    }

    fn location(&self) -> &FileLocation {
        &self.location
    }
}

/// A spec that embeds a pod template.
pub trait TemplateSpec {
    fn template(&self) -> &PodTemplateSpec;

    /// Annotations of a template between the object and its pod template, if any.
    fn intermediate_annotations(&self) -> Option<&BTreeMap<String, String>> {
        None
    }
}

impl<S: ObjectSpec + TemplateSpec> PodTemplateHolder for Versioned<S> {
    fn pod_template(&self) -> PodTemplate<'_> {
        let template = self.obj.spec.template();
        PodTemplate {
            namespace: &self.obj.metadata.namespace,
            metadata: &template.metadata,
            spec: &template.spec,
        }
    }

    fn annotation_sources(&self) -> Vec<&BTreeMap<String, String>> {
        let mut sources = vec![&self.obj.metadata.annotations];
        sources.extend(self.obj.spec.intermediate_annotations());
        sources.push(&self.obj.spec.template().metadata.annotations);
        sources
    }
}
