//! Jobs and cron jobs.
//!
//! `batch/v1beta1` and `batch/v1` CronJob share the fields read here, so both
//! decode into [`CronJobSpec`].

use super::TemplateSpec;
use crate::context::schema::{null_as_default, ObjectMeta, ObjectSpec, PodTemplateSpec};
use crate::context::{CronJobHolder, Versioned};
use serde::Deserialize;
use std::collections::BTreeMap;

/// `batch/v1` Job, also embedded in cron job templates.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    pub backoff_limit: Option<i32>,
    pub active_deadline_seconds: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub template: PodTemplateSpec,
}

impl ObjectSpec for JobSpec {}

impl TemplateSpec for JobSpec {
    fn template(&self) -> &PodTemplateSpec {
        &self.template
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobTemplateSpec {
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: ObjectMeta,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spec: JobSpec,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CronJobSpec {
    #[serde(default, deserialize_with = "null_as_default")]
    pub schedule: String,
    pub starting_deadline_seconds: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job_template: JobTemplateSpec,
}

impl ObjectSpec for CronJobSpec {}

impl TemplateSpec for CronJobSpec {
    fn template(&self) -> &PodTemplateSpec {
        &self.job_template.spec.template
    }

    fn intermediate_annotations(&self) -> Option<&BTreeMap<String, String>> {
        Some(&self.job_template.metadata.annotations)
    }
}

impl CronJobHolder for Versioned<CronJobSpec> {
    fn starting_deadline_seconds(&self) -> Option<i64> {
        self.obj.spec.starting_deadline_seconds
    }

    fn backoff_limit(&self) -> Option<i32> {
        self.obj.spec.job_template.spec.backoff_limit
    }
}
