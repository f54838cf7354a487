//! HorizontalPodAutoscaler in its three target shapes.

use crate::context::schema::{null_as_default, ObjectSpec};
use crate::context::{AutoscaleTargetHolder, CrossVersionObjectReference, Versioned};
use serde::Deserialize;

const CPU: &str = "cpu";

/// `autoscaling/v1`: a single CPU utilization target.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HpaV1Spec {
    #[serde(default)]
    pub scale_target_ref: CrossVersionObjectReference,
    pub min_replicas: Option<i32>,
    #[serde(default)]
    pub max_replicas: i32,
    #[serde(rename = "targetCPUUtilizationPercentage")]
    pub target_cpu_utilization_percentage: Option<i32>,
}

impl ObjectSpec for HpaV1Spec {}

impl AutoscaleTargetHolder for Versioned<HpaV1Spec> {
    fn scale_target(&self) -> &CrossVersionObjectReference {
        &self.obj.spec.scale_target_ref
    }

    fn min_replicas(&self) -> Option<i32> {
        self.obj.spec.min_replicas
    }

    fn max_replicas(&self) -> i32 {
        self.obj.spec.max_replicas
    }

    fn target_cpu_utilization(&self) -> Option<i32> {
        self.obj.spec.target_cpu_utilization_percentage
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetricSourceV2beta1 {
    #[serde(default)]
    pub name: String,
    pub target_average_utilization: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricSpecV2beta1 {
    #[serde(rename = "type", default)]
    pub metric_type: String,
    pub resource: Option<ResourceMetricSourceV2beta1>,
}

/// `autoscaling/v2beta1`: metrics with `targetAverageUtilization`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HpaV2beta1Spec {
    #[serde(default)]
    pub scale_target_ref: CrossVersionObjectReference,
    pub min_replicas: Option<i32>,
    #[serde(default)]
    pub max_replicas: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: Vec<MetricSpecV2beta1>,
}

impl ObjectSpec for HpaV2beta1Spec {}

impl AutoscaleTargetHolder for Versioned<HpaV2beta1Spec> {
    fn scale_target(&self) -> &CrossVersionObjectReference {
        &self.obj.spec.scale_target_ref
    }

    fn min_replicas(&self) -> Option<i32> {
        self.obj.spec.min_replicas
    }

    fn max_replicas(&self) -> i32 {
        self.obj.spec.max_replicas
    }

    fn target_cpu_utilization(&self) -> Option<i32> {
        self.obj
            .spec
            .metrics
            .iter()
            .filter(|m| m.metric_type == "Resource")
            .filter_map(|m| m.resource.as_ref())
            .find(|r| r.name == CPU)
            .and_then(|r| r.target_average_utilization)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricTarget {
    #[serde(rename = "type", default)]
    pub target_type: String,
    pub average_utilization: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceMetricSource {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub target: MetricTarget,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricSpec {
    #[serde(rename = "type", default)]
    pub metric_type: String,
    pub resource: Option<ResourceMetricSource>,
}

/// `autoscaling/v2beta2` and `autoscaling/v2`: metrics with a typed `target`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HpaV2Spec {
    #[serde(default)]
    pub scale_target_ref: CrossVersionObjectReference,
    pub min_replicas: Option<i32>,
    #[serde(default)]
    pub max_replicas: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: Vec<MetricSpec>,
}

impl ObjectSpec for HpaV2Spec {}

impl AutoscaleTargetHolder for Versioned<HpaV2Spec> {
    fn scale_target(&self) -> &CrossVersionObjectReference {
        &self.obj.spec.scale_target_ref
    }

    fn min_replicas(&self) -> Option<i32> {
        self.obj.spec.min_replicas
    }

    fn max_replicas(&self) -> i32 {
        self.obj.spec.max_replicas
    }

    fn target_cpu_utilization(&self) -> Option<i32> {
        self.obj
            .spec
            .metrics
            .iter()
            .filter(|m| m.metric_type == "Resource")
            .filter_map(|m| m.resource.as_ref())
            .find(|r| r.name == CPU && r.target.target_type == "Utilization")
            .and_then(|r| r.target.average_utilization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileLocation;

    #[test]
    fn test_cpu_target_across_versions() {
        let v1 = r#"
apiVersion: autoscaling/v1
kind: HorizontalPodAutoscaler
metadata:
  name: web
spec:
  scaleTargetRef:
    apiVersion: apps/v1
    kind: Deployment
    name: web
  maxReplicas: 10
  targetCPUUtilizationPercentage: 70
"#;
        let v2beta1 = r#"
apiVersion: autoscaling/v2beta1
kind: HorizontalPodAutoscaler
metadata:
  name: web
spec:
  scaleTargetRef:
    kind: Deployment
    name: web
  maxReplicas: 10
  metrics:
    - type: Resource
      resource:
        name: cpu
        targetAverageUtilization: 70
"#;
        let v2 = r#"
apiVersion: autoscaling/v2
kind: HorizontalPodAutoscaler
metadata:
  name: web
spec:
  scaleTargetRef:
    kind: Deployment
    name: web
  minReplicas: 2
  maxReplicas: 10
  metrics:
    - type: Resource
      resource:
        name: memory
        target:
          type: Utilization
          averageUtilization: 50
    - type: Resource
      resource:
        name: cpu
        target:
          type: Utilization
          averageUtilization: 70
"#;
        let loc = FileLocation::default;
        let a = Versioned::<HpaV1Spec>::from_yaml(v1, loc()).unwrap();
        let b = Versioned::<HpaV2beta1Spec>::from_yaml(v2beta1, loc()).unwrap();
        let c = Versioned::<HpaV2Spec>::from_yaml(v2, loc()).unwrap();

        let targets: [&dyn AutoscaleTargetHolder; 3] = [&a, &b, &c];
        for hpa in targets {
            assert_eq!(hpa.target_cpu_utilization(), Some(70));
            assert_eq!(hpa.scale_target().name, "web");
            assert_eq!(hpa.scale_target().kind, "Deployment");
            assert_eq!(hpa.max_replicas(), 10);
        }
        assert_eq!(c.min_replicas(), Some(2));
        assert_eq!(a.min_replicas(), None);
    }
}
