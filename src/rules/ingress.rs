//! Ingress checks.

use crate::checks::{CheckContext, CheckOutcome, Checks, Evaluator};
use crate::context::{IngressBackendRef, IngressHolder, IntOrString, ObjectIdentity, ServiceHolder};
use crate::types::{Grade, TestScore};

pub fn register(checks: &mut Checks) {
    checks.register(
        "Ingress targets Service",
        "Makes sure that the Ingress targets a Service",
        Evaluator::ingress(ingress_targets_service),
    );
}

fn service_exposes(service: &dyn ServiceHolder, port: Option<&IntOrString>) -> bool {
    match port {
        None => true,
        Some(IntOrString::Int(number)) => service.ports().iter().any(|p| p.port == *number),
        Some(IntOrString::String(name)) => service.ports().iter().any(|p| &p.name == name),
    }
}

fn describe(backend: &IngressBackendRef) -> String {
    match &backend.service_port {
        Some(port) => format!(
            "No service with name {} and port {} was found",
            backend.service_name, port
        ),
        None => format!("No service with name {} was found", backend.service_name),
    }
}

fn ingress_targets_service(ingress: &dyn IngressHolder, ctx: &CheckContext<'_>) -> CheckOutcome {
    let mut score = TestScore::new();

    for backend in ingress.backends() {
        let found = ctx.batch.services().any(|service| {
            service.namespace() == ingress.namespace()
                && service.name() == backend.service_name
                && service_exposes(service, backend.service_port.as_ref())
        });

        if !found {
            score.grade = Grade::Critical;
            score.add_comment(&backend.service_name, "No service match was found", &describe(&backend));
        }
    }

    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::score_of;

    const SERVICE: &str = "apiVersion: v1
kind: Service
metadata:
  name: web
  namespace: shop
spec:
  selector:
    app: web
  ports:
    - name: http
      port: 80
";

    fn ingress_v1(port: &str) -> String {
        format!(
            "---
apiVersion: networking.k8s.io/v1
kind: Ingress
metadata:
  name: web
  namespace: shop
spec:
  rules:
    - host: shop.example.com
      http:
        paths:
          - path: /
            pathType: Prefix
            backend:
              service:
                name: web
                port:
{port}"
        )
    }

    #[test]
    fn test_port_number_and_name() {
        let by_number = format!("{}{}", SERVICE, ingress_v1("                  number: 80\n"));
        assert_eq!(score_of(&by_number, "Ingress targets Service").grade, Grade::AllOk);

        let by_name = format!("{}{}", SERVICE, ingress_v1("                  name: http\n"));
        assert_eq!(score_of(&by_name, "Ingress targets Service").grade, Grade::AllOk);
    }

    #[test]
    fn test_missing_port() {
        let yaml = format!("{}{}", SERVICE, ingress_v1("                  number: 8080\n"));
        let score = score_of(&yaml, "Ingress targets Service");
        assert_eq!(score.grade, Grade::Critical);
        assert_eq!(score.comments[0].subject, "web");
        assert_eq!(
            score.comments[0].description,
            "No service with name web and port 8080 was found"
        );
    }

    #[test]
    fn test_missing_service_on_legacy_ingress() {
        let yaml = "apiVersion: extensions/v1beta1
kind: Ingress
metadata:
  name: web
  namespace: shop
spec:
  backend:
    serviceName: default
    servicePort: 80
  rules:
    - http:
        paths:
          - backend:
              serviceName: web
              servicePort: 80
";
        let yaml = format!("{}---\n{}", SERVICE, yaml);
        let score = score_of(&yaml, "Ingress targets Service");
        assert_eq!(score.grade, Grade::Critical);
        assert_eq!(score.comments.len(), 1);
        assert_eq!(score.comments[0].subject, "default");
    }
}
