//! Object metadata checks.

use crate::checks::{CheckContext, CheckOutcome, Checks, Evaluator};
use crate::context::BothMeta;
use crate::extract::labels::matches_label_value_syntax;
use crate::types::{Grade, TestScore};

pub fn register(checks: &mut Checks) {
    checks.register(
        "Label values",
        "Validates label values",
        Evaluator::meta(valid_label_values),
    );
}

fn valid_label_values(meta: &BothMeta, _: &CheckContext<'_>) -> CheckOutcome {
    let mut score = TestScore::new();

    for (key, value) in &meta.object_meta.labels {
        if !matches_label_value_syntax(value) {
            score.grade = Grade::Critical;
            score.add_comment(
                key,
                "Invalid label value",
                "The label value is invalid, and will not be accepted by Kubernetes",
            );
        }
    }

    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::context::{NormalizedBatch, ObjectMeta, TypeMeta};
    use std::collections::BTreeMap;

    fn meta(labels: &[(&str, &str)]) -> BothMeta {
        BothMeta {
            type_meta: TypeMeta::new("v1", "Pod"),
            object_meta: ObjectMeta {
                name: "p".to_string(),
                labels: labels
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect::<BTreeMap<_, _>>(),
                ..Default::default()
            },
            location: Default::default(),
        }
    }

    fn run(meta: &BothMeta) -> TestScore {
        let batch = NormalizedBatch::new();
        let config = RunConfig::default();
        valid_label_values(meta, &CheckContext::new(&batch, &config)).unwrap()
    }

    #[test]
    fn test_valid_labels() {
        let score = run(&meta(&[("app", "web"), ("tier", ""), ("version", "1.2.3-rc_1")]));
        assert_eq!(score.grade, Grade::AllOk);
        assert!(score.comments.is_empty());
    }

    #[test]
    fn test_invalid_labels_are_reported_per_key() {
        let score = run(&meta(&[("app", "web"), ("bad", "-web"), ("worse", "a b")]));
        assert_eq!(score.grade, Grade::Critical);
        let keys: Vec<&str> = score.comments.iter().map(|c| c.subject.as_str()).collect();
        assert_eq!(keys, vec!["bad", "worse"]);
    }

    #[test]
    fn test_long_values_are_not_length_checked() {
        let long = "a".repeat(64);
        let score = run(&meta(&[("x", long.as_str())]));
        assert_eq!(score.grade, Grade::AllOk);
        assert!(score.comments.is_empty());
    }
}
