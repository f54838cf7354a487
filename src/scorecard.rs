//! The result model of a scoring run.

use crate::checks::CheckInfo;
use crate::context::{ObjectMeta, TypeMeta};
use crate::error::CheckError;
use crate::types::{FileLocation, Grade, TestScore};
use serde::{Serialize, Serializer};

/// What happened to one check on one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// The evaluator ran and produced a score.
    Evaluated,
    /// The evaluator returned an error.
    Failed,
    /// Skipped by the run ignore list or an ignore annotation.
    Ignored,
    /// Optional and not enabled for this object.
    NotEnabled,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Evaluated => "evaluated",
            Self::Failed => "failed",
            Self::Ignored => "ignored",
            Self::NotEnabled => "not_enabled",
        }
    }
}

fn serialize_error<S: Serializer>(error: &Option<CheckError>, s: S) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => s.serialize_str(&e.to_string()),
        None => s.serialize_none(),
    }
}

/// One check on one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub check: CheckInfo,
    pub status: CheckStatus,
    pub score: TestScore,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_error"
    )]
    pub error: Option<CheckError>,
}

impl CheckResult {
    pub(crate) fn new(check: CheckInfo, status: CheckStatus, score: TestScore) -> Self {
        Self {
            check,
            status,
            score,
            error: None,
        }
    }

    pub(crate) fn failed(check: CheckInfo, error: CheckError) -> Self {
        Self {
            check,
            status: CheckStatus::Failed,
            score: TestScore::default(),
            error: Some(error),
        }
    }

    /// The grade this result contributes, if any.
    ///
    /// Skipped, ignored, disabled and failed results have none, so they can
    /// never be mistaken for `AllOk`.
    pub fn effective_grade(&self) -> Option<Grade> {
        match self.status {
            CheckStatus::Evaluated if !self.score.skipped => Some(self.score.grade),
            _ => None,
        }
    }
}

/// Every check result for one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredObject {
    pub type_meta: TypeMeta,
    pub object_meta: ObjectMeta,
    pub location: FileLocation,
    pub checks: Vec<CheckResult>,
}

impl ScoredObject {
    /// Worst grade among the evaluated checks, `None` when nothing was graded.
    pub fn worst_grade(&self) -> Option<Grade> {
        self.checks.iter().filter_map(CheckResult::effective_grade).min()
    }

    /// Human-readable identity, e.g. `apps/v1/Deployment shop/web`.
    pub fn display_name(&self) -> String {
        let name = if self.object_meta.namespace.is_empty() {
            self.object_meta.name.clone()
        } else {
            format!("{}/{}", self.object_meta.namespace, self.object_meta.name)
        };
        format!("{}/{} {}", self.type_meta.api_version, self.type_meta.kind, name)
    }
}

/// The result of scoring a batch, objects in batch order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Scorecard {
    pub objects: Vec<ScoredObject>,
}

impl Scorecard {
    fn graded(&self) -> impl Iterator<Item = Grade> + '_ {
        self.objects
            .iter()
            .flat_map(|o| o.checks.iter())
            .filter_map(CheckResult::effective_grade)
    }

    /// Worst grade over every object, `None` when nothing was graded.
    pub fn worst_grade(&self) -> Option<Grade> {
        self.graded().min()
    }

    /// Number of evaluated results with exactly this grade.
    pub fn count(&self, grade: Grade) -> usize {
        self.graded().filter(|g| *g == grade).count()
    }

    /// Whether any evaluated result is graded `grade` or worse.
    pub fn has_grade_at_or_below(&self, grade: Grade) -> bool {
        self.graded().any(|g| g <= grade)
    }

    /// Number of results with the given status.
    pub fn count_status(&self, status: CheckStatus) -> usize {
        self.objects
            .iter()
            .flat_map(|o| o.checks.iter())
            .filter(|c| c.status == status)
            .count()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::Category;

    fn info(name: &str) -> CheckInfo {
        CheckInfo {
            name: name.to_string(),
            id: crate::checks::check_id(name),
            description: String::new(),
            category: Category::Meta,
            optional: false,
        }
    }

    fn object(results: Vec<CheckResult>) -> ScoredObject {
        ScoredObject {
            type_meta: TypeMeta::new("v1", "Pod"),
            object_meta: ObjectMeta {
                name: "web".to_string(),
                namespace: "shop".to_string(),
                ..Default::default()
            },
            location: FileLocation::new("pod.yaml", 1, 0),
            checks: results,
        }
    }

    #[test]
    fn test_skipped_results_have_no_grade() {
        let skipped = CheckResult::new(info("a"), CheckStatus::Evaluated, TestScore::skipped("x"));
        let ignored = CheckResult::new(info("b"), CheckStatus::Ignored, TestScore::default());
        let failed = CheckResult::failed(info("c"), CheckError::Evaluation("boom".to_string()));
        assert_eq!(skipped.effective_grade(), None);
        assert_eq!(ignored.effective_grade(), None);
        assert_eq!(failed.effective_grade(), None);
    }

    #[test]
    fn test_worst_grade_and_counts() {
        let card = Scorecard {
            objects: vec![
                object(vec![
                    CheckResult::new(info("a"), CheckStatus::Evaluated, TestScore::new()),
                    CheckResult::new(
                        info("b"),
                        CheckStatus::Evaluated,
                        TestScore::with_grade(Grade::Warning),
                    ),
                ]),
                object(vec![CheckResult::new(
                    info("c"),
                    CheckStatus::NotEnabled,
                    TestScore::default(),
                )]),
            ],
        };

        assert_eq!(card.worst_grade(), Some(Grade::Warning));
        assert_eq!(card.objects[1].worst_grade(), None);
        assert_eq!(card.count(Grade::AllOk), 1);
        assert_eq!(card.count(Grade::Critical), 0);
        assert!(card.has_grade_at_or_below(Grade::Warning));
        assert!(!card.has_grade_at_or_below(Grade::Critical));
        assert_eq!(card.count_status(CheckStatus::NotEnabled), 1);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(object(vec![]).display_name(), "v1/Pod shop/web");
    }

    #[test]
    fn test_error_serializes_as_message() {
        let failed = CheckResult::failed(info("a"), CheckError::Evaluation("boom".to_string()));
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["error"], "boom");
        assert_eq!(json["status"], "failed");
    }
}
