//! Core result types for kube-scorecard.
//!
//! - `Grade` - ordered outcome of one check on one object
//! - `TestScore` - grade, skipped flag and comments produced by a check
//! - `FileLocation` - where an object was read from

use serde::Serialize;
use std::fmt;

/// Grade of a single check evaluation.
///
/// Ordered from worst to best: `Critical < Warning < AllOk`.
/// A skipped result is tracked separately on [`TestScore`] and is not a grade.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Grade {
    /// The object has a problem that should be fixed before deploying.
    Critical,
    /// The object deviates from recommended practice.
    Warning,
    /// Nothing was detected.
    #[default]
    AllOk,
}

impl Grade {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Warning => "WARNING",
            Self::AllOk => "OK",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A note attached to a [`TestScore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestScoreComment {
    /// What the comment is about, e.g. a container or label name. Empty for the object itself.
    pub subject: String,
    /// Short message.
    pub summary: String,
    /// Longer explanation, usually with remediation advice.
    pub description: String,
}

/// The result of running one check against one object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestScore {
    pub grade: Grade,
    /// Skipped results carry no grade weight.
    pub skipped: bool,
    pub comments: Vec<TestScoreComment>,
}

impl TestScore {
    /// Create an empty score graded `AllOk`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a score with the given grade.
    pub fn with_grade(grade: Grade) -> Self {
        Self {
            grade,
            ..Self::default()
        }
    }

    /// Create a skipped score with a reason.
    pub fn skipped(reason: impl Into<String>) -> Self {
        let mut score = Self {
            skipped: true,
            ..Self::default()
        };
        score.add_comment("", reason, "");
        score
    }

    /// Append a comment.
    pub fn add_comment(
        &mut self,
        subject: impl Into<String>,
        summary: impl Into<String>,
        description: impl Into<String>,
    ) {
        self.comments.push(TestScoreComment {
            subject: subject.into(),
            summary: summary.into(),
            description: description.into(),
        });
    }

    /// Builder form of [`TestScore::add_comment`].
    pub fn comment(
        mut self,
        subject: impl Into<String>,
        summary: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.add_comment(subject, summary, description);
        self
    }
}

/// Source position of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct FileLocation {
    /// Source name (file path or `-` for stdin).
    pub name: String,
    /// 1-indexed line the document starts on.
    pub line: usize,
    /// 0-indexed position of the document within its source.
    pub document: usize,
}

impl FileLocation {
    pub fn new(name: impl Into<String>, line: usize, document: usize) -> Self {
        Self {
            name: name.into(),
            line,
            document,
        }
    }
}

impl fmt::Display for FileLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_ordering() {
        assert!(Grade::Critical < Grade::Warning);
        assert!(Grade::Warning < Grade::AllOk);
        assert_eq!(
            [Grade::AllOk, Grade::Critical, Grade::Warning].iter().min(),
            Some(&Grade::Critical)
        );
    }

    #[test]
    fn test_grade_default_is_all_ok() {
        assert_eq!(Grade::default(), Grade::AllOk);
        assert_eq!(TestScore::new().grade, Grade::AllOk);
        assert!(!TestScore::new().skipped);
    }

    #[test]
    fn test_skipped_score() {
        let score = TestScore::skipped("not applicable");
        assert!(score.skipped);
        assert_eq!(score.comments.len(), 1);
        assert_eq!(score.comments[0].summary, "not applicable");
    }

    #[test]
    fn test_file_location_display() {
        let loc = FileLocation::new("app.yaml", 12, 2);
        assert_eq!(loc.to_string(), "app.yaml:12");
    }
}
