//! JSON formatter.

use crate::scorecard::{ScoredObject, Scorecard};
use crate::types::Grade;
use serde::Serialize;

/// Format a scorecard as JSON.
pub fn format(card: &Scorecard) -> String {
    let output = JsonOutput::from(card);
    serde_json::to_string_pretty(&output).unwrap_or_else(|e| {
        log::warn!("Failed to serialize scorecard: {}", e);
        "{}".to_string()
    })
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    objects: &'a [ScoredObject],
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonSummary {
    objects_scored: usize,
    critical: usize,
    warning: usize,
    ok: usize,
    worst_grade: Option<Grade>,
}

impl<'a> From<&'a Scorecard> for JsonOutput<'a> {
    fn from(card: &'a Scorecard) -> Self {
        Self {
            objects: &card.objects,
            summary: JsonSummary {
                objects_scored: card.len(),
                critical: card.count(Grade::Critical),
                warning: card.count(Grade::Warning),
                ok: card.count(Grade::AllOk),
                worst_grade: card.worst_grade(),
            },
        }
    }
}
