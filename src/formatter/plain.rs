//! Human-readable formatter.

use super::PlainOptions;
use crate::scorecard::{CheckResult, CheckStatus, Scorecard};
use crate::types::Grade;
use colored::Colorize;

fn grade_label(grade: Grade) -> String {
    let label = format!("[{}]", grade);
    match grade {
        Grade::Critical => label.red().bold().to_string(),
        Grade::Warning => label.yellow().bold().to_string(),
        Grade::AllOk => label.green().to_string(),
    }
}

fn format_check(output: &mut String, result: &CheckResult, options: PlainOptions) {
    let header = match (result.status, result.effective_grade()) {
        (CheckStatus::Failed, _) => {
            let error = result
                .error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            format!("{} {}: {}", "[ERROR]".red(), result.check.name, error)
        }
        (_, Some(grade)) if grade < Grade::AllOk => {
            format!("{} {}", grade_label(grade), result.check.name)
        }
        (_, Some(grade)) if options.show_ok => {
            format!("{} {}", grade_label(grade), result.check.name)
        }
        (CheckStatus::Evaluated, None) if options.show_ok => {
            format!("{} {}", "[SKIPPED]".dimmed(), result.check.name)
        }
        _ => return,
    };
    output.push_str(&format!("    {}\n", header));

    for comment in &result.score.comments {
        let line = if comment.subject.is_empty() {
            comment.summary.clone()
        } else {
            format!("{} -> {}", comment.subject.bold(), comment.summary)
        };
        output.push_str(&format!("        · {}\n", line));
        if !comment.description.is_empty() {
            output.push_str(&format!("            {}\n", comment.description.dimmed()));
        }
    }
}

/// Format a scorecard grouped by object.
pub fn format(card: &Scorecard, options: PlainOptions) -> String {
    let mut output = String::new();

    for object in &card.objects {
        let mut body = String::new();
        for result in &object.checks {
            format_check(&mut body, result, options);
        }
        if body.is_empty() {
            continue;
        }

        output.push_str(&format!(
            "{} {}\n",
            object.display_name().bright_white().bold(),
            format!("({})", object.location).dimmed(),
        ));
        output.push_str(&body);
    }

    let critical = card.count(Grade::Critical);
    let warning = card.count(Grade::Warning);
    if critical == 0 && warning == 0 {
        output.push_str(&format!(
            "{} objects scored, no problems found.\n",
            card.len()
        ));
    } else {
        output.push_str(&format!(
            "\n{} objects scored: {} critical, {} warning.\n",
            card.len(),
            critical,
            warning
        ));
    }

    output
}
