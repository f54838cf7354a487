//! Output formatters for scorecards.

pub mod json;
pub mod plain;

use crate::scorecard::Scorecard;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Grouped, colored text for terminals.
    #[default]
    Human,
    /// The full scorecard as JSON.
    Json,
}

/// What the human formatter includes besides problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlainOptions {
    /// Also list checks graded `OK` and skipped checks.
    pub show_ok: bool,
}

/// Format a scorecard to a string.
pub fn format_scorecard_to_string(
    card: &Scorecard,
    format: OutputFormat,
    options: PlainOptions,
) -> String {
    match format {
        OutputFormat::Human => plain::format(card, options),
        OutputFormat::Json => json::format(card),
    }
}

/// Format and print a scorecard.
pub fn format_scorecard(card: &Scorecard, format: OutputFormat, options: PlainOptions) {
    print!("{}", format_scorecard_to_string(card, format, options));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_dispatch() {
        let card = Scorecard::default();
        let json = format_scorecard_to_string(&card, OutputFormat::Json, PlainOptions::default());
        assert!(json.trim_start().starts_with('{'));

        colored::control::set_override(false);
        let human = format_scorecard_to_string(&card, OutputFormat::Human, PlainOptions::default());
        assert!(human.contains("0 objects scored"));
    }
}
