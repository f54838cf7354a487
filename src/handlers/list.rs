//! Handler for the `list` command.

use crate::checks::CheckInfo;
use crate::checks::builtin::builtin_checks;
use crate::error::Result;
use crate::formatter::OutputFormat;
use colored::Colorize;

/// Render the check catalogue.
pub fn format_checks(infos: &[CheckInfo], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(infos).unwrap_or_else(|e| {
                log::warn!("Failed to serialize check catalogue: {}", e);
                "[]".to_string()
            });
            json + "\n"
        }
        OutputFormat::Human => {
            let mut output = String::new();
            for info in infos {
                let optional = if info.optional { " (optional)" } else { "" };
                output.push_str(&format!(
                    "{} [{}]{}\n    {}\n",
                    info.id.bold(),
                    info.category,
                    optional.dimmed(),
                    info.description
                ));
            }
            output
        }
    }
}

/// Handle the `list` command.
pub fn handle_list(format: OutputFormat) -> Result<()> {
    print!("{}", format_checks(&builtin_checks().infos(), format));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_listing() {
        let infos = builtin_checks().infos();
        let text = format_checks(&infos, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.as_array().unwrap().len(), infos.len());
        assert_eq!(value[0]["id"], "label-values");
    }
}
