use clap::Parser;
use kube_scorecard::{
    VERSION,
    cli::{Cli, Commands},
    handlers::{self, ScoreOptions},
};
use std::process;

/// Exit code when a check graded `Critical`.
const EXIT_CRITICAL: i32 = 1;
/// Exit code when input could not be read or decoded.
const EXIT_INPUT: i32 = 2;

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(EXIT_INPUT);
        }
    }
}

fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse();
    cli.init_logging();
    cli.init_color();

    match cli.command {
        Commands::Score {
            files,
            output_format,
            kubernetes_version,
            enable_optional_test,
            all_optional_tests,
            ignore_test,
            disable_ignore_checks_annotations,
            disable_optional_checks_annotations,
            parallel,
            show_ok,
        } => {
            let options = ScoreOptions {
                config_file: cli.config,
                format: output_format,
                kubernetes_version,
                enable_optional: enable_optional_test,
                all_optional: all_optional_tests,
                ignore: ignore_test,
                disable_ignore_annotation: disable_ignore_checks_annotations,
                disable_optional_annotation: disable_optional_checks_annotations,
                parallel,
                show_ok,
            };
            let critical = handlers::handle_score(&files, &options)?;
            Ok(if critical { EXIT_CRITICAL } else { 0 })
        }
        Commands::List { output_format } => {
            handlers::handle_list(output_format)?;
            Ok(0)
        }
        Commands::Version => {
            println!("kube-scorecard {}", VERSION);
            Ok(0)
        }
    }
}
