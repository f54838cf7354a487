use crate::formatter::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kube-scorecard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Score Kubernetes object definitions")]
#[command(long_about = "Statically scores Kubernetes object definitions against a catalogue of reliability and security checks, without contacting a cluster.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a run configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score object definitions read from files, directories or stdin
    Score {
        /// Files or directories to score; `-` reads stdin
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        output_format: OutputFormat,

        /// Kubernetes version the objects are deployed to, e.g. v1.24
        #[arg(long, value_name = "VERSION")]
        kubernetes_version: Option<String>,

        /// Enable an optional check by ID (repeatable)
        #[arg(long = "enable-optional-test", value_name = "ID")]
        enable_optional_test: Vec<String>,

        /// Enable every optional check
        #[arg(long = "all-optional-tests")]
        all_optional_tests: bool,

        /// Skip a check by ID for every object (repeatable)
        #[arg(long = "ignore-test", value_name = "ID")]
        ignore_test: Vec<String>,

        /// Do not honour the kube-score/ignore annotation
        #[arg(long)]
        disable_ignore_checks_annotations: bool,

        /// Do not honour the kube-score/enable annotation
        #[arg(long)]
        disable_optional_checks_annotations: bool,

        /// Parse and score on a thread pool
        #[arg(long)]
        parallel: bool,

        /// Also list passed and skipped checks in human output
        #[arg(long)]
        show_ok: bool,
    },

    /// List every available check
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        output_format: OutputFormat,
    },

    /// Print version information
    Version,
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }

    /// Disable colors when asked to.
    pub fn init_color(&self) {
        if self.no_color {
            colored::control::set_override(false);
        }
    }
}
