//! # kube-scorecard
//!
//! Static scoring of Kubernetes object definitions. Documents are decoded
//! into version-specific types, exposed to checks through version-agnostic
//! views, and graded by a catalogue of independent checks. Nothing talks to
//! a cluster.
//!
//! ## Features
//!
//! - **Multi-version decoding**: every historical shape of the supported kinds
//! - **Correlation checks**: network policies, services, budgets and autoscalers
//!   are matched against the workloads they select
//! - **Annotation control**: `kube-score/ignore` and `kube-score/enable`
//! - **Fail late**: one malformed document never hides problems in the others
//!
//! ## Example
//!
//! ```rust,no_run
//! use kube_scorecard::{audit, builtin_checks, InputSource, RunConfig};
//!
//! # fn main() -> kube_scorecard::Result<()> {
//! let sources = vec![InputSource::from_text("app.yaml", "apiVersion: v1\nkind: Pod\n")];
//! let checks = builtin_checks();
//! let card = audit(&sources, &checks, &RunConfig::default())?;
//! println!("{:?}", card.worst_grade());
//! # Ok(())
//! # }
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod extract;
pub mod formatter;
pub mod handlers;
pub mod parser;
pub mod pragma;
pub mod rules;
pub mod score;
pub mod scorecard;
pub mod types;

// Re-export commonly used types and functions
pub use checks::builtin::builtin_checks;
pub use checks::{Category, CheckInfo, Checks};
pub use config::{KubernetesVersion, RunConfig};
pub use context::NormalizedBatch;
pub use error::{Error, Result};
pub use parser::{DocumentParser, InputSource};
pub use score::ScoringEngine;
pub use scorecard::{CheckResult, CheckStatus, ScoredObject, Scorecard};
pub use types::{FileLocation, Grade, TestScore};

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse every source, fail late on decode errors, then score the batch.
///
/// Parsing and scoring run on the rayon pool when `config.parallel` is set.
pub fn audit(sources: &[InputSource], checks: &Checks, config: &RunConfig) -> Result<Scorecard> {
    let parser = DocumentParser::default();
    let batch = if config.parallel {
        parser.parse_parallel(sources)
    } else {
        parser.parse(sources)
    };
    let batch = batch.into_result()?;

    let engine = ScoringEngine::new(checks, config);
    let card = if config.parallel {
        engine.score_parallel(&batch)
    } else {
        engine.score(&batch)
    };
    Ok(card)
}
