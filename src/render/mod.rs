//! Output of tagged documents: ANSI-colored text, JSON, or a plain span list

pub mod ansi;
pub mod json;

use clap::ValueEnum;

/// Output format for `texwriter highlight`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Source text colored with ANSI escape sequences
    #[default]
    Ansi,
    /// JSON object listing every tag run
    Json,
    /// One tag run per line
    Plain,
}
