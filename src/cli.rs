//! Command-line argument parsing
//!
//! Supports:
//! - Highlighting a file as ANSI text, JSON, or a plain span list
//! - Replaying a file through the incremental hooks
//! - Listing themes and persisting the selected one
//! - Config path override and verbosity

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::render::OutputFormat;

/// Incremental LaTeX syntax highlighter
#[derive(Parser, Debug)]
#[command(
    name = "texwriter",
    version,
    about = "Incremental LaTeX syntax highlighter"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Read configuration from this file instead of ~/.config/texwriter/config.yaml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Tokenize a file and print it
    Highlight {
        /// LaTeX source file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Ansi)]
        format: OutputFormat,

        /// Theme id (overrides the configured theme)
        #[arg(short, long, value_name = "ID")]
        theme: Option<String>,
    },
    /// Re-type a file through the edit hooks and compare with a full scan
    Replay {
        /// LaTeX source file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Characters inserted per edit
        #[arg(short, long, value_name = "N", default_value_t = 1)]
        chunk: usize,
    },
    /// List available themes, or select one and save it to the config file
    Themes {
        /// Theme id to store as the configured theme
        #[arg(long, value_name = "ID")]
        set: Option<String>,
    },
}

/// What to do, validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Highlight {
        file: PathBuf,
        format: OutputFormat,
        theme: Option<String>,
    },
    Replay {
        file: PathBuf,
        chunk: usize,
    },
    Themes {
        set: Option<String>,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub action: Action,
    pub config_path: Option<PathBuf>,
    pub verbosity: u8,
}

impl CliArgs {
    /// Convert parsed CLI args into a run configuration
    pub fn into_config(self) -> Result<RunConfig, String> {
        let action = match self.command {
            Command::Highlight {
                file,
                format,
                theme,
            } => {
                if theme.as_deref().is_some_and(|id| id.trim().is_empty()) {
                    return Err("Theme id must not be empty".to_string());
                }
                Action::Highlight {
                    file,
                    format,
                    theme,
                }
            }
            Command::Replay { file, chunk } => {
                if chunk == 0 {
                    return Err("Chunk size must be at least 1".to_string());
                }
                Action::Replay { file, chunk }
            }
            Command::Themes { set } => {
                if set.as_deref().is_some_and(|id| id.trim().is_empty()) {
                    return Err("Theme id must not be empty".to_string());
                }
                Action::Themes { set }
            }
        };

        Ok(RunConfig {
            action,
            config_path: self.config,
            verbosity: self.verbose,
        })
    }
}
