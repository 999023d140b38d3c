//! texwriter - incremental LaTeX syntax highlighting
//!
//! This crate provides a tokenizer that tags LaTeX commands, line breaks,
//! comments and inline math in a mutable document, re-scanning only the
//! text each edit can affect.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod model;
pub mod render;
pub mod replay;
pub mod syntax;
pub mod theme;
pub mod tracing;
pub mod util;

// Re-export commonly used types
pub use config::EditorConfig;
pub use model::{LatexBuffer, LatexDocument};
pub use syntax::{IncrementalLatexTokenizer, ParserState, ReparseStats, TagKind, TextDocument};
pub use theme::Theme;
