//! LaTeX syntax highlighting
//!
//! Provides incremental LaTeX tokenizing with:
//! - Language detection from file extensions
//! - A document trait the tokenizer reads and tags through
//! - Edit hooks that re-tag only the text an edit can affect
//!
//! ## Architecture
//!
//! ```text
//! Document Edit → on_before_* (capture ParserState, place mark)
//!              → text mutation
//!              → on_after_* → reparse → foreground pass + inline-math pass
//! ```

mod document;
mod languages;
mod tags;
mod tokenizer;

pub use document::{MarkId, TagToggles, TextDocument};
pub use languages::LanguageId;
pub use tags::{SyntaxStyles, TagKind, TagSpan, TagStyle, TAG_NAMES};
pub use tokenizer::{IncrementalLatexTokenizer, ParserState, ReparseStats};
