//! Document model - a tagged LaTeX buffer and its file state
//!
//! `LatexDocument` is the host side of the edit protocol: every mutation is
//! bracketed by the tokenizer's before/after hooks so tags stay current.

use std::ops::Range;
use std::path::{Path, PathBuf};

use super::buffer::LatexBuffer;
use crate::syntax::{
    IncrementalLatexTokenizer, LanguageId, ReparseStats, SyntaxStyles, TagKind, TagSpan,
    TextDocument,
};
use crate::util::{read_text_file, FileOpenError};

#[derive(Debug)]
pub struct LatexDocument {
    /// The tagged text
    pub buffer: LatexBuffer,
    tokenizer: IncrementalLatexTokenizer,
    /// Path to the file on disk (None for new/unsaved documents)
    pub file_path: Option<PathBuf>,
    /// Whether the buffer has changed since it was loaded
    pub is_modified: bool,
    /// Incremented on each edit
    pub revision: u64,
    pub language: LanguageId,
}

impl LatexDocument {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::with_styles("", &SyntaxStyles::default())
    }

    /// Create a document with initial text, fully tokenized
    pub fn with_text(text: &str) -> Self {
        Self::with_styles(text, &SyntaxStyles::default())
    }

    pub fn with_styles(text: &str, styles: &SyntaxStyles) -> Self {
        let mut buffer = LatexBuffer::with_text(text);
        let mut tokenizer = IncrementalLatexTokenizer::new(&mut buffer, styles);
        tokenizer.tokenize(&mut buffer);
        Self {
            buffer,
            tokenizer,
            file_path: None,
            is_modified: false,
            revision: 0,
            language: LanguageId::Latex,
        }
    }

    /// Load a document from a file path
    pub fn from_file(path: &Path, styles: &SyntaxStyles) -> Result<Self, FileOpenError> {
        let content = read_text_file(path)?;
        let mut doc = Self::with_styles(&content, styles);
        doc.language = LanguageId::from_path(path);
        doc.file_path = Some(path.to_path_buf());
        tracing::info!(
            path = %path.display(),
            chars = doc.len_chars(),
            language = doc.language.display_name(),
            "loaded document"
        );
        Ok(doc)
    }

    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    pub fn text(&self) -> String {
        self.buffer.contents()
    }

    /// All tag runs ordered by start, then category
    pub fn spans(&self) -> Vec<TagSpan> {
        self.buffer.spans()
    }

    pub fn tag_runs(&self, kind: TagKind) -> &[Range<usize>] {
        self.buffer.tag_runs(kind)
    }

    pub fn tokenizer(&self) -> &IncrementalLatexTokenizer {
        &self.tokenizer
    }

    /// Insert `text` at char offset `pos` and re-tag around it
    pub fn insert(&mut self, pos: usize, text: &str) -> ReparseStats {
        let pos = pos.min(self.buffer.len_chars());
        self.tokenizer
            .on_before_insert(&mut self.buffer, pos, text);
        let end = self.buffer.insert(pos, text);
        self.touch();
        self.tokenizer.on_after_insert(&mut self.buffer, end)
    }

    /// Delete the chars in `range` and re-tag around it
    pub fn delete(&mut self, range: Range<usize>) -> ReparseStats {
        let len = self.buffer.len_chars();
        let end = range.end.min(len);
        let start = range.start.min(end);
        if start == end {
            return ReparseStats::default();
        }
        self.tokenizer
            .on_before_delete(&mut self.buffer, start, end);
        self.buffer.remove(start..end);
        self.touch();
        self.tokenizer.on_after_delete(&mut self.buffer, start)
    }

    /// Replace `range` with `text`; returns the stats of the insertion pass
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> ReparseStats {
        let start = range.start;
        self.delete(range);
        self.insert(start, text)
    }

    fn touch(&mut self) {
        self.is_modified = true;
        self.revision += 1;
    }

    /// Get the display name for this document (filename or "Untitled")
    pub fn display_name(&self) -> String {
        self.file_path
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("Untitled")
            .to_string()
    }
}

impl Default for LatexDocument {
    fn default() -> Self {
        Self::new()
    }
}
