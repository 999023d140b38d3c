//! Re-typing a document through the edit hooks
//!
//! `replay` appends a source text to an empty document a few characters at
//! a time, the way an editor sees it typed, then checks the incrementally
//! maintained tags against a from-scratch tokenization.

use crate::model::LatexDocument;
use crate::syntax::{ReparseStats, SyntaxStyles, TagSpan};

/// Aggregated cost and outcome of a replay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub edits: usize,
    pub chars: usize,
    pub tokens_scanned: usize,
    pub chars_scanned: usize,
    /// Largest single foreground rescan
    pub max_chars_scanned: usize,
    pub math_chars_scanned: usize,
    /// Spans the incremental result has that a full scan does not, and vice versa
    pub mismatch: Option<SpanMismatch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanMismatch {
    pub incremental_only: Vec<TagSpan>,
    pub full_only: Vec<TagSpan>,
}

impl ReplayReport {
    pub fn is_consistent(&self) -> bool {
        self.mismatch.is_none()
    }

    fn record(&mut self, stats: &ReparseStats) {
        self.edits += 1;
        self.tokens_scanned += stats.tokens_scanned;
        self.chars_scanned += stats.chars_scanned;
        self.max_chars_scanned = self.max_chars_scanned.max(stats.chars_scanned);
        self.math_chars_scanned += stats.math_chars();
    }
}

/// Type `text` into an empty document `chunk` characters at a time
pub fn replay(text: &str, chunk: usize, styles: &SyntaxStyles) -> ReplayReport {
    let chunk = chunk.max(1);
    let mut doc = LatexDocument::with_styles("", styles);
    let mut report = ReplayReport::default();

    let chars: Vec<char> = text.chars().collect();
    for piece in chars.chunks(chunk) {
        let piece: String = piece.iter().collect();
        let stats = doc.insert(doc.len_chars(), &piece);
        report.record(&stats);
    }
    report.chars = chars.len();

    let incremental = doc.spans();
    let full = LatexDocument::with_styles(text, styles).spans();
    if incremental != full {
        let incremental_only: Vec<TagSpan> = incremental
            .iter()
            .filter(|span| !full.contains(span))
            .cloned()
            .collect();
        let full_only: Vec<TagSpan> = full
            .iter()
            .filter(|span| !incremental.contains(span))
            .cloned()
            .collect();
        tracing::error!(
            incremental = incremental_only.len(),
            full = full_only.len(),
            "incremental tags diverged from a full scan"
        );
        report.mismatch = Some(SpanMismatch {
            incremental_only,
            full_only,
        });
    }

    tracing::debug!(
        edits = report.edits,
        chars_scanned = report.chars_scanned,
        max_chars_scanned = report.max_chars_scanned,
        "replay finished"
    );
    report
}
