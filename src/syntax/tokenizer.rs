//! Incremental LaTeX tokenizer
//!
//! Classifies LaTeX source into `command`, `newline`, `comment` and
//! `inline-math` runs and keeps those runs current as the document is
//! edited, re-scanning only the region an edit can affect.
//!
//! ## Edit protocol
//!
//! ```text
//! on_before_insert(pos, text) → (host splices text) → on_after_insert(end)
//! on_before_delete(start, end) → (host removes text) → on_after_delete(start)
//! ```
//!
//! ## Windows
//!
//! Foreground tokens never extend past the start of the next line, so the
//! foreground scan restarts at most one token (or one line) before the edit
//! and stops at the first token boundary after it where the existing tags are
//! known to be valid. Inline math pairs `$` delimiters within a paragraph;
//! its window runs from the paragraph break before the edit to the one after.
//!
//! A document with no blank lines is one paragraph, so every edit re-pairs
//! `$` across the whole text. That pass only compares characters and never
//! re-lexes, but its cost is linear in the paragraph length.

use std::ops::Range;

use super::document::{MarkId, TextDocument};
use super::tags::{SyntaxStyles, TagKind, TagSpan};

/// Tokenizer memory carried between the before- and after-hooks of an edit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserState {
    /// The edit lands exactly where a command run ends, so letters typed
    /// there extend the command.
    pub at_command_end: bool,
    /// The edit lands at the end of a comment not closed by `\n`
    /// (a comment running to the end of the document).
    pub at_comment_end: bool,
    /// Foreground category active across the edit position
    pub continuing: Option<TagKind>,
    /// Unmatched `$` left open by the last inline-math window
    pub inline_math_start: Option<usize>,
}

impl ParserState {
    /// Inspect the tags at `pos` before a mutation
    pub fn capture<D: TextDocument + ?Sized>(doc: &D, pos: usize) -> Self {
        let toggles = doc.tags_at(pos);
        let at_comment_end = toggles.is_toggled_off(TagKind::Comment)
            && pos.checked_sub(1).and_then(|prev| doc.char_at(prev)) != Some('\n');
        Self {
            at_command_end: toggles.is_toggled_off(TagKind::Command),
            at_comment_end,
            continuing: toggles
                .active
                .iter()
                .copied()
                .find(|kind| kind.is_foreground()),
            inline_math_start: None,
        }
    }

    /// Whether the next rescan must start before the edit position
    fn wants_resync(&self, kind: TagKind) -> bool {
        let extendable = match kind {
            TagKind::Command => self.at_command_end,
            TagKind::Comment => self.at_comment_end,
            TagKind::Newline | TagKind::InlineMath => false,
        };
        extendable || self.continuing.is_some()
    }
}

/// What one `reparse` call touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReparseStats {
    /// First character re-lexed
    pub scan_start: usize,
    /// One past the last character re-lexed
    pub scan_end: usize,
    pub tokens_scanned: usize,
    pub chars_scanned: usize,
    /// Foreground tags applied
    pub tags_applied: usize,
    /// Inline-math window
    pub math_start: usize,
    pub math_end: usize,
}

impl ReparseStats {
    pub fn math_chars(&self) -> usize {
        self.math_end - self.math_start
    }
}

/// One lexed unit: a tagged token or a single untagged character
struct Lexeme {
    end: usize,
    kind: Option<TagKind>,
}

fn lex_token<D: TextDocument + ?Sized>(doc: &D, it: usize) -> Lexeme {
    match doc.char_at(it) {
        Some('%') => {
            let eol = doc.forward_to_line_end(it);
            Lexeme {
                end: doc.forward_chars(eol, 1),
                kind: Some(TagKind::Comment),
            }
        }
        Some('\\') => match doc.char_at(it + 1) {
            // lone trailing backslash
            None => Lexeme {
                end: it + 1,
                kind: Some(TagKind::Command),
            },
            Some('\\') => Lexeme {
                end: it + 2,
                kind: Some(TagKind::Newline),
            },
            Some(ch) if ch.is_ascii_alphabetic() => Lexeme {
                end: doc.forward_word_end(it + 1),
                kind: Some(TagKind::Command),
            },
            // control symbol, including "\ " and a backslash before a line break
            Some(_) => Lexeme {
                end: it + 2,
                kind: Some(TagKind::Command),
            },
        },
        _ => Lexeme {
            end: it + 1,
            kind: None,
        },
    }
}

/// Mark placed by a before-hook, consumed by the matching after-hook
#[derive(Debug)]
struct PendingEdit {
    mark: MarkId,
    /// Characters after the edit point that belong to a token cut by a deletion
    dirty_tail: usize,
}

/// Keeps LaTeX tag runs consistent with a document across edits
#[derive(Debug, Default)]
pub struct IncrementalLatexTokenizer {
    state: ParserState,
    pending: Option<PendingEdit>,
}

impl IncrementalLatexTokenizer {
    /// Register the tag categories with `doc` and return an idle tokenizer
    pub fn new<D: TextDocument + ?Sized>(doc: &mut D, styles: &SyntaxStyles) -> Self {
        for kind in TagKind::ALL {
            doc.register_tag(kind, styles.get(kind));
        }
        Self::default()
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Call just before `incoming_text` is spliced in at `position`
    pub fn on_before_insert<D: TextDocument + ?Sized>(
        &mut self,
        doc: &mut D,
        position: usize,
        incoming_text: &str,
    ) {
        self.begin_edit(doc, position, 0);
        tracing::trace!(
            position,
            incoming = incoming_text.chars().count(),
            state = ?self.state,
            "before insert"
        );
    }

    /// Call right after the splice; `end_position` follows the inserted text
    pub fn on_after_insert<D: TextDocument + ?Sized>(
        &mut self,
        doc: &mut D,
        end_position: usize,
    ) -> ReparseStats {
        match self.finish_edit(doc) {
            Some((start, _)) => self.reparse(doc, start, end_position),
            None => ReparseStats::default(),
        }
    }

    /// Call just before `start..end` is removed
    pub fn on_before_delete<D: TextDocument + ?Sized>(
        &mut self,
        doc: &mut D,
        start: usize,
        end: usize,
    ) {
        let len = doc.len_chars();
        let start = start.min(len);
        let end = end.clamp(start, len);

        // A token cut by the right edge of the deletion survives only as a
        // fragment; the rescan must cover that fragment.
        let dirty_tail = match end
            .checked_sub(1)
            .filter(|_| end > start)
            .and_then(|last| doc.foreground_run_at(last))
        {
            Some((_, run)) if run.end > end => {
                let line_end = doc.forward_chars(doc.forward_to_line_end(end - 1), 1);
                run.end.min(line_end) - end
            }
            _ => 0,
        };

        self.begin_edit(doc, start, dirty_tail);
        tracing::trace!(start, end, dirty_tail, state = ?self.state, "before delete");
    }

    /// Call right after the removal with the position the range collapsed to
    pub fn on_after_delete<D: TextDocument + ?Sized>(
        &mut self,
        doc: &mut D,
        position: usize,
    ) -> ReparseStats {
        match self.finish_edit(doc) {
            Some((start, dirty_tail)) => {
                if start != position {
                    tracing::warn!(
                        start,
                        position,
                        "after-delete position disagrees with the before-delete mark"
                    );
                }
                self.reparse(doc, start, start + dirty_tail)
            }
            None => ReparseStats::default(),
        }
    }

    fn begin_edit<D: TextDocument + ?Sized>(
        &mut self,
        doc: &mut D,
        position: usize,
        dirty_tail: usize,
    ) {
        if let Some(stale) = self.pending.take() {
            tracing::warn!("before-edit hook fired twice without an after-edit hook");
            doc.delete_mark(stale.mark);
        }
        self.state = ParserState::capture(doc, position);
        let mark = doc.create_mark(position, true);
        self.pending = Some(PendingEdit { mark, dirty_tail });
    }

    fn finish_edit<D: TextDocument + ?Sized>(&mut self, doc: &mut D) -> Option<(usize, usize)> {
        let Some(pending) = self.pending.take() else {
            tracing::error!("after-edit hook fired without a matching before-edit hook");
            return None;
        };
        let start = doc.mark_position(pending.mark);
        doc.delete_mark(pending.mark);
        if start.is_none() {
            tracing::error!(mark = ?pending.mark, "edit start mark vanished");
        }
        start.map(|start| (start, pending.dirty_tail))
    }

    /// Clear every tag and tokenize the whole document from scratch
    pub fn tokenize<D: TextDocument + ?Sized>(&mut self, doc: &mut D) -> ReparseStats {
        let len = doc.len_chars();
        for kind in TagKind::ALL {
            doc.remove_tag(kind, 0..len);
        }
        self.state = ParserState::default();
        let stats = self.reparse(doc, 0, len);
        tracing::debug!(
            len,
            tokens = stats.tokens_scanned,
            tags = stats.tags_applied,
            "full tokenize"
        );
        stats
    }

    /// Re-tag the region affected by text that changed in `range_start..range_end`
    ///
    /// The scan may begin before `range_start` to re-lex a token the edit
    /// touched, and may run past `range_end` to finish a token begun inside
    /// the range or to replace a stale run straddling its end. It never
    /// starts a new token past `range_end` once the existing tags agree.
    pub fn reparse<D: TextDocument + ?Sized>(
        &mut self,
        doc: &mut D,
        range_start: usize,
        range_end: usize,
    ) -> ReparseStats {
        let len = doc.len_chars();
        let range_end = range_end.min(len);
        let range_start = range_start.min(range_end);

        let scan_start = self.resync_start(doc, range_start);
        let mut stats = ReparseStats {
            scan_start,
            ..ReparseStats::default()
        };

        let mut tokens: Vec<TagSpan> = Vec::new();
        let mut it = scan_start;
        while it < len {
            if it >= range_end && Self::converged(doc, it, range_end) {
                break;
            }
            let lexeme = lex_token(doc, it);
            stats.tokens_scanned += 1;
            stats.chars_scanned += lexeme.end - it;
            if let Some(kind) = lexeme.kind {
                tokens.push(TagSpan::new(kind, it..lexeme.end));
            }
            it = lexeme.end;
        }
        stats.scan_end = it;

        if scan_start < it {
            for kind in TagKind::FOREGROUND {
                doc.remove_tag(kind, scan_start..it);
            }
        }
        for token in &tokens {
            doc.apply_tag(token.kind, token.range());
        }
        stats.tags_applied = tokens.len();

        // A command cut off at the end of the range may keep growing
        self.state.at_command_end = tokens
            .last()
            .is_some_and(|token| token.kind == TagKind::Command && token.end == range_end);
        self.state.at_comment_end = false;
        self.state.continuing = None;

        let math = self.retag_inline_math(doc, scan_start, stats.scan_end);
        stats.math_start = math.start;
        stats.math_end = math.end;

        tracing::trace!(
            range_start,
            range_end,
            scan_start,
            scan_end = stats.scan_end,
            tokens = stats.tokens_scanned,
            math_start = stats.math_start,
            math_end = stats.math_end,
            "reparse"
        );
        stats
    }

    /// Where the foreground scan has to begin for an edit at `pos`
    fn resync_start<D: TextDocument + ?Sized>(&self, doc: &D, pos: usize) -> usize {
        let Some(prev) = pos.checked_sub(1) else {
            return pos;
        };
        let Some((kind, run)) = doc.foreground_run_at(prev) else {
            return pos;
        };
        let straddles = run.end > pos;
        if straddles || self.state.wants_resync(kind) {
            // line starts are token boundaries
            run.start.max(doc.line_start(prev))
        } else {
            pos
        }
    }

    /// Whether the tags from `it` onward are still valid
    fn converged<D: TextDocument + ?Sized>(doc: &D, it: usize, range_end: usize) -> bool {
        if it > range_end && doc.is_line_start(it) {
            return true;
        }
        !doc
            .foreground_run_at(it)
            .is_some_and(|(_, run)| run.start < it)
    }

    /// Re-pair `$` delimiters over the paragraphs around `scan_start..scan_end`
    fn retag_inline_math<D: TextDocument + ?Sized>(
        &mut self,
        doc: &mut D,
        scan_start: usize,
        scan_end: usize,
    ) -> Range<usize> {
        let window = Self::math_window(doc, scan_start, scan_end);

        let mut spans = Vec::new();
        let mut pending: Option<usize> = None;
        let mut it = window.start;
        while it < window.end {
            if doc.is_line_start(it) && doc.is_blank_line(it) {
                pending = None;
            }
            if doc.char_at(it) == Some('$') && doc.foreground_run_at(it).is_none() {
                if doc.char_at(it + 1) == Some('$') {
                    // display math delimiter
                    it += 2;
                    continue;
                }
                match pending.take() {
                    Some(open) => spans.push(open..it + 1),
                    None => pending = Some(it),
                }
            }
            it += 1;
        }

        if !window.is_empty() {
            doc.remove_tag(TagKind::InlineMath, window.clone());
        }
        for span in spans {
            doc.apply_tag(TagKind::InlineMath, span);
        }
        self.state.inline_math_start = pending;
        window
    }

    /// From the paragraph break before the line holding `scan_start` to the
    /// first paragraph break wholly after `scan_end`
    fn math_window<D: TextDocument + ?Sized>(
        doc: &D,
        scan_start: usize,
        scan_end: usize,
    ) -> Range<usize> {
        let len = doc.len_chars();

        let mut start = 0;
        let mut line = doc.line_start(scan_start);
        while line > 0 {
            let prev_line = doc.line_start(line - 1);
            if doc.is_blank_line(prev_line) {
                start = prev_line;
                break;
            }
            line = prev_line;
        }

        let mut end = len;
        let mut line_end = doc.forward_to_line_end(scan_end);
        while line_end < len {
            let next_line = line_end + 1;
            if next_line < len && doc.is_blank_line(next_line) {
                end = next_line;
                break;
            }
            line_end = doc.forward_to_line_end(next_line);
        }

        start..end
    }
}
