//! Rope-backed text buffer carrying tags and marks
//!
//! `LatexBuffer` is the `TextDocument` the tokenizer annotates. Text lives in
//! a `ropey::Rope`; tags live in a `TagTable` and marks in a map keyed by
//! `MarkId`. Every mutation shifts both so they stay attached to the same
//! characters.
//!
//! Lines are split on `\n` only, so the rope's own line APIs (which also
//! break on `\r` and Unicode separators) are not used here.

use std::collections::HashMap;
use std::ops::Range;

use ropey::Rope;

use super::tag_table::TagTable;
use crate::syntax::{MarkId, TagKind, TagSpan, TagStyle, TextDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Mark {
    pos: usize,
    /// Stays put when text is inserted exactly at its position
    left_gravity: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LatexBuffer {
    text: Rope,
    tags: TagTable,
    styles: [Option<TagStyle>; 4],
    marks: HashMap<MarkId, Mark>,
    next_mark: u64,
}

impl LatexBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            text: Rope::from_str(text),
            ..Self::default()
        }
    }

    pub fn contents(&self) -> String {
        self.text.to_string()
    }

    pub fn slice_to_string(&self, range: Range<usize>) -> String {
        let range = self.clamp(range);
        self.text.slice(range).to_string()
    }

    /// Number of `\n`-separated lines
    pub fn line_count(&self) -> usize {
        self.text.chars().filter(|&ch| ch == '\n').count() + 1
    }

    fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let len = self.text.len_chars();
        let end = range.end.min(len);
        range.start.min(end)..end
    }

    /// Splice `text` in at `pos`, returning the position just after it
    pub fn insert(&mut self, pos: usize, text: &str) -> usize {
        let pos = pos.min(self.text.len_chars());
        let added = text.chars().count();
        if added == 0 {
            return pos;
        }
        self.text.insert(pos, text);
        self.tags.shift_for_insert(pos, added);
        for mark in self.marks.values_mut() {
            if mark.pos > pos || (mark.pos == pos && !mark.left_gravity) {
                mark.pos += added;
            }
        }
        pos + added
    }

    /// Remove `range`; marks inside it collapse to its start
    pub fn remove(&mut self, range: Range<usize>) {
        let range = self.clamp(range);
        if range.is_empty() {
            return;
        }
        let removed = range.end - range.start;
        self.text.remove(range.clone());
        self.tags.shift_for_delete(range.clone());
        for mark in self.marks.values_mut() {
            if mark.pos >= range.end {
                mark.pos -= removed;
            } else if mark.pos > range.start {
                mark.pos = range.start;
            }
        }
    }

    pub fn tag_runs(&self, kind: TagKind) -> &[Range<usize>] {
        self.tags.runs(kind).as_slice()
    }

    /// All tag runs ordered by start, then category
    pub fn spans(&self) -> Vec<TagSpan> {
        self.tags.spans()
    }

    pub fn is_registered(&self, kind: TagKind) -> bool {
        self.styles[kind.index()].is_some()
    }

    pub fn mark_count(&self) -> usize {
        self.marks.len()
    }
}

impl TextDocument for LatexBuffer {
    fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.text.get_char(pos)
    }

    fn create_mark(&mut self, pos: usize, left_gravity: bool) -> MarkId {
        let id = MarkId(self.next_mark);
        self.next_mark += 1;
        let pos = pos.min(self.text.len_chars());
        self.marks.insert(id, Mark { pos, left_gravity });
        id
    }

    fn mark_position(&self, mark: MarkId) -> Option<usize> {
        self.marks.get(&mark).map(|m| m.pos)
    }

    fn delete_mark(&mut self, mark: MarkId) {
        self.marks.remove(&mark);
    }

    fn register_tag(&mut self, kind: TagKind, style: TagStyle) {
        self.styles[kind.index()] = Some(style);
    }

    fn apply_tag(&mut self, kind: TagKind, range: Range<usize>) {
        if !self.is_registered(kind) {
            tracing::warn!(tag = %kind, "applying unregistered tag ignored");
            return;
        }
        let range = self.clamp(range);
        self.tags.runs_mut(kind).add(range);
    }

    fn remove_tag(&mut self, kind: TagKind, range: Range<usize>) {
        let range = self.clamp(range);
        self.tags.runs_mut(kind).remove(range);
    }

    fn tag_run_at(&self, kind: TagKind, pos: usize) -> Option<Range<usize>> {
        self.tags.runs(kind).run_at(pos)
    }

    fn forward_to_line_end(&self, pos: usize) -> usize {
        let pos = pos.min(self.text.len_chars());
        self.text
            .chars_at(pos)
            .position(|ch| ch == '\n')
            .map_or(self.text.len_chars(), |offset| pos + offset)
    }

    fn line_start(&self, pos: usize) -> usize {
        let mut it = pos.min(self.text.len_chars());
        let mut chars = self.text.chars_at(it);
        while let Some(ch) = chars.prev() {
            if ch == '\n' {
                break;
            }
            it -= 1;
        }
        it
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxStyles;

    fn registered(text: &str) -> LatexBuffer {
        let mut buffer = LatexBuffer::with_text(text);
        let styles = SyntaxStyles::default();
        for kind in TagKind::ALL {
            buffer.register_tag(kind, styles.get(kind));
        }
        buffer
    }

    #[test]
    fn test_insert_returns_end_in_chars() {
        let mut buffer = LatexBuffer::with_text("ab");
        assert_eq!(buffer.insert(1, "αβ"), 3);
        assert_eq!(buffer.contents(), "aαβb");
        assert_eq!(buffer.len_chars(), 4);
    }

    #[test]
    fn test_insert_past_end_appends() {
        let mut buffer = LatexBuffer::with_text("ab");
        assert_eq!(buffer.insert(10, "c"), 3);
        assert_eq!(buffer.contents(), "abc");
    }

    #[test]
    fn test_mark_gravity() {
        let mut buffer = LatexBuffer::with_text("abcd");
        let left = buffer.create_mark(2, true);
        let right = buffer.create_mark(2, false);
        buffer.insert(2, "xy");
        assert_eq!(buffer.mark_position(left), Some(2));
        assert_eq!(buffer.mark_position(right), Some(4));
    }

    #[test]
    fn test_marks_collapse_on_remove() {
        let mut buffer = LatexBuffer::with_text("abcdef");
        let inside = buffer.create_mark(3, true);
        let after = buffer.create_mark(5, true);
        buffer.remove(1..4);
        assert_eq!(buffer.mark_position(inside), Some(1));
        assert_eq!(buffer.mark_position(after), Some(2));
        buffer.delete_mark(inside);
        assert_eq!(buffer.mark_position(inside), None);
        assert_eq!(buffer.mark_count(), 1);
    }

    #[test]
    fn test_unregistered_tag_is_ignored() {
        let mut buffer = LatexBuffer::with_text("\\a");
        buffer.apply_tag(TagKind::Command, 0..2);
        assert!(buffer.tag_runs(TagKind::Command).is_empty());
    }

    #[test]
    fn test_tags_follow_edits() {
        let mut buffer = registered("x \\cmd y");
        buffer.apply_tag(TagKind::Command, 2..6);
        buffer.insert(0, "ab");
        assert_eq!(buffer.tag_runs(TagKind::Command), &[4..8]);
        buffer.remove(0..3);
        assert_eq!(buffer.tag_runs(TagKind::Command), &[1..5]);
    }

    #[test]
    fn test_tags_at_reports_toggles() {
        let mut buffer = registered("\\ab cd");
        buffer.apply_tag(TagKind::Command, 0..3);
        assert!(buffer.tags_at(0).is_toggled_on(TagKind::Command));
        assert!(buffer.tags_at(1).is_active(TagKind::Command));
        let at_end = buffer.tags_at(3);
        assert!(at_end.is_toggled_off(TagKind::Command));
        assert!(at_end.active.is_empty());
    }

    #[test]
    fn test_line_navigation_ignores_carriage_return() {
        let buffer = LatexBuffer::with_text("ab\r\ncd\nef");
        assert_eq!(buffer.forward_to_line_end(0), 3);
        assert_eq!(buffer.forward_to_line_end(4), 6);
        assert_eq!(buffer.forward_to_line_end(7), 9);
        assert_eq!(buffer.line_start(3), 0);
        assert_eq!(buffer.line_start(5), 4);
        assert_eq!(buffer.line_start(9), 7);
        assert_eq!(buffer.line_count(), 3);
    }

    #[test]
    fn test_blank_lines() {
        let buffer = LatexBuffer::with_text("a\n \t\r\nb\n\n");
        assert!(!buffer.is_blank_line(0));
        assert!(buffer.is_blank_line(2));
        assert!(!buffer.is_blank_line(6));
        assert!(buffer.is_blank_line(8));
        assert!(buffer.is_blank_line(9));
    }
}
