//! The document interface the tokenizer annotates
//!
//! The tokenizer never owns text. It reads characters, places marks, and
//! applies tags through this trait; `model::LatexBuffer` is the concrete
//! implementation.

use std::ops::Range;

use super::tags::{TagKind, TagStyle};

/// Handle to a stable position that moves with edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkId(pub u64);

/// Tags found at a single position
///
/// Mirrors a text widget's view of tag toggles: a tag is *toggled on* at the
/// first character of a run, *toggled off* just after its last character, and
/// *active* on every other character inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagToggles {
    pub toggled_on: Vec<TagKind>,
    pub toggled_off: Vec<TagKind>,
    /// Runs covering the position that do not start there
    pub active: Vec<TagKind>,
}

impl TagToggles {
    pub fn is_toggled_on(&self, kind: TagKind) -> bool {
        self.toggled_on.contains(&kind)
    }

    pub fn is_toggled_off(&self, kind: TagKind) -> bool {
        self.toggled_off.contains(&kind)
    }

    pub fn is_active(&self, kind: TagKind) -> bool {
        self.active.contains(&kind)
    }
}

/// A mutable character sequence that can carry tags and marks
///
/// Positions are char offsets. Implementations must keep tag runs coalesced:
/// two applications of the same kind that touch or overlap form one run.
pub trait TextDocument {
    fn len_chars(&self) -> usize;

    /// Character at `pos`, or `None` at/after the end
    fn char_at(&self, pos: usize) -> Option<char>;

    fn create_mark(&mut self, pos: usize, left_gravity: bool) -> MarkId;

    fn mark_position(&self, mark: MarkId) -> Option<usize>;

    fn delete_mark(&mut self, mark: MarkId);

    /// Declare a category and its style before first use
    fn register_tag(&mut self, kind: TagKind, style: TagStyle);

    fn apply_tag(&mut self, kind: TagKind, range: Range<usize>);

    fn remove_tag(&mut self, kind: TagKind, range: Range<usize>);

    /// The run of `kind` covering `pos`, if any
    fn tag_run_at(&self, kind: TagKind, pos: usize) -> Option<Range<usize>>;

    fn tags_at(&self, pos: usize) -> TagToggles {
        let mut toggles = TagToggles::default();
        for kind in TagKind::ALL {
            if let Some(run) = self.tag_run_at(kind, pos) {
                if run.start == pos {
                    toggles.toggled_on.push(kind);
                } else {
                    toggles.active.push(kind);
                }
            }
            if let Some(prev) = pos.checked_sub(1) {
                if self.tag_run_at(kind, prev).is_some_and(|run| run.end == pos) {
                    toggles.toggled_off.push(kind);
                }
            }
        }
        toggles
    }

    /// The foreground run (command, newline or comment) covering `pos`
    fn foreground_run_at(&self, pos: usize) -> Option<(TagKind, Range<usize>)> {
        TagKind::FOREGROUND
            .into_iter()
            .find_map(|kind| self.tag_run_at(kind, pos).map(|run| (kind, run)))
    }

    fn forward_chars(&self, pos: usize, count: usize) -> usize {
        pos.saturating_add(count).min(self.len_chars())
    }

    /// Position of the `\n` ending the line at `pos`, or the document end
    fn forward_to_line_end(&self, pos: usize) -> usize {
        let mut it = pos;
        while let Some(ch) = self.char_at(it) {
            if ch == '\n' {
                return it;
            }
            it += 1;
        }
        self.len_chars()
    }

    /// End of the ASCII letter run starting at `pos`
    fn forward_word_end(&self, pos: usize) -> usize {
        let mut it = pos;
        while self.char_at(it).is_some_and(|ch| ch.is_ascii_alphabetic()) {
            it += 1;
        }
        it
    }

    /// Start of the line containing `pos`
    fn line_start(&self, pos: usize) -> usize {
        let mut it = pos.min(self.len_chars());
        while it > 0 && self.char_at(it - 1) != Some('\n') {
            it -= 1;
        }
        it
    }

    fn is_line_start(&self, pos: usize) -> bool {
        pos == 0 || self.char_at(pos - 1) == Some('\n')
    }

    /// Whether the line starting at `line_start` holds only spaces, tabs and
    /// carriage returns
    fn is_blank_line(&self, line_start: usize) -> bool {
        let mut it = line_start;
        loop {
            match self.char_at(it) {
                None | Some('\n') => return true,
                Some(' ' | '\t' | '\r') => it += 1,
                Some(_) => return false,
            }
        }
    }
}
