//! Tag categories produced by the tokenizer
//!
//! Defines the four lexical categories, their styles, and the span type
//! handed to renderers.

use std::ops::Range;

use serde::Serialize;

use crate::theme::Color;

/// Tag names as registered with a document.
/// Index into this array is `TagKind as usize`.
pub const TAG_NAMES: &[&str] = &[
    "command",     // \alpha, \%, "\ "
    "newline",     // \\
    "comment",     // % ... end of line
    "inline-math", // $...$
];

/// Lexical category of a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagKind {
    Command,
    Newline,
    Comment,
    InlineMath,
}

impl TagKind {
    pub const ALL: [TagKind; 4] = [
        TagKind::Command,
        TagKind::Newline,
        TagKind::Comment,
        TagKind::InlineMath,
    ];

    /// Categories that are mutually exclusive per character.
    /// Inline math is a background and may overlap any of them.
    pub const FOREGROUND: [TagKind; 3] = [TagKind::Command, TagKind::Newline, TagKind::Comment];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        TAG_NAMES[self.index()]
    }

    pub fn is_foreground(self) -> bool {
        !matches!(self, TagKind::InlineMath)
    }

    /// Look up a kind by its registered name
    pub fn from_name(name: &str) -> Option<Self> {
        TAG_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|idx| Self::ALL[idx])
    }
}

impl std::fmt::Display for TagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A tagged half-open character range
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TagSpan {
    pub kind: TagKind,
    /// Start offset in chars (inclusive)
    pub start: usize,
    /// End offset in chars (exclusive)
    pub end: usize,
}

impl TagSpan {
    pub fn new(kind: TagKind, range: Range<usize>) -> Self {
        Self {
            kind,
            start: range.start,
            end: range.end,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Visual style of one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagStyle {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
}

impl TagStyle {
    pub const fn foreground(color: Color) -> Self {
        Self {
            foreground: Some(color),
            background: None,
        }
    }

    pub const fn background(color: Color) -> Self {
        Self {
            foreground: None,
            background: Some(color),
        }
    }
}

/// One style per category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxStyles {
    pub command: TagStyle,
    pub newline: TagStyle,
    pub comment: TagStyle,
    pub inline_math: TagStyle,
}

impl SyntaxStyles {
    /// Green commands and line breaks, gray comments, light-gray math background
    pub const fn reference() -> Self {
        const GREEN: Color = Color::rgb(0x00, 0x80, 0x00);
        const GRAY: Color = Color::rgb(0x80, 0x80, 0x80);
        const LIGHT_GRAY: Color = Color::rgb(0xD3, 0xD3, 0xD3);
        Self {
            command: TagStyle::foreground(GREEN),
            newline: TagStyle::foreground(GREEN),
            comment: TagStyle::foreground(GRAY),
            inline_math: TagStyle::background(LIGHT_GRAY),
        }
    }

    pub fn get(&self, kind: TagKind) -> TagStyle {
        match kind {
            TagKind::Command => self.command,
            TagKind::Newline => self.newline,
            TagKind::Comment => self.comment,
            TagKind::InlineMath => self.inline_math,
        }
    }
}

impl Default for SyntaxStyles {
    fn default() -> Self {
        Self::reference()
    }
}
