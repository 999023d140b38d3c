//! ANSI terminal rendering
//!
//! Paints each character with 24-bit SGR sequences: the foreground color of
//! its command/newline/comment tag and the background of its inline-math tag.
//! Styles are reset before every line break so backgrounds never bleed into
//! the rest of the terminal line.

use std::fmt::Write;

use crate::model::LatexDocument;
use crate::syntax::{SyntaxStyles, TagKind, TagSpan};
use crate::theme::Color;

const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CellStyle {
    foreground: Option<Color>,
    background: Option<Color>,
}

impl CellStyle {
    fn is_plain(&self) -> bool {
        self.foreground.is_none() && self.background.is_none()
    }

    fn write_sgr(&self, out: &mut String) {
        if let Some(c) = self.foreground {
            let _ = write!(out, "\x1b[38;2;{};{};{}m", c.r, c.g, c.b);
        }
        if let Some(c) = self.background {
            let _ = write!(out, "\x1b[48;2;{};{};{}m", c.r, c.g, c.b);
        }
    }
}

/// Per-character styles for `len` characters
fn cell_styles(len: usize, spans: &[TagSpan], styles: &SyntaxStyles) -> Vec<CellStyle> {
    let mut cells = vec![CellStyle::default(); len];
    for span in spans {
        let style = styles.get(span.kind);
        let end = span.end.min(len);
        for cell in &mut cells[span.start.min(end)..end] {
            if span.kind == TagKind::InlineMath {
                cell.background = style.background.or(cell.background);
                cell.foreground = cell.foreground.or(style.foreground);
            } else {
                cell.foreground = style.foreground.or(cell.foreground);
                cell.background = cell.background.or(style.background);
            }
        }
    }
    cells
}

/// Render `text` with `spans` as an ANSI-colored string
pub fn render(text: &str, spans: &[TagSpan], styles: &SyntaxStyles) -> String {
    let len = text.chars().count();
    let cells = cell_styles(len, spans, styles);

    let mut out = String::with_capacity(text.len() * 2);
    let mut current = CellStyle::default();
    for (ch, cell) in text.chars().zip(cells) {
        if ch == '\n' {
            if !current.is_plain() {
                out.push_str(RESET);
                current = CellStyle::default();
            }
            out.push('\n');
            continue;
        }
        if cell != current {
            if !current.is_plain() {
                out.push_str(RESET);
            }
            cell.write_sgr(&mut out);
            current = cell;
        }
        out.push(ch);
    }
    if !current.is_plain() {
        out.push_str(RESET);
    }
    out
}

/// Render a whole document
pub fn render_document(doc: &LatexDocument, styles: &SyntaxStyles) -> String {
    render(&doc.text(), &doc.spans(), styles)
}
