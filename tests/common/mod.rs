//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::ops::Range;

use texwriter::model::LatexDocument;
use texwriter::syntax::{TagKind, TagSpan};

/// Build a fully tokenized document
pub fn doc(text: &str) -> LatexDocument {
    LatexDocument::with_text(text)
}

/// The runs of `kind` as plain ranges
pub fn runs(doc: &LatexDocument, kind: TagKind) -> Vec<Range<usize>> {
    doc.tag_runs(kind).to_vec()
}

/// The text under every run of `kind`
pub fn tagged_text(doc: &LatexDocument, kind: TagKind) -> Vec<String> {
    doc.tag_runs(kind)
        .iter()
        .map(|run| doc.buffer.slice_to_string(run.clone()))
        .collect()
}

/// Spans a from-scratch tokenization of the same text produces
pub fn full_scan_spans(doc: &LatexDocument) -> Vec<TagSpan> {
    LatexDocument::with_text(&doc.text()).spans()
}

/// Assert the incrementally maintained tags equal a full scan
pub fn assert_matches_full_scan(doc: &LatexDocument, context: &str) {
    let expected = full_scan_spans(doc);
    let actual = doc.spans();
    assert_eq!(
        actual,
        expected,
        "{}: incremental tags diverged for text {:?}",
        context,
        doc.text()
    );
}

/// Type `text` one character at a time at the end of `doc`
pub fn type_text(doc: &mut LatexDocument, text: &str) {
    for ch in text.chars() {
        let mut buf = [0u8; 4];
        doc.insert(doc.len_chars(), ch.encode_utf8(&mut buf));
    }
}

/// A multi-paragraph document of roughly `paragraphs * 120` characters
pub fn large_document(paragraphs: usize) -> String {
    let mut text = String::from("\\documentclass{article}\n\\begin{document}\n\n");
    for i in 0..paragraphs {
        text.push_str(&format!(
            "\\section{{Part {i}}} % section {i}\n\
             Let $x_{i} \\in X$ and $$y = {i}$$ hold.\\\\\n\
             Escaped \\% and \\$ signs, then \\emph{{text}}.\n\n"
        ));
    }
    text.push_str("\\end{document}\n");
    text
}
