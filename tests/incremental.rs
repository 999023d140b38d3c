//! Incremental re-tagging must always agree with a from-scratch scan
//!
//! Random insert/delete sequences are driven by a seeded RNG so failures
//! reproduce; each edit is checked against a full tokenization.

mod common;

use common::{assert_matches_full_scan, doc, large_document, runs};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use texwriter::model::LatexDocument;
use texwriter::syntax::TagKind;

/// Fragments that exercise every token boundary rule
const FRAGMENTS: &[&str] = &[
    "\\", "\\\\", "%", "$", "$$", "\n", "\n\n", " ", "a", "bc", "\\alpha", "\\%", "\\$", "{",
    "}", "\t", "x_1", "% note\n", "\r\n", "é",
];

fn random_edit(rng: &mut StdRng, d: &mut LatexDocument) -> String {
    let len = d.len_chars();
    if len > 0 && rng.gen_bool(0.4) {
        let start = rng.gen_range(0..len);
        let end = (start + rng.gen_range(1..=4)).min(len);
        d.delete(start..end);
        format!("delete {}..{}", start, end)
    } else {
        let pos = rng.gen_range(0..=len);
        let fragment = FRAGMENTS[rng.gen_range(0..FRAGMENTS.len())];
        d.insert(pos, fragment);
        format!("insert {:?} at {}", fragment, pos)
    }
}

#[test]
fn test_random_edits_from_empty() {
    for seed in 0..40u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut d = LatexDocument::new();
        for step in 0..150 {
            let edit = random_edit(&mut rng, &mut d);
            assert_matches_full_scan(&d, &format!("seed {} step {} ({})", seed, step, edit));
        }
    }
}

#[test]
fn test_random_edits_in_real_document() {
    let text = large_document(6);
    for seed in 100..120u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut d = doc(&text);
        for step in 0..80 {
            let edit = random_edit(&mut rng, &mut d);
            assert_matches_full_scan(&d, &format!("seed {} step {} ({})", seed, step, edit));
        }
    }
}

#[test]
fn test_random_replacements() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut d = doc(&large_document(3));
    for step in 0..100 {
        let len = d.len_chars();
        let start = rng.gen_range(0..=len);
        let end = (start + rng.gen_range(0..6)).min(len);
        let fragment = FRAGMENTS[rng.gen_range(0..FRAGMENTS.len())];
        d.replace(start..end, fragment);
        assert_matches_full_scan(&d, &format!("step {} replace {}..{}", step, start, end));
    }
}

// ========================================================================
// Targeted edits
// ========================================================================

#[test]
fn test_deleting_percent_restores_commands() {
    let mut d = doc("a % \\b \\c\n\\d");
    d.delete(2..3);
    assert_eq!(runs(&d, TagKind::Comment), Vec::<std::ops::Range<usize>>::new());
    assert_eq!(runs(&d, TagKind::Command), vec![3..5, 6..8, 9..11]);
    assert_matches_full_scan(&d, "delete percent");
}

#[test]
fn test_deleting_line_break_merges_comment() {
    let mut d = doc("% a\n\\b c");
    d.delete(3..4);
    assert_eq!(runs(&d, TagKind::Comment), vec![0..7]);
    assert!(runs(&d, TagKind::Command).is_empty());
}

#[test]
fn test_inserting_line_break_ends_comment() {
    let mut d = doc("% a \\b c");
    d.insert(4, "\n");
    assert_eq!(runs(&d, TagKind::Comment), vec![0..5]);
    assert_eq!(runs(&d, TagKind::Command), vec![5..7]);
}

#[test]
fn test_deleting_blank_line_joins_math() {
    let mut d = doc("$a\n\nb$");
    assert!(runs(&d, TagKind::InlineMath).is_empty());
    d.delete(3..4);
    assert_eq!(runs(&d, TagKind::InlineMath), vec![0..5]);
}

#[test]
fn test_inserting_blank_line_splits_math() {
    let mut d = doc("$a\nb$ c");
    d.insert(3, "\n");
    assert!(runs(&d, TagKind::InlineMath).is_empty());
    assert_eq!(d.tokenizer().state().inline_math_start, Some(5));
}

#[test]
fn test_inserting_dollar_reflows_paragraph_only() {
    let mut d = doc("$a$ $b$\n\n$c$");
    d.insert(0, "$");
    assert_eq!(runs(&d, TagKind::InlineMath), vec![3..6, 10..13]);
    assert_matches_full_scan(&d, "leading dollar");
}

#[test]
fn test_escaping_dollar_by_inserting_backslash() {
    let mut d = doc("$x$ y$");
    d.insert(0, "\\");
    assert_eq!(runs(&d, TagKind::Command), vec![0..2]);
    assert_eq!(runs(&d, TagKind::InlineMath), vec![3..7]);
}

#[test]
fn test_delete_whole_document() {
    let mut d = doc(&large_document(2));
    let len = d.len_chars();
    d.delete(0..len);
    assert!(d.spans().is_empty());
    assert_eq!(d.len_chars(), 0);
}

// ========================================================================
// Re-scan cost
// ========================================================================

fn char_offset_of_nth(text: &str, needle: &str, n: usize) -> usize {
    let byte = text
        .match_indices(needle)
        .nth(n)
        .map(|(byte, _)| byte)
        .expect("needle occurs often enough");
    text[..byte].chars().count()
}

#[test]
fn test_single_char_insert_scans_locally() {
    let text = large_document(200);
    let mut d = doc(&text);
    let pos = char_offset_of_nth(&text, "hold.", 100) + 2;

    let stats = d.insert(pos, "q");
    assert_eq!(stats.tokens_scanned, 1);
    assert_eq!(stats.chars_scanned, 1);
    assert!(stats.math_chars() < 200, "math window {}", stats.math_chars());
    assert_matches_full_scan(&d, "local insert");
}

#[test]
fn test_math_window_covers_whole_unbroken_paragraph() {
    let text = "Line $x$ with \\emph{math}.\n".repeat(500);
    let mut d = doc(&text);
    let pos = char_offset_of_nth(&text, "with", 250);

    let stats = d.insert(pos, "q");
    assert_eq!(stats.chars_scanned, 1);
    assert_eq!(stats.math_start, 0);
    assert_eq!(stats.math_end, d.len_chars());
    assert_eq!(stats.math_chars(), text.chars().count() + 1);
    assert_matches_full_scan(&d, "unbroken paragraph");
}

#[test]
fn test_insert_inside_command_rescans_that_command() {
    let text = large_document(200);
    let mut d = doc(&text);
    let start = char_offset_of_nth(&text, "\\emph", 100);

    let stats = d.insert(start + 3, "q");
    assert_eq!(stats.scan_start, start);
    assert_eq!(stats.tokens_scanned, 1);
    assert_eq!(stats.chars_scanned, "\\emqph".len());
    assert_matches_full_scan(&d, "insert inside command");
}
