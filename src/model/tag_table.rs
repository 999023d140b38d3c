//! Per-category tag run storage
//!
//! Each category keeps its runs as a sorted list of disjoint, non-touching
//! char ranges. Applying a tag coalesces with neighbours, removing one splits
//! runs, and text edits shift runs the way a text widget moves tag toggles.

use std::ops::Range;

use crate::syntax::{TagKind, TagSpan};

/// Sorted, disjoint, non-adjacent runs of a single category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRuns {
    runs: Vec<Range<usize>>,
}

impl TagRuns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[Range<usize>] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Tag `range`, merging with every run it overlaps or touches
    pub fn add(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let lo = self.runs.partition_point(|run| run.end < range.start);
        let hi = self.runs.partition_point(|run| run.start <= range.end);
        let mut merged = range;
        if lo < hi {
            merged.start = merged.start.min(self.runs[lo].start);
            merged.end = merged.end.max(self.runs[hi - 1].end);
        }
        self.runs.splice(lo..hi, std::iter::once(merged));
    }

    /// Untag `range`, splitting runs that extend past either side
    pub fn remove(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let lo = self.runs.partition_point(|run| run.end <= range.start);
        let hi = self.runs.partition_point(|run| run.start < range.end);
        if lo >= hi {
            return;
        }
        let first = self.runs[lo].clone();
        let last = self.runs[hi - 1].clone();
        let mut keep = Vec::with_capacity(2);
        if first.start < range.start {
            keep.push(first.start..range.start);
        }
        if last.end > range.end {
            keep.push(range.end..last.end);
        }
        self.runs.splice(lo..hi, keep);
    }

    /// The run covering `pos`
    pub fn run_at(&self, pos: usize) -> Option<Range<usize>> {
        let idx = self.runs.partition_point(|run| run.end <= pos);
        self.runs
            .get(idx)
            .filter(|run| run.start <= pos)
            .cloned()
    }

    /// Make room for `len` chars inserted at `pos`
    ///
    /// Text inserted strictly inside a run joins it; text inserted at either
    /// edge of a run stays outside it.
    pub fn shift_for_insert(&mut self, pos: usize, len: usize) {
        if len == 0 {
            return;
        }
        for run in &mut self.runs {
            if run.start >= pos {
                run.start += len;
                run.end += len;
            } else if run.end > pos {
                run.end += len;
            }
        }
    }

    /// Collapse `range` out of every run
    pub fn shift_for_delete(&mut self, range: Range<usize>) {
        let removed = range.end - range.start;
        if removed == 0 {
            return;
        }
        let map = |pos: usize| {
            if pos <= range.start {
                pos
            } else if pos >= range.end {
                pos - removed
            } else {
                range.start
            }
        };

        let mut shifted: Vec<Range<usize>> = Vec::with_capacity(self.runs.len());
        for run in &self.runs {
            let mapped = map(run.start)..map(run.end);
            if mapped.is_empty() {
                continue;
            }
            match shifted.last_mut() {
                Some(prev) if prev.end >= mapped.start => prev.end = prev.end.max(mapped.end),
                _ => shifted.push(mapped),
            }
        }
        self.runs = shifted;
    }
}

/// Tag runs for every category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagTable {
    runs: [TagRuns; 4],
}

impl TagTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runs(&self, kind: TagKind) -> &TagRuns {
        &self.runs[kind.index()]
    }

    pub fn runs_mut(&mut self, kind: TagKind) -> &mut TagRuns {
        &mut self.runs[kind.index()]
    }

    pub fn shift_for_insert(&mut self, pos: usize, len: usize) {
        for runs in &mut self.runs {
            runs.shift_for_insert(pos, len);
        }
    }

    pub fn shift_for_delete(&mut self, range: Range<usize>) {
        for runs in &mut self.runs {
            runs.shift_for_delete(range.clone());
        }
    }

    /// All runs as spans, ordered by start then category
    pub fn spans(&self) -> Vec<TagSpan> {
        let mut spans: Vec<TagSpan> = TagKind::ALL
            .into_iter()
            .flat_map(|kind| {
                self.runs(kind)
                    .as_slice()
                    .iter()
                    .map(move |run| TagSpan::new(kind, run.clone()))
            })
            .collect();
        spans.sort_by_key(|span| (span.start, span.kind));
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runs_of(ranges: &[Range<usize>]) -> TagRuns {
        let mut runs = TagRuns::new();
        for range in ranges {
            runs.add(range.clone());
        }
        runs
    }

    #[test]
    fn test_add_coalesces_touching_runs() {
        let runs = runs_of(&[0..2, 2..4, 6..8]);
        assert_eq!(runs.as_slice(), &[0..4, 6..8]);
    }

    #[test]
    fn test_add_bridges_multiple_runs() {
        let mut runs = runs_of(&[0..2, 4..5, 7..9]);
        runs.add(1..8);
        assert_eq!(runs.as_slice(), &[0..9]);
    }

    #[test]
    fn test_add_empty_is_noop() {
        let mut runs = runs_of(&[0..2]);
        runs.add(5..5);
        assert_eq!(runs.as_slice(), &[0..2]);
    }

    #[test]
    fn test_remove_splits_run() {
        let mut runs = runs_of(&[0..10]);
        runs.remove(3..5);
        assert_eq!(runs.as_slice(), &[0..3, 5..10]);
    }

    #[test]
    fn test_remove_across_runs() {
        let mut runs = runs_of(&[0..3, 5..7, 9..12]);
        runs.remove(2..10);
        assert_eq!(runs.as_slice(), &[0..2, 10..12]);
    }

    #[test]
    fn test_remove_outside_runs() {
        let mut runs = runs_of(&[0..3, 5..7]);
        runs.remove(3..5);
        assert_eq!(runs.as_slice(), &[0..3, 5..7]);
    }

    #[test]
    fn test_run_at_is_half_open() {
        let runs = runs_of(&[2..4]);
        assert_eq!(runs.run_at(1), None);
        assert_eq!(runs.run_at(2), Some(2..4));
        assert_eq!(runs.run_at(3), Some(2..4));
        assert_eq!(runs.run_at(4), None);
    }

    #[test]
    fn test_insert_inside_extends() {
        let mut runs = runs_of(&[2..6]);
        runs.shift_for_insert(4, 3);
        assert_eq!(runs.as_slice(), &[2..9]);
    }

    #[test]
    fn test_insert_at_edges_stays_outside() {
        let mut runs = runs_of(&[2..6]);
        runs.shift_for_insert(2, 1);
        assert_eq!(runs.as_slice(), &[3..7]);
        runs.shift_for_insert(7, 2);
        assert_eq!(runs.as_slice(), &[3..7]);
    }

    #[test]
    fn test_delete_drops_covered_runs_and_merges() {
        let mut runs = runs_of(&[0..2, 3..4, 5..8]);
        runs.shift_for_delete(2..5);
        assert_eq!(runs.as_slice(), &[0..5]);
    }

    #[test]
    fn test_delete_trims_partial_runs() {
        let mut runs = runs_of(&[1..4, 10..12]);
        runs.shift_for_delete(3..7);
        assert_eq!(runs.as_slice(), &[1..3, 6..8]);

        // remainders that end up touching become one run
        let mut runs = runs_of(&[1..4, 6..9]);
        runs.shift_for_delete(3..7);
        assert_eq!(runs.as_slice(), &[1..5]);
    }

    #[test]
    fn test_table_spans_sorted() {
        let mut table = TagTable::new();
        table.runs_mut(TagKind::InlineMath).add(0..5);
        table.runs_mut(TagKind::Command).add(1..3);
        table.runs_mut(TagKind::Comment).add(6..9);
        let spans = table.spans();
        let kinds: Vec<TagKind> = spans.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![TagKind::InlineMath, TagKind::Command, TagKind::Comment]
        );
    }
}
