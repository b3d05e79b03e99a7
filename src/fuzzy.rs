//! Approximate matching over one column.
//!
//! Scores are a 0–100 normalized edit-distance ratio over lowercased text:
//! 100 is an identical (case-normalized) string, lower means more edits
//! relative to length. Candidates are rows, not distinct values, so rows
//! sharing an identical cell value all survive together — mapping back by
//! value instead of row identity would silently collapse duplicates.

use std::collections::BTreeSet;

use itertools::Itertools;

use crate::dataset::Column;

/// Similarity of `term` against one cell value, case-normalized.
pub fn score(term: &str, candidate: &str) -> u8 {
    let ratio =
        strsim::normalized_levenshtein(&term.to_lowercase(), &candidate.to_lowercase());
    (ratio * 100.0).round() as u8
}

/// Rows surviving fuzzy selection: the top `limit` non-null candidates by
/// score (ties keep original row order), minus anything scoring strictly
/// below `threshold`. An empty term disables the constraint entirely.
pub fn apply(column: &Column, term: &str, threshold: u8, limit: usize) -> BTreeSet<usize> {
    if term.is_empty() {
        return (0..column.cells.len()).collect();
    }
    column
        .cells
        .iter()
        .enumerate()
        .filter_map(|(row, cell)| cell.as_deref().map(|value| (row, score(term, value))))
        .sorted_by(|a, b| b.1.cmp(&a.1))
        .take(limit)
        .filter(|&(_, value)| value >= threshold)
        .map(|(row, _)| row)
        .collect()
}
