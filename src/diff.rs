//! Unified diffs between original and rewritten text.
//!
//! Identical inputs produce an empty string: no headers and no hunks.

use similar::{Algorithm, ChangeTag, TextDiff};
use std::fmt::Write;
use std::ops::AddAssign;
use thiserror::Error;

/// Lines of unchanged context around each change.
pub const CONTEXT_LINES: usize = 3;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("failed to render unified diff: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Compute a unified diff with `--- original_path` / `+++ modified_path`
/// headers and [`CONTEXT_LINES`] of context.
pub fn diff(
    original_path: &str,
    original: &str,
    modified_path: &str,
    modified: &str,
) -> Result<String, DiffError> {
    let text_diff = line_diff(original, modified);
    let mut unified = text_diff.unified_diff();
    unified
        .context_radius(CONTEXT_LINES)
        .header(original_path, modified_path);

    let mut out = String::new();
    write!(out, "{unified}")?;
    Ok(out)
}

/// Summary counts of a line diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub insertions: usize,
    pub deletions: usize,
    pub hunks: usize,
}

impl DiffStats {
    pub fn is_empty(&self) -> bool {
        self.insertions == 0 && self.deletions == 0
    }
}

impl AddAssign for DiffStats {
    fn add_assign(&mut self, other: Self) {
        self.insertions += other.insertions;
        self.deletions += other.deletions;
        self.hunks += other.hunks;
    }
}

pub fn diff_stats(original: &str, modified: &str) -> DiffStats {
    let text_diff = line_diff(original, modified);
    let mut stats = DiffStats {
        hunks: text_diff.grouped_ops(CONTEXT_LINES).len(),
        ..DiffStats::default()
    };
    for change in text_diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => stats.insertions += 1,
            ChangeTag::Delete => stats.deletions += 1,
            ChangeTag::Equal => {}
        }
    }
    stats
}

fn line_diff<'a>(original: &'a str, modified: &'a str) -> TextDiff<'a, 'a, 'a, str> {
    TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_lines(original, modified)
}
