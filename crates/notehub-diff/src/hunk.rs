use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::line::{Diff, DiffLine, LineKind};

/// A context-bounded region of a diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hunk {
    /// First original line covered (the preceding line when the hunk only
    /// inserts).
    pub original_start: usize,
    /// Number of original lines covered.
    pub original_len: usize,
    /// First updated line covered.
    pub new_start: usize,
    /// Number of updated lines covered.
    pub new_len: usize,
    /// Lines of the hunk, context included.
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    /// Unified-style header, e.g. `@@ -3,5 +3,6 @@`.
    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.original_start, self.original_len, self.new_start, self.new_len
        )
    }

    /// Header followed by one prefixed row per line.
    pub fn render(&self) -> String {
        let mut out = self.header();
        out.push('\n');
        for line in &self.lines {
            let marker = match line.kind {
                LineKind::Common => ' ',
                LineKind::Added => '+',
                LineKind::Deleted => '-',
            };
            let _ = writeln!(out, "{marker}{}", line.text);
        }
        out
    }
}

/// Partial view of `diff`: each run of changes with up to `context`
/// unchanged lines on either side. Runs whose context windows touch are
/// merged into one hunk; common lines outside every window are omitted, so
/// identical texts produce no hunks at all.
pub fn hunks(diff: &Diff, context: usize) -> Vec<Hunk> {
    let lines = diff.lines();
    let changes: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.is_change())
        .map(|(i, _)| i)
        .collect();
    if changes.is_empty() {
        return Vec::new();
    }

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for &idx in &changes {
        let start = idx.saturating_sub(context);
        let end = (idx + context).min(lines.len() - 1);
        match ranges.last_mut() {
            Some((_, last_end)) if start <= *last_end + 1 => *last_end = end.max(*last_end),
            _ => ranges.push((start, end)),
        }
    }

    // Lines of each side consumed before index i.
    let mut original_before = Vec::with_capacity(lines.len() + 1);
    let mut new_before = Vec::with_capacity(lines.len() + 1);
    let (mut o, mut n) = (0usize, 0usize);
    for line in lines {
        original_before.push(o);
        new_before.push(n);
        if line.original_line_number.is_some() {
            o += 1;
        }
        if line.new_line_number.is_some() {
            n += 1;
        }
    }

    ranges
        .into_iter()
        .map(|(start, end)| {
            let slice = &lines[start..=end];
            let original_len = slice.iter().filter(|l| l.original_line_number.is_some()).count();
            let new_len = slice.iter().filter(|l| l.new_line_number.is_some()).count();
            Hunk {
                original_start: original_before[start] + usize::from(original_len > 0),
                original_len,
                new_start: new_before[start] + usize::from(new_len > 0),
                new_len,
                lines: slice.to_vec(),
            }
        })
        .collect()
}
