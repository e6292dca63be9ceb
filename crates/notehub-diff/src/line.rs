use serde::{Deserialize, Serialize};

use crate::block::ChangeBlock;

/// Identifier shared by all lines of one change block.
pub type BlockId = u32;

/// Classification of a diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Present in both texts.
    Common,
    /// Present only in the updated text.
    Added,
    /// Present only in the original text.
    Deleted,
}

/// One line of a diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffLine {
    pub kind: LineKind,
    /// Line text without its terminator.
    pub text: String,
    /// Whether the line ends with `\n` in the original text. Only the last
    /// line of a text can be unterminated. Added lines carry their updated
    /// terminator here too.
    pub original_newline: bool,
    /// Whether the line ends with `\n` in the updated text. Deleted lines
    /// carry their original terminator here too.
    pub new_newline: bool,
    /// 1-based line number in the original text (common and deleted lines).
    pub original_line_number: Option<usize>,
    /// 1-based line number in the updated text (common and added lines).
    pub new_line_number: Option<usize>,
    /// Block this line belongs to; `None` for common lines.
    pub change_block_id: Option<BlockId>,
}

impl DiffLine {
    /// Whether the line is part of a change block.
    pub fn is_change(&self) -> bool {
        self.kind != LineKind::Common
    }
}

/// Line and block counts of a diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub common: usize,
    pub added: usize,
    pub deleted: usize,
    pub blocks: usize,
}

/// The full line-level difference between two texts: every line of both
/// inputs appears exactly once, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diff {
    lines: Vec<DiffLine>,
}

impl Diff {
    pub(crate) fn from_lines(lines: Vec<DiffLine>) -> Self {
        Self { lines }
    }

    /// The classified lines.
    pub fn lines(&self) -> &[DiffLine] {
        &self.lines
    }

    /// Consume the diff, returning its lines.
    pub fn into_lines(self) -> Vec<DiffLine> {
        self.lines
    }

    /// Distinct block ids in order of appearance.
    pub fn block_ids(&self) -> Vec<BlockId> {
        let mut ids: Vec<BlockId> = Vec::new();
        for id in self.lines.iter().filter_map(|l| l.change_block_id) {
            if ids.last() != Some(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Number of change blocks.
    pub fn block_count(&self) -> usize {
        self.block_ids().len()
    }

    /// Whether the two texts differ at all.
    pub fn has_changes(&self) -> bool {
        self.lines.iter().any(DiffLine::is_change)
    }

    /// Group the changed lines into blocks.
    pub fn blocks(&self) -> Vec<ChangeBlock> {
        ChangeBlock::collect(&self.lines)
    }

    /// Line and block counts.
    pub fn stats(&self) -> DiffStats {
        let mut stats = DiffStats {
            blocks: self.block_count(),
            ..DiffStats::default()
        };
        for line in &self.lines {
            match line.kind {
                LineKind::Common => stats.common += 1,
                LineKind::Added => stats.added += 1,
                LineKind::Deleted => stats.deleted += 1,
            }
        }
        stats
    }
}

/// Split a text into `(line, terminated)` pairs.
///
/// An empty text has no lines, and a final `\n` terminates the last line
/// rather than starting an empty one.
pub fn split_lines(text: &str) -> Vec<(&str, bool)> {
    text.split_inclusive('\n')
        .map(|piece| match piece.strip_suffix('\n') {
            Some(line) => (line, true),
            None => (piece, false),
        })
        .collect()
}
