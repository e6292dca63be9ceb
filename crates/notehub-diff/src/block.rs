use serde::{Deserialize, Serialize};

use crate::line::{BlockId, DiffLine, LineKind};

/// One logical edit: a maximal run of deleted and added lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeBlock {
    pub id: BlockId,
    /// Original line number of the first deleted line, if any.
    pub original_start: Option<usize>,
    /// Updated line number of the first added line, if any.
    pub new_start: Option<usize>,
    /// Lines removed by this edit.
    pub deleted: Vec<String>,
    /// Lines inserted by this edit.
    pub added: Vec<String>,
}

impl ChangeBlock {
    /// A block with both deletions and insertions.
    pub fn is_replacement(&self) -> bool {
        !self.deleted.is_empty() && !self.added.is_empty()
    }

    pub(crate) fn collect(lines: &[DiffLine]) -> Vec<ChangeBlock> {
        let mut blocks: Vec<ChangeBlock> = Vec::new();
        for line in lines {
            let Some(id) = line.change_block_id else {
                continue;
            };
            if blocks.last().map(|b| b.id) != Some(id) {
                blocks.push(ChangeBlock {
                    id,
                    original_start: None,
                    new_start: None,
                    deleted: Vec::new(),
                    added: Vec::new(),
                });
            }
            let Some(block) = blocks.last_mut() else {
                continue;
            };
            match line.kind {
                LineKind::Deleted => {
                    block.original_start = block.original_start.or(line.original_line_number);
                    block.deleted.push(line.text.clone());
                }
                LineKind::Added => {
                    block.new_start = block.new_start.or(line.new_line_number);
                    block.added.push(line.text.clone());
                }
                LineKind::Common => {}
            }
        }
        blocks
    }
}
