use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::line::{BlockId, Diff};

/// The set of change blocks a user chose to apply.
///
/// Selections are plain values: every operation returns a new selection
/// and leaves the receiver untouched, so independent diff sessions never
/// share state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockSelection(BTreeSet<BlockId>);

impl BlockSelection {
    /// No block selected.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every block of `diff` selected.
    pub fn all(diff: &Diff) -> Self {
        diff.block_ids().into_iter().collect()
    }

    pub fn contains(&self, block: BlockId) -> bool {
        self.0.contains(&block)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.0.iter().copied()
    }

    /// A copy with `block` flipped.
    #[must_use]
    pub fn toggle(&self, block: BlockId) -> Self {
        let mut next = self.0.clone();
        if !next.remove(&block) {
            next.insert(block);
        }
        Self(next)
    }

    /// Empty if this selection already covers every block of `diff`,
    /// otherwise every block.
    #[must_use]
    pub fn toggle_all(&self, diff: &Diff) -> Self {
        let all = Self::all(diff);
        if *self == all { Self::empty() } else { all }
    }
}

impl FromIterator<BlockId> for BlockSelection {
    fn from_iter<I: IntoIterator<Item = BlockId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
