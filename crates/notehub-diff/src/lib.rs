//! # notehub-diff
//!
//! Pure, stateless line diffing for the editor workflow:
//!
//! * [`diff`] aligns two texts with a longest-common-subsequence table and
//!   classifies every line as common, added, or deleted.
//! * Every maximal run of non-common lines forms one change block, the
//!   unit a user toggles on or off.
//! * [`BlockSelection`] is an immutable value owned by the caller;
//!   toggling returns a new selection.
//! * [`reconstruct`] rebuilds a text from a diff and a selection: a
//!   selected block applies its edit, a deselected block keeps the
//!   original lines.
//! * [`hunks`] renders the partial, context-bounded view.
//!
//! Nothing here performs I/O or keeps state between calls.

mod block;
mod hunk;
mod lcs;
mod line;
mod reconstruct;
mod selection;

pub use block::ChangeBlock;
pub use hunk::{Hunk, hunks};
pub use lcs::diff;
pub use line::{BlockId, Diff, DiffLine, DiffStats, LineKind, split_lines};
pub use reconstruct::reconstruct;
pub use selection::BlockSelection;

/// Every change block of `diff`, selected.
pub fn select_all(diff: &Diff) -> BlockSelection {
    BlockSelection::all(diff)
}

/// `selection` with `block` flipped.
pub fn toggle(selection: &BlockSelection, block: BlockId) -> BlockSelection {
    selection.toggle(block)
}

/// Clear `selection` if it already holds every block of `diff`, otherwise
/// select every block.
pub fn toggle_all(selection: &BlockSelection, diff: &Diff) -> BlockSelection {
    selection.toggle_all(diff)
}
