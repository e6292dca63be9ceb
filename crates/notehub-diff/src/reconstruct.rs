use crate::line::{Diff, LineKind};
use crate::selection::BlockSelection;

/// Rebuild a text from `diff`, applying exactly the selected blocks.
///
/// Common lines are always kept. An added line is kept iff its block is
/// selected, a deleted line iff its block is not. Lines are joined with
/// `\n`, and each line keeps the terminator it had in its source text, so
/// selecting everything yields the updated text byte for byte and selecting
/// nothing yields the original.
///
/// A common line that ends differently on the two sides is always the last
/// line of one text, directly followed by the trailing block. Its
/// terminator follows that block's selection.
pub fn reconstruct(diff: &Diff, selection: &BlockSelection) -> String {
    let lines = diff.lines();
    let mut out = String::new();
    for (idx, line) in lines.iter().enumerate() {
        let keep = match (line.kind, line.change_block_id) {
            (LineKind::Common, _) => true,
            (LineKind::Added, Some(block)) => selection.contains(block),
            (LineKind::Deleted, Some(block)) => !selection.contains(block),
            (_, None) => false,
        };
        if keep {
            out.push_str(&line.text);
            let newline = if line.original_newline == line.new_newline {
                line.original_newline
            } else {
                match lines.get(idx + 1).and_then(|next| next.change_block_id) {
                    Some(block) if selection.contains(block) => line.new_newline,
                    _ => line.original_newline,
                }
            };
            if newline {
                out.push('\n');
            }
        }
    }
    out
}
