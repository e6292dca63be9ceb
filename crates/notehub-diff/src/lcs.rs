use std::iter;

use crate::line::{BlockId, Diff, DiffLine, LineKind, split_lines};

/// Compute the line diff of `original` against `updated`.
///
/// Lines are aligned on their longest common subsequence. Between two
/// consecutive common lines, deletions are emitted before insertions and
/// the whole run shares one change block id, so a replaced line shows up
/// as a single block holding both its old and new text.
///
/// Lines are matched on their text alone. A common line may still end
/// differently on the two sides when it is the last line of one text; the
/// terminators are kept per side and resolved by `reconstruct`.
/// When the last lines of both texts match but only one is terminated, the
/// pair is reported as a change so that the difference stays selectable.
pub fn diff(original: &str, updated: &str) -> Diff {
    let a = split_lines(original);
    let b = split_lines(updated);
    let text_a: Vec<&str> = a.iter().map(|(text, _)| *text).collect();
    let text_b: Vec<&str> = b.iter().map(|(text, _)| *text).collect();
    let mut pairs = common_subsequence(&text_a, &text_b);
    if let Some(&(ci, cj)) = pairs.last() {
        if ci + 1 == a.len() && cj + 1 == b.len() && a[ci].1 != b[cj].1 {
            pairs.pop();
        }
    }

    let mut lines = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0usize, 0usize);
    let mut next_block: BlockId = 0;

    for (ci, cj) in pairs.into_iter().chain(iter::once((a.len(), b.len()))) {
        if i < ci || j < cj {
            let block = next_block;
            next_block += 1;
            for (k, (text, newline)) in a.iter().enumerate().take(ci).skip(i) {
                lines.push(DiffLine {
                    kind: LineKind::Deleted,
                    text: (*text).to_string(),
                    original_newline: *newline,
                    new_newline: *newline,
                    original_line_number: Some(k + 1),
                    new_line_number: None,
                    change_block_id: Some(block),
                });
            }
            for (k, (text, newline)) in b.iter().enumerate().take(cj).skip(j) {
                lines.push(DiffLine {
                    kind: LineKind::Added,
                    text: (*text).to_string(),
                    original_newline: *newline,
                    new_newline: *newline,
                    original_line_number: None,
                    new_line_number: Some(k + 1),
                    change_block_id: Some(block),
                });
            }
        }
        if ci < a.len() {
            let (text, original_newline) = a[ci];
            lines.push(DiffLine {
                kind: LineKind::Common,
                text: text.to_string(),
                original_newline,
                new_newline: b[cj].1,
                original_line_number: Some(ci + 1),
                new_line_number: Some(cj + 1),
                change_block_id: None,
            });
        }
        i = ci + 1;
        j = cj + 1;
    }

    Diff::from_lines(lines)
}

/// Index pairs `(i, j)` with `a[i] == b[j]` forming a longest common
/// subsequence, in increasing order.
///
/// The shared prefix and suffix are matched directly; the classic
/// O(|A|·|B|) table is only built for the differing middle.
fn common_subsequence(a: &[&str], b: &[&str]) -> Vec<(usize, usize)> {
    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    let mid_a = &a[prefix..a.len() - suffix];
    let mid_b = &b[prefix..b.len() - suffix];
    let (n, m) = (mid_a.len(), mid_b.len());

    // table[i][j] = LCS length of mid_a[i..] and mid_b[j..]
    let width = m + 1;
    let mut table = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if mid_a[i] == mid_b[j] {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let mut pairs: Vec<(usize, usize)> = (0..prefix).map(|k| (k, k)).collect();
    let (mut i, mut j) = (0usize, 0usize);
    while i < n && j < m {
        if mid_a[i] == mid_b[j] {
            pairs.push((prefix + i, prefix + j));
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    let (tail_a, tail_b) = (a.len() - suffix, b.len() - suffix);
    pairs.extend((0..suffix).map(|k| (tail_a + k, tail_b + k)));
    pairs
}
