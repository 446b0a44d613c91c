//! LCS diff algorithm over a full dynamic programming table.
//!
//! * time: `O(NM)`
//! * space `O(NM)`
//!
//! This is the fallback for small inputs and for cross-checking; Myers' diff
//! is the primary path.

use std::ops::Range;

use super::raw_operation::RawOperation;
use crate::{
    Equality,
    utils::{common_prefix_len::common_prefix_len, common_suffix_len::common_suffix_len},
};

/// LCS diff algorithm. On a mismatch the old element is dropped first
/// whenever that doesn't shorten the common subsequence, which keeps matches
/// as early as possible in the new sequence.
pub fn lcs_diff<E>(old: &[E], new: &[E], equality: &Equality<E>) -> Vec<RawOperation> {
    let common_prefix_len = common_prefix_len(old, 0..old.len(), new, 0..new.len(), equality);
    let common_suffix_len = common_suffix_len(
        old,
        common_prefix_len..old.len(),
        new,
        common_prefix_len..new.len(),
        equality,
    );

    let old_range = common_prefix_len..old.len() - common_suffix_len;
    let new_range = common_prefix_len..new.len() - common_suffix_len;
    let table = LcsTable::new(old, old_range.clone(), new, new_range.clone(), equality);

    let mut result = Vec::new();
    if common_prefix_len > 0 {
        result.push(RawOperation::Equal {
            old: 0..common_prefix_len,
            new: 0..common_prefix_len,
        });
    }

    let mut old_index = old_range.start;
    let mut new_index = new_range.start;
    while old_index < old_range.end && new_index < new_range.end {
        let (i, j) = (old_index - old_range.start, new_index - new_range.start);

        if equality(&old[old_index], &new[new_index]) {
            result.push(RawOperation::Equal {
                old: old_index..old_index + 1,
                new: new_index..new_index + 1,
            });
            old_index += 1;
            new_index += 1;
        } else if table.get(i + 1, j) >= table.get(i, j + 1) {
            result.push(RawOperation::Delete {
                old: old_index..old_index + 1,
                new_index,
            });
            old_index += 1;
        } else {
            result.push(RawOperation::Insert {
                old_index,
                new: new_index..new_index + 1,
            });
            new_index += 1;
        }
    }

    if old_index < old_range.end {
        result.push(RawOperation::Delete {
            old: old_index..old_range.end,
            new_index,
        });
    }

    if new_index < new_range.end {
        result.push(RawOperation::Insert {
            old_index: old_range.end,
            new: new_index..new_range.end,
        });
    }

    if common_suffix_len > 0 {
        result.push(RawOperation::Equal {
            old: old_range.end..old.len(),
            new: new_range.end..new.len(),
        });
    }

    result
}

/// `get(i, j)` is the length of the longest common subsequence of the old
/// range from offset `i` and the new range from offset `j`.
#[derive(Debug)]
struct LcsTable {
    columns: usize,
    lengths: Vec<usize>,
}

impl LcsTable {
    fn new<E>(
        old: &[E],
        old_range: Range<usize>,
        new: &[E],
        new_range: Range<usize>,
        equality: &Equality<E>,
    ) -> Self {
        let rows = old_range.len() + 1;
        let columns = new_range.len() + 1;
        let mut table = Self {
            columns,
            lengths: vec![0; rows * columns],
        };

        for i in (0..old_range.len()).rev() {
            for j in (0..new_range.len()).rev() {
                let length = if equality(&old[old_range.start + i], &new[new_range.start + j]) {
                    table.get(i + 1, j + 1) + 1
                } else {
                    table.get(i + 1, j).max(table.get(i, j + 1))
                };
                table.lengths[i * columns + j] = length;
            }
        }

        table
    }

    fn get(&self, i: usize, j: usize) -> usize { self.lengths[i * self.columns + j] }
}
