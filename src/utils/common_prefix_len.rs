use std::ops::Range;

use crate::Equality;

/// Given two sequences and ranges calculates the length of the common prefix
/// under the given element equality.
/// Adapted from <https://github.com/mitsuhiko/similar/blob/7e15c44de11a1cd61e1149189929e189ef977fd8/src/algorithms/utils.rs>
pub fn common_prefix_len<E>(
    old: &[E],
    old_range: Range<usize>,
    new: &[E],
    new_range: Range<usize>,
    equality: &Equality<E>,
) -> usize {
    new_range
        .zip(old_range)
        .take_while(|&(new_index, old_index)| equality(&old[old_index], &new[new_index]))
        .count()
}
