use core::ops::Range;

use crate::Equality;

/// Given two sequences and ranges calculates the length of common suffix
/// under the given element equality.
/// Adapted from <https://github.com/mitsuhiko/similar/blob/7e15c44de11a1cd61e1149189929e189ef977fd8/src/algorithms/utils.rs>
pub fn common_suffix_len<E>(
    old: &[E],
    old_range: Range<usize>,
    new: &[E],
    new_range: Range<usize>,
    equality: &Equality<E>,
) -> usize {
    new_range
        .rev()
        .zip(old_range.rev())
        .take_while(|&(new_index, old_index)| equality(&old[old_index], &new[new_index]))
        .count()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_common_suffix_len() {
        assert_eq!(
            common_suffix_len("".as_bytes(), 0..0, "".as_bytes(), 0..0, &u8::eq),
            0
        );
        assert_eq!(
            common_suffix_len("1234".as_bytes(), 0..4, "X0001234".as_bytes(), 0..8, &u8::eq),
            4
        );
        assert_eq!(
            common_suffix_len("1234".as_bytes(), 0..4, "Xxxx".as_bytes(), 0..4, &u8::eq),
            0
        );
        assert_eq!(
            common_suffix_len("1234".as_bytes(), 2..4, "01234".as_bytes(), 2..5, &u8::eq),
            2
        );
    }
}
