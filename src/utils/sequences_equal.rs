use crate::Equality;

/// Element-wise comparison of two sequences under the given equality.
pub fn sequences_equal<E>(left: &[E], right: &[E], equality: &Equality<E>) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .all(|(left_element, right_element)| equality(left_element, right_element))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequences_equal() {
        assert!(sequences_equal::<u8>(&[], &[], &u8::eq));
        assert!(sequences_equal(&[1, 2, 3], &[1, 2, 3], &i32::eq));
        assert!(!sequences_equal(&[1, 2, 3], &[1, 2], &i32::eq));
        assert!(!sequences_equal(&[1, 2, 3], &[1, 2, 4], &i32::eq));
        assert!(sequences_equal(&[1, 2], &[3, 4], &|_: &i32, _: &i32| true));
    }
}
