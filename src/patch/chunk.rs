use std::fmt::Debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::PatchMismatch;
use crate::Equality;

/// A contiguous span of a sequence: the elements together with the position
/// of the first one in the sequence they were taken from.
///
/// An empty chunk marks a position between elements, which is where
/// insertions happen and what remains of a deletion.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Chunk<E>
where
    E: Clone + Debug,
{
    index: usize,
    elements: Vec<E>,
}

impl<E> Chunk<E>
where
    E: Clone + Debug,
{
    #[must_use]
    pub fn new(index: usize, elements: Vec<E>) -> Self { Self { index, elements } }

    /// Position of the first element in the originating sequence.
    #[must_use]
    pub fn index(&self) -> usize { self.index }

    #[must_use]
    pub fn elements(&self) -> &[E] { &self.elements }

    #[must_use]
    pub fn into_elements(self) -> Vec<E> { self.elements }

    #[must_use]
    pub fn size(&self) -> usize { self.elements.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.elements.is_empty() }

    /// Exclusive end of the span in the originating sequence.
    #[must_use]
    pub fn end(&self) -> usize { self.index + self.size() }

    /// Index of the last element, which is `index - 1` for an empty chunk.
    /// Returns `None` for an empty chunk at the very start of a sequence.
    #[must_use]
    pub fn last_index(&self) -> Option<usize> { self.end().checked_sub(1) }

    /// Compares the closed `[index, last_index]` ranges of two chunks taken
    /// from the same coordinate system. An empty chunk only overlaps a span
    /// which strictly contains its position.
    #[must_use]
    pub fn is_overlapping_with(&self, other: &Self) -> bool {
        match (self.last_index(), other.last_index()) {
            (Some(self_last), Some(other_last)) => {
                self.index <= other_last && other.index <= self_last
            }
            _ => false,
        }
    }

    /// Checks that `target` holds exactly this chunk's elements starting at
    /// `index`.
    ///
    /// # Errors
    ///
    /// Returns `PatchMismatch` if the span is out of bounds or any element
    /// differs.
    pub fn verify(&self, target: &[E]) -> Result<(), PatchMismatch>
    where
        E: PartialEq,
    {
        self.verify_by(target, &|a: &E, b: &E| a == b)
    }

    /// Same as `verify` but compares elements with the given equality.
    ///
    /// # Errors
    ///
    /// Returns `PatchMismatch` if the span is out of bounds or any element
    /// differs.
    pub fn verify_by(&self, target: &[E], equality: &Equality<E>) -> Result<(), PatchMismatch> {
        let available = target.len().saturating_sub(self.index);
        if self.index > target.len() || available < self.size() {
            return Err(PatchMismatch::OutOfBounds {
                position: self.index,
                expected_len: self.size(),
                available,
            });
        }

        match self
            .elements
            .iter()
            .zip(&target[self.index..self.end()])
            .position(|(expected, actual)| !equality(expected, actual))
        {
            Some(offset) => Err(PatchMismatch::ContentDiffers {
                position: self.index + offset,
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn moved_to(&self, index: usize) -> Self {
        Self {
            index,
            elements: self.elements.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn test_last_index() {
        assert_eq!(Chunk::new(2, vec!['a', 'b']).last_index(), Some(3));
        assert_eq!(Chunk::new(2, Vec::<char>::new()).last_index(), Some(1));
        assert_eq!(Chunk::new(0, Vec::<char>::new()).last_index(), None);
    }

    #[test_case(0, 2, 1, 2 => true ; "partial overlap")]
    #[test_case(0, 2, 2, 2 => false ; "adjacent")]
    #[test_case(0, 4, 1, 1 => true ; "contained")]
    #[test_case(3, 0, 1, 4 => true ; "insertion point strictly inside")]
    #[test_case(1, 0, 1, 4 => false ; "insertion point at start")]
    #[test_case(5, 0, 1, 4 => false ; "insertion point at end")]
    #[test_case(2, 0, 2, 0 => false ; "two insertion points")]
    fn test_is_overlapping_with(
        index: usize,
        size: usize,
        other_index: usize,
        other_size: usize,
    ) -> bool {
        let chunk = Chunk::new(index, vec!['x'; size]);
        let other = Chunk::new(other_index, vec!['y'; other_size]);

        assert_eq!(
            chunk.is_overlapping_with(&other),
            other.is_overlapping_with(&chunk),
            "overlap must be symmetric"
        );

        chunk.is_overlapping_with(&other)
    }

    #[test]
    fn test_verify() {
        let target = ["a", "b", "c"];

        assert_eq!(Chunk::new(1, vec!["b", "c"]).verify(&target), Ok(()));
        assert_eq!(Chunk::new(3, Vec::new()).verify(&target), Ok(()));
        assert_eq!(
            Chunk::new(1, vec!["b", "x"]).verify(&target),
            Err(PatchMismatch::ContentDiffers { position: 2 })
        );
        assert_eq!(
            Chunk::new(2, vec!["c", "d"]).verify(&target),
            Err(PatchMismatch::OutOfBounds {
                position: 2,
                expected_len: 2,
                available: 1
            })
        );
        assert_eq!(
            Chunk::new(5, Vec::new()).verify(&target),
            Err(PatchMismatch::OutOfBounds {
                position: 5,
                expected_len: 0,
                available: 0
            })
        );
    }

    #[test]
    fn test_verify_by_custom_equality() {
        let chunk = Chunk::new(0, vec!["Hello".to_owned()]);
        let target = ["hello".to_owned()];

        assert!(chunk.verify(&target).is_err());
        assert!(
            chunk
                .verify_by(&target, &|a: &String, b: &String| a.eq_ignore_ascii_case(b))
                .is_ok()
        );
    }
}
