use std::fmt::Debug;

use thiserror::Error;

use super::{Delta, DeltaKind};

/// The target sequence no longer holds what a chunk expects to find in it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchMismatch {
    /// The chunk reaches past the end of the target
    #[error(
        "Patch mismatch: expected {expected_len} elements starting at position {position}, but \
         the target only has {available} elements from there"
    )]
    OutOfBounds {
        /// The position where the chunk starts
        position: usize,
        /// The number of elements in the chunk
        expected_len: usize,
        /// The number of elements available from the position
        available: usize,
    },

    /// The target holds a different element than the chunk
    #[error("Patch mismatch: the element at position {position} differs from the expected one")]
    ContentDiffers {
        /// The position of the first differing element
        position: usize,
    },
}

/// Error returned when a `Delta` cannot be replayed on a target sequence.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatchError<E>
where
    E: Clone + Debug,
{
    #[error("Cannot apply {kind} delta at position {position}: {source}")]
    Apply {
        kind: DeltaKind,
        position: usize,
        delta: Box<Delta<E>>,
        source: PatchMismatch,
    },

    #[error("Cannot restore {kind} delta at position {position}: {source}")]
    Restore {
        kind: DeltaKind,
        position: usize,
        delta: Box<Delta<E>>,
        source: PatchMismatch,
    },
}

impl<E> PatchError<E>
where
    E: Clone + Debug,
{
    /// The delta which failed to verify against its target.
    #[must_use]
    pub fn delta(&self) -> &Delta<E> {
        match self {
            PatchError::Apply { delta, .. } | PatchError::Restore { delta, .. } => delta,
        }
    }

    #[must_use]
    pub fn mismatch(&self) -> &PatchMismatch {
        match self {
            PatchError::Apply { source, .. } | PatchError::Restore { source, .. } => source,
        }
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn test_mismatch_messages() {
        assert_snapshot!(
            PatchMismatch::OutOfBounds { position: 3, expected_len: 2, available: 1 }.to_string(),
            @"Patch mismatch: expected 2 elements starting at position 3, but the target only has 1 elements from there"
        );
        assert_snapshot!(
            PatchMismatch::ContentDiffers { position: 7 }.to_string(),
            @"Patch mismatch: the element at position 7 differs from the expected one"
        );
    }
}
