use thiserror::Error;

use crate::DeltaKind;

/// Error type for edit scripts breaking their structural invariants. These
/// are not expected for well-formed input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiffError {
    /// The chunks of a delta don't fit its kind
    #[error(
        "Invalid diff: a {kind} delta cannot have {previous_len} previous and {next_len} next \
         elements"
    )]
    InvalidDelta {
        /// The kind of the rejected delta
        kind: DeltaKind,
        /// The number of elements in the previous chunk
        previous_len: usize,
        /// The number of elements in the next chunk
        next_len: usize,
    },

    /// The deltas of a patch are out of order or overlap
    #[error("Invalid patch: delta {index} starts before the one preceding it ends")]
    UnorderedDeltas {
        /// Position of the offending delta in the patch
        index: usize,
    },

    /// The edit script doesn't cover its input sequence exactly
    #[error(
        "Invalid diff: the edit script covers {covered} elements of the {sequence} sequence, \
         which has {available}"
    )]
    ScriptLengthMismatch {
        /// Which of the two diffed sequences is affected
        sequence: &'static str,
        /// The number of elements reached by the script
        covered: usize,
        /// The length of the sequence
        available: usize,
    },
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn test_messages() {
        assert_snapshot!(
            DiffError::InvalidDelta { kind: DeltaKind::Insert, previous_len: 1, next_len: 0 }.to_string(),
            @"Invalid diff: a Insert delta cannot have 1 previous and 0 next elements"
        );
        assert_snapshot!(
            DiffError::ScriptLengthMismatch { sequence: "next", covered: 3, available: 4 }.to_string(),
            @"Invalid diff: the edit script covers 3 elements of the next sequence, which has 4"
        );
        assert_snapshot!(
            DiffError::UnorderedDeltas { index: 2 }.to_string(),
            @"Invalid patch: delta 2 starts before the one preceding it ends"
        );
    }
}
