use core::fmt::{Debug, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Chunk, PatchError, PatchMismatch};
use crate::{DiffError, Equality};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeltaKind {
    Change,
    Delete,
    Insert,
}

impl Display for DeltaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeltaKind::Change => write!(f, "Change"),
            DeltaKind::Delete => write!(f, "Delete"),
            DeltaKind::Insert => write!(f, "Insert"),
        }
    }
}

/// A single edit turning the `previous` chunk of one sequence into the `next`
/// chunk of another.
///
/// The chunk indexes are in the coordinates of their own sequences:
/// `previous.index()` points into the sequence the delta is applied to,
/// `next.index()` into the one it produces.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "DeltaFields<E>"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta<E>
where
    E: Clone + Debug,
{
    kind: DeltaKind,
    previous: Chunk<E>,
    next: Chunk<E>,
}

/// Unchecked form of a deserialized `Delta`.
#[cfg(feature = "serde")]
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeltaFields<E>
where
    E: Clone + Debug,
{
    kind: DeltaKind,
    previous: Chunk<E>,
    next: Chunk<E>,
}

#[cfg(feature = "serde")]
impl<E> TryFrom<DeltaFields<E>> for Delta<E>
where
    E: Clone + Debug,
{
    type Error = DiffError;

    fn try_from(fields: DeltaFields<E>) -> Result<Self, Self::Error> {
        Self::new(fields.kind, fields.previous, fields.next)
    }
}

impl<E> Delta<E>
where
    E: Clone + Debug,
{
    /// Creates a delta of the given kind.
    ///
    /// # Errors
    ///
    /// Returns `DiffError::InvalidDelta` if the chunks don't fit the kind:
    /// a `Delete` must have an empty `next`, an `Insert` an empty `previous`
    /// and a `Change` needs both to be non-empty.
    pub fn new(kind: DeltaKind, previous: Chunk<E>, next: Chunk<E>) -> Result<Self, DiffError> {
        let is_valid = match kind {
            DeltaKind::Change => !previous.is_empty() && !next.is_empty(),
            DeltaKind::Delete => !previous.is_empty() && next.is_empty(),
            DeltaKind::Insert => previous.is_empty() && !next.is_empty(),
        };

        if !is_valid {
            return Err(DiffError::InvalidDelta {
                kind,
                previous_len: previous.size(),
                next_len: next.size(),
            });
        }

        Ok(Self {
            kind,
            previous,
            next,
        })
    }

    /// Creates a delta whose kind is derived from which chunks are empty.
    ///
    /// # Errors
    ///
    /// Returns `DiffError::InvalidDelta` if both chunks are empty.
    pub fn from_chunks(previous: Chunk<E>, next: Chunk<E>) -> Result<Self, DiffError> {
        let kind = match (previous.is_empty(), next.is_empty()) {
            (true, _) => DeltaKind::Insert,
            (false, true) => DeltaKind::Delete,
            (false, false) => DeltaKind::Change,
        };

        Self::new(kind, previous, next)
    }

    #[must_use]
    pub fn kind(&self) -> DeltaKind { self.kind }

    #[must_use]
    pub fn previous(&self) -> &Chunk<E> { &self.previous }

    #[must_use]
    pub fn next(&self) -> &Chunk<E> { &self.next }

    /// The size of the larger of the two chunks.
    #[must_use]
    pub fn max_chunk_size(&self) -> usize { self.previous.size().max(self.next.size()) }

    /// Checks whether the delta can be applied to `target`.
    ///
    /// # Errors
    ///
    /// Returns `PatchMismatch` if the span the delta replaces is not found at
    /// `previous.index()` or, for insertions, if the insertion point is past
    /// the end of `target`.
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
    /// See `verify`.
    pub fn verify_by(&self, target: &[E], equality: &Equality<E>) -> Result<(), PatchMismatch> {
        // For insertions the empty previous chunk only checks the bounds
        self.previous.verify_by(target, equality)
    }

    /// Applies the delta in place.
    ///
    /// # Errors
    ///
    /// Returns `PatchError::Apply` without touching `target` if `verify`
    /// fails.
    pub fn apply(&self, target: &mut Vec<E>) -> Result<(), PatchError<E>>
    where
        E: PartialEq,
    {
        self.apply_by(target, &|a: &E, b: &E| a == b)
    }

    /// Same as `apply` but compares elements with the given equality.
    ///
    /// # Errors
    ///
    /// See `apply`.
    pub fn apply_by(&self, target: &mut Vec<E>, equality: &Equality<E>) -> Result<(), PatchError<E>> {
        replace(target, &self.previous, &self.next, equality).map_err(|source| PatchError::Apply {
            kind: self.kind,
            position: self.previous.index(),
            delta: Box::new(self.clone()),
            source,
        })
    }

    /// Undoes the delta in place: the `next` span of `target` is replaced
    /// with the `previous` elements.
    ///
    /// # Errors
    ///
    /// Returns `PatchError::Restore` without touching `target` if the `next`
    /// chunk is not found at `next.index()`.
    pub fn restore(&self, target: &mut Vec<E>) -> Result<(), PatchError<E>>
    where
        E: PartialEq,
    {
        self.restore_by(target, &|a: &E, b: &E| a == b)
    }

    /// Same as `restore` but compares elements with the given equality.
    ///
    /// # Errors
    ///
    /// See `restore`.
    pub fn restore_by(
        &self,
        target: &mut Vec<E>,
        equality: &Equality<E>,
    ) -> Result<(), PatchError<E>> {
        replace(target, &self.next, &self.previous, equality).map_err(|source| {
            PatchError::Restore {
                kind: self.kind,
                position: self.next.index(),
                delta: Box::new(self.clone()),
                source,
            }
        })
    }

    /// The structural inverse: swaps the chunks, turning insertions into
    /// deletions and vice versa.
    #[must_use]
    pub fn inverted(&self) -> Self {
        let kind = match self.kind {
            DeltaKind::Change => DeltaKind::Change,
            DeltaKind::Delete => DeltaKind::Insert,
            DeltaKind::Insert => DeltaKind::Delete,
        };

        Self {
            kind,
            previous: self.next.clone(),
            next: self.previous.clone(),
        }
    }

    /// Moves both chunks to `index`, so that the delta can be replayed on a
    /// sequence in which its span starts elsewhere.
    pub(crate) fn rebased(&self, index: usize) -> Self {
        Self {
            kind: self.kind,
            previous: self.previous.moved_to(index),
            next: self.next.moved_to(index),
        }
    }
}

fn replace<E>(
    target: &mut Vec<E>,
    from: &Chunk<E>,
    to: &Chunk<E>,
    equality: &Equality<E>,
) -> Result<(), PatchMismatch>
where
    E: Clone + Debug,
{
    from.verify_by(target, equality)?;
    target.splice(from.index()..from.end(), to.elements().iter().cloned());

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn change() -> Delta<&'static str> {
        Delta::new(
            DeltaKind::Change,
            Chunk::new(1, vec!["b", "c"]),
            Chunk::new(1, vec!["X"]),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_deltas() {
        assert_eq!(
            Delta::new(DeltaKind::Delete, Chunk::new(0, vec![1]), Chunk::new(0, vec![2])),
            Err(DiffError::InvalidDelta {
                kind: DeltaKind::Delete,
                previous_len: 1,
                next_len: 1
            })
        );
        assert!(
            Delta::new(DeltaKind::Insert, Chunk::new(0, vec![1]), Chunk::new(0, vec![2])).is_err()
        );
        assert!(Delta::new(DeltaKind::Change, Chunk::new(0, vec![1]), Chunk::new(0, vec![])).is_err());
        assert!(Delta::<i32>::from_chunks(Chunk::new(0, vec![]), Chunk::new(0, vec![])).is_err());
    }

    #[test]
    fn test_from_chunks_infers_kind() {
        let insert = Delta::from_chunks(Chunk::new(2, vec![]), Chunk::new(2, vec![1])).unwrap();
        let delete = Delta::from_chunks(Chunk::new(2, vec![1]), Chunk::new(2, vec![])).unwrap();
        let change = Delta::from_chunks(Chunk::new(2, vec![1]), Chunk::new(2, vec![3, 4])).unwrap();

        assert_eq!(insert.kind(), DeltaKind::Insert);
        assert_eq!(delete.kind(), DeltaKind::Delete);
        assert_eq!(change.kind(), DeltaKind::Change);
        assert_eq!(change.max_chunk_size(), 2);
    }

    #[test]
    fn test_apply_and_restore_change() {
        let mut target = vec!["a", "b", "c", "d"];

        change().apply(&mut target).unwrap();
        assert_eq!(target, vec!["a", "X", "d"]);

        change().restore(&mut target).unwrap();
        assert_eq!(target, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_apply_insert_and_delete() {
        let insert = Delta::new(
            DeltaKind::Insert,
            Chunk::new(3, vec![]),
            Chunk::new(3, vec!["d", "e"]),
        )
        .unwrap();
        let mut target = vec!["a", "b", "c"];
        insert.apply(&mut target).unwrap();
        assert_eq!(target, vec!["a", "b", "c", "d", "e"]);

        let delete = insert.inverted();
        assert_eq!(delete.kind(), DeltaKind::Delete);
        delete.apply(&mut target).unwrap();
        assert_eq!(target, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_apply_on_drifted_target_leaves_it_untouched() {
        let mut target = vec!["a", "B", "c", "d"];

        let error = change().apply(&mut target).unwrap_err();

        assert_eq!(target, vec!["a", "B", "c", "d"]);
        assert_eq!(error.delta(), &change());
        assert_eq!(error.mismatch(), &PatchMismatch::ContentDiffers { position: 1 });
        assert_eq!(
            error.to_string(),
            "Cannot apply Change delta at position 1: Patch mismatch: the element at position 1 \
             differs from the expected one"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_checks_the_kind() {
        let owned = Delta::new(
            DeltaKind::Change,
            Chunk::new(1, vec!["b".to_owned(), "c".to_owned()]),
            Chunk::new(1, vec!["X".to_owned()]),
        )
        .unwrap();
        let yaml = serde_yaml::to_string(&owned).unwrap();
        assert_eq!(serde_yaml::from_str::<Delta<String>>(&yaml).unwrap(), owned);

        let delete_with_content = "
kind: Delete
previous: { index: 0, elements: [a] }
next: { index: 0, elements: [b] }
";
        let error = serde_yaml::from_str::<Delta<String>>(delete_with_content).unwrap_err();
        assert!(error.to_string().contains("a Delete delta cannot have 1 previous and 1 next"));
    }

    #[test]
    fn test_insert_past_the_end_fails() {
        let insert =
            Delta::new(DeltaKind::Insert, Chunk::new(4, vec![]), Chunk::new(4, vec![1])).unwrap();

        assert!(insert.verify(&[0, 0, 0]).is_err());
        assert!(insert.verify(&[0, 0, 0, 0]).is_ok());
    }

    #[test]
    fn test_restore_failure_reports_next_position() {
        let mut target = vec!["a", "Y", "d"];

        let error = change().restore(&mut target).unwrap_err();

        assert!(matches!(
            error,
            PatchError::Restore {
                kind: DeltaKind::Change,
                position: 1,
                ..
            }
        ));
    }
}
