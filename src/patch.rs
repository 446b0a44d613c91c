mod chunk;
mod delta;
mod patch_error;

use std::fmt::Debug;

pub use chunk::Chunk;
pub use delta::{Delta, DeltaKind};
pub use patch_error::{PatchError, PatchMismatch};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{DiffError, Equality};

/// The edit script turning one sequence into another.
///
/// Deltas are kept in ascending `previous.index()` order and never overlap.
/// They are replayed in descending order, so that applying a delta never
/// shifts the position of the ones still to be applied.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Delta<E>>", into = "Vec<Delta<E>>"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch<E>
where
    E: Clone + Debug,
{
    deltas: Vec<Delta<E>>,
}

impl<E> Default for Patch<E>
where
    E: Clone + Debug,
{
    fn default() -> Self {
        Self {
            deltas: Vec::new(),
        }
    }
}

impl<E> Patch<E>
where
    E: Clone + Debug,
{
    pub(crate) fn from_deltas(deltas: Vec<Delta<E>>) -> Self {
        debug_assert!(
            deltas
                .windows(2)
                .all(|pair| pair[0].previous().end() <= pair[1].previous().index()),
            "Deltas must be sorted and must not overlap"
        );

        Self { deltas }
    }

    #[must_use]
    pub fn deltas(&self) -> &[Delta<E>] { &self.deltas }

    pub fn iter(&self) -> std::slice::Iter<'_, Delta<E>> { self.deltas.iter() }

    #[must_use]
    pub fn len(&self) -> usize { self.deltas.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.deltas.is_empty() }

    /// Returns a copy of `target` with every delta applied.
    ///
    /// # Errors
    ///
    /// Returns `PatchError::Apply` carrying the first delta (counting from the
    /// end) which doesn't match `target`.
    pub fn apply(&self, target: &[E]) -> Result<Vec<E>, PatchError<E>>
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
    pub fn apply_by(&self, target: &[E], equality: &Equality<E>) -> Result<Vec<E>, PatchError<E>> {
        let mut result = target.to_vec();
        for delta in self.deltas.iter().rev() {
            delta.apply_by(&mut result, equality)?;
        }

        Ok(result)
    }

    /// Returns a copy of `target` with every delta undone, turning the output
    /// of `apply` back into its input.
    ///
    /// # Errors
    ///
    /// Returns `PatchError::Restore` carrying the first delta (counting from
    /// the end) which doesn't match `target`.
    pub fn restore(&self, target: &[E]) -> Result<Vec<E>, PatchError<E>>
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
        target: &[E],
        equality: &Equality<E>,
    ) -> Result<Vec<E>, PatchError<E>> {
        let mut result = target.to_vec();
        for delta in self.deltas.iter().rev() {
            delta.restore_by(&mut result, equality)?;
        }

        Ok(result)
    }

    /// The patch going the opposite way.
    #[must_use]
    pub fn inverted(&self) -> Self {
        Self {
            deltas: self.deltas.iter().map(Delta::inverted).collect(),
        }
    }
}

impl<E> TryFrom<Vec<Delta<E>>> for Patch<E>
where
    E: Clone + Debug,
{
    type Error = DiffError;

    /// Accepts the deltas if they are sorted and disjoint in both the
    /// previous and the next sequence.
    fn try_from(deltas: Vec<Delta<E>>) -> Result<Self, Self::Error> {
        let unordered = deltas.windows(2).position(|pair| {
            pair[0].previous().end() > pair[1].previous().index()
                || pair[0].next().end() > pair[1].next().index()
        });

        match unordered {
            Some(position) => Err(DiffError::UnorderedDeltas {
                index: position + 1,
            }),
            None => Ok(Self { deltas }),
        }
    }
}

impl<E> From<Patch<E>> for Vec<Delta<E>>
where
    E: Clone + Debug,
{
    fn from(patch: Patch<E>) -> Self { patch.deltas }
}

impl<'a, E> IntoIterator for &'a Patch<E>
where
    E: Clone + Debug,
{
    type IntoIter = std::slice::Iter<'a, Delta<E>>;
    type Item = &'a Delta<E>;

    fn into_iter(self) -> Self::IntoIter { self.deltas.iter() }
}

impl<E> IntoIterator for Patch<E>
where
    E: Clone + Debug,
{
    type IntoIter = std::vec::IntoIter<Delta<E>>;
    type Item = Delta<E>;

    fn into_iter(self) -> Self::IntoIter { self.deltas.into_iter() }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn patch() -> Patch<char> {
        Patch::from_deltas(vec![
            Delta::new(DeltaKind::Delete, Chunk::new(0, vec!['a']), Chunk::new(0, vec![]))
                .unwrap(),
            Delta::new(DeltaKind::Insert, Chunk::new(2, vec![]), Chunk::new(1, vec!['x', 'y']))
                .unwrap(),
            Delta::new(DeltaKind::Change, Chunk::new(3, vec!['d']), Chunk::new(4, vec!['D']))
                .unwrap(),
        ])
    }

    #[test]
    fn test_apply_replays_from_the_end() {
        let previous = vec!['a', 'b', 'c', 'd', 'e'];

        let next = patch().apply(&previous).unwrap();

        assert_eq!(next, vec!['b', 'x', 'y', 'c', 'D', 'e']);
        assert_eq!(previous, vec!['a', 'b', 'c', 'd', 'e'], "input must be untouched");
    }

    #[test]
    fn test_restore() {
        let next = vec!['b', 'x', 'y', 'c', 'D', 'e'];

        assert_eq!(
            patch().restore(&next).unwrap(),
            vec!['a', 'b', 'c', 'd', 'e']
        );
    }

    #[test]
    fn test_inverted_applies_like_restore() {
        let next = vec!['b', 'x', 'y', 'c', 'D', 'e'];

        assert_eq!(patch().inverted().apply(&next), patch().restore(&next));
    }

    #[test]
    fn test_apply_on_drifted_target() {
        let error = patch().apply(&['a', 'b', 'c', 'Q', 'e']).unwrap_err();

        assert_eq!(error.delta().kind(), DeltaKind::Change);
        assert_eq!(error.mismatch(), &PatchMismatch::ContentDiffers { position: 3 });
    }

    #[test]
    fn test_try_from_rejects_unordered_deltas() {
        let mut deltas = patch().into_iter().collect::<Vec<_>>();
        assert_eq!(Patch::try_from(deltas.clone()), Ok(patch()));

        deltas.swap(0, 1);
        assert_eq!(
            Patch::try_from(deltas),
            Err(DiffError::UnorderedDeltas { index: 1 })
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates_deltas() {
        let yaml = serde_yaml::to_string(&patch()).unwrap();
        assert_eq!(serde_yaml::from_str::<Patch<char>>(&yaml).unwrap(), patch());

        let unordered = "
- kind: Insert
  previous: { index: 2, elements: [] }
  next: { index: 1, elements: [x] }
- kind: Delete
  previous: { index: 0, elements: [a] }
  next: { index: 0, elements: [] }
";
        assert!(serde_yaml::from_str::<Patch<char>>(unordered).is_err());

        let empty_change = "
- kind: Change
  previous: { index: 0, elements: [a] }
  next: { index: 0, elements: [] }
";
        assert!(serde_yaml::from_str::<Patch<char>>(empty_change).is_err());
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let patch = Patch::<char>::default();

        assert!(patch.is_empty());
        assert_eq!(patch.apply(&['a']).unwrap(), vec!['a']);
        assert_eq!(patch.restore(&['a']).unwrap(), vec!['a']);
    }
}
