use std::fmt::Debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Chunk, Delta};

/// A span of the common ancestor which was edited differently by the incoming
/// (ancestor to next) and the current (ancestor to current) side.
///
/// Both deltas share the ancestor span as their `previous` chunk. The `next`
/// chunk of `delta_next` is positioned in the next version, the `next` chunk
/// of `delta_current` in the current version.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict<E>
where
    E: Clone + Debug,
{
    index: usize,
    delta_current: Delta<E>,
    delta_next: Delta<E>,
}

impl<E> Conflict<E>
where
    E: Clone + Debug,
{
    pub(crate) fn new(index: usize, delta_current: Delta<E>, delta_next: Delta<E>) -> Self {
        Self {
            index,
            delta_current,
            delta_next,
        }
    }

    /// Position of the conflicting span in the common ancestor. This is the
    /// key callers use to hand in a `ConflictDecision`.
    #[must_use]
    pub fn index(&self) -> usize { self.index }

    #[must_use]
    pub fn delta_current(&self) -> &Delta<E> { &self.delta_current }

    #[must_use]
    pub fn delta_next(&self) -> &Delta<E> { &self.delta_next }

    /// The ancestor's content of the conflicting span.
    #[must_use]
    pub fn previous_elements(&self) -> &[E] { self.delta_next.previous().elements() }

    #[must_use]
    pub fn next_elements(&self) -> &[E] { self.delta_next.next().elements() }

    #[must_use]
    pub fn current_elements(&self) -> &[E] { self.delta_current.next().elements() }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DecisionKind {
    #[default]
    Undecided,
    Previous,
    Current,
    Next,
    Custom,
}

/// The caller's resolution of a single `Conflict`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictDecision<E>
where
    E: Clone + Debug,
{
    pub kind: DecisionKind,

    /// Replacement for the conflicting span, only read for `Custom`.
    pub custom_chunk: Option<Chunk<E>>,
}

impl<E> Default for ConflictDecision<E>
where
    E: Clone + Debug,
{
    fn default() -> Self {
        Self {
            kind: DecisionKind::Undecided,
            custom_chunk: None,
        }
    }
}

impl<E> ConflictDecision<E>
where
    E: Clone + Debug,
{
    #[must_use]
    pub fn new(kind: DecisionKind) -> Self {
        Self {
            kind,
            custom_chunk: None,
        }
    }

    #[must_use]
    pub fn custom(chunk: Chunk<E>) -> Self {
        Self {
            kind: DecisionKind::Custom,
            custom_chunk: Some(chunk),
        }
    }

    #[must_use]
    pub fn is_decided(&self) -> bool { self.kind != DecisionKind::Undecided }
}
