//! Minimal diffs between sequences of arbitrary elements and three-way merges
//! which report overlapping edits as explicit conflicts.
//!
//! The elements are opaque to this crate: they are only ever compared for
//! equality, either with `PartialEq` or with a caller-supplied [`Equality`].
//! Splitting documents into lines, words or nodes is up to the caller.

mod diff;
mod merge;
mod patch;
mod utils;

use std::fmt::Debug;

pub use diff::{DiffAlgorithm, DiffEngine, DiffError, Equality};
pub use merge::{
    Conflict, ConflictDecision, DecisionKind, Fallback, LogEntry, LogLevel, MergeConfig,
    MergeConfigError, MergeEngine, MergeError, MergeLog, MergeResult,
};
pub use patch::{Chunk, Delta, DeltaKind, Patch, PatchError, PatchMismatch};

/// Computes the minimal patch turning `previous` into `next` using Myers'
/// algorithm.
///
/// ```
/// use reconcile_sequence::{DeltaKind, diff};
///
/// let previous = ["a", "b", "c"];
/// let next = ["a", "X", "c", "d"];
///
/// let patch = diff(&previous, &next).unwrap();
/// assert_eq!(patch.len(), 2);
/// assert_eq!(patch.deltas()[0].kind(), DeltaKind::Change);
/// assert_eq!(patch.apply(&previous).unwrap(), next);
/// assert_eq!(patch.restore(&next).unwrap(), previous);
/// ```
///
/// # Errors
///
/// Returns `DiffError` only if the computed edit script breaks its own
/// invariants, which doesn't happen for well-formed input.
pub fn diff<E>(previous: &[E], next: &[E]) -> Result<Patch<E>, DiffError>
where
    E: PartialEq + Clone + Debug,
{
    DiffEngine::default().diff(previous, next)
}

/// Same as [`diff`] but compares elements with the given equality.
///
/// # Errors
///
/// See [`diff`].
pub fn diff_by<E>(previous: &[E], next: &[E], equality: &Equality<E>) -> Result<Patch<E>, DiffError>
where
    E: Clone + Debug,
{
    DiffEngine::default().diff_by(previous, next, equality)
}

/// Replays the changes leading from `common_ancestor` to `next` on `current`.
///
/// Changes which don't overlap with the ones made in `current` are merged
/// cleanly. Overlapping ones become [`Conflict`]s, resolved with the
/// configured [`Fallback`] until the caller decides otherwise through
/// [`MergeResult::resolve`]. Content-level problems never panic or fail the
/// call, they are collected in [`MergeResult::log`].
///
/// ```
/// use reconcile_sequence::{Fallback, MergeConfig, merge};
///
/// let ancestor = ["a", "b", "c", "d"];
/// let next = ["A", "b", "c", "d"];
/// let current = ["a", "b", "c", "D"];
///
/// let result = merge(&ancestor, &next, &current, &MergeConfig::default());
/// assert_eq!(result.merged(), Some(&["A", "b", "c", "D"][..]));
/// assert!(result.conflicts().is_empty());
///
/// let conflicting = ["a", "B", "c", "d"];
/// let result = merge(
///     &ancestor,
///     &["a", "X", "c", "d"],
///     &conflicting,
///     &MergeConfig::new(Fallback::Current),
/// );
/// assert_eq!(result.conflicts().len(), 1);
/// assert_eq!(result.merged(), Some(&conflicting[..]));
/// ```
#[must_use]
pub fn merge<E>(
    common_ancestor: &[E],
    next: &[E],
    current: &[E],
    config: &MergeConfig,
) -> MergeResult<E>
where
    E: PartialEq + Clone + Debug,
{
    MergeEngine::new(*config).merge(common_ancestor, next, current)
}

/// Same as [`merge`] but compares elements with the given equality.
#[must_use]
pub fn merge_by<E>(
    common_ancestor: &[E],
    next: &[E],
    current: &[E],
    config: &MergeConfig,
    equality: &Equality<E>,
) -> MergeResult<E>
where
    E: Clone + Debug,
{
    MergeEngine::new(*config).merge_by(common_ancestor, next, current, equality)
}
