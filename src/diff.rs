mod cook_deltas;
mod diff_error;
mod lcs_diff;
mod myers_diff;
mod raw_operation;

use std::fmt::Debug;

pub use diff_error::DiffError;
use log::debug;

use crate::Patch;

/// Element equality used when comparing sequences. Callers with structured
/// elements supply their own, otherwise `PartialEq::eq` is used.
pub type Equality<E> = dyn Fn(&E, &E) -> bool;

/// The algorithm used to find the longest common subsequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffAlgorithm {
    /// Myers' `O((N+M)D)` algorithm with linear space.
    #[default]
    Myers,

    /// A full `O(NM)` dynamic programming table. Only meant for small inputs
    /// or as a reference to compare against.
    LcsTable,
}

/// Computes minimal patches between sequences.
///
/// The engine holds no state besides its configuration, so a single instance
/// can be shared between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffEngine {
    algorithm: DiffAlgorithm,
}

impl DiffEngine {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn with_algorithm(algorithm: DiffAlgorithm) -> Self { Self { algorithm } }

    #[must_use]
    pub fn algorithm(&self) -> DiffAlgorithm { self.algorithm }

    /// Returns the patch turning `previous` into `next`.
    ///
    /// # Errors
    ///
    /// Returns `DiffError` if the computed edit script breaks its own
    /// invariants, which doesn't happen for well-formed input.
    pub fn diff<E>(&self, previous: &[E], next: &[E]) -> Result<Patch<E>, DiffError>
    where
        E: PartialEq + Clone + Debug,
    {
        self.diff_by(previous, next, &|a: &E, b: &E| a == b)
    }

    /// Same as `diff` but compares elements with the given equality.
    ///
    /// # Errors
    ///
    /// See `diff`.
    pub fn diff_by<E>(
        &self,
        previous: &[E],
        next: &[E],
        equality: &Equality<E>,
    ) -> Result<Patch<E>, DiffError>
    where
        E: Clone + Debug,
    {
        let raw_operations = match self.algorithm {
            DiffAlgorithm::Myers => myers_diff::myers_diff(previous, next, equality),
            DiffAlgorithm::LcsTable => lcs_diff::lcs_diff(previous, next, equality),
        };

        let patch = cook_deltas::cook_deltas(previous, next, raw_operations)?;

        debug!(
            "Diffed {} against {} elements using {:?}: {} deltas",
            previous.len(),
            next.len(),
            self.algorithm,
            patch.len()
        );

        Ok(patch)
    }
}
