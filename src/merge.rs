mod conflict;
mod merge_config;
mod merge_log;
mod merge_result;
mod overlap_cluster;

use std::{collections::HashMap, fmt::Debug};

pub use conflict::{Conflict, ConflictDecision, DecisionKind};
use log::debug;
pub use merge_config::{Fallback, MergeConfig, MergeConfigError};
pub use merge_log::{LogEntry, LogLevel, MergeError, MergeLog};
pub use merge_result::MergeResult;
use overlap_cluster::{OverlapCluster, overlap_clusters, translate};

use crate::{
    Chunk, Delta, DiffEngine, DiffError, Equality, Patch, utils::sequences_equal::sequences_equal,
};

/// Three-way merge of sequences.
///
/// The edits leading from the common ancestor to the next version are
/// replayed on the current version. Edits touching a part of the ancestor
/// which the current version has changed differently are reported as
/// conflicts and resolved with the configured fallback.
///
/// The engine is stateless apart from its configuration, every call works on
/// its own copies of the inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeEngine {
    config: MergeConfig,
    diff_engine: DiffEngine,
}

impl MergeEngine {
    #[must_use]
    pub fn new(config: MergeConfig) -> Self {
        Self {
            config,
            diff_engine: DiffEngine::default(),
        }
    }

    #[must_use]
    pub fn with_diff_engine(mut self, diff_engine: DiffEngine) -> Self {
        self.diff_engine = diff_engine;
        self
    }

    #[must_use]
    pub fn config(&self) -> &MergeConfig { &self.config }

    #[must_use]
    pub fn merge<E>(&self, common_ancestor: &[E], next: &[E], current: &[E]) -> MergeResult<E>
    where
        E: PartialEq + Clone + Debug,
    {
        self.merge_by(common_ancestor, next, current, &|a: &E, b: &E| a == b)
    }

    /// Same as `merge` but compares elements with the given equality.
    #[must_use]
    pub fn merge_by<E>(
        &self,
        common_ancestor: &[E],
        next: &[E],
        current: &[E],
        equality: &Equality<E>,
    ) -> MergeResult<E>
    where
        E: Clone + Debug,
    {
        let mut result = MergeResult::new(common_ancestor, next, current, self.config);

        if sequences_equal(common_ancestor, next, equality) {
            debug!("No incoming changes, keeping the current version");
            result.set_merged(current.to_vec());
        } else if current.is_empty() {
            merge_into_empty(common_ancestor, next, &mut result);
        } else {
            self.merge_general(common_ancestor, next, current, equality, &mut result);
        }

        result
    }

    fn merge_general<E>(
        &self,
        common_ancestor: &[E],
        next: &[E],
        current: &[E],
        equality: &Equality<E>,
        result: &mut MergeResult<E>,
    ) where
        E: Clone + Debug,
    {
        let patches = self
            .diff_engine
            .diff_by(common_ancestor, next, equality)
            .map_err(|source| MergeError::Diff {
                sequence: "next",
                source,
            })
            .and_then(|incoming| {
                self.diff_engine
                    .diff_by(common_ancestor, current, equality)
                    .map(|local| (incoming, local))
                    .map_err(|source| MergeError::Diff {
                        sequence: "current",
                        source,
                    })
            });

        let (incoming, local) = match patches {
            Ok(patches) => patches,
            Err(error) => {
                result.log_mut().error(None, &error);
                return;
            }
        };

        let replay = Replay {
            common_ancestor,
            next,
            current,
            incoming: &incoming,
            local: &local,
            equality,
        };

        let clusters = overlap_clusters(&incoming, &local);
        debug!(
            "Replaying {} incoming deltas over {} local ones in {} clusters",
            incoming.len(),
            local.len(),
            clusters.len()
        );

        for cluster in &clusters {
            match (cluster.incoming().is_empty(), cluster.local().is_empty()) {
                (false, true) => {
                    for delta in cluster.incoming() {
                        replay.replay_clean(delta, result);
                    }
                }
                (false, false) => replay.reconcile(cluster, result),
                // Local edits are already part of the current version
                (true, _) => {}
            }
        }

        result.resolve_by(&HashMap::new(), equality);
    }
}

/// The current version is empty while the ancestor and the next version
/// differ.
fn merge_into_empty<E>(common_ancestor: &[E], next: &[E], result: &mut MergeResult<E>)
where
    E: Clone + Debug,
{
    if common_ancestor.is_empty() {
        debug!("Adopting the next version as there's nothing to merge it with");

        // Recorded as a replayed insertion so that `resolve` rebuilds it
        match Delta::from_chunks(Chunk::new(0, Vec::new()), Chunk::new(0, next.to_vec())) {
            Ok(adoption) => result.push_replayed(0..0, adoption),
            Err(source) => result.log_mut().error(None, &MergeError::Diff {
                sequence: "next",
                source,
            }),
        }
        result.set_merged(next.to_vec());
    } else if next.is_empty() {
        result.log_mut().warning(
            None,
            "Modification already applied: the current version is already empty",
        );
        result.set_merged(Vec::new());
    } else {
        result.log_mut().error(Some(0), &MergeError::CurrentEmpty);

        match whole_sequence_conflict(common_ancestor, next) {
            Ok(conflict) => result.push_blocking_conflict(conflict),
            Err(source) => result.log_mut().error(Some(0), &MergeError::Diff {
                sequence: "next",
                source,
            }),
        }
    }
}

/// Conflict between the current version deleting everything and the next
/// version changing the ancestor.
fn whole_sequence_conflict<E>(common_ancestor: &[E], next: &[E]) -> Result<Conflict<E>, DiffError>
where
    E: Clone + Debug,
{
    let delta_current =
        Delta::from_chunks(Chunk::new(0, common_ancestor.to_vec()), Chunk::new(0, Vec::new()))?;
    let delta_next =
        Delta::from_chunks(Chunk::new(0, common_ancestor.to_vec()), Chunk::new(0, next.to_vec()))?;

    Ok(Conflict::new(0, delta_current, delta_next))
}

struct Replay<'a, E>
where
    E: Clone + Debug,
{
    common_ancestor: &'a [E],
    next: &'a [E],
    current: &'a [E],
    incoming: &'a Patch<E>,
    local: &'a Patch<E>,
    equality: &'a Equality<E>,
}

impl<E> Replay<'_, E>
where
    E: Clone + Debug,
{
    /// Replays an incoming delta which no local edit touches. The delta is
    /// moved to the current version's coordinates and must find the
    /// ancestor's elements there.
    fn replay_clean(&self, delta: &Delta<E>, result: &mut MergeResult<E>) {
        let index = delta.previous().index();
        let rebased = delta.rebased(translate(index, self.local, &[]));

        match rebased.verify_by(self.current, self.equality) {
            Ok(()) => result.push_replayed(index..delta.previous().end(), rebased),
            Err(source) => result
                .log_mut()
                .error(Some(index), &MergeError::ReplayFailed { index, source }),
        }
    }

    /// Turns a cluster edited on both sides into a conflict, unless both
    /// sides ended up with the same elements.
    fn reconcile(&self, cluster: &OverlapCluster<'_, E>, result: &mut MergeResult<E>) {
        let index = cluster.span().start;

        let combined = cluster
            .combine(self.common_ancestor, self.next, self.incoming, cluster.incoming())
            .and_then(|delta_next| {
                cluster
                    .combine(self.common_ancestor, self.current, self.local, cluster.local())
                    .map(|delta_current| (delta_next, delta_current))
            });

        match combined {
            Ok((delta_next, delta_current)) => {
                if sequences_equal(
                    delta_next.next().elements(),
                    delta_current.next().elements(),
                    self.equality,
                ) {
                    result.log_mut().info(
                        Some(index),
                        format!("Change at index {index} is already present in the current version"),
                    );
                } else {
                    result.push_conflict(Conflict::new(index, delta_current, delta_next));
                }
            }
            Err(source) => result.log_mut().error(Some(index), &MergeError::Diff {
                sequence: "current",
                source,
            }),
        }
    }
}
