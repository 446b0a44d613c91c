use std::{collections::HashMap, fmt::Debug, ops::Range};

use super::{
    Conflict, ConflictDecision, DecisionKind, Fallback, MergeConfig, MergeError, MergeLog,
};
use crate::{Chunk, Delta, Equality};

/// An edit to be replayed on the current version, positioned in its
/// coordinates, together with the ancestor span it originates from. The
/// ancestor span decides the replay order.
#[derive(Debug, Clone)]
struct ReplayStep<E>
where
    E: Clone + Debug,
{
    ancestor_span: Range<usize>,
    delta: Delta<E>,
}

/// Outcome of a three-way merge.
///
/// `merged` is `None` only when the merge needs an explicit decision from the
/// caller. Conflicts are resolved with the configured fallback until the
/// caller decides otherwise through `resolve`.
#[derive(Debug, Clone)]
pub struct MergeResult<E>
where
    E: Clone + Debug,
{
    common_ancestor: Vec<E>,
    next: Vec<E>,
    current: Vec<E>,
    merged: Option<Vec<E>>,
    conflicts: Vec<Conflict<E>>,
    log: MergeLog,
    config: MergeConfig,
    replayed: Vec<ReplayStep<E>>,
    requires_decision: bool,

    /// Length of the log before the first resolution. Entries past it are
    /// replaced on every `resolve`.
    resolution_log_start: Option<usize>,
}

impl<E> MergeResult<E>
where
    E: Clone + Debug,
{
    pub(crate) fn new(
        common_ancestor: &[E],
        next: &[E],
        current: &[E],
        config: MergeConfig,
    ) -> Self {
        Self {
            common_ancestor: common_ancestor.to_vec(),
            next: next.to_vec(),
            current: current.to_vec(),
            merged: None,
            conflicts: Vec::new(),
            log: MergeLog::new(),
            config,
            replayed: Vec::new(),
            requires_decision: false,
            resolution_log_start: None,
        }
    }

    #[must_use]
    pub fn common_ancestor(&self) -> &[E] { &self.common_ancestor }

    #[must_use]
    pub fn next(&self) -> &[E] { &self.next }

    #[must_use]
    pub fn current(&self) -> &[E] { &self.current }

    #[must_use]
    pub fn merged(&self) -> Option<&[E]> { self.merged.as_deref() }

    #[must_use]
    pub fn into_merged(self) -> Option<Vec<E>> { self.merged }

    #[must_use]
    pub fn conflicts(&self) -> &[Conflict<E>] { &self.conflicts }

    #[must_use]
    pub fn has_conflicts(&self) -> bool { !self.conflicts.is_empty() }

    #[must_use]
    pub fn log(&self) -> &MergeLog { &self.log }

    #[must_use]
    pub fn config(&self) -> &MergeConfig { &self.config }

    /// Rebuilds `merged` from the caller's decisions, keyed by
    /// `Conflict::index`. Conflicts without a decision (or an `Undecided`
    /// one) use the configured fallback. A `Custom` decision replaces the
    /// conflicting span with the elements of its chunk, the chunk's index
    /// is ignored.
    ///
    /// When the merge could not proceed without a decision, `merged` stays
    /// `None` until every conflict is decided.
    pub fn resolve(&mut self, decisions: &HashMap<usize, ConflictDecision<E>>)
    where
        E: PartialEq,
    {
        self.resolve_by(decisions, &|a: &E, b: &E| a == b);
    }

    /// Same as `resolve` but compares elements with the given equality.
    pub fn resolve_by(
        &mut self,
        decisions: &HashMap<usize, ConflictDecision<E>>,
        equality: &Equality<E>,
    ) {
        let log_start = *self.resolution_log_start.get_or_insert(self.log.len());
        self.log.truncate(log_start);

        let mut steps = self.replayed.clone();
        let mut is_complete = true;

        for conflict in &self.conflicts {
            let index = conflict.index();
            let decision = decisions.get(&index);

            let chosen = match decision.map(|decision| (decision.kind, &decision.custom_chunk)) {
                Some((DecisionKind::Previous, _)) => Some(conflict.previous_elements()),
                Some((DecisionKind::Current, _)) => Some(conflict.current_elements()),
                Some((DecisionKind::Next, _)) => Some(conflict.next_elements()),
                Some((DecisionKind::Custom, Some(chunk))) => Some(chunk.elements()),
                Some((DecisionKind::Custom, None)) => {
                    self.log.error(Some(index), &MergeError::MissingCustomChunk { index });
                    self.fallback_for(conflict)
                }
                Some((DecisionKind::Undecided, _)) | None => self.fallback_for(conflict),
            };

            match chosen {
                Some(elements) => steps.extend(resolution_step(conflict, elements)),
                None => is_complete = false,
            }
        }

        if !is_complete {
            self.merged = None;
            return;
        }

        steps.sort_by_key(|step| (step.ancestor_span.start, step.ancestor_span.end));

        let mut merged = self.current.clone();
        for step in steps.iter().rev() {
            if let Err(error) = step.delta.apply_by(&mut merged, equality) {
                let index = step.ancestor_span.start;
                self.log.error(Some(index), &MergeError::ReplayFailed {
                    index,
                    source: error.mismatch().clone(),
                });
            }
        }

        self.merged = Some(merged);
    }

    /// The elements the configured fallback picks for the conflict, or `None`
    /// if the merge must wait for the caller.
    fn fallback_for<'c>(&self, conflict: &'c Conflict<E>) -> Option<&'c [E]> {
        if self.requires_decision {
            return None;
        }

        let fallback = self.config.fallback_on_conflict;
        log::debug!(
            "Resolving conflict at index {} with the {fallback} version",
            conflict.index()
        );

        Some(match fallback {
            Fallback::Previous => conflict.previous_elements(),
            Fallback::Next => conflict.next_elements(),
            Fallback::Current => conflict.current_elements(),
        })
    }

    pub(crate) fn log_mut(&mut self) -> &mut MergeLog { &mut self.log }

    pub(crate) fn set_merged(&mut self, merged: Vec<E>) { self.merged = Some(merged); }

    pub(crate) fn push_replayed(&mut self, ancestor_span: Range<usize>, delta: Delta<E>) {
        self.replayed.push(ReplayStep {
            ancestor_span,
            delta,
        });
    }

    pub(crate) fn push_conflict(&mut self, conflict: Conflict<E>) {
        self.log.warning(
            Some(conflict.index()),
            format!(
                "Conflicting changes at index {}: {} {} elements in the next version, {} {} in \
                 the current one",
                conflict.index(),
                conflict.delta_next().kind(),
                conflict.delta_next().max_chunk_size(),
                conflict.delta_current().kind(),
                conflict.delta_current().max_chunk_size(),
            ),
        );
        self.conflicts.push(conflict);
    }

    /// Registers a conflict which the fallback must not resolve.
    pub(crate) fn push_blocking_conflict(&mut self, conflict: Conflict<E>) {
        self.requires_decision = true;
        self.merged = None;
        self.conflicts.push(conflict);
    }
}

/// The edit replacing the conflict's span of the current version with
/// `elements`. Keeping the current elements needs no edit.
fn resolution_step<E>(conflict: &Conflict<E>, elements: &[E]) -> Option<ReplayStep<E>>
where
    E: Clone + Debug,
{
    let current_span = conflict.delta_current().next();
    if std::ptr::eq(elements, current_span.elements()) {
        return None;
    }

    let delta = Delta::from_chunks(
        current_span.clone(),
        Chunk::new(current_span.index(), elements.to_vec()),
    )
    .ok()?;

    Some(ReplayStep {
        ancestor_span: conflict.index()..conflict.delta_next().previous().end(),
        delta,
    })
}
