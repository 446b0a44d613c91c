use std::{fmt::Debug, ops::Range};

use crate::{Chunk, Delta, DiffError, Patch, utils::merge_iters::MergeSorted};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Incoming,
    Local,
}

/// A maximal group of deltas from the incoming (ancestor to next) and the
/// local (ancestor to current) patch whose ancestor spans overlap.
///
/// Spans overlap if they intersect. An insertion point overlaps a span which
/// strictly contains it, and another insertion point at the same position.
/// Edits which merely touch never overlap.
#[derive(Debug)]
pub struct OverlapCluster<'a, E>
where
    E: Clone + Debug,
{
    span: Range<usize>,
    incoming: Vec<&'a Delta<E>>,
    local: Vec<&'a Delta<E>>,
}

impl<'a, E> OverlapCluster<'a, E>
where
    E: Clone + Debug,
{
    fn new(origin: Origin, delta: &'a Delta<E>) -> Self {
        let mut cluster = Self {
            span: ancestor_span(delta),
            incoming: Vec::new(),
            local: Vec::new(),
        };
        cluster.push(origin, delta);

        cluster
    }

    fn push(&mut self, origin: Origin, delta: &'a Delta<E>) {
        self.span.end = self.span.end.max(delta.previous().end());
        match origin {
            Origin::Incoming => self.incoming.push(delta),
            Origin::Local => self.local.push(delta),
        }
    }

    fn collides_with(&self, delta: &Delta<E>) -> bool {
        collides(&self.span, &ancestor_span(delta))
    }

    /// The span of the common ancestor covered by the cluster.
    pub fn span(&self) -> Range<usize> { self.span.clone() }

    pub fn incoming(&self) -> &[&'a Delta<E>] { &self.incoming }

    pub fn local(&self) -> &[&'a Delta<E>] { &self.local }

    /// Joins the deltas of one side into a single delta replacing the whole
    /// ancestor span of the cluster. The `next` chunk of the result is cut
    /// from `edited`, the sequence `patch` produces.
    pub fn combine(
        &self,
        ancestor: &[E],
        edited: &[E],
        patch: &Patch<E>,
        members: &[&Delta<E>],
    ) -> Result<Delta<E>, DiffError> {
        let edited_start = translate(self.span.start, patch, members);
        let grown: usize = members.iter().map(|delta| delta.next().size()).sum();
        let shrunk: usize = members.iter().map(|delta| delta.previous().size()).sum();
        let edited_end = edited_start + self.span.len() + grown - shrunk;

        let previous = ancestor
            .get(self.span.clone())
            .ok_or(DiffError::ScriptLengthMismatch {
                sequence: "previous",
                covered: self.span.end,
                available: ancestor.len(),
            })?;
        let next = edited
            .get(edited_start..edited_end)
            .ok_or(DiffError::ScriptLengthMismatch {
                sequence: "next",
                covered: edited_end,
                available: edited.len(),
            })?;

        Delta::from_chunks(
            Chunk::new(self.span.start, previous.to_vec()),
            Chunk::new(edited_start, next.to_vec()),
        )
    }
}

/// Groups the deltas of both patches into clusters, in ascending ancestor
/// order. Both patches must have been computed from the same ancestor.
pub fn overlap_clusters<'a, E>(
    incoming: &'a Patch<E>,
    local: &'a Patch<E>,
) -> Vec<OverlapCluster<'a, E>>
where
    E: Clone + Debug,
{
    let mut clusters: Vec<OverlapCluster<'a, E>> = Vec::new();

    let deltas = incoming
        .iter()
        .map(|delta| (Origin::Incoming, delta))
        .merge_sorted_by_key(local.iter().map(|delta| (Origin::Local, delta)), |(_, delta)| {
            (delta.previous().index(), delta.previous().end())
        });

    for (origin, delta) in deltas {
        match clusters.last_mut() {
            Some(cluster) if cluster.collides_with(delta) => cluster.push(origin, delta),
            _ => clusters.push(OverlapCluster::new(origin, delta)),
        }
    }

    clusters
}

/// Maps a position of the ancestor to the sequence produced by `patch`,
/// ignoring the `excluded` deltas. Insertions at `position` itself are
/// counted as coming before it.
pub fn translate<E>(position: usize, patch: &Patch<E>, excluded: &[&Delta<E>]) -> usize
where
    E: Clone + Debug,
{
    let (grown, shrunk) = patch
        .iter()
        .take_while(|delta| delta.previous().end() <= position)
        .filter(|delta| !excluded.iter().any(|member| std::ptr::eq(*member, *delta)))
        .fold((0, 0), |(grown, shrunk), delta| {
            (grown + delta.next().size(), shrunk + delta.previous().size())
        });

    position - shrunk + grown
}

fn ancestor_span<E>(delta: &Delta<E>) -> Range<usize>
where
    E: Clone + Debug,
{
    delta.previous().index()..delta.previous().end()
}

fn collides(first: &Range<usize>, second: &Range<usize>) -> bool {
    match (first.is_empty(), second.is_empty()) {
        (true, true) => first.start == second.start,
        (true, false) => second.start < first.start && first.start < second.end,
        (false, true) => first.start < second.start && second.start < first.end,
        (false, false) => first.start < second.end && second.start < first.end,
    }
}
