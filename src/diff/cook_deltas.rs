use std::{fmt::Debug, ops::Range};

use super::{DiffError, raw_operation::RawOperation};
use crate::{Chunk, Delta, Patch};

/// Turns raw operations into a `Patch`. The deletions and insertions between
/// two equal runs are joined into a single delta, so interleaved steps such
/// as `DIDI` become one `Change` instead of a series of small edits.
pub fn cook_deltas<E, I>(previous: &[E], next: &[E], raw_operations: I) -> Result<Patch<E>, DiffError>
where
    E: Clone + Debug,
    I: IntoIterator<Item = RawOperation>,
{
    let mut deltas = Vec::new();
    let mut previous_position = 0;
    let mut next_position = 0;
    let mut pending: Option<(Range<usize>, Range<usize>)> = None;

    for operation in raw_operations {
        if operation.is_empty() {
            continue;
        }

        let (previous_range, next_range) = (operation.old_range(), operation.new_range());
        debug_assert_eq!(
            (previous_range.start, next_range.start),
            (previous_position, next_position),
            "Raw operations must be contiguous"
        );

        match operation {
            RawOperation::Equal { .. } => {
                if let Some((previous_span, next_span)) = pending.take() {
                    deltas.push(create_delta(previous, previous_span, next, next_span)?);
                }
            }
            RawOperation::Delete { .. } | RawOperation::Insert { .. } => {
                let (previous_span, next_span) = pending.get_or_insert((
                    previous_position..previous_position,
                    next_position..next_position,
                ));
                previous_span.end = previous_range.end;
                next_span.end = next_range.end;
            }
        }

        previous_position = previous_range.end;
        next_position = next_range.end;
    }

    if let Some((previous_span, next_span)) = pending {
        deltas.push(create_delta(previous, previous_span, next, next_span)?);
    }

    check_coverage("previous", previous_position, previous.len())?;
    check_coverage("next", next_position, next.len())?;

    Ok(Patch::from_deltas(deltas))
}

fn create_delta<E>(
    previous: &[E],
    previous_span: Range<usize>,
    next: &[E],
    next_span: Range<usize>,
) -> Result<Delta<E>, DiffError>
where
    E: Clone + Debug,
{
    check_within("previous", &previous_span, previous.len())?;
    check_within("next", &next_span, next.len())?;

    Delta::from_chunks(
        Chunk::new(previous_span.start, previous[previous_span].to_vec()),
        Chunk::new(next_span.start, next[next_span].to_vec()),
    )
}

fn check_within(
    sequence: &'static str,
    span: &Range<usize>,
    available: usize,
) -> Result<(), DiffError> {
    if span.end <= available {
        Ok(())
    } else {
        Err(DiffError::ScriptLengthMismatch {
            sequence,
            covered: span.end,
            available,
        })
    }
}

fn check_coverage(sequence: &'static str, covered: usize, available: usize) -> Result<(), DiffError> {
    if covered == available {
        Ok(())
    } else {
        Err(DiffError::ScriptLengthMismatch {
            sequence,
            covered,
            available,
        })
    }
}
