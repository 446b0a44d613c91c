use std::ops::Range;

/// A step of an edit script in terms of positions in the old and the new
/// sequence.
///
/// `Delete` keeps the position in the new sequence it happens at, `Insert`
/// the position in the old one, so that every operation can be placed on
/// both sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawOperation {
    Equal { old: Range<usize>, new: Range<usize> },
    Delete { old: Range<usize>, new_index: usize },
    Insert { old_index: usize, new: Range<usize> },
}

impl RawOperation {
    pub fn old_range(&self) -> Range<usize> {
        match self {
            RawOperation::Equal { old, .. } | RawOperation::Delete { old, .. } => old.clone(),
            RawOperation::Insert { old_index, .. } => *old_index..*old_index,
        }
    }

    pub fn new_range(&self) -> Range<usize> {
        match self {
            RawOperation::Equal { new, .. } | RawOperation::Insert { new, .. } => new.clone(),
            RawOperation::Delete { new_index, .. } => *new_index..*new_index,
        }
    }

    pub fn is_empty(&self) -> bool { self.old_range().is_empty() && self.new_range().is_empty() }
}
