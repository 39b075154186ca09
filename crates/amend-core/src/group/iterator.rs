//! Cursor over a resolved group sequence

use amend_api::GroupId;

/// Walks a resolved sequence one pass at a time, remembering the current group
#[derive(Debug, Clone)]
pub struct GroupSequenceIterator {
    sequence: Vec<GroupId>,
    next_index: usize,
}

impl GroupSequenceIterator {
    /// Create iterator over `sequence`
    #[must_use]
    pub fn new(sequence: Vec<GroupId>) -> Self {
        Self {
            sequence,
            next_index: 0,
        }
    }

    /// Check if another group remains
    #[inline]
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.next_index < self.sequence.len()
    }

    /// Group most recently returned by `next`
    #[must_use]
    pub fn current(&self) -> Option<&GroupId> {
        self.next_index
            .checked_sub(1)
            .and_then(|i| self.sequence.get(i))
    }
}

impl Iterator for GroupSequenceIterator {
    type Item = GroupId;

    fn next(&mut self) -> Option<GroupId> {
        let group = self.sequence.get(self.next_index)?.clone();
        self.next_index += 1;
        Some(group)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.sequence.len() - self.next_index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GroupSequenceIterator {}
