/*
    pagination.rs - Bounded reverse-chronological reads

    Every read path walks an append-only log from its tail toward slot 0.
    The cursor position is an Option<usize>; None means the walk is
    exhausted, so stepping past slot 0 can never wrap.
*/

use super::errors::{LedgerError, LedgerResult};

/// Iterator over slot indices `len - 1, len - 2, ..., 0`, bounded by a count
#[derive(Debug, Clone)]
pub struct ReverseCursor {
    next: Option<usize>,
    remaining: usize,
}

impl ReverseCursor {
    pub fn new(len: usize, count: usize) -> Self {
        Self {
            next: len.checked_sub(1),
            remaining: count.min(len),
        }
    }
}

impl Iterator for ReverseCursor {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        self.next = current.checked_sub(1);
        self.remaining -= 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ReverseCursor {}

/// Reject a zero page size
pub fn check_count(count: usize) -> LedgerResult<()> {
    if count == 0 {
        return Err(LedgerError::InvalidArgument(
            "count must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

/// The last `min(count, items.len())` items, newest first
pub fn latest<T>(items: &[T], count: usize) -> LedgerResult<Vec<&T>> {
    check_count(count)?;
    Ok(ReverseCursor::new(items.len(), count)
        .map(|i| &items[i])
        .collect())
}
