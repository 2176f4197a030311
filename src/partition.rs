//! Keyspace partitioning
//!
//! Splits the index range of one candidate length into contiguous chunks, one per worker.

use std::fmt;
use std::ops::Range;

/// Half-open index range `[start, end)` of candidates with `length` symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkItem {
    pub length: usize,
    pub start: u64,
    pub end: u64,
}

impl WorkItem {
    /// The whole keyspace of one length as a single item
    pub fn whole(length: usize, total: u64) -> Self {
        Self {
            length,
            start: 0,
            end: total,
        }
    }

    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn indices(&self) -> Range<u64> {
        self.start..self.end
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "len {} [{}, {})", self.length, self.start, self.end)
    }
}

/// Split `[0, total)` for candidates of `length` symbols across `workers`.
///
/// The last item absorbs the division remainder. Fewer items than workers are
/// issued when `total < workers`, and none when `total == 0`.
pub fn partition(length: usize, total: u64, workers: usize) -> Vec<WorkItem> {
    if total == 0 {
        return Vec::new();
    }

    let workers = (workers.max(1) as u64).min(total);
    let chunk = total / workers;

    (0..workers)
        .map(|i| {
            let start = i * chunk;
            let end = if i == workers - 1 { total } else { (i + 1) * chunk };
            WorkItem { length, start, end }
        })
        .collect()
}
