use std::collections::VecDeque;

/// Which extreme a [`MonotonicDeque`] tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Extreme {
    Min,
    Max,
}

/// Sliding-window min or max with O(1) amortized push and eviction.
///
/// Entries are `(push_index, value)` kept monotonic from front to back, so the
/// front is always the extreme of the live window.
#[derive(Debug, Clone)]
pub(crate) struct MonotonicDeque {
    extreme: Extreme,
    entries: VecDeque<(usize, f64)>,
}

impl MonotonicDeque {
    pub(crate) fn new(extreme: Extreme, capacity: usize) -> Self {
        Self {
            extreme,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, index: usize, value: f64) {
        while let Some(&(_, back)) = self.entries.back() {
            let dominated = match self.extreme {
                Extreme::Min => back >= value,
                Extreme::Max => back <= value,
            };
            if !dominated {
                break;
            }
            self.entries.pop_back();
        }
        self.entries.push_back((index, value));
    }

    /// Drop entries pushed before `oldest_live`.
    pub(crate) fn evict_before(&mut self, oldest_live: usize) {
        while let Some(&(index, _)) = self.entries.front() {
            if index >= oldest_live {
                break;
            }
            self.entries.pop_front();
        }
    }

    pub(crate) fn front(&self) -> Option<f64> {
        self.entries.front().map(|&(_, v)| v)
    }
}
