//! Bounded, insertion-ordered console log.
//!
//! Appending past capacity evicts from the front (oldest first). The only
//! other mutation is `clear()`.

use crate::types::LogEntry;
use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 500;

#[derive(Debug, Clone)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// Entries with an id greater than `id`, in order. Relies on ids being
    /// assigned monotonically by the writer.
    pub fn entries_after(&self, id: u64) -> impl Iterator<Item = &LogEntry> {
        let start = self.entries.partition_point(|e| e.id <= id);
        self.entries.range(start..)
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
