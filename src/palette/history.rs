use std::fmt;

use crate::color::ColorValue;
use crate::store::{DELETED_HISTORY_CAPACITY, GENERATED_HISTORY_CAPACITY};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HistoryKind {
    Generated,
    Deleted,
}

impl HistoryKind {
    pub fn capacity(self) -> usize {
        match self {
            HistoryKind::Generated => GENERATED_HISTORY_CAPACITY,
            HistoryKind::Deleted => DELETED_HISTORY_CAPACITY,
        }
    }
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryKind::Generated => f.write_str("generated"),
            HistoryKind::Deleted => f.write_str("deleted"),
        }
    }
}

/// Unique colors, most recent last, never longer than the kind's capacity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryList {
    kind: HistoryKind,
    entries: Vec<ColorValue>,
}

impl HistoryList {
    pub fn new(kind: HistoryKind, entries: Vec<ColorValue>) -> Self {
        let mut list = Self {
            kind,
            entries: Vec::with_capacity(kind.capacity() + 1),
        };
        for entry in entries {
            list.record(entry);
        }
        list
    }

    pub fn entries(&self) -> &[ColorValue] {
        &self.entries
    }

    /// Makes `color` the most recent entry, evicting the oldest when full.
    pub fn record(&mut self, color: ColorValue) {
        self.entries.retain(|entry| *entry != color);
        self.entries.push(color);
        let overflow = self.entries.len().saturating_sub(self.kind.capacity());
        self.entries.drain(..overflow);
    }
}

/// Owns the generated and deleted histories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryTracker {
    generated: HistoryList,
    deleted: HistoryList,
}

impl HistoryTracker {
    pub fn new(generated: Vec<ColorValue>, deleted: Vec<ColorValue>) -> Self {
        Self {
            generated: HistoryList::new(HistoryKind::Generated, generated),
            deleted: HistoryList::new(HistoryKind::Deleted, deleted),
        }
    }

    pub fn record_generated(&mut self, color: ColorValue) {
        self.generated.record(color);
    }

    pub fn record_deleted(&mut self, color: ColorValue) {
        self.deleted.record(color);
    }

    pub fn list(&self, kind: HistoryKind) -> &HistoryList {
        match kind {
            HistoryKind::Generated => &self.generated,
            HistoryKind::Deleted => &self.deleted,
        }
    }
}
