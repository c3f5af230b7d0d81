//! Timeline ring buffer with per-category running counts.
//!
//! The presentation layer only ever shows the most recent slice of the
//! event stream, so the buffer holds a fixed window and forgets the rest.
//! Eviction forgets payloads only: the per-category counts keep counting
//! for the life of the run and feed the end-of-run summary.

use std::collections::BTreeMap;

use clarion_types::{EventCategory, TimelineEvent};

/// Maximum events kept in the buffer.
pub const TIMELINE_CAPACITY: usize = 120;

/// Bounded event log, newest first.
#[derive(Debug, Clone, Default)]
pub struct TimelineLog {
    /// Retained events, newest first.
    events: Vec<TimelineEvent>,
    /// Events ever seen per category, including evicted ones.
    counts: BTreeMap<EventCategory, u64>,
}

impl TimelineLog {
    /// Create an empty log.
    pub const fn new() -> Self {
        Self {
            events: Vec::new(),
            counts: BTreeMap::new(),
        }
    }

    /// Add an event to the log.
    ///
    /// If the log exceeds [`TIMELINE_CAPACITY`], the oldest events are
    /// removed. Duplicate IDs are kept as-is; the producer may replay a
    /// phase.
    pub fn push(&mut self, event: TimelineEvent) {
        let count = self.counts.entry(event.category).or_insert(0);
        *count = count.saturating_add(1);

        self.events.insert(0, event);
        if self.events.len() > TIMELINE_CAPACITY {
            self.events.truncate(TIMELINE_CAPACITY);
        }
    }

    /// All retained events, newest first.
    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    /// Iterate retained events, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &TimelineEvent> {
        self.events.iter()
    }

    /// Retained events in one category, newest first.
    pub fn by_category(
        &self,
        category: EventCategory,
    ) -> impl Iterator<Item = &TimelineEvent> {
        self.events.iter().filter(move |e| e.category == category)
    }

    /// Number of retained events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events ever seen in one category, counting evicted ones.
    pub fn count(&self, category: EventCategory) -> u64 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Per-category totals for the life of the run.
    pub const fn counts(&self) -> &BTreeMap<EventCategory, u64> {
        &self.counts
    }

    /// Drop all events and counts.
    pub fn reset(&mut self) {
        self.events.clear();
        self.counts.clear();
    }
}
