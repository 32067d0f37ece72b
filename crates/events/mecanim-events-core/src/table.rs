//! Event table: flat lookup from (controller, layer, state) to authored events.
//!
//! The table is immutable while sampling. Reloading a data source always builds a
//! fresh table and swaps it in whole.

use hashbrown::HashMap;

use crate::data::EventData;
use crate::event::TimedEvent;
use crate::ids::StateKey;

#[derive(Clone, Debug, Default)]
pub struct EventTable {
    entries: HashMap<StateKey, Vec<TimedEvent>>,
}

impl EventTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a single data source.
    pub fn from_data(data: &EventData) -> Self {
        let mut table = Self::new();
        table.load(data);
        table
    }

    /// Build a table from several sources. For a key present in more than one entry
    /// the last one wins; its event list replaces the earlier one entirely.
    pub fn from_sources(sources: &[EventData]) -> Self {
        let mut table = Self::new();
        for data in sources {
            table.load(data);
        }
        table
    }

    fn load(&mut self, data: &EventData) {
        for entry in &data.entries {
            if self
                .entries
                .insert(entry.key(), entry.events.clone())
                .is_some()
            {
                log::debug!("event table: entry {:?} replaced by a later source", entry.key());
            }
        }
    }

    /// Events for a key in declaration order; empty when the key is unknown.
    pub fn events(&self, key: &StateKey) -> &[TimedEvent] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Events for a key ordered by scheduled time (stable for equal times).
    /// Intended for display; sampling always uses declaration order.
    pub fn events_sorted_by_time(&self, key: &StateKey) -> Vec<&TimedEvent> {
        let mut sorted: Vec<&TimedEvent> = self.events(key).iter().collect();
        sorted.sort_by(|a, b| a.scheduled_time.total_cmp(&b.scheduled_time));
        sorted
    }

    pub fn contains(&self, key: &StateKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &StateKey> {
        self.entries.keys()
    }

    /// Number of (controller, layer, state) entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of events across all entries.
    pub fn event_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
