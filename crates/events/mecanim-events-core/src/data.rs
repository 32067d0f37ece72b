//! Event data sources: authored events grouped by controller, layer and state.

use serde::{Deserialize, Serialize};

use crate::error::EventDataError;
use crate::event::TimedEvent;
use crate::ids::{ControllerId, StateHash, StateKey};

/// All events authored for one state of one layer of one controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventDataEntry {
    pub controller: ControllerId,
    pub layer: u32,
    pub state: StateHash,
    #[serde(default)]
    pub events: Vec<TimedEvent>,
}

impl EventDataEntry {
    pub fn new(controller: ControllerId, layer: u32, state: StateHash) -> Self {
        Self {
            controller,
            layer,
            state,
            events: Vec::new(),
        }
    }

    pub fn with_event(mut self, event: TimedEvent) -> Self {
        self.events.push(event);
        self
    }

    #[inline]
    pub fn key(&self) -> StateKey {
        StateKey::new(self.controller, self.layer, self.state)
    }
}

/// One event data source.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    #[serde(default)]
    pub entries: Vec<EventDataEntry>,
}

impl EventData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, entry: EventDataEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn has_controller(&self, controller: ControllerId) -> bool {
        self.entries.iter().any(|e| e.controller == controller)
    }

    pub fn event_count(&self) -> usize {
        self.entries.iter().map(|e| e.events.len()).sum()
    }

    /// Validate basic invariants (times finite and in [0,1], named callbacks).
    pub fn validate(&self) -> Result<(), EventDataError> {
        for entry in &self.entries {
            for (index, event) in entry.events.iter().enumerate() {
                if event.function_name.trim().is_empty() {
                    return Err(EventDataError::EmptyFunctionName {
                        layer: entry.layer,
                        state: entry.state,
                        index,
                    });
                }
                let t = event.scheduled_time;
                if !t.is_finite() || !(0.0..=1.0).contains(&t) {
                    return Err(EventDataError::InvalidTime {
                        function_name: event.function_name.clone(),
                        layer: entry.layer,
                        state: entry.state,
                        time: t,
                    });
                }
            }
        }
        Ok(())
    }
}
