//! Global event manager: one shared event table plus the sampler state of every
//! entity polling against it.

use crate::config::Config;
use crate::data::EventData;
use crate::event::FiredEvent;
use crate::ids::{ControllerId, EntityId};
use crate::sample::AnimatorSource;
use crate::sampler::EventSampler;
use crate::table::EventTable;

#[derive(Debug, Default)]
pub struct EventManager {
    sources: Vec<EventData>,
    table: EventTable,
    sampler: EventSampler,
}

impl EventManager {
    pub fn new(cfg: Config) -> Self {
        Self {
            sources: Vec::new(),
            table: EventTable::new(),
            sampler: EventSampler::new(cfg),
        }
    }

    /// Replace the data sources with a single one.
    pub fn set_event_data_source(&mut self, source: EventData) {
        self.set_event_data_sources(vec![source]);
    }

    /// Replace the data sources and rebuild the table wholesale.
    pub fn set_event_data_sources(&mut self, sources: Vec<EventData>) {
        self.table = EventTable::from_sources(&sources);
        self.sources = sources;
        log::debug!(
            "event manager: loaded {} source(s), {} state entries, {} events",
            self.sources.len(),
            self.table.len(),
            self.table.event_count()
        );
        if self.sampler.config().clear_state_on_source_change {
            self.sampler.on_level_loaded();
        }
    }

    pub fn sources(&self) -> &[EventData] {
        &self.sources
    }

    pub fn table(&self) -> &EventTable {
        &self.table
    }

    pub fn sampler(&self) -> &EventSampler {
        &self.sampler
    }

    /// Level/scene reload: forget every last-seen sample. The table is kept.
    pub fn on_level_loaded(&mut self) {
        self.sampler.on_level_loaded();
    }

    pub fn forget_entity(&mut self, entity: EntityId) {
        self.sampler.forget_entity(entity);
    }

    /// Poll every layer of `animator` against the shared table.
    pub fn get_events(
        &mut self,
        controller: ControllerId,
        entity: EntityId,
        animator: &dyn AnimatorSource,
    ) -> Vec<FiredEvent> {
        self.sampler.poll(entity, controller, animator, &self.table)
    }
}
