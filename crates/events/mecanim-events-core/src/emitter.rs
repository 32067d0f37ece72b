//! Emitters: per-entity polling that hands fired events to a host receiver.
//!
//! Delivery itself (direct call, upward propagation, broadcast) belongs to the host.
//! The emitter only decides *which* events fire and passes each one, with its
//! context, to [`EventReceiver::receive`] in sampler order.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::data::EventData;
use crate::error::EmitterError;
use crate::event::FiredEvent;
use crate::ids::{ControllerId, EntityId};
use crate::manager::EventManager;
use crate::sample::AnimatorSource;
use crate::sampler::EventSampler;
use crate::table::EventTable;

/// How the host should route a fired event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitMode {
    /// The emitting entity only.
    #[default]
    Default,
    /// The emitting entity and its ancestors.
    Upwards,
    /// The emitting entity and its descendants.
    Broadcast,
}

/// Host-side sink for fired events.
pub trait EventReceiver {
    fn receive(&mut self, mode: EmitMode, fired: &FiredEvent);
}

/// Collects fired events; handy for tests and for hosts that dispatch later.
#[derive(Clone, Debug, Default)]
pub struct CollectingReceiver {
    pub received: Vec<(EmitMode, FiredEvent)>,
}

impl EventReceiver for CollectingReceiver {
    fn receive(&mut self, mode: EmitMode, fired: &FiredEvent) {
        self.received.push((mode, fired.clone()));
    }
}

impl CollectingReceiver {
    pub fn names(&self) -> Vec<&str> {
        self.received
            .iter()
            .map(|(_, f)| f.function_name())
            .collect()
    }
}

/// Where an emitter's events come from.
#[derive(Debug)]
pub enum EmitterSource {
    /// The shared table of an [`EventManager`].
    Global,
    /// A private table with its own sampler state.
    Local {
        table: EventTable,
        sampler: EventSampler,
    },
}

#[derive(Debug)]
pub struct Emitter {
    pub controller: ControllerId,
    pub entity: EntityId,
    pub mode: EmitMode,
    source: EmitterSource,
}

impl Emitter {
    /// Emitter polling the manager's shared table.
    pub fn new(controller: ControllerId, entity: EntityId, mode: EmitMode) -> Self {
        Self {
            controller,
            entity,
            mode,
            source: EmitterSource::Global,
        }
    }

    /// Emitter with its own event data.
    pub fn with_data(
        controller: ControllerId,
        entity: EntityId,
        mode: EmitMode,
        data: &EventData,
        cfg: Config,
    ) -> Result<Self, EmitterError> {
        data.validate()?;
        if !data.has_controller(controller) {
            return Err(EmitterError::NoDataForController { controller });
        }
        Ok(Self {
            controller,
            entity,
            mode,
            source: EmitterSource::Local {
                table: EventTable::from_data(data),
                sampler: EventSampler::new(cfg),
            },
        })
    }

    pub fn source(&self) -> &EmitterSource {
        &self.source
    }

    /// Poll once and deliver every fired event to `receiver`. Returns how many fired.
    ///
    /// Local emitters ignore `manager`.
    pub fn update(
        &mut self,
        manager: &mut EventManager,
        animator: &dyn AnimatorSource,
        receiver: &mut dyn EventReceiver,
    ) -> usize {
        let fired = match &mut self.source {
            EmitterSource::Global => manager.get_events(self.controller, self.entity, animator),
            EmitterSource::Local { table, sampler } => {
                sampler.poll(self.entity, self.controller, animator, table)
            }
        };
        for event in &fired {
            receiver.receive(self.mode, event);
        }
        fired.len()
    }

    /// Level/scene reload for emitters with their own state.
    pub fn on_level_loaded(&mut self) {
        if let EmitterSource::Local { sampler, .. } = &mut self.source {
            sampler.on_level_loaded();
        }
    }
}
