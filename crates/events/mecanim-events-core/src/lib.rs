//! Mecanim Events Core (engine-agnostic)
//!
//! Timed callbacks attached to animation-state timelines. Hosts feed one
//! [`PlaybackSample`] per layer per tick; the sampler reconstructs the normalized-time
//! interval(s) each layer traversed since the previous tick and returns the authored
//! events scheduled inside them, honouring enabled flags, parameter conditions, and
//! critical events that must survive an interrupting transition.
//!
//! Delivery of fired events is left to the host through [`EventReceiver`].

pub mod condition;
pub mod config;
pub mod data;
pub mod emitter;
pub mod error;
pub mod event;
pub mod ids;
pub mod manager;
pub mod sample;
pub mod sampler;
pub mod stored_events;
pub mod table;

// Re-exports for consumers (adapters)
pub use condition::{
    ConditionTerm, EventCondition, FloatMode, IntMode, NoParameters, ParamValue, ParameterMap,
    ParameterSource, Predicate,
};
pub use config::{Config, MissingParameterPolicy};
pub use data::{EventData, EventDataEntry};
pub use emitter::{CollectingReceiver, EmitMode, Emitter, EmitterSource, EventReceiver};
pub use error::{EmitterError, EventDataError};
pub use event::{EventContext, EventParam, EventParamType, FiredEvent, TimedEvent};
pub use ids::{ControllerId, EntityAllocator, EntityId, StateHash, StateKey, TagHash};
pub use manager::EventManager;
pub use sample::{AnimatorSnapshot, AnimatorSource, PlaybackSample};
pub use sampler::{
    collect_events, plan_queries, sample_layer, EventSampler, Interval, IntervalQuery,
    LayerQuery, SamplerState, LOOP_EPSILON,
};
pub use stored_events::parse_event_data_json;
pub use table::EventTable;
