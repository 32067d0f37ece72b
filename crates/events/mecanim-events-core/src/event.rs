//! Timed events, their payloads, and the provenance stamped on fired copies.

use serde::{Deserialize, Serialize};

use crate::condition::EventCondition;
use crate::ids::{ControllerId, StateHash, TagHash};

/// Discriminant of [`EventParam`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventParamType {
    None,
    Int,
    Float,
    Text,
    Bool,
}

/// Typed payload delivered with an event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum EventParam {
    #[default]
    None,
    Int(i32),
    Float(f32),
    Text(String),
    Bool(bool),
}

impl EventParam {
    pub fn param_type(&self) -> EventParamType {
        match self {
            EventParam::None => EventParamType::None,
            EventParam::Int(_) => EventParamType::Int,
            EventParam::Float(_) => EventParamType::Float,
            EventParam::Text(_) => EventParamType::Text,
            EventParam::Bool(_) => EventParamType::Bool,
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, EventParam::None)
    }
}

fn default_enabled() -> bool {
    true
}

/// A callback scheduled at a normalized time within one loop of its owning state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub function_name: String,
    /// Normalized time in [0,1] within one loop of the state.
    pub scheduled_time: f32,
    #[serde(default)]
    pub param: EventParam,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Fire even when a transition interrupts the (non-looping) state before it is reached.
    #[serde(default)]
    pub critical: bool,
    #[serde(default)]
    pub condition: EventCondition,
}

impl TimedEvent {
    pub fn new(function_name: impl Into<String>, scheduled_time: f32) -> Self {
        Self {
            function_name: function_name.into(),
            scheduled_time,
            param: EventParam::None,
            enabled: true,
            critical: false,
            condition: EventCondition::default(),
        }
    }

    pub fn with_param(mut self, param: EventParam) -> Self {
        self.param = param;
        self
    }

    pub fn with_critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_condition(mut self, condition: EventCondition) -> Self {
        self.condition = condition;
        self
    }
}

/// Where a fired event came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventContext {
    pub controller: ControllerId,
    pub layer: u32,
    pub state: StateHash,
    pub tag: TagHash,
}

/// A private copy of a table entry, stamped with the context it fired in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FiredEvent {
    pub event: TimedEvent,
    pub context: EventContext,
}

impl FiredEvent {
    #[inline]
    pub fn function_name(&self) -> &str {
        &self.event.function_name
    }

    #[inline]
    pub fn param(&self) -> &EventParam {
        &self.event.param
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_type_matches_variant() {
        assert_eq!(EventParam::None.param_type(), EventParamType::None);
        assert_eq!(EventParam::Int(3).param_type(), EventParamType::Int);
        assert_eq!(EventParam::Float(0.5).param_type(), EventParamType::Float);
        assert_eq!(EventParam::Text("x".into()).param_type(), EventParamType::Text);
        assert_eq!(EventParam::Bool(true).param_type(), EventParamType::Bool);
        assert!(EventParam::default().is_none());
    }

    #[test]
    fn deserialize_applies_defaults() {
        let e: TimedEvent =
            serde_json::from_str(r#"{ "function_name": "OnStep", "scheduled_time": 0.25 }"#)
                .unwrap();
        assert!(e.enabled);
        assert!(!e.critical);
        assert!(e.param.is_none());
        assert!(e.condition.is_unconditional());
    }
}
