//! Error types for event data loading and emitter setup.
//!
//! Sampling itself never fails: absent table entries mean "no events" and unknown
//! condition parameters are resolved by [`crate::config::MissingParameterPolicy`].

use serde::{Deserialize, Serialize};

use crate::ids::{ControllerId, StateHash};

/// Errors produced while loading or validating event data.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum EventDataError {
    /// The JSON document could not be parsed
    #[error("event data parse error: {reason}")]
    Parse { reason: String },

    /// A scheduled time outside [0,1] or not finite
    #[error("event '{function_name}' on state {state:?} (layer {layer}) has invalid time {time}")]
    InvalidTime {
        function_name: String,
        layer: u32,
        state: StateHash,
        time: f32,
    },

    /// An event without a function name
    #[error("event #{index} on state {state:?} (layer {layer}) has no function name")]
    EmptyFunctionName {
        layer: u32,
        state: StateHash,
        index: usize,
    },

    /// A payload whose declared type disagrees with its value
    #[error("event '{function_name}' declares param type {declared} but holds {actual}")]
    ParamTypeMismatch {
        function_name: String,
        declared: String,
        actual: String,
    },
}

impl EventDataError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "serialization",
            Self::InvalidTime { .. }
            | Self::EmptyFunctionName { .. }
            | Self::ParamTypeMismatch { .. } => "validation",
        }
    }
}

impl From<serde_json::Error> for EventDataError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            reason: err.to_string(),
        }
    }
}

/// Errors produced while setting up an emitter.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum EmitterError {
    /// The emitter's own data holds no entry for its controller
    #[error("event data has no entries for controller {controller:?}")]
    NoDataForController { controller: ControllerId },

    /// The emitter's own data failed validation
    #[error(transparent)]
    InvalidData(#[from] EventDataError),
}
