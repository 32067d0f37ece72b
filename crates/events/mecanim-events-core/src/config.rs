//! Core configuration for mecanim-events-core.

use serde::{Deserialize, Serialize};

/// How a condition term treats a parameter the source does not know.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingParameterPolicy {
    /// The term fails, so the event does not fire.
    #[default]
    FailClosed,
    /// The term is skipped as if it had no parameter name.
    FailOpen,
}

/// Configuration for sampling policy and diagnostics.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resolution of condition terms naming unknown parameters.
    pub missing_parameter: MissingParameterPolicy,

    /// A single poll firing more events than this is logged as a warning.
    /// Nothing is dropped.
    pub warn_events_per_poll: usize,

    /// Forget every last-seen sample when the event data source is replaced.
    pub clear_state_on_source_change: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            missing_parameter: MissingParameterPolicy::FailClosed,
            warn_events_per_poll: 64,
            clear_state_on_source_change: true,
        }
    }
}
