//! Loader for the camelCase event-data interchange JSON written by authoring tools.

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::condition::{ConditionTerm, EventCondition, FloatMode, IntMode, Predicate};
use crate::data::{EventData, EventDataEntry};
use crate::error::EventDataError;
use crate::event::{EventParam, TimedEvent};
use crate::ids::{ControllerId, StateHash};

/// Public API: parse the camelCase event-data interchange JSON (as exported by
/// authoring tools) into the canonical [`EventData`].
///
/// Notes:
/// - `normalizedTime` is kept as-is and validated to lie in [0,1].
/// - `param` is untagged (null/bool/number/string). An optional `paramType` pins the
///   interpretation of numbers; without it integral numbers become `Int`.
/// - Condition entries use the flat authoring layout (`param`, `paramType`, `mode`,
///   `intValue`/`floatValue`/`boolValue`). Float entries with a mode other than
///   `greaterThan`/`lessThan` never constrain anything and are dropped.
pub fn parse_event_data_json(s: &str) -> Result<EventData, EventDataError> {
    let doc: StoredEventData = serde_json::from_str(s)?;

    let mut entries = Vec::with_capacity(doc.entries.len());
    for se in doc.entries {
        let mut events = Vec::with_capacity(se.events.len());
        for ev in se.events {
            let param = to_core_param(&ev.function_name, ev.param_type, &ev.param)?;
            let terms = ev
                .conditions
                .iter()
                .filter_map(|c| to_core_term(&ev.function_name, c))
                .collect();
            events.push(TimedEvent {
                function_name: ev.function_name,
                scheduled_time: ev.normalized_time,
                param,
                enabled: ev.enabled,
                critical: ev.critical,
                condition: EventCondition { terms },
            });
        }
        entries.push(EventDataEntry {
            controller: ControllerId(se.controller_id),
            layer: se.layer,
            state: StateHash(se.state_hash),
            events,
        });
    }

    let data = EventData { entries };
    data.validate()?;
    Ok(data)
}

fn json_kind(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn as_i32(v: &JsonValue) -> Option<i32> {
    v.as_i64().and_then(|n| i32::try_from(n).ok())
}

fn to_core_param(
    function_name: &str,
    declared: Option<StoredParamType>,
    raw: &JsonValue,
) -> Result<EventParam, EventDataError> {
    let mismatch = |declared: &str| EventDataError::ParamTypeMismatch {
        function_name: function_name.to_string(),
        declared: declared.to_string(),
        actual: json_kind(raw).to_string(),
    };

    match declared {
        None => match raw {
            JsonValue::Null => Ok(EventParam::None),
            JsonValue::Bool(b) => Ok(EventParam::Bool(*b)),
            JsonValue::String(s) => Ok(EventParam::Text(s.clone())),
            JsonValue::Number(n) => match as_i32(raw) {
                Some(i) => Ok(EventParam::Int(i)),
                None => n
                    .as_f64()
                    .map(|f| EventParam::Float(f as f32))
                    .ok_or_else(|| mismatch("number")),
            },
            _ => Err(mismatch("param")),
        },
        // An explicit "none" ignores whatever payload was left behind by the editor.
        Some(StoredParamType::None) => Ok(EventParam::None),
        Some(StoredParamType::Int) => as_i32(raw)
            .map(EventParam::Int)
            .ok_or_else(|| mismatch("int")),
        Some(StoredParamType::Float) => raw
            .as_f64()
            .map(|f| EventParam::Float(f as f32))
            .ok_or_else(|| mismatch("float")),
        Some(StoredParamType::String) => raw
            .as_str()
            .map(|s| EventParam::Text(s.to_string()))
            .ok_or_else(|| mismatch("string")),
        Some(StoredParamType::Bool) => raw
            .as_bool()
            .map(EventParam::Bool)
            .ok_or_else(|| mismatch("bool")),
    }
}

fn to_core_term(function_name: &str, c: &StoredCondition) -> Option<ConditionTerm> {
    let predicate = match c.param_type {
        StoredConditionType::Int => Predicate::Int {
            mode: c.mode.into(),
            value: c.int_value,
        },
        StoredConditionType::Float => {
            let mode = match c.mode {
                StoredMode::GreaterThan => FloatMode::GreaterThan,
                StoredMode::LessThan => FloatMode::LessThan,
                other => {
                    log::warn!(
                        "event '{}': float condition on '{}' uses {:?}, which never constrains; dropping it",
                        function_name,
                        c.param,
                        other
                    );
                    return None;
                }
            };
            Predicate::Float {
                mode,
                value: c.float_value,
            }
        }
        StoredConditionType::Bool => Predicate::Bool {
            value: c.bool_value,
        },
    };
    Some(ConditionTerm {
        parameter: c.param.clone(),
        predicate,
    })
}

// ----- JSON schema (serde) -----

#[derive(Debug, Deserialize)]
struct StoredEventData {
    #[serde(default)]
    pub entries: Vec<StoredEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    pub controller_id: i32,
    #[serde(default)]
    pub layer: u32,
    pub state_hash: i32,
    #[serde(default)]
    pub events: Vec<StoredEvent>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEvent {
    pub function_name: String,
    pub normalized_time: f32,
    #[serde(default)]
    pub param_type: Option<StoredParamType>,
    #[serde(default)]
    pub param: JsonValue,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub critical: bool,
    #[serde(default)]
    pub conditions: Vec<StoredCondition>,
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
enum StoredParamType {
    None,
    #[serde(alias = "int32")]
    Int,
    Float,
    String,
    #[serde(alias = "boolean")]
    Bool,
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
enum StoredConditionType {
    Int,
    Float,
    #[serde(alias = "boolean")]
    Bool,
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
enum StoredMode {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterEqualThan,
    LessEqualThan,
}

impl From<StoredMode> for IntMode {
    fn from(m: StoredMode) -> Self {
        match m {
            StoredMode::Equal => IntMode::Equal,
            StoredMode::NotEqual => IntMode::NotEqual,
            StoredMode::GreaterThan => IntMode::GreaterThan,
            StoredMode::LessThan => IntMode::LessThan,
            StoredMode::GreaterEqualThan => IntMode::GreaterEqualThan,
            StoredMode::LessEqualThan => IntMode::LessEqualThan,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCondition {
    #[serde(default)]
    pub param: String,
    pub param_type: StoredConditionType,
    #[serde(default = "default_mode")]
    pub mode: StoredMode,
    #[serde(default)]
    pub int_value: i32,
    #[serde(default)]
    pub float_value: f32,
    #[serde(default)]
    pub bool_value: bool,
}

fn default_mode() -> StoredMode {
    StoredMode::Equal
}
