//! Event conditions: ANDed predicates over named runtime parameters.
//!
//! Parameters are looked up through [`ParameterSource`], which the host implements
//! over its animation graph (or uses [`ParameterMap`] directly). Int predicates support
//! every comparison, float predicates only strict greater/less, bool predicates only
//! equality.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::config::MissingParameterPolicy;

/// Read access to the named parameters of an animation graph.
pub trait ParameterSource {
    fn get_int(&self, name: &str) -> Option<i32>;
    fn get_float(&self, name: &str) -> Option<f32>;
    fn get_bool(&self, name: &str) -> Option<bool>;
}

/// A source that knows no parameters.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoParameters;

impl ParameterSource for NoParameters {
    fn get_int(&self, _name: &str) -> Option<i32> {
        None
    }
    fn get_float(&self, _name: &str) -> Option<f32> {
        None
    }
    fn get_bool(&self, _name: &str) -> Option<bool> {
        None
    }
}

/// One runtime parameter value.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ParamValue {
    Int(i32),
    Float(f32),
    Bool(bool),
}

/// Map-backed [`ParameterSource`]. Typed lookups only succeed for values stored
/// with the matching type.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterMap {
    values: HashMap<String, ParamValue>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_int(&mut self, name: impl Into<String>, value: i32) -> &mut Self {
        self.values.insert(name.into(), ParamValue::Int(value));
        self
    }

    pub fn set_float(&mut self, name: impl Into<String>, value: f32) -> &mut Self {
        self.values.insert(name.into(), ParamValue::Float(value));
        self
    }

    pub fn set_bool(&mut self, name: impl Into<String>, value: bool) -> &mut Self {
        self.values.insert(name.into(), ParamValue::Bool(value));
        self
    }

    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.values.get(name).copied()
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.values.remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ParameterSource for ParameterMap {
    fn get_int(&self, name: &str) -> Option<i32> {
        match self.values.get(name) {
            Some(ParamValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    fn get_float(&self, name: &str) -> Option<f32> {
        match self.values.get(name) {
            Some(ParamValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    fn get_bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(ParamValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }
}

/// Comparison applied to an integer parameter: `actual <mode> expected`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntMode {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterEqualThan,
    LessEqualThan,
}

impl IntMode {
    #[inline]
    pub fn compare(self, actual: i32, expected: i32) -> bool {
        match self {
            IntMode::Equal => actual == expected,
            IntMode::NotEqual => actual != expected,
            IntMode::GreaterThan => actual > expected,
            IntMode::LessThan => actual < expected,
            IntMode::GreaterEqualThan => actual >= expected,
            IntMode::LessEqualThan => actual <= expected,
        }
    }
}

/// Comparison applied to a float parameter. Equality is not offered for floats.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatMode {
    GreaterThan,
    LessThan,
}

impl FloatMode {
    #[inline]
    pub fn compare(self, actual: f32, expected: f32) -> bool {
        match self {
            FloatMode::GreaterThan => actual > expected,
            FloatMode::LessThan => actual < expected,
        }
    }
}

/// Typed predicate of a single condition term.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Predicate {
    Int { mode: IntMode, value: i32 },
    Float { mode: FloatMode, value: f32 },
    Bool { value: bool },
}

/// A predicate bound to a parameter name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConditionTerm {
    #[serde(default)]
    pub parameter: String,
    #[serde(flatten)]
    pub predicate: Predicate,
}

impl ConditionTerm {
    pub fn int(parameter: impl Into<String>, mode: IntMode, value: i32) -> Self {
        Self {
            parameter: parameter.into(),
            predicate: Predicate::Int { mode, value },
        }
    }

    pub fn float(parameter: impl Into<String>, mode: FloatMode, value: f32) -> Self {
        Self {
            parameter: parameter.into(),
            predicate: Predicate::Float { mode, value },
        }
    }

    pub fn bool(parameter: impl Into<String>, value: bool) -> Self {
        Self {
            parameter: parameter.into(),
            predicate: Predicate::Bool { value },
        }
    }

    /// Evaluate this term. A term without a parameter name always passes.
    pub fn test(&self, params: &dyn ParameterSource, policy: MissingParameterPolicy) -> bool {
        if self.parameter.is_empty() {
            return true;
        }
        let outcome = match self.predicate {
            Predicate::Int { mode, value } => params
                .get_int(&self.parameter)
                .map(|actual| mode.compare(actual, value)),
            Predicate::Float { mode, value } => params
                .get_float(&self.parameter)
                .map(|actual| mode.compare(actual, value)),
            Predicate::Bool { value } => params
                .get_bool(&self.parameter)
                .map(|actual| actual == value),
        };
        match outcome {
            Some(passed) => passed,
            None => {
                log::debug!(
                    "condition parameter '{}' not found ({:?})",
                    self.parameter,
                    policy
                );
                policy == MissingParameterPolicy::FailOpen
            }
        }
    }
}

/// Conjunction of condition terms. An empty condition is unconditional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventCondition {
    pub terms: Vec<ConditionTerm>,
}

impl EventCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_term(mut self, term: ConditionTerm) -> Self {
        self.terms.push(term);
        self
    }

    #[inline]
    pub fn is_unconditional(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn test(&self, params: &dyn ParameterSource, policy: MissingParameterPolicy) -> bool {
        self.terms.iter().all(|term| term.test(params, policy))
    }
}
