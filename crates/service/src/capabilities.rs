//! Session capabilities in the three shapes a test runner hands out
//!
//! - a single capability object (standalone session)
//! - an array of capability objects (one per parallel worker)
//! - a multiremote map of `{ "<instance>": { "capabilities": { ... } } }`

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{ServiceError, ServiceResult};

/// One capability object
pub type Capabilities = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum CapabilitySet {
    Single(Capabilities),
    Array(Vec<Capabilities>),
    /// Instance name to that instance's entry (holding `capabilities`)
    MultiRemote(Map<String, Value>),
}

impl CapabilitySet {
    pub fn from_value(value: Value) -> ServiceResult<Self> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::Object(caps) => Ok(caps),
                    other => Err(ServiceError::InvalidConfig(format!(
                        "capabilities[{}] must be an object, got {}",
                        index,
                        value_kind(&other)
                    ))),
                })
                .collect::<ServiceResult<Vec<_>>>()
                .map(CapabilitySet::Array),
            Value::Object(map) if is_multiremote(&map) => Ok(CapabilitySet::MultiRemote(map)),
            Value::Object(map) => Ok(CapabilitySet::Single(map)),
            other => Err(ServiceError::InvalidConfig(format!(
                "capabilities must be an object or an array, got {}",
                value_kind(&other)
            ))),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            CapabilitySet::Single(caps) => Value::Object(caps),
            CapabilitySet::Array(items) => Value::Array(items.into_iter().map(Value::Object).collect()),
            CapabilitySet::MultiRemote(map) => Value::Object(map),
        }
    }

    pub fn is_multiremote(&self) -> bool {
        matches!(self, CapabilitySet::MultiRemote(_))
    }

    /// Instance names of a multiremote set, empty otherwise
    pub fn instance_names(&self) -> Vec<&str> {
        match self {
            CapabilitySet::MultiRemote(map) => map.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Every capability object, in order
    pub fn each(&self) -> Vec<&Capabilities> {
        match self {
            CapabilitySet::Single(caps) => vec![caps],
            CapabilitySet::Array(items) => items.iter().collect(),
            CapabilitySet::MultiRemote(map) => map
                .values()
                .filter_map(|entry| entry.get("capabilities").and_then(Value::as_object))
                .collect(),
        }
    }

    /// Every capability object, in order, mutably
    pub fn each_mut(&mut self) -> Vec<&mut Capabilities> {
        match self {
            CapabilitySet::Single(caps) => vec![caps],
            CapabilitySet::Array(items) => items.iter_mut().collect(),
            CapabilitySet::MultiRemote(map) => map
                .values_mut()
                .filter_map(|entry| {
                    entry
                        .get_mut("capabilities")
                        .and_then(Value::as_object_mut)
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.each().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for CapabilitySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CapabilitySet::Single(caps) => caps.serialize(serializer),
            CapabilitySet::Array(items) => items.serialize(serializer),
            CapabilitySet::MultiRemote(map) => map.serialize(serializer),
        }
    }
}

/// Non-empty object whose every value carries a `capabilities` object
fn is_multiremote(map: &Map<String, Value>) -> bool {
    !map.is_empty()
        && map.values().all(|entry| {
            entry
                .get("capabilities")
                .is_some_and(Value::is_object)
        })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
