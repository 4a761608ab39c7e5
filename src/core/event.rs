//! Events sent to a binding.
//!
//! An event is a `type` name plus an optional JSON payload, mirroring the
//! `{ type, ...payload }` shape UI code naturally produces. Bare names and
//! numbers normalize to an event with an empty payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Name of the synthetic event used when a binding mounts.
pub const INIT_EVENT: &str = "@@INIT";

/// Errors converting arbitrary JSON into an [`Event`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EventError {
    #[error("Event object has no `type` field")]
    MissingType,

    #[error("Event `type` must be a string or number, got {0}")]
    InvalidType(String),

    #[error("Value cannot be used as an event: {0}")]
    Unsupported(String),
}

/// An event with a name and a payload.
///
/// # Example
///
/// ```rust
/// use statebind::core::Event;
///
/// let bare: Event = "FLICK".into();
/// assert_eq!(bare.name(), "FLICK");
/// assert!(bare.payload().is_empty());
///
/// let filter = Event::new("FILTER").with("query", "ap");
/// assert_eq!(filter.get_str("query"), Some("ap"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    name: String,
    #[serde(flatten)]
    payload: Map<String, Value>,
}

impl Event {
    /// Create an event with an empty payload.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: Map::new(),
        }
    }

    /// The synthetic event a binding commits its initial actions with.
    pub fn init() -> Self {
        Self::new(INIT_EVENT)
    }

    /// Add a payload field, returning the event.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Payload field as a string, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }

    pub fn is_init(&self) -> bool {
        self.name == INIT_EVENT
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for Event {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Event {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&String> for Event {
    fn from(name: &String) -> Self {
        Self::new(name.as_str())
    }
}

macro_rules! numeric_events {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Event {
                fn from(code: $ty) -> Self {
                    Self::new(code.to_string())
                }
            }
        )*
    };
}

numeric_events!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl TryFrom<Value> for Event {
    type Error = EventError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(name) => Ok(Self::new(name)),
            Value::Number(code) => Ok(Self::new(code.to_string())),
            Value::Object(mut payload) => {
                let name = match payload.remove("type") {
                    Some(Value::String(name)) => name,
                    Some(Value::Number(code)) => code.to_string(),
                    Some(other) => return Err(EventError::InvalidType(other.to_string())),
                    None => return Err(EventError::MissingType),
                };
                Ok(Self { name, payload })
            }
            other => Err(EventError::Unsupported(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_names_normalize_to_empty_payload() {
        let event = Event::from("EDIT");
        assert_eq!(event.name(), "EDIT");
        assert!(event.payload().is_empty());

        let owned = Event::from(String::from("VIEW"));
        assert_eq!(owned.name(), "VIEW");
    }

    #[test]
    fn numbers_normalize_to_their_decimal_name() {
        assert_eq!(Event::from(42_i64).name(), "42");
        assert_eq!(Event::from(7_u64).name(), "7");
        assert_eq!(Event::try_from(json!(3)).unwrap().name(), "3");
    }

    #[test]
    fn object_values_split_type_from_payload() {
        let event = Event::try_from(json!({ "type": "FILTER", "query": "ap" })).unwrap();

        assert_eq!(event.name(), "FILTER");
        assert_eq!(event.get_str("query"), Some("ap"));
        assert!(event.get("type").is_none());
    }

    #[test]
    fn numeric_type_field_is_accepted() {
        let event = Event::try_from(json!({ "type": 5, "x": true })).unwrap();
        assert_eq!(event.name(), "5");
        assert_eq!(event.get("x"), Some(&json!(true)));
    }

    #[test]
    fn objects_without_type_are_rejected() {
        let result = Event::try_from(json!({ "query": "ap" }));
        assert_eq!(result, Err(EventError::MissingType));
    }

    #[test]
    fn unsupported_values_are_rejected() {
        assert!(matches!(
            Event::try_from(json!({ "type": [1] })),
            Err(EventError::InvalidType(_))
        ));
        assert!(matches!(
            Event::try_from(json!(null)),
            Err(EventError::Unsupported(_))
        ));
    }

    #[test]
    fn event_serializes_flat() {
        let event = Event::new("SELECT").with("option", "Kiwis");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json, json!({ "type": "SELECT", "option": "Kiwis" }));

        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn integer_literals_become_event_names() {
        fn name(event: impl Into<Event>) -> String {
            event.into().name().to_string()
        }

        assert_eq!(name(5), "5");
        assert_eq!(name(-3i64), "-3");
        assert_eq!(name(7u8), "7");
        assert_eq!(name(42usize), "42");
    }

    #[test]
    fn init_event_is_recognized() {
        assert!(Event::init().is_init());
        assert!(!Event::from("FLICK").is_init());
    }
}
