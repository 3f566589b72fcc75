//! Event records and handler types for the event bus

use crate::core::error_handling::ExternalError;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::SystemTime;

/// Event payload: string keys to JSON values
pub type Payload = Map<String, Value>;

/// Error returned by an event handler
pub type HandlerError = ExternalError;

/// Handler registered for one event name
pub type EventHandler = Arc<dyn Fn(&EventRecord) -> Result<(), HandlerError> + Send + Sync>;

/// Handler observing every published event
pub type AnyEventHandler = Arc<dyn Fn(&str, &Payload) -> Result<(), HandlerError> + Send + Sync>;

/// Published after an interface binding is created: `{plugin_id, interface_name}`
pub const INTERFACE_REGISTERED: &str = "interface_registered";
/// Published after an interface binding is removed: `{plugin_id, interface_name}`
pub const INTERFACE_UNREGISTERED: &str = "interface_unregistered";
/// Published for every call attempt: `{interface, method, args}`
pub const METHOD_CALLED: &str = "method_called";
/// Published after an accepted status transition: `{plugin_id, from, to}`
pub const PLUGIN_STATUS_CHANGED: &str = "plugin_status_changed";

/// One published event as kept in the history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub name: String,
    pub payload: Payload,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: SystemTime,
}

impl EventRecord {
    pub fn new(name: impl Into<String>, payload: Payload) -> Self {
        Self {
            name: name.into(),
            payload,
            timestamp: SystemTime::now(),
        }
    }

    /// Payload field as a string, if present and a string
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }
}

fn serialize_timestamp<S: Serializer>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error> {
    let datetime: chrono::DateTime<chrono::Utc> = (*time).into();
    serializer.serialize_str(&datetime.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
}

/// Wrap a closure as an `EventHandler`
///
/// Keep the returned `Arc` to unsubscribe later; handlers are matched by identity.
pub fn handler<F>(f: F) -> EventHandler
where
    F: Fn(&EventRecord) -> Result<(), HandlerError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as an `AnyEventHandler`
pub fn any_handler<F>(f: F) -> AnyEventHandler
where
    F: Fn(&str, &Payload) -> Result<(), HandlerError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Build a payload from `(key, value)` pairs
pub fn payload<K, I>(entries: I) -> Payload
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
{
    entries.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
