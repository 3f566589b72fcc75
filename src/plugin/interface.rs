//! Plugin interfaces
//!
//! A named, versioned bundle of callable methods one plugin publishes so other
//! plugins can call it by name through the interaction manager.

use crate::plugin::error::MethodError;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

/// Result returned by an interface method
pub type MethodResult = Result<Value, MethodError>;

/// Callable stored in an interface's method map
pub type MethodFn = Arc<dyn Fn(&[Value]) -> MethodResult + Send + Sync>;

/// The callable surface a plugin exposes
#[derive(Clone)]
pub struct PluginInterface {
    pub name: String,
    pub version: String,
    pub description: String,
    methods: HashMap<String, MethodFn>,
    events: BTreeSet<String>,
}

impl PluginInterface {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: String::new(),
            methods: HashMap::new(),
            events: BTreeSet::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add (or replace) a method
    pub fn with_method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&[Value]) -> MethodResult + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(method));
        self
    }

    /// Declare an event this interface may emit
    pub fn with_event(mut self, event_name: impl Into<String>) -> Self {
        self.events.insert(event_name.into());
        self
    }

    pub fn method(&self, name: &str) -> Option<&MethodFn> {
        self.methods.get(name)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Method names, sorted
    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.keys().cloned().collect();
        names.sort();
        names
    }

    /// Declared event names, sorted
    pub fn event_names(&self) -> Vec<String> {
        self.events.iter().cloned().collect()
    }
}

impl fmt::Debug for PluginInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginInterface")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("methods", &self.method_names())
            .field("events", &self.events)
            .finish()
    }
}

/// Read-only description of a registered interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub methods: Vec<String>,
    pub events: Vec<String>,
    pub provider: String,
    pub consumers: Vec<String>,
}
