//! Interface Registry
//!
//! Single source of truth for "who can call what": maps each interface name to
//! the plugin that provides it and the plugins that consume it, and dispatches
//! method calls by interface name.

use crate::core::cleanup::Cleanup;
use crate::core::error_handling::guard_external_call;
use crate::core::validation::is_valid_identifier;
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::interface::{InterfaceInfo, PluginInterface};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Provider and consumers of one interface name
struct InterfaceBinding {
    provider_id: String,
    consumer_ids: BTreeSet<String>,
    interface: Arc<PluginInterface>,
}

/// Registry of published plugin interfaces
///
/// At most one binding exists per interface name.
#[derive(Default)]
pub struct InterfaceRegistry {
    bindings: HashMap<String, InterfaceBinding>,
}

impl std::fmt::Debug for InterfaceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterfaceRegistry")
            .field("interfaces", &self.names())
            .finish()
    }
}

impl InterfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish an interface for `provider_id`
    ///
    /// Returns false, leaving the existing binding untouched, when the name is
    /// already bound or is not a valid identifier.
    pub fn register(&mut self, provider_id: &str, interface: Arc<PluginInterface>) -> bool {
        let name = interface.name.clone();

        if !is_valid_identifier(&name) {
            log::warn!(
                "Rejected interface '{}' from '{}': invalid name",
                name,
                provider_id
            );
            return false;
        }

        if let Some(existing) = self.bindings.get(&name) {
            log::warn!(
                "Interface '{}' is already provided by '{}'; registration from '{}' ignored",
                name,
                existing.provider_id,
                provider_id
            );
            return false;
        }

        log::debug!(
            "Registered interface '{}' v{} from '{}'",
            name,
            interface.version,
            provider_id
        );
        self.bindings.insert(
            name,
            InterfaceBinding {
                provider_id: provider_id.to_string(),
                consumer_ids: BTreeSet::new(),
                interface,
            },
        );
        true
    }

    /// Remove a binding together with its consumer relationships
    pub fn unregister(&mut self, name: &str) -> bool {
        match self.bindings.remove(name) {
            Some(binding) => {
                log::debug!(
                    "Unregistered interface '{}' (provider '{}', {} consumer(s))",
                    name,
                    binding.provider_id,
                    binding.consumer_ids.len()
                );
                true
            }
            None => false,
        }
    }

    /// Record `consumer_id` as a consumer; false only for unknown interfaces
    pub fn subscribe(&mut self, consumer_id: &str, name: &str) -> bool {
        match self.bindings.get_mut(name) {
            Some(binding) => {
                binding.consumer_ids.insert(consumer_id.to_string());
                true
            }
            None => false,
        }
    }

    /// Drop `consumer_id` as a consumer; false only for unknown interfaces
    pub fn unsubscribe(&mut self, consumer_id: &str, name: &str) -> bool {
        match self.bindings.get_mut(name) {
            Some(binding) => {
                binding.consumer_ids.remove(consumer_id);
                true
            }
            None => false,
        }
    }

    /// Invoke `method` on the interface registered as `name`
    ///
    /// A method that returns an error or panics yields
    /// `PluginError::MethodInvocation` wrapping the original cause.
    pub fn call(&self, name: &str, method: &str, args: &[Value]) -> PluginResult<Value> {
        let binding = self
            .bindings
            .get(name)
            .ok_or_else(|| PluginError::UnknownInterface {
                name: name.to_string(),
            })?;

        let callable = binding
            .interface
            .method(method)
            .ok_or_else(|| PluginError::UnknownMethod {
                interface: name.to_string(),
                method: method.to_string(),
            })?;

        guard_external_call(|| callable(args)).map_err(|source| {
            log::warn!("{}.{} failed: {}", name, method, source);
            PluginError::MethodInvocation {
                interface: name.to_string(),
                method: method.to_string(),
                source,
            }
        })
    }

    /// Introspection for one interface; `None` for unknown names
    pub fn describe(&self, name: &str) -> Option<InterfaceInfo> {
        let binding = self.bindings.get(name)?;
        let interface = &binding.interface;
        Some(InterfaceInfo {
            name: interface.name.clone(),
            version: interface.version.clone(),
            description: interface.description.clone(),
            methods: interface.method_names(),
            events: interface.event_names(),
            provider: binding.provider_id.clone(),
            consumers: binding.consumer_ids.iter().cloned().collect(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn provider_of(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(|b| b.provider_id.as_str())
    }

    /// Interface names provided by `provider_id`, sorted
    pub fn provided_by(&self, provider_id: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, binding)| binding.provider_id == provider_id)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// All registered interface names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Cleanup for InterfaceRegistry {
    fn cleanup(&mut self) {
        self.bindings.clear();
    }
}
