//! Interaction Manager
//!
//! The façade external code and plugins talk to. Owns one dependency graph, one
//! interface registry and one event bus, records per-method call counters and
//! drives plugin status transitions.

use crate::core::cleanup::Cleanup;
use crate::core::validation::{validate_identifier, ValidationError};
use crate::events::api::{
    payload, AnyEventHandler, BusStatistics, DeliveryReport, EventBus, EventBusConfig,
    EventHandler, EventRecord, Payload, INTERFACE_REGISTERED, INTERFACE_UNREGISTERED,
    METHOD_CALLED, PLUGIN_STATUS_CHANGED,
};
use crate::plugin::dependency::DependencyGraph;
use crate::plugin::error::{CycleError, PluginError, PluginResult};
use crate::plugin::interface::{InterfaceInfo, PluginInterface};
use crate::plugin::registry::InterfaceRegistry;
use crate::plugin::statistics::CallStatistics;
use crate::plugin::types::{DependencyReport, PluginDescriptor, PluginStatus};
use serde_json::{json, Value};
use std::sync::Arc;

/// Settings for a new `InteractionManager`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManagerConfig {
    pub event_bus: EventBusConfig,
}

impl ManagerConfig {
    /// Default settings with a different event history limit
    pub fn with_history_limit(history_limit: usize) -> Result<Self, ValidationError> {
        Ok(Self {
            event_bus: EventBusConfig::new(history_limit)?,
        })
    }
}

/// Single entry point of the plugin interaction subsystem
///
/// Not internally synchronized: embedders that share it between threads must
/// serialize access to the whole manager.
#[derive(Debug, Default)]
pub struct InteractionManager {
    graph: DependencyGraph,
    registry: InterfaceRegistry,
    event_bus: EventBus,
    call_statistics: CallStatistics,
}

impl InteractionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ManagerConfig) -> Self {
        Self {
            event_bus: EventBus::with_config(config.event_bus),
            ..Self::default()
        }
    }

    // ----------------------------------------------------------------------
    // Dependency resolution
    // ----------------------------------------------------------------------

    /// Declare a plugin and its dependencies
    ///
    /// Replaces an existing descriptor with the same id and returns it.
    pub fn register_plugin(
        &mut self,
        descriptor: PluginDescriptor,
    ) -> PluginResult<Option<PluginDescriptor>> {
        validate_identifier(&descriptor.id).map_err(|reason| PluginError::InvalidIdentifier {
            value: descriptor.id.clone(),
            reason,
        })?;
        for dependency in &descriptor.dependencies {
            validate_identifier(&dependency.target_id).map_err(|reason| {
                PluginError::InvalidIdentifier {
                    value: dependency.target_id.clone(),
                    reason,
                }
            })?;
        }

        log::debug!(
            "Registering plugin '{}' with {} dependenc(ies)",
            descriptor.id,
            descriptor.dependencies.len()
        );
        Ok(self.graph.add_plugin(descriptor))
    }

    /// Forget a plugin and withdraw every interface it provides
    pub fn unregister_plugin(&mut self, plugin_id: &str) -> Option<PluginDescriptor> {
        for name in self.registry.provided_by(plugin_id) {
            self.unregister_plugin_interface(&name);
        }
        let removed = self.graph.remove_plugin(plugin_id);
        if removed.is_some() {
            log::debug!("Unregistered plugin '{}'", plugin_id);
        }
        removed
    }

    pub fn plugin_status(&self, plugin_id: &str) -> Option<PluginStatus> {
        self.graph.status(plugin_id)
    }

    /// Move a plugin to `status`, returning the previous status
    ///
    /// Only transitions allowed by `PluginStatus::can_transition_to` are
    /// accepted; each one publishes `plugin_status_changed`.
    pub fn set_plugin_status(
        &mut self,
        plugin_id: &str,
        status: PluginStatus,
    ) -> PluginResult<PluginStatus> {
        let current = self
            .graph
            .status(plugin_id)
            .ok_or_else(|| PluginError::PluginNotFound {
                plugin_name: plugin_id.to_string(),
            })?;

        if !current.can_transition_to(status) {
            return Err(PluginError::InvalidTransition {
                plugin_id: plugin_id.to_string(),
                from: current,
                to: status,
            });
        }

        self.graph.set_status(plugin_id, status);
        log::debug!("Plugin '{}': {} -> {}", plugin_id, current, status);
        self.event_bus.publish(
            PLUGIN_STATUS_CHANGED,
            payload([
                ("plugin_id", json!(plugin_id)),
                ("from", json!(current.to_string())),
                ("to", json!(status.to_string())),
            ]),
        );
        Ok(current)
    }

    pub fn check_dependencies(&self, plugin_id: &str) -> DependencyReport {
        self.graph.check_dependencies(plugin_id)
    }

    pub fn compute_load_order(&self) -> Result<Vec<String>, CycleError> {
        self.graph.compute_load_order()
    }

    /// Read-only view of the declared plugins
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    // ----------------------------------------------------------------------
    // Interfaces
    // ----------------------------------------------------------------------

    /// Publish `interface` on behalf of `plugin_id`
    ///
    /// Returns false when the name is taken or malformed; on success publishes
    /// `interface_registered`.
    pub fn register_plugin_interface(
        &mut self,
        plugin_id: &str,
        interface: impl Into<Arc<PluginInterface>>,
    ) -> bool {
        let interface = interface.into();
        let interface_name = interface.name.clone();
        if !self.registry.register(plugin_id, interface) {
            return false;
        }

        self.event_bus.publish(
            INTERFACE_REGISTERED,
            payload([
                ("plugin_id", json!(plugin_id)),
                ("interface_name", json!(interface_name)),
            ]),
        );
        true
    }

    /// Withdraw an interface; publishes `interface_unregistered` when it existed
    pub fn unregister_plugin_interface(&mut self, interface_name: &str) -> bool {
        let Some(provider) = self.registry.provider_of(interface_name).map(str::to_string) else {
            return false;
        };
        self.registry.unregister(interface_name);
        self.event_bus.publish(
            INTERFACE_UNREGISTERED,
            payload([
                ("plugin_id", json!(provider)),
                ("interface_name", json!(interface_name)),
            ]),
        );
        true
    }

    pub fn subscribe_interface(&mut self, consumer_id: &str, interface_name: &str) -> bool {
        self.registry.subscribe(consumer_id, interface_name)
    }

    pub fn unsubscribe_interface(&mut self, consumer_id: &str, interface_name: &str) -> bool {
        self.registry.unsubscribe(consumer_id, interface_name)
    }

    /// Call a method on a registered interface
    ///
    /// The attempt is counted and announced as `method_called` before dispatch,
    /// so failed calls are counted too.
    pub fn call_plugin_method(
        &mut self,
        interface_name: &str,
        method_name: &str,
        args: &[Value],
    ) -> PluginResult<Value> {
        self.call_statistics.record(interface_name, method_name);
        self.event_bus.publish(
            METHOD_CALLED,
            payload([
                ("interface", json!(interface_name)),
                ("method", json!(method_name)),
                ("args", Value::Array(args.to_vec())),
            ]),
        );
        self.registry.call(interface_name, method_name, args)
    }

    /// Registered interface names, sorted
    pub fn get_available_interfaces(&self) -> Vec<String> {
        self.registry.names()
    }

    pub fn get_interface_info(&self, interface_name: &str) -> Option<InterfaceInfo> {
        self.registry.describe(interface_name)
    }

    /// Interfaces provided by one plugin, sorted
    pub fn interfaces_provided_by(&self, plugin_id: &str) -> Vec<String> {
        self.registry.provided_by(plugin_id)
    }

    pub fn get_call_statistics(&self) -> &CallStatistics {
        &self.call_statistics
    }

    pub fn clear_call_statistics(&mut self) {
        self.call_statistics.clear();
    }

    // ----------------------------------------------------------------------
    // Events
    // ----------------------------------------------------------------------

    pub fn subscribe_event(&mut self, event_name: &str, handler: EventHandler) -> bool {
        self.event_bus.subscribe(event_name, handler)
    }

    pub fn unsubscribe_event(&mut self, event_name: &str, handler: &EventHandler) -> bool {
        self.event_bus.unsubscribe(event_name, handler)
    }

    pub fn subscribe_all_events(&mut self, handler: AnyEventHandler) -> bool {
        self.event_bus.subscribe_all(handler)
    }

    pub fn unsubscribe_all_events(&mut self, handler: &AnyEventHandler) -> bool {
        self.event_bus.unsubscribe_all(handler)
    }

    /// Event names with at least one named-event handler, sorted
    pub fn subscribed_events(&self) -> Vec<String> {
        self.event_bus.subscribed_events()
    }

    pub fn publish_event(&mut self, event_name: &str, payload: Payload) -> DeliveryReport {
        self.event_bus.publish(event_name, payload)
    }

    /// Recorded events, oldest first
    pub fn get_event_history(&self, event_name: Option<&str>) -> Vec<EventRecord> {
        self.event_bus.history(event_name)
    }

    pub fn event_statistics(&self) -> BusStatistics {
        self.event_bus.statistics()
    }
}

/// Clears subscribers, interface bindings, plugins and call counters
///
/// The event history survives so a host can inspect what happened after
/// shutdown.
impl Cleanup for InteractionManager {
    fn cleanup(&mut self) {
        log::debug!(
            "Cleaning up interaction manager: {} plugin(s), {} interface(s)",
            self.graph.len(),
            self.registry.len()
        );
        self.event_bus.cleanup();
        self.registry.cleanup();
        self.graph.cleanup();
        self.call_statistics.clear();
    }
}
