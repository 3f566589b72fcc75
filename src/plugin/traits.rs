//! Plugin Trait System
//!
//! The lifecycle contract a loaded plugin satisfies and the loader contract
//! that turns a plugin id into such a handle.
//!
//! A plugin never receives a reference to another plugin. During `initialize`
//! it gets the interaction manager, through which it can subscribe to events,
//! publish events and call interfaces of plugins that are already active.

use crate::plugin::error::PluginResult;
use crate::plugin::interface::PluginInterface;
use crate::plugin::manager::InteractionManager;
use crate::plugin::types::PluginDescriptor;
use std::sync::Arc;

/// Base plugin trait that all plugins must implement
pub trait Plugin: Send {
    /// Identity and declared dependencies
    ///
    /// The status field is ignored; the host registers every plugin as
    /// `Inactive`.
    fn descriptor(&self) -> PluginDescriptor;

    /// Prepare the plugin once its dependencies are active
    fn initialize(&mut self, manager: &mut InteractionManager) -> PluginResult<()>;

    /// Run the plugin's own entry point
    fn execute(&mut self, args: &[String]) -> PluginResult<()>;

    /// Release resources and drop event subscriptions made in `initialize`
    fn cleanup(&mut self, manager: &mut InteractionManager) -> PluginResult<()>;

    /// Interface to publish after a successful `initialize`
    fn interface(&self) -> Option<Arc<PluginInterface>> {
        None
    }
}

/// Turns plugin ids into plugin handles
///
/// How the code behind an id is located is up to the implementation.
pub trait PluginLoader {
    /// Ids this loader can produce, in a stable order
    fn available(&self) -> Vec<String>;

    /// Create a fresh handle for `plugin_id`
    fn load(&self, plugin_id: &str) -> PluginResult<Box<dyn Plugin>>;
}
