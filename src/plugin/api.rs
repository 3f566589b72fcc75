//! Public API for the plugin system
//!
//! External modules should import from here rather than directly from internal modules.

// Interaction façade
pub use crate::core::cleanup::Cleanup;
pub use crate::plugin::manager::{InteractionManager, ManagerConfig};

// Error handling
pub use crate::plugin::error::{CycleError, MethodError, PluginError, PluginResult};

// Plugin identity, dependencies and status
pub use crate::plugin::types::{
    Dependency, DependencyKind, DependencyReport, PluginDescriptor, PluginStatus,
};

// Dependency resolution
pub use crate::plugin::dependency::DependencyGraph;

// Interfaces and dispatch
pub use crate::plugin::interface::{InterfaceInfo, MethodFn, MethodResult, PluginInterface};
pub use crate::plugin::registry::InterfaceRegistry;
pub use crate::plugin::statistics::CallStatistics;

// Lifecycle contract and host
pub use crate::plugin::host::{ActivationReport, PluginHost};
pub use crate::plugin::loader::BuiltinLoader;
pub use crate::plugin::traits::{Plugin, PluginLoader};

// Enable flag persistence
pub use crate::plugin::settings::{ConfigStore, EnabledFlags, MemoryConfigStore, TomlConfigStore};
