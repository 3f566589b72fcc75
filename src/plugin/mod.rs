//! Plugin System Module
//!
//! Dependency resolution with load ordering, the interface registry for
//! cross-plugin calls, the interaction manager façade and the lifecycle host.

// Internal modules - all access should go through api module
pub(crate) mod builtin;
pub(crate) mod dependency;
pub(crate) mod error;
pub(crate) mod host;
pub(crate) mod interface;
pub(crate) mod loader;
pub(crate) mod manager;
pub(crate) mod registry;
pub(crate) mod settings;
pub(crate) mod statistics;
pub(crate) mod traits;
pub(crate) mod types;

// Public API module - the only public interface for the plugin system
pub mod api;

#[cfg(test)]
mod error_tests;
#[cfg(test)]
mod tests;
