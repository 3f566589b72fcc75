//! Loader for plugins compiled into the binary

use crate::plugin::builtin::api::{get_all_builtin_plugins, BuiltinPluginEntry};
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::traits::{Plugin, PluginLoader};

/// Resolves ids against the built-in plugins registered with `builtin!`
pub struct BuiltinLoader {
    entries: Vec<&'static BuiltinPluginEntry>,
}

impl BuiltinLoader {
    pub fn new() -> Self {
        let mut entries = get_all_builtin_plugins();
        entries.sort_by_key(|entry| entry.id);
        log::trace!("Builtin loader found {} plugin(s)", entries.len());
        Self { entries }
    }
}

impl Default for BuiltinLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginLoader for BuiltinLoader {
    fn available(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.id.to_string()).collect()
    }

    fn load(&self, plugin_id: &str) -> PluginResult<Box<dyn Plugin>> {
        self.entries
            .iter()
            .find(|entry| entry.id == plugin_id)
            .map(|entry| (entry.factory)())
            .ok_or_else(|| PluginError::PluginNotFound {
                plugin_name: plugin_id.to_string(),
            })
    }
}
