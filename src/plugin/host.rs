//! Plugin Host
//!
//! Drives plugin lifecycles against an `InteractionManager`: discovery through a
//! loader, activation in dependency order, deactivation, removal, enable flags
//! and shutdown.

use crate::core::cleanup::Cleanup;
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::manager::{InteractionManager, ManagerConfig};
use crate::plugin::settings::{ConfigStore, EnabledFlags};
use crate::plugin::traits::{Plugin, PluginLoader};
use crate::plugin::types::PluginStatus;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Outcome of `PluginHost::activate_all`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivationReport {
    /// Plugins that reached `Active`, in activation order
    pub activated: Vec<String>,
    /// Plugins that ended in `Error`, with the reasons
    pub failed: BTreeMap<String, Vec<String>>,
    /// Disabled or already active plugins
    pub skipped: Vec<String>,
}

impl ActivationReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Owns the interaction manager, a loader and the loaded plugin handles
pub struct PluginHost<L: PluginLoader> {
    manager: InteractionManager,
    loader: L,
    store: Box<dyn ConfigStore>,
    plugins: HashMap<String, Box<dyn Plugin>>,
    enabled: EnabledFlags,
    activation_order: Vec<String>,
}

impl<L: PluginLoader> PluginHost<L> {
    pub fn new(loader: L, store: Box<dyn ConfigStore>) -> PluginResult<Self> {
        Self::with_config(loader, store, ManagerConfig::default())
    }

    pub fn with_config(
        loader: L,
        store: Box<dyn ConfigStore>,
        config: ManagerConfig,
    ) -> PluginResult<Self> {
        let enabled = store.load_enabled_flags()?;
        Ok(Self {
            manager: InteractionManager::with_config(config),
            loader,
            store,
            plugins: HashMap::new(),
            enabled,
            activation_order: Vec::new(),
        })
    }

    pub fn manager(&self) -> &InteractionManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut InteractionManager {
        &mut self.manager
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Loaded plugin ids in registration order
    pub fn plugin_ids(&self) -> Vec<String> {
        self.manager
            .graph()
            .plugin_ids()
            .into_iter()
            .filter(|id| self.plugins.contains_key(id))
            .collect()
    }

    /// Plugins activated and not yet deactivated, in activation order
    pub fn activation_order(&self) -> &[String] {
        &self.activation_order
    }

    pub fn is_enabled(&self, plugin_id: &str) -> bool {
        self.enabled.get(plugin_id).copied().unwrap_or(true)
    }

    /// Load every plugin the loader offers and register its descriptor
    ///
    /// A plugin that fails to load is logged and left out.
    pub fn discover(&mut self) -> PluginResult<Vec<String>> {
        let mut discovered = Vec::new();
        for id in self.loader.available() {
            match self.loader.load(&id) {
                Ok(plugin) => {
                    discovered.push(self.add_plugin(plugin)?);
                }
                Err(e) => {
                    log::warn!("Skipping plugin '{}': {}", id, e);
                }
            }
        }
        log::info!("Discovered {} plugin(s)", discovered.len());
        Ok(discovered)
    }

    /// Register an already loaded plugin; returns its id
    pub fn add_plugin(&mut self, plugin: Box<dyn Plugin>) -> PluginResult<String> {
        let mut descriptor = plugin.descriptor();
        descriptor.status = PluginStatus::Inactive;
        let id = descriptor.id.clone();

        if self.plugins.contains_key(&id) {
            return Err(PluginError::LoadError {
                plugin_name: id,
                cause: "a plugin with this id is already loaded".to_string(),
            });
        }

        self.manager.register_plugin(descriptor)?;
        self.plugins.insert(id.clone(), plugin);

        if !self.is_enabled(&id) {
            self.manager.set_plugin_status(&id, PluginStatus::Disabled)?;
        }
        log::debug!("Loaded plugin '{}'", id);
        Ok(id)
    }

    /// Activate every enabled plugin in dependency order
    ///
    /// A dependency cycle aborts before any plugin is touched. Individual
    /// activation failures are collected in the report.
    pub fn activate_all(&mut self) -> PluginResult<ActivationReport> {
        let order = self.manager.compute_load_order()?;
        let mut report = ActivationReport::default();

        for id in order {
            if !self.plugins.contains_key(&id) {
                continue;
            }
            match self.manager.plugin_status(&id) {
                Some(PluginStatus::Disabled) | Some(PluginStatus::Active) => {
                    report.skipped.push(id);
                    continue;
                }
                _ => {}
            }

            match self.activate(&id) {
                Ok(()) => report.activated.push(id),
                Err(e) => {
                    let reasons = match e {
                        PluginError::DependencyUnsatisfied { errors, .. } => errors,
                        other => vec![other.to_string()],
                    };
                    report.failed.insert(id, reasons);
                }
            }
        }

        log::info!(
            "Activation complete: {} active, {} failed, {} skipped",
            report.activated.len(),
            report.failed.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Activate one plugin whose dependencies are already active
    pub fn activate(&mut self, plugin_id: &str) -> PluginResult<()> {
        let plugin = self
            .plugins
            .get_mut(plugin_id)
            .ok_or_else(|| PluginError::PluginNotFound {
                plugin_name: plugin_id.to_string(),
            })?;

        if self.manager.plugin_status(plugin_id) == Some(PluginStatus::Active) {
            return Ok(());
        }

        self.manager
            .set_plugin_status(plugin_id, PluginStatus::Loading)?;

        let report = self.manager.check_dependencies(plugin_id);
        for warning in &report.warnings {
            log::warn!("Plugin '{}': {}", plugin_id, warning);
        }
        if !report.valid {
            self.manager.set_plugin_status(plugin_id, PluginStatus::Error)?;
            return Err(PluginError::DependencyUnsatisfied {
                plugin_id: plugin_id.to_string(),
                errors: report.errors,
            });
        }

        if let Err(e) = plugin.initialize(&mut self.manager) {
            log::warn!("Plugin '{}' failed to initialize: {}", plugin_id, e);
            self.manager.set_plugin_status(plugin_id, PluginStatus::Error)?;
            return Err(e);
        }

        self.manager
            .set_plugin_status(plugin_id, PluginStatus::Active)?;

        if let Some(interface) = plugin.interface() {
            let name = interface.name.clone();
            if !self.manager.register_plugin_interface(plugin_id, interface) {
                log::warn!(
                    "Plugin '{}' is active but its interface '{}' was not registered",
                    plugin_id,
                    name
                );
            }
        }

        self.activation_order.push(plugin_id.to_string());
        log::debug!("Activated plugin '{}'", plugin_id);
        Ok(())
    }

    /// Deactivate an active plugin; other statuses are left alone
    ///
    /// The plugin ends `Inactive` even when its `cleanup` fails; that error is
    /// returned afterwards.
    pub fn deactivate(&mut self, plugin_id: &str) -> PluginResult<()> {
        let plugin = self
            .plugins
            .get_mut(plugin_id)
            .ok_or_else(|| PluginError::PluginNotFound {
                plugin_name: plugin_id.to_string(),
            })?;

        if self.manager.plugin_status(plugin_id) != Some(PluginStatus::Active) {
            return Ok(());
        }

        let active_dependents: Vec<String> = self
            .manager
            .graph()
            .dependents_of(plugin_id)
            .into_iter()
            .filter(|id| self.manager.plugin_status(id) == Some(PluginStatus::Active))
            .collect();
        if !active_dependents.is_empty() {
            log::warn!(
                "Deactivating '{}' while dependents are active: {}",
                plugin_id,
                active_dependents.join(", ")
            );
        }

        let cleanup_result = plugin.cleanup(&mut self.manager);

        for name in self.manager.interfaces_provided_by(plugin_id) {
            self.manager.unregister_plugin_interface(&name);
        }
        self.manager
            .set_plugin_status(plugin_id, PluginStatus::Inactive)?;
        self.activation_order.retain(|id| id != plugin_id);
        log::debug!("Deactivated plugin '{}'", plugin_id);

        cleanup_result.map_err(|e| PluginError::ExecutionError {
            plugin_name: plugin_id.to_string(),
            operation: "cleanup".to_string(),
            cause: e.to_string(),
        })
    }

    /// Deactivate if needed and drop the plugin entirely
    pub fn remove(&mut self, plugin_id: &str) -> PluginResult<Box<dyn Plugin>> {
        if !self.plugins.contains_key(plugin_id) {
            return Err(PluginError::PluginNotFound {
                plugin_name: plugin_id.to_string(),
            });
        }

        let deactivated = self.deactivate(plugin_id);
        self.manager.unregister_plugin(plugin_id);
        let plugin = self
            .plugins
            .remove(plugin_id)
            .ok_or_else(|| PluginError::PluginNotFound {
                plugin_name: plugin_id.to_string(),
            })?;

        if let Err(e) = deactivated {
            log::warn!("Removed plugin '{}' after failed cleanup: {}", plugin_id, e);
        }
        Ok(plugin)
    }

    /// Switch a plugin on or off and persist the flag
    ///
    /// Disabling deactivates an active plugin first. Enabling moves a disabled
    /// plugin back to `Inactive`; it is not activated.
    pub fn set_enabled(&mut self, plugin_id: &str, enabled: bool) -> PluginResult<()> {
        let status =
            self.manager
                .plugin_status(plugin_id)
                .ok_or_else(|| PluginError::PluginNotFound {
                    plugin_name: plugin_id.to_string(),
                })?;

        if enabled {
            if status == PluginStatus::Disabled {
                self.manager
                    .set_plugin_status(plugin_id, PluginStatus::Inactive)?;
            }
        } else if status != PluginStatus::Disabled {
            if status == PluginStatus::Active {
                if let Err(e) = self.deactivate(plugin_id) {
                    log::warn!("{}", e);
                }
            }
            self.manager
                .set_plugin_status(plugin_id, PluginStatus::Disabled)?;
        }

        self.enabled.insert(plugin_id.to_string(), enabled);
        self.store.save_enabled_flags(&self.enabled)?;
        log::info!(
            "Plugin '{}' {}",
            plugin_id,
            if enabled { "enabled" } else { "disabled" }
        );
        Ok(())
    }

    /// Run an active plugin's entry point
    pub fn execute(&mut self, plugin_id: &str, args: &[String]) -> PluginResult<()> {
        let plugin = self
            .plugins
            .get_mut(plugin_id)
            .ok_or_else(|| PluginError::PluginNotFound {
                plugin_name: plugin_id.to_string(),
            })?;

        match self.manager.plugin_status(plugin_id) {
            Some(PluginStatus::Active) => plugin.execute(args),
            status => Err(PluginError::ExecutionError {
                plugin_name: plugin_id.to_string(),
                operation: "execute".to_string(),
                cause: format!(
                    "plugin is not active (status: {})",
                    status.unwrap_or_default()
                ),
            }),
        }
    }

    /// Deactivate in reverse activation order, then clean up the manager
    ///
    /// Returns the ids that were deactivated. Loaded handles are dropped.
    pub fn shutdown(&mut self) -> Vec<String> {
        let mut deactivated = Vec::new();
        let order: Vec<String> = self.activation_order.iter().rev().cloned().collect();
        for id in order {
            if let Err(e) = self.deactivate(&id) {
                log::warn!("{}", e);
            }
            deactivated.push(id);
        }

        self.manager.cleanup();
        self.plugins.clear();
        self.activation_order.clear();
        log::info!("Plugin host shut down ({} deactivated)", deactivated.len());
        deactivated
    }
}
