//! Plugin Test Utilities
//!
//! Configurable mock plugins and a mock loader shared by the test modules.

use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::interface::PluginInterface;
use crate::plugin::manager::InteractionManager;
use crate::plugin::traits::{Plugin, PluginLoader};
use crate::plugin::types::{Dependency, PluginDescriptor};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Lifecycle calls observed across all mocks of one test, in order
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn new_call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Configurable mock plugin for lifecycle testing
#[derive(Debug, Clone)]
pub struct MockPlugin {
    pub id: String,
    pub dependencies: Vec<Dependency>,
    pub interface_name: Option<String>,
    pub should_fail_initialize: bool,
    pub should_fail_cleanup: bool,
    pub log: CallLog,
}

impl MockPlugin {
    pub fn new(id: &str, log: &CallLog) -> Self {
        Self {
            id: id.to_string(),
            dependencies: Vec::new(),
            interface_name: None,
            should_fail_initialize: false,
            should_fail_cleanup: false,
            log: Arc::clone(log),
        }
    }

    pub fn requires(mut self, target: &str) -> Self {
        self.dependencies.push(Dependency::required(target));
        self
    }

    pub fn optionally_uses(mut self, target: &str) -> Self {
        self.dependencies.push(Dependency::optional(target));
        self
    }

    pub fn conflicts_with(mut self, target: &str) -> Self {
        self.dependencies.push(Dependency::conflict(target));
        self
    }

    /// Publish an interface with a `ping` method returning the plugin id
    pub fn providing(mut self, interface_name: &str) -> Self {
        self.interface_name = Some(interface_name.to_string());
        self
    }

    pub fn failing_initialize(mut self) -> Self {
        self.should_fail_initialize = true;
        self
    }

    pub fn failing_cleanup(mut self) -> Self {
        self.should_fail_cleanup = true;
        self
    }

    fn record(&self, call: &str) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}", call, self.id));
    }
}

impl Plugin for MockPlugin {
    fn descriptor(&self) -> PluginDescriptor {
        PluginDescriptor::new(self.id.clone()).with_dependencies(self.dependencies.clone())
    }

    fn initialize(&mut self, _manager: &mut InteractionManager) -> PluginResult<()> {
        self.record("initialize");
        if self.should_fail_initialize {
            return Err(PluginError::ExecutionError {
                plugin_name: self.id.clone(),
                operation: "initialize".to_string(),
                cause: "mock initialize failure".to_string(),
            });
        }
        Ok(())
    }

    fn execute(&mut self, args: &[String]) -> PluginResult<()> {
        self.record(&format!("execute({})", args.join(" ")));
        Ok(())
    }

    fn cleanup(&mut self, _manager: &mut InteractionManager) -> PluginResult<()> {
        self.record("cleanup");
        if self.should_fail_cleanup {
            return Err(PluginError::ExecutionError {
                plugin_name: self.id.clone(),
                operation: "cleanup".to_string(),
                cause: "mock cleanup failure".to_string(),
            });
        }
        Ok(())
    }

    fn interface(&self) -> Option<Arc<PluginInterface>> {
        let name = self.interface_name.as_ref()?;
        let id = self.id.clone();
        Some(Arc::new(
            PluginInterface::new(name.clone(), "1.0")
                .with_method("ping", move |_args| Ok(json!(id.clone()))),
        ))
    }
}

/// Loader serving clones of preconfigured mock plugins
#[derive(Debug, Default)]
pub struct MockLoader {
    plugins: BTreeMap<String, MockPlugin>,
    broken: Vec<String>,
}

impl MockLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, plugin: MockPlugin) -> Self {
        self.plugins.insert(plugin.id.clone(), plugin);
        self
    }

    /// Advertise an id that fails to load
    pub fn with_broken(mut self, id: &str) -> Self {
        self.broken.push(id.to_string());
        self
    }
}

impl PluginLoader for MockLoader {
    fn available(&self) -> Vec<String> {
        self.plugins
            .keys()
            .cloned()
            .chain(self.broken.iter().cloned())
            .collect()
    }

    fn load(&self, plugin_id: &str) -> PluginResult<Box<dyn Plugin>> {
        match self.plugins.get(plugin_id) {
            Some(plugin) => Ok(Box::new(plugin.clone())),
            None => Err(PluginError::LoadError {
                plugin_name: plugin_id.to_string(),
                cause: "mock loader cannot produce this plugin".to_string(),
            }),
        }
    }
}
